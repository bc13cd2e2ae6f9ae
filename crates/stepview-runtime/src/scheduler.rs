//! Frame scheduler
//!
//! One [`FrameScheduler::tick`] is one scheduler invocation: drain the shared
//! queue, process every message strictly in order, and report whether another
//! invocation should be armed. The scheduler never blocks; between ticks the
//! driver either holds a ~60 Hz timer or the loop is idle until an external
//! wake-up.
//!
//! Conceptual states over (spinner flag × scene initialized):
//! Idle → EmptySceneReady (`InitEmptyScene`) → Loading (`DrawLoadingScreen`
//! self-sustains while the spinner flag is set) → DocumentReady (worker
//! clears the flag and chains `ClearScreen`×N → `InitDocument` →
//! `NextFrame`; the steady-state `NextFrame` keeps the render loop alive).

use std::f32::consts::TAU;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use stepview_core::{
    ContentSink, Message, MessageKind, PipelineHandle, SceneRenderer, SpinnerParams, ViewerConfig,
    ViewerContext,
};

/// Fixed re-arm interval between ticks while frames are wanted (~60 Hz).
pub const FRAME_INTERVAL: Duration = Duration::from_millis(1000 / 60);

// ----------------------------------------------------------------------------
// Tick Outcome
// ----------------------------------------------------------------------------

/// What a completed tick asks of the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Arm the frame timer for another invocation.
    Reschedule,
    /// Go idle until an external push wakes the loop again.
    Idle,
}

// ----------------------------------------------------------------------------
// Frame Scheduler
// ----------------------------------------------------------------------------

/// The UI-side message interpreter and render-state owner.
///
/// Render sub-state (current pipeline, rebuild flag, spinner angle) lives
/// here rather than in the shared context because only scheduler ticks ever
/// touch it.
pub struct FrameScheduler<R: SceneRenderer> {
    context: Arc<ViewerContext>,
    renderer: R,
    content_sink: Box<dyn ContentSink>,
    config: ViewerConfig,
    pipeline: PipelineHandle,
    rebuild_pipeline: bool,
    spinner_angle: f32,
}

impl<R: SceneRenderer> FrameScheduler<R> {
    /// Create the scheduler and build the initial render pipeline.
    pub fn new(
        context: Arc<ViewerContext>,
        mut renderer: R,
        content_sink: Box<dyn ContentSink>,
        config: ViewerConfig,
    ) -> Self {
        let pipeline = renderer.build_pipeline();
        Self {
            context,
            renderer,
            content_sink,
            config,
            pipeline,
            rebuild_pipeline: false,
            spinner_angle: 0.0,
        }
    }

    /// Run one scheduler invocation: drain, process in order, report.
    pub fn tick(&mut self) -> TickOutcome {
        let mut working = self.context.drain_messages();
        let mut next_frame_requested = false;

        while let Some(mut message) = working.pop_front() {
            match message.kind() {
                MessageKind::ClearScreen => {
                    self.renderer.clear_surface(self.config.background);
                }
                MessageKind::DrawSplashScreen => {
                    self.renderer.draw_splash();
                }
                MessageKind::InitEmptyScene => {
                    self.rebuild_pipeline = true;
                    self.renderer.init_empty_scene();
                }
                MessageKind::InitDocument => match self.context.document() {
                    Some(document) => self.renderer.bind_document_to_scene(&document),
                    // Chain ordering normally guarantees the handle exists;
                    // a violated precondition must not abort the drain.
                    None => warn!("InitDocument with no published document handle, skipping"),
                },
                MessageKind::NextFrame => {
                    self.context.push_message(MessageKind::NextFrame);
                    next_frame_requested = true;
                }
                MessageKind::DrawLoadingScreen => {
                    self.renderer.clear_surface(self.config.background);
                    if self.rebuild_pipeline {
                        self.pipeline = self.renderer.build_pipeline();
                        self.rebuild_pipeline = false;
                    }

                    self.spinner_angle =
                        (self.spinner_angle + self.config.spinner.step_radians) % TAU;
                    let params = SpinnerParams {
                        angle: self.spinner_angle,
                        color: self.config.spinner.color,
                    };
                    self.renderer.draw_spinner(&self.pipeline, &params);

                    if self.context.spinner_showing() {
                        self.context.push_message(MessageKind::DrawLoadingScreen);
                        next_frame_requested = true;
                    } else {
                        // Spinner is done: this branch stops asking for frames
                        // (without cancelling requests made by other messages
                        // in the same drain) and the pipeline gets one rebuild
                        // before the next real frame.
                        debug!("spinner flag cleared, loading screen stops rescheduling");
                        self.rebuild_pipeline = true;
                    }
                }
                MessageKind::SetDocumentContent => match message.text() {
                    Some(text) => self.content_sink.publish_source(text),
                    None => warn!("SetDocumentContent without a text payload, skipping"),
                },
                other => warn!(kind = ?other, "unhandled message kind"),
            }

            // Chains spread over ticks: one step per drain, order preserved.
            if let Some(successor) = message.take_successor() {
                self.context.push_message(successor);
                next_frame_requested = true;
            }
        }

        if next_frame_requested {
            TickOutcome::Reschedule
        } else {
            TickOutcome::Idle
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use stepview_core::{Color, DocumentHandle, MessagePayload, NoopContentSink};

    #[derive(Debug, Clone, PartialEq)]
    enum Effect {
        Clear,
        BuildPipeline,
        Spinner(u64),
        Splash,
        InitEmptyScene,
        BindDocument,
    }

    #[derive(Default)]
    struct RecordingRenderer {
        effects: Arc<Mutex<Vec<Effect>>>,
        pipelines_built: u64,
    }

    impl RecordingRenderer {
        fn new() -> (Self, Arc<Mutex<Vec<Effect>>>) {
            let effects = Arc::new(Mutex::new(Vec::new()));
            (
                Self {
                    effects: Arc::clone(&effects),
                    pipelines_built: 0,
                },
                effects,
            )
        }
    }

    impl SceneRenderer for RecordingRenderer {
        fn clear_surface(&mut self, _color: Color) {
            self.effects.lock().unwrap().push(Effect::Clear);
        }

        fn build_pipeline(&mut self) -> PipelineHandle {
            self.pipelines_built += 1;
            self.effects.lock().unwrap().push(Effect::BuildPipeline);
            PipelineHandle::new(self.pipelines_built)
        }

        fn draw_spinner(&mut self, pipeline: &PipelineHandle, _params: &SpinnerParams) {
            self.effects
                .lock()
                .unwrap()
                .push(Effect::Spinner(pipeline.id()));
        }

        fn draw_splash(&mut self) {
            self.effects.lock().unwrap().push(Effect::Splash);
        }

        fn init_empty_scene(&mut self) {
            self.effects.lock().unwrap().push(Effect::InitEmptyScene);
        }

        fn bind_document_to_scene(&mut self, _document: &DocumentHandle) {
            self.effects.lock().unwrap().push(Effect::BindDocument);
        }
    }

    fn scheduler_with_recorder(
        context: Arc<ViewerContext>,
    ) -> (FrameScheduler<RecordingRenderer>, Arc<Mutex<Vec<Effect>>>) {
        let (renderer, effects) = RecordingRenderer::new();
        let scheduler = FrameScheduler::new(
            context,
            renderer,
            Box::new(NoopContentSink),
            ViewerConfig::default(),
        );
        // Drop the construction-time pipeline build from the record so tests
        // assert on tick effects only.
        effects.lock().unwrap().clear();
        (scheduler, effects)
    }

    #[test]
    fn empty_drain_goes_idle() {
        let context = Arc::new(ViewerContext::new());
        let (mut scheduler, effects) = scheduler_with_recorder(Arc::clone(&context));

        assert_eq!(scheduler.tick(), TickOutcome::Idle);
        assert!(effects.lock().unwrap().is_empty());
    }

    #[test]
    fn repeated_clear_screen_is_idempotent_and_idle() {
        let context = Arc::new(ViewerContext::new());
        let (mut scheduler, effects) = scheduler_with_recorder(Arc::clone(&context));

        for _ in 0..3 {
            context.push_message(MessageKind::ClearScreen);
        }
        assert_eq!(scheduler.tick(), TickOutcome::Idle);
        // Three clears, no other observable state.
        assert_eq!(
            *effects.lock().unwrap(),
            vec![Effect::Clear, Effect::Clear, Effect::Clear]
        );
        assert_eq!(context.pending_messages(), 0);
    }

    #[test]
    fn splash_screen_draws_and_goes_idle() {
        let context = Arc::new(ViewerContext::new());
        let (mut scheduler, effects) = scheduler_with_recorder(Arc::clone(&context));

        context.push_message(MessageKind::DrawSplashScreen);
        assert_eq!(scheduler.tick(), TickOutcome::Idle);
        assert_eq!(*effects.lock().unwrap(), vec![Effect::Splash]);
        assert_eq!(context.pending_messages(), 0);
    }

    #[test]
    fn next_frame_reschedules_and_repushes() {
        let context = Arc::new(ViewerContext::new());
        let (mut scheduler, _effects) = scheduler_with_recorder(Arc::clone(&context));

        context.push_message(MessageKind::NextFrame);
        assert_eq!(scheduler.tick(), TickOutcome::Reschedule);
        assert_eq!(context.pending_messages(), 1);

        // The loop sustains itself tick after tick.
        assert_eq!(scheduler.tick(), TickOutcome::Reschedule);
        assert_eq!(context.pending_messages(), 1);
    }

    #[test]
    fn chain_spreads_one_step_per_tick_in_order() {
        let context = Arc::new(ViewerContext::new());
        let (mut scheduler, effects) = scheduler_with_recorder(Arc::clone(&context));

        context.push_message(Message::chain(
            MessageKind::ClearScreen,
            vec![
                Message::new(MessageKind::ClearScreen),
                Message::new(MessageKind::ClearScreen),
                Message::new(MessageKind::InitEmptyScene),
                Message::new(MessageKind::NextFrame),
            ],
        ));

        // Four ticks of one chain step each, all demanding a reschedule.
        for _ in 0..4 {
            assert_eq!(scheduler.tick(), TickOutcome::Reschedule);
        }
        assert_eq!(
            *effects.lock().unwrap(),
            vec![
                Effect::Clear,
                Effect::Clear,
                Effect::Clear,
                Effect::InitEmptyScene,
            ]
        );

        // Final step is the steady-state NextFrame; spinner and document
        // are untouched by the whole chain.
        assert_eq!(scheduler.tick(), TickOutcome::Reschedule);
        assert!(!context.spinner_showing());
        assert!(context.document().is_none());
    }

    #[test]
    fn loading_screen_self_sustains_while_spinner_is_up() {
        let context = Arc::new(ViewerContext::new());
        let (mut scheduler, effects) = scheduler_with_recorder(Arc::clone(&context));

        context.set_spinner(true);
        context.push_message(MessageKind::DrawLoadingScreen);

        for _ in 0..3 {
            assert_eq!(scheduler.tick(), TickOutcome::Reschedule);
        }
        let spinner_frames = effects
            .lock()
            .unwrap()
            .iter()
            .filter(|e| matches!(e, Effect::Spinner(_)))
            .count();
        assert_eq!(spinner_frames, 3);
        // Queue still holds the next DrawLoadingScreen.
        assert_eq!(context.pending_messages(), 1);
    }

    #[test]
    fn spinner_termination_stops_rescheduling_from_that_branch() {
        let context = Arc::new(ViewerContext::new());
        let (mut scheduler, effects) = scheduler_with_recorder(Arc::clone(&context));

        context.set_spinner(true);
        context.push_message(MessageKind::DrawLoadingScreen);
        assert_eq!(scheduler.tick(), TickOutcome::Reschedule);

        // Worker flips the flag; the queued stale DrawLoadingScreen still
        // draws one frame but requests nothing further.
        context.set_spinner(false);
        assert_eq!(scheduler.tick(), TickOutcome::Idle);
        assert_eq!(context.pending_messages(), 0);

        let spinner_frames = effects
            .lock()
            .unwrap()
            .iter()
            .filter(|e| matches!(e, Effect::Spinner(_)))
            .count();
        assert_eq!(spinner_frames, 2);
    }

    #[test]
    fn spinner_termination_does_not_cancel_other_reschedules() {
        let context = Arc::new(ViewerContext::new());
        let (mut scheduler, _effects) = scheduler_with_recorder(Arc::clone(&context));

        // NextFrame earlier in the same drain keeps the loop alive even
        // though the loading-screen branch stops asking.
        context.push_message(MessageKind::NextFrame);
        context.push_message(MessageKind::DrawLoadingScreen);
        assert_eq!(scheduler.tick(), TickOutcome::Reschedule);
    }

    #[test]
    fn pipeline_rebuilds_once_after_scene_init() {
        let context = Arc::new(ViewerContext::new());
        let (mut scheduler, effects) = scheduler_with_recorder(Arc::clone(&context));

        context.set_spinner(true);
        context.push_message(MessageKind::InitEmptyScene);
        context.push_message(MessageKind::DrawLoadingScreen);
        scheduler.tick();
        scheduler.tick(); // self-pushed DrawLoadingScreen, no rebuild flag now

        let rebuilds = effects
            .lock()
            .unwrap()
            .iter()
            .filter(|e| matches!(e, Effect::BuildPipeline))
            .count();
        assert_eq!(rebuilds, 1);

        // The later spinner frame drew with the rebuilt pipeline.
        let last_spinner = effects
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find_map(|e| match e {
                Effect::Spinner(id) => Some(*id),
                _ => None,
            })
            .expect("a spinner frame was drawn");
        assert_eq!(last_spinner, 2);
    }

    #[test]
    fn init_document_binds_published_handle() {
        let context = Arc::new(ViewerContext::new());
        let (mut scheduler, effects) = scheduler_with_recorder(Arc::clone(&context));

        context.publish_document(DocumentHandle::new("model"));
        context.push_message(MessageKind::InitDocument);
        assert_eq!(scheduler.tick(), TickOutcome::Idle);
        assert_eq!(*effects.lock().unwrap(), vec![Effect::BindDocument]);
    }

    #[test]
    fn init_document_without_handle_is_contained() {
        let context = Arc::new(ViewerContext::new());
        let (mut scheduler, effects) = scheduler_with_recorder(Arc::clone(&context));

        // The malformed message is skipped; the rest of the drain proceeds.
        context.push_message(MessageKind::InitDocument);
        context.push_message(MessageKind::ClearScreen);
        assert_eq!(scheduler.tick(), TickOutcome::Idle);
        assert_eq!(*effects.lock().unwrap(), vec![Effect::Clear]);
    }

    #[test]
    fn document_content_reaches_the_sink() {
        struct CapturingSink(Arc<Mutex<Vec<String>>>);
        impl ContentSink for CapturingSink {
            fn publish_source(&self, text: &str) {
                self.0.lock().unwrap().push(text.to_string());
            }
        }

        let captured = Arc::new(Mutex::new(Vec::new()));
        let context = Arc::new(ViewerContext::new());
        let (renderer, _effects) = RecordingRenderer::new();
        let mut scheduler = FrameScheduler::new(
            Arc::clone(&context),
            renderer,
            Box::new(CapturingSink(Arc::clone(&captured))),
            ViewerConfig::default(),
        );

        context.push_message(Message::with_payload(
            MessageKind::SetDocumentContent,
            MessagePayload::Text(Arc::from("ISO-10303-21;")),
        ));
        // Payload-less delivery is a logged no-op, not a failure.
        context.push_message(MessageKind::SetDocumentContent);

        assert_eq!(scheduler.tick(), TickOutcome::Idle);
        assert_eq!(*captured.lock().unwrap(), vec!["ISO-10303-21;".to_string()]);
    }
}
