//! Viewer facade
//!
//! The surface exposed to the surrounding application shell: construct a
//! viewer bound to a host container, request document loads, request the
//! empty scene, and answer the one-shot queries (kernel version, loaded raw
//! content). Everything else happens through messages behind the scenes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, warn};

use stepview_core::{
    ContentSink, DocumentLoader, Message, MessageKind, NoopContentSink, SceneRenderer, TickHost,
    ViewerConfig, ViewerContext, ViewerError, ViewerResult,
};

use crate::driver::TickDriver;
use crate::load_task;
use crate::scheduler::FrameScheduler;

// ----------------------------------------------------------------------------
// Viewer Builder
// ----------------------------------------------------------------------------

/// Builder-style construction for [`Viewer`], for shells that want to attach
/// a content sink or override configuration before the loop starts.
pub struct ViewerBuilder {
    container_id: String,
    config: ViewerConfig,
    content_sink: Option<Box<dyn ContentSink>>,
}

impl ViewerBuilder {
    pub fn new(container_id: impl Into<String>) -> Self {
        Self {
            container_id: container_id.into(),
            config: ViewerConfig::default(),
            content_sink: None,
        }
    }

    pub fn with_config(mut self, config: ViewerConfig) -> Self {
        self.config = config;
        self
    }

    /// Attach the side channel that receives loaded raw content.
    pub fn with_content_sink(mut self, sink: Box<dyn ContentSink>) -> Self {
        self.content_sink = Some(sink);
        self
    }

    /// Build the viewer and kick off its render loop.
    pub fn build<R, L>(self, renderer: R, loader: L, host: Arc<dyn TickHost>) -> Viewer<R, L>
    where
        R: SceneRenderer + 'static,
        L: DocumentLoader + 'static,
    {
        let context = Arc::new(ViewerContext::new());
        let sink = self
            .content_sink
            .unwrap_or_else(|| Box::new(NoopContentSink));

        let scheduler = FrameScheduler::new(Arc::clone(&context), renderer, sink, self.config);
        let driver = TickDriver::new(scheduler, host);

        // Kick off the event loop: the first NextFrame sustains itself.
        context.push_message(MessageKind::NextFrame);
        driver.request_now();
        debug!(container = %self.container_id, "viewer initialized");

        Viewer {
            context,
            driver,
            loader: Arc::new(loader),
            container_id: self.container_id,
            load_in_flight: Arc::new(AtomicBool::new(false)),
            loaded_content: Mutex::new(None),
        }
    }
}

// ----------------------------------------------------------------------------
// Viewer
// ----------------------------------------------------------------------------

/// One viewer instance: shared context, running tick loop, loader handle.
pub struct Viewer<R: SceneRenderer + 'static, L: DocumentLoader + 'static> {
    context: Arc<ViewerContext>,
    driver: Arc<TickDriver<R>>,
    loader: Arc<L>,
    container_id: String,
    load_in_flight: Arc<AtomicBool>,
    loaded_content: Mutex<Option<Arc<str>>>,
}

impl<R: SceneRenderer + 'static, L: DocumentLoader + 'static> Viewer<R, L> {
    /// Start building a viewer bound to the given host container element.
    pub fn builder(container_id: impl Into<String>) -> ViewerBuilder {
        ViewerBuilder::new(container_id)
    }

    /// Construct a viewer with default configuration.
    pub fn initialize(
        container_id: impl Into<String>,
        renderer: R,
        loader: L,
        host: Arc<dyn TickHost>,
    ) -> Self {
        ViewerBuilder::new(container_id).build(renderer, loader, host)
    }

    /// Request a background load of raw document content.
    ///
    /// Rejected while another load is in flight; loads are neither queued nor
    /// cancelled. On success the scene swap happens through the message chain
    /// once the parse completes; on parse failure the spinner keeps animating
    /// and a later `request_load` may retry.
    pub fn request_load(&self, content: &str) -> ViewerResult<()> {
        if content.trim().is_empty() {
            return Err(ViewerError::EmptyContent);
        }
        if self.load_in_flight.swap(true, Ordering::AcqRel) {
            warn!("load requested while another is in flight, rejecting");
            return Err(ViewerError::LoadInProgress);
        }

        let content: Arc<str> = Arc::from(content);
        *self.lock_content() = Some(Arc::clone(&content));

        let context = Arc::clone(&self.context);
        let driver = Arc::clone(&self.driver);
        let loader = Arc::clone(&self.loader);
        let in_flight = Arc::clone(&self.load_in_flight);
        // The parse may block for a long time; keep it off the async workers.
        tokio::task::spawn_blocking(move || {
            load_task::run(context, driver, loader, content, in_flight);
        });
        Ok(())
    }

    /// Draw the startup splash screen, a checkerboard shown before any load.
    pub fn display_splash_screen(&self) {
        self.context.push_message(MessageKind::DrawSplashScreen);
        self.driver.request_now();
    }

    /// Blank the surface and show an empty scene.
    pub fn init_empty_scene(&self) {
        self.context
            .push_message(load_task::flush_chain([
                Message::new(MessageKind::InitEmptyScene),
                Message::new(MessageKind::NextFrame),
            ]));
        // Wake the loop in case it had gone idle.
        self.driver.request_now();
    }

    // ------------------------------------------------------------------
    // One-shot queries
    // ------------------------------------------------------------------

    /// Version string of the geometry kernel behind the loader.
    pub fn kernel_version(&self) -> String {
        self.loader.kernel_version()
    }

    /// The raw content most recently handed to [`request_load`](Self::request_load).
    pub fn loaded_content(&self) -> Option<Arc<str>> {
        self.lock_content().clone()
    }

    /// Whether a load is currently in flight.
    pub fn load_in_flight(&self) -> bool {
        self.load_in_flight.load(Ordering::Acquire)
    }

    /// Id of the host container element this viewer renders into.
    pub fn container_id(&self) -> &str {
        &self.container_id
    }

    /// The shared context, for shells that need to observe viewer state.
    pub fn context(&self) -> &Arc<ViewerContext> {
        &self.context
    }

    fn lock_content(&self) -> std::sync::MutexGuard<'_, Option<Arc<str>>> {
        self.loaded_content
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

// ----------------------------------------------------------------------------
// Demo Document
// ----------------------------------------------------------------------------

/// Small embedded STEP sample for demos and smoke tests.
pub fn demo_document() -> &'static str {
    DEMO_STEP
}

const DEMO_STEP: &str = r"ISO-10303-21;
HEADER;
FILE_DESCRIPTION(('stepview demo part'),'2;1');
FILE_NAME('demo.step','2024-01-01T00:00:00',(''),(''),'','','');
FILE_SCHEMA(('AUTOMOTIVE_DESIGN { 1 0 10303 214 1 1 1 1 }'));
ENDSEC;
DATA;
#1=CARTESIAN_POINT('',(0.,0.,0.));
#2=DIRECTION('',(0.,0.,1.));
#3=DIRECTION('',(1.,0.,0.));
#4=AXIS2_PLACEMENT_3D('',#1,#2,#3);
ENDSEC;
END-ISO-10303-21;
";
