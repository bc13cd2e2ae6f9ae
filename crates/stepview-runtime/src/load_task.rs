//! Background load task
//!
//! Runs once per load request, off the scheduler thread. Everything the task
//! does to render state goes through messages; the only shared writes are the
//! spinner flag and the document handle, both published under the context
//! lock before the message that signals them.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{error, info};

use stepview_core::{
    DocumentLoader, Message, MessageKind, MessagePayload, SceneRenderer, ViewerContext,
};

use crate::driver::TickDriver;

/// Number of `ClearScreen` steps prepended to scene-transition chains.
///
/// A flush workaround for double/triple-buffered surfaces, carried over from
/// the original viewer; not a semantic requirement.
pub(crate) const CLEAR_FLUSH_COUNT: usize = 3;

/// Build a chain that blanks the surface and then runs `tail` in order.
pub(crate) fn flush_chain(tail: impl IntoIterator<Item = Message>) -> Message {
    let rest = std::iter::repeat_with(|| Message::new(MessageKind::ClearScreen))
        .take(CLEAR_FLUSH_COUNT - 1)
        .chain(tail);
    Message::chain(MessageKind::ClearScreen, rest)
}

/// Run one load attempt: spinner up, blocking parse, publish-or-log.
///
/// `in_flight` is the viewer's re-entrancy guard; it is released when the
/// loader's completion callback runs, whatever the outcome, so a failed load
/// can be retried.
pub(crate) fn run<R, L>(
    context: Arc<ViewerContext>,
    driver: Arc<TickDriver<R>>,
    loader: Arc<L>,
    content: Arc<str>,
    in_flight: Arc<AtomicBool>,
) where
    R: SceneRenderer + 'static,
    L: DocumentLoader + ?Sized,
{
    info!(bytes = content.len(), "document load starting");

    context.begin_load_cycle();
    context.push_message(MessageKind::DrawLoadingScreen);
    context.push_message(Message::with_payload(
        MessageKind::SetDocumentContent,
        MessagePayload::Text(Arc::clone(&content)),
    ));
    // Wake the scheduler so the spinner starts animating before the parse.
    driver.request_now();

    let callback_context = Arc::clone(&context);
    let callback_driver = Arc::clone(&driver);
    loader.load(
        &content,
        Box::new(move |document| {
            match document {
                None => {
                    // Terminal for this attempt: the spinner keeps animating
                    // and no structured error reaches the UI layer.
                    error!("document load failed: loader returned no handle");
                }
                Some(handle) => {
                    info!("document loaded");
                    callback_context.publish_document(handle);
                    callback_context.set_spinner(false);
                    callback_context.push_message(flush_chain([
                        Message::new(MessageKind::InitDocument),
                        Message::new(MessageKind::NextFrame),
                    ]));
                    callback_driver.request_now();
                }
            }
            in_flight.store(false, Ordering::Release);
        }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flush_chain_prepends_three_clears() {
        let mut chain = flush_chain([Message::new(MessageKind::InitDocument)]);
        assert_eq!(chain.chain_len(), CLEAR_FLUSH_COUNT + 1);

        let mut kinds = vec![chain.kind()];
        let mut current = chain.take_successor();
        while let Some(mut msg) = current {
            kinds.push(msg.kind());
            current = msg.take_successor();
        }
        assert_eq!(
            kinds,
            vec![
                MessageKind::ClearScreen,
                MessageKind::ClearScreen,
                MessageKind::ClearScreen,
                MessageKind::InitDocument,
            ]
        );
    }
}
