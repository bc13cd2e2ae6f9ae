//! Cross-thread message model
//!
//! Messages are the only unit of intent that crosses the worker/scheduler
//! boundary. A message is a kind, an optional payload, and an optional owned
//! chain of successor messages. Chains are built front-to-back and never
//! mutated afterwards, so they are acyclic by construction; the scheduler
//! consumes each message exactly once and re-enqueues the detached successor.

use std::collections::VecDeque;
use std::mem;
use std::sync::Arc;

// ----------------------------------------------------------------------------
// Message Kind
// ----------------------------------------------------------------------------

/// Enumerated tag describing what a message asks the scheduler to do.
///
/// The enum is `#[non_exhaustive]`: the scheduler treats kinds it does not
/// handle as a logged no-op, so new kinds can be added without breaking
/// existing consumers.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    /// Clear the render surface to the background color.
    ClearScreen,
    /// (Re)initialize an empty 3D scene and flag the pipeline for rebuild.
    InitEmptyScene,
    /// Bind the published document handle into the scene.
    InitDocument,
    /// Keep the render loop alive: re-push and request another tick.
    NextFrame,
    /// Draw one frame of the loading spinner.
    DrawLoadingScreen,
    /// Deliver raw document text to the surrounding UI.
    SetDocumentContent,
    /// Draw the startup splash checkerboard on the surface.
    DrawSplashScreen,
}

// ----------------------------------------------------------------------------
// Message Payload
// ----------------------------------------------------------------------------

/// Payload variants for content-carrying message kinds.
///
/// A closed tagged union rather than a type-erased `Any`: only raw document
/// text crosses the thread boundary today.
#[derive(Debug, Clone)]
pub enum MessagePayload {
    /// Raw document content (e.g. STEP file text), shared between threads.
    Text(Arc<str>),
}

// ----------------------------------------------------------------------------
// Message
// ----------------------------------------------------------------------------

/// Smallest unit of cross-thread intent: a kind, an optional payload, and an
/// owned sequence of successor messages forming a chain.
#[derive(Debug)]
pub struct Message {
    kind: MessageKind,
    payload: Option<MessagePayload>,
    successors: VecDeque<Message>,
}

impl Message {
    /// Create a standalone message without payload.
    pub fn new(kind: MessageKind) -> Self {
        Self {
            kind,
            payload: None,
            successors: VecDeque::new(),
        }
    }

    /// Create a message carrying a payload.
    pub fn with_payload(kind: MessageKind, payload: MessagePayload) -> Self {
        Self {
            kind,
            payload: Some(payload),
            successors: VecDeque::new(),
        }
    }

    /// Build a chain: `head` executes first, then each message in `rest`, in
    /// order, across one or more scheduler ticks.
    ///
    /// The whole chain enters the queue as one value, so concurrently pushed
    /// messages can never interleave between its steps.
    pub fn chain(head: impl Into<Message>, rest: impl IntoIterator<Item = Message>) -> Self {
        let mut head = head.into();
        head.successors = rest.into_iter().collect();
        head
    }

    /// The message's kind tag.
    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    /// The payload, if this kind carries one.
    pub fn payload(&self) -> Option<&MessagePayload> {
        self.payload.as_ref()
    }

    /// Convenience accessor for a text payload.
    pub fn text(&self) -> Option<&str> {
        match self.payload {
            Some(MessagePayload::Text(ref text)) => Some(text),
            None => None,
        }
    }

    /// Whether this message has at least one successor.
    pub fn has_successor(&self) -> bool {
        !self.successors.is_empty()
    }

    /// Total number of steps in this chain, including the head.
    pub fn chain_len(&self) -> usize {
        1 + self.successors.len()
    }

    /// Detach the next chain step, moving the remaining tail onto it.
    ///
    /// Returns `None` for standalone messages. The scheduler calls this after
    /// handling a message and re-enqueues the result, which is how a chain
    /// spreads over successive ticks while preserving its order.
    pub fn take_successor(&mut self) -> Option<Message> {
        let mut next = self.successors.pop_front()?;
        next.successors = mem::take(&mut self.successors);
        Some(next)
    }
}

impl From<MessageKind> for Message {
    fn from(kind: MessageKind) -> Self {
        Message::new(kind)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standalone_message_has_no_successor() {
        let mut msg = Message::new(MessageKind::ClearScreen);
        assert_eq!(msg.kind(), MessageKind::ClearScreen);
        assert!(!msg.has_successor());
        assert_eq!(msg.chain_len(), 1);
        assert!(msg.take_successor().is_none());
    }

    #[test]
    fn chain_preserves_order() {
        let chain = Message::chain(
            MessageKind::ClearScreen,
            vec![
                Message::new(MessageKind::InitEmptyScene),
                Message::new(MessageKind::NextFrame),
            ],
        );
        assert_eq!(chain.chain_len(), 3);

        let mut kinds = Vec::new();
        let mut current = Some(chain);
        while let Some(mut msg) = current {
            kinds.push(msg.kind());
            current = msg.take_successor();
        }
        assert_eq!(
            kinds,
            vec![
                MessageKind::ClearScreen,
                MessageKind::InitEmptyScene,
                MessageKind::NextFrame,
            ]
        );
    }

    #[test]
    fn take_successor_rethreads_tail() {
        let mut chain = Message::chain(
            MessageKind::ClearScreen,
            vec![
                Message::new(MessageKind::ClearScreen),
                Message::new(MessageKind::InitDocument),
                Message::new(MessageKind::NextFrame),
            ],
        );

        let next = chain.take_successor().expect("chain has a successor");
        assert_eq!(next.kind(), MessageKind::ClearScreen);
        assert_eq!(next.chain_len(), 3);
        assert!(!chain.has_successor());
    }

    #[test]
    fn text_payload_round_trips() {
        let msg = Message::with_payload(
            MessageKind::SetDocumentContent,
            MessagePayload::Text(Arc::from("ISO-10303-21;")),
        );
        assert_eq!(msg.text(), Some("ISO-10303-21;"));

        let bare = Message::new(MessageKind::SetDocumentContent);
        assert_eq!(bare.text(), None);
    }
}
