//! Property tests for queue ordering and chain construction.
//!
//! The linearizability contract says the concatenation of all drains, in
//! drain order, reproduces push order exactly: nothing lost, nothing
//! duplicated, nothing reordered.

use proptest::prelude::*;
use stepview_core::{Message, MessageKind, ViewerContext};

fn kind_strategy() -> impl Strategy<Value = MessageKind> {
    prop_oneof![
        Just(MessageKind::ClearScreen),
        Just(MessageKind::InitEmptyScene),
        Just(MessageKind::InitDocument),
        Just(MessageKind::NextFrame),
        Just(MessageKind::DrawLoadingScreen),
        Just(MessageKind::SetDocumentContent),
        Just(MessageKind::DrawSplashScreen),
    ]
}

proptest! {
    #[test]
    fn drains_concatenate_to_push_order(
        batches in prop::collection::vec(prop::collection::vec(kind_strategy(), 0..16), 0..8)
    ) {
        let context = ViewerContext::new();
        let mut expected = Vec::new();
        let mut observed = Vec::new();

        for batch in &batches {
            for &kind in batch {
                context.push_message(kind);
                expected.push(kind);
            }
            observed.extend(context.drain_messages().into_iter().map(|m| m.kind()));
        }
        observed.extend(context.drain_messages().into_iter().map(|m| m.kind()));

        prop_assert_eq!(observed, expected);
    }

    #[test]
    fn chain_walks_in_construction_order(kinds in prop::collection::vec(kind_strategy(), 1..12)) {
        let mut iter = kinds.iter().copied();
        let head = iter.next().unwrap();
        let chain = Message::chain(head, iter.map(Message::new));
        prop_assert_eq!(chain.chain_len(), kinds.len());

        let mut walked = Vec::new();
        let mut current = Some(chain);
        while let Some(mut msg) = current {
            walked.push(msg.kind());
            current = msg.take_successor();
        }
        prop_assert_eq!(walked, kinds);
    }
}
