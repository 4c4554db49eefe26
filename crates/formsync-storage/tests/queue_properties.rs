//! Property tests: the pending queue is FIFO and enqueue is idempotent per
//! submission id.

use proptest::prelude::*;
use serde_json::json;

use formsync_core::models::SubmissionPayload;
use formsync_storage::LocalStore;
use test_fixtures::payload;

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn drain_preserves_insertion_order(form_ids in prop::collection::vec(1i64..20, 0..25)) {
        let rt = runtime();
        let (payloads, drained) = rt.block_on(async {
            let store = LocalStore::open_in_memory().unwrap();
            let payloads: Vec<SubmissionPayload> = form_ids
                .iter()
                .enumerate()
                .map(|(i, id)| payload(*id, json!({ "i": i })))
                .collect();
            for p in &payloads {
                store.enqueue(p).await.unwrap();
            }
            let drained = store.drain_all().await.unwrap();
            (payloads, drained)
        });

        prop_assert_eq!(drained.len(), payloads.len());
        for (queued, original) in drained.iter().zip(&payloads) {
            prop_assert_eq!(&queued.payload, original);
        }
    }

    #[test]
    fn repeated_enqueue_stores_once(repeats in 1usize..6) {
        let rt = runtime();
        let count = rt.block_on(async {
            let store = LocalStore::open_in_memory().unwrap();
            let p = payload(3, json!({"a": 1}));
            for _ in 0..repeats {
                store.enqueue(&p).await.unwrap();
            }
            store.pending_count().await.unwrap()
        });
        prop_assert_eq!(count, 1);
    }

    #[test]
    fn clear_through_splits_queue(total in 1usize..15, cut in 0usize..15) {
        let cut = cut.min(total);
        let rt = runtime();
        let (left, expected) = rt.block_on(async {
            let store = LocalStore::open_in_memory().unwrap();
            for i in 0..total {
                store.enqueue(&payload(3, json!({ "i": i }))).await.unwrap();
            }
            let all = store.drain_all().await.unwrap();
            let mark = if cut == 0 { 0 } else { all[cut - 1].seq };
            store.clear_through(mark).await.unwrap();
            (store.pending_count().await.unwrap(), total - cut)
        });
        prop_assert_eq!(left, expected);
    }
}
