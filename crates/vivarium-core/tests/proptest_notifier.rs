//! Property tests for change notification.
//!
//! Random sequences of subscribe / unsubscribe / notify / drain must keep
//! the notifier's bookkeeping in line with a simple model.

use proptest::prelude::*;
use vivarium_core::notify::{ChangeNotifier, Subscription};

#[derive(Debug, Clone)]
enum NotifyOp {
    Subscribe,
    Unsubscribe(usize),
    Notify,
    Drain(usize),
}

fn notify_op_strategy() -> impl Strategy<Value = NotifyOp> {
    prop_oneof![
        Just(NotifyOp::Subscribe),
        (0..16usize).prop_map(NotifyOp::Unsubscribe),
        Just(NotifyOp::Notify),
        (0..16usize).prop_map(NotifyOp::Drain),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2_000))]

    #[test]
    fn notifier_matches_model(ops in prop::collection::vec(notify_op_strategy(), 1..60)) {
        let notifier = ChangeNotifier::new();
        // Model: live subscriptions with their expected pending counts.
        let mut live: Vec<(Subscription, u32)> = Vec::new();

        for op in ops {
            match op {
                NotifyOp::Subscribe => {
                    live.push((notifier.subscribe(), 0));
                }
                NotifyOp::Unsubscribe(i) => {
                    if !live.is_empty() {
                        let (sub, _) = live.remove(i % live.len());
                        prop_assert!(notifier.unsubscribe(sub));
                    }
                }
                NotifyOp::Notify => {
                    prop_assert_eq!(notifier.notify(), live.len());
                    for (_, pending) in live.iter_mut() {
                        *pending += 1;
                    }
                }
                NotifyOp::Drain(i) => {
                    if !live.is_empty() {
                        let idx = i % live.len();
                        let (sub, expected) = &mut live[idx];
                        prop_assert_eq!(notifier.take_pending(sub), *expected);
                        *expected = 0;
                    }
                }
            }
            prop_assert_eq!(notifier.subscriber_count(), live.len());
        }

        for (sub, _) in live {
            prop_assert!(notifier.unsubscribe(sub));
        }
        prop_assert_eq!(notifier.subscriber_count(), 0);
    }
}
