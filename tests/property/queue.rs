use callstub::{Behavior, BehaviorQueue};
use proptest::prelude::*;

use crate::utils::answers;

proptest! {
    #[test]
    fn test_queue_repeats_last_answer(values in answers(), extra in 0usize..10) {
        let mut queue: BehaviorQueue<(), i32> = BehaviorQueue::new();
        for value in &values {
            queue.append(Behavior::returning(*value));
        }

        for i in 0..values.len() + extra {
            let expected = values[i.min(values.len() - 1)];
            prop_assert_eq!(queue.consume_next(&()), Some(expected));
        }
        prop_assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_append_after_exhaustion(first in answers(), second in answers()) {
        let mut queue: BehaviorQueue<(), i32> = BehaviorQueue::new();
        for value in &first {
            queue.append(Behavior::returning(*value));
        }
        for _ in 0..first.len() {
            queue.consume_next(&());
        }
        for value in &second {
            queue.append(Behavior::returning(*value));
        }

        // The surviving last answer of `first` is served once more.
        prop_assert_eq!(queue.consume_next(&()), first.last().copied());
        for value in &second {
            prop_assert_eq!(queue.consume_next(&()), Some(*value));
        }
    }
}
