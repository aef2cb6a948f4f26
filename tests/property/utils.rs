use proptest::prelude::*;

/// Small argument tuples so generated calls collide with stubs often.
pub fn call_args() -> impl Strategy<Value = (u8, bool)> {
    (0u8..8, any::<bool>())
}

pub fn call_sequence() -> impl Strategy<Value = Vec<(u8, bool)>> {
    prop::collection::vec(call_args(), 0..40)
}

/// Non-empty list of answers for one stub
pub fn answers() -> impl Strategy<Value = Vec<i32>> {
    prop::collection::vec(any::<i32>(), 1..8)
}
