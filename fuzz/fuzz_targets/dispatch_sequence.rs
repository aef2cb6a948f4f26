#![no_main]

use callstub::{Behavior, OperationMock};
use libfuzzer_sys::fuzz_target;
use std::collections::HashMap;

// Each byte pair is one step: the high bit of the first byte selects stub or
// call, the rest picks the arguments, the second byte is the stubbed answer.
fuzz_target!(|data: &[u8]| {
    let mut mock: OperationMock<(u8,), u8> = OperationMock::new("op", Behavior::returning(0));
    let mut answers: HashMap<u8, Vec<u8>> = HashMap::new();
    let mut served: HashMap<u8, usize> = HashMap::new();
    let mut calls = 0;

    for step in data.chunks_exact(2) {
        let key = step[0] & 0x0f;
        if step[0] & 0x80 != 0 {
            mock.stub((key,)).append(Behavior::returning(step[1]));
            answers.entry(key).or_default().push(step[1]);
            continue;
        }

        let answer = mock.handle_call((key,)).expect("seeded default answers every call");
        calls += 1;
        let expected = match answers.get(&key) {
            Some(queue) => {
                let position = served.entry(key).or_insert(0);
                let value = queue[(*position).min(queue.len() - 1)];
                if *position < queue.len() - 1 {
                    *position += 1;
                }
                value
            }
            None => 0,
        };
        assert_eq!(answer, expected);
    }

    assert_eq!(mock.call_count(), calls);
    assert_eq!(mock.expectations().len(), 1 + answers.len());
});
