#![no_main]

use libfuzzer_sys::fuzz_target;
use lifokit::ds::RecencyStack;

// Fuzz arbitrary operation sequences on RecencyStack
//
// Tests random sequences of push, pop, peek, drain_oldest and clear against
// a Vec model that keeps the newest `capacity` values.
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    // First byte picks capacity (0-32); zero is raised to 1
    let capacity = (data[0] as usize) % 33;
    let mut stack: RecencyStack<u8> = RecencyStack::new(capacity);
    let mut model: Vec<u8> = Vec::new();
    let cap = capacity.max(1);

    let mut idx = 1;
    while idx + 1 < data.len() {
        let op = data[idx] % 5;
        let value = data[idx + 1];

        match op {
            0 => {
                let evicted = stack.push(value);
                model.push(value);
                let expected = if model.len() > cap {
                    Some(model.remove(0))
                } else {
                    None
                };
                assert_eq!(evicted, expected);
            },
            1 => {
                assert_eq!(stack.pop(), model.pop());
            },
            2 => {
                assert_eq!(stack.peek(), model.last());
            },
            3 => {
                let k = (value as usize) % (cap + 2);
                let drained = stack.drain_oldest(k);
                let take = k.min(model.len());
                let expected: Vec<u8> = model.drain(..take).collect();
                assert_eq!(drained, expected);
            },
            4 => {
                stack.clear();
                model.clear();
            },
            _ => unreachable!(),
        }

        stack.debug_validate_invariants();
        assert_eq!(stack.len(), model.len());
        assert!(stack.len() <= stack.capacity());
        assert_eq!(stack.is_full(), stack.len() == cap);

        idx += 2;
    }
});
