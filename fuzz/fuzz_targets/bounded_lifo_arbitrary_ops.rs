#![no_main]

use std::time::Duration;

use libfuzzer_sys::fuzz_target;
use lifokit::cancel::CancelToken;
use lifokit::stack::BoundedLifo;

// Fuzz arbitrary push/pop/clear sequences on BoundedLifo
//
// Pops only use tokens that have already fired or stacks that are non-empty,
// so the target never blocks. A fired token still receives a resident item.
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    // First byte is the signed capacity; non-positive values clamp to 1
    let capacity = data[0] as i8 as isize;
    let stack: BoundedLifo<u8> = BoundedLifo::new(capacity);
    let fired = CancelToken::with_timeout(Duration::ZERO);
    let live = CancelToken::new();

    for chunk in data[1..].chunks(2) {
        let op = chunk[0] % 5;
        match op {
            0 | 1 => {
                let value = chunk.get(1).copied().unwrap_or(0);
                stack.push(value);
            },
            2 => {
                let before = stack.len();
                assert_eq!(stack.pop(&fired).is_ok(), before > 0);
                if !stack.is_empty() {
                    assert!(stack.pop(&live).is_ok());
                }
            },
            3 => {
                let before = stack.len();
                assert_eq!(stack.try_pop().is_some(), before > 0);
            },
            4 => {
                let before = stack.len();
                assert_eq!(stack.clear(), before);
                assert!(stack.is_empty());
            },
            _ => unreachable!(),
        }

        assert!(stack.check_invariants().is_ok());
        assert_eq!(stack.available_permits(), stack.len());
    }
});
