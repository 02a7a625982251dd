// ==============================================
// BLACK-BOX BEHAVIOUR TESTS (integration)
// ==============================================
//
// Exercises BoundedLifo purely through its public API: ordering, clamping,
// blocking, and cancellation propagation.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use lifokit::cancel::CancelToken;
use lifokit::error::CancelError;
use lifokit::stack::BoundedLifo;

fn token(secs: u64) -> CancelToken {
    CancelToken::with_timeout(Duration::from_secs(secs))
}

// ==============================================
// Ordering
// ==============================================

mod ordering {
    use super::*;

    #[test]
    fn overflow_keeps_newest_in_lifo_order() {
        let stack = BoundedLifo::new(50);
        for i in 1..101 {
            stack.push(i.to_string());
        }

        let ctx = token(5);
        for i in (51..=100).rev() {
            let item = stack.pop(&ctx).unwrap();
            assert_eq!(item, i.to_string());
        }
    }

    #[test]
    fn capacity_two_keeps_last_two() {
        let stack = BoundedLifo::new(2);
        stack.push("a");
        stack.push("b");
        stack.push("c");

        assert_eq!(stack.pop(&token(5)), Ok("c"));
        assert_eq!(stack.pop(&token(5)), Ok("b"));
        assert_eq!(stack.try_pop(), None);
    }

    #[test]
    fn interleaved_push_pop_returns_current_top() {
        let stack = BoundedLifo::new(10);
        stack.push(1);
        stack.push(2);
        assert_eq!(stack.try_pop(), Some(2));
        stack.push(3);
        assert_eq!(stack.try_pop(), Some(3));
        assert_eq!(stack.try_pop(), Some(1));
    }
}

// ==============================================
// Clamping
// ==============================================

mod clamping {
    use super::*;

    #[test]
    fn non_positive_capacities_act_like_one() {
        for capacity in [-1, 0, 1, 10] {
            let stack = BoundedLifo::new(capacity);
            for i in 0..10 {
                stack.push(i.to_string());
            }

            let item = stack.pop(&CancelToken::new()).unwrap();
            assert_eq!(item, "9");
            if capacity <= 1 {
                assert!(stack.is_empty());
            }
        }
    }
}

// ==============================================
// Blocking and Cancellation
// ==============================================

mod blocking {
    use super::*;

    #[test]
    fn pop_on_empty_waits_for_concurrent_push() {
        let stack = Arc::new(BoundedLifo::new(4));
        let ctx = token(5);
        let start = Instant::now();

        let pusher = {
            let stack = Arc::clone(&stack);
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(50));
                stack.push(String::from("late"));
            })
        };

        assert_eq!(stack.pop(&ctx).unwrap(), "late");
        assert!(start.elapsed() < Duration::from_secs(5));
        pusher.join().unwrap();
    }

    #[test]
    fn timeout_error_equals_token_error() {
        let ctx = CancelToken::with_timeout(Duration::from_millis(20));
        let stack: BoundedLifo<String> = BoundedLifo::new(0);

        let err = stack.pop(&ctx).unwrap_err();
        assert_eq!(Some(err), ctx.err());
        assert_eq!(err, CancelError::DeadlineExceeded);
    }

    #[test]
    fn explicit_cancel_error_equals_token_error() {
        let ctx = CancelToken::new();
        ctx.cancel();
        let stack: BoundedLifo<String> = BoundedLifo::new(3);

        let err = stack.pop(&ctx).unwrap_err();
        assert_eq!(Some(err), ctx.err());
        assert_eq!(err, CancelError::Cancelled);
    }

    #[test]
    fn parent_cancel_reaches_pop_on_child_token() {
        let parent = CancelToken::new();
        let child = parent.child_with_timeout(Duration::from_secs(30));
        let stack: Arc<BoundedLifo<u8>> = Arc::new(BoundedLifo::new(1));

        let popper = {
            let stack = Arc::clone(&stack);
            thread::spawn(move || stack.pop(&child))
        };

        thread::sleep(Duration::from_millis(30));
        parent.cancel();
        assert_eq!(popper.join().unwrap(), Err(CancelError::Cancelled));
    }

    #[test]
    fn repeated_immediate_cancels_do_not_leak_permits() {
        let stack: BoundedLifo<u8> = BoundedLifo::new(3);
        let fired = CancelToken::with_timeout(Duration::ZERO);

        for _ in 0..1_000 {
            assert_eq!(stack.pop(&fired), Err(CancelError::DeadlineExceeded));
        }
        assert_eq!(stack.available_permits(), 0);
        stack.push(1);
        assert_eq!(stack.try_pop(), Some(1));
    }

    #[test]
    fn expired_token_drains_resident_items_before_failing() {
        let stack = BoundedLifo::new(3);
        stack.push("a");
        stack.push("b");
        let fired = CancelToken::with_timeout(Duration::ZERO);

        assert_eq!(stack.pop(&fired), Ok("b"));
        assert_eq!(stack.pop(&fired), Ok("a"));
        assert_eq!(stack.pop(&fired), Err(CancelError::DeadlineExceeded));
        assert_eq!(stack.available_permits(), 0);
    }
}

// ==============================================
// Draining
// ==============================================

mod draining {
    use super::*;

    #[test]
    fn short_deadlines_drain_to_empty() {
        for n in [1, 5, 10, 100, 1000] {
            let stack = BoundedLifo::new(n);
            for i in 0..n {
                stack.push(i.to_string());
            }

            let mut successes = 0;
            let mut cancellations = 0;
            for _ in 0..(n + 20) {
                let ctx = CancelToken::with_timeout(Duration::from_millis(10));
                match stack.pop(&ctx) {
                    Ok(_) => successes += 1,
                    Err(_) => cancellations += 1,
                }
            }

            assert_eq!(stack.len(), 0, "expected stack to be empty for {n}");
            assert_eq!(successes, n);
            assert_eq!(cancellations, 20);
        }
    }
}

// ==============================================
// Producers and Consumers
// ==============================================

mod producers_consumers {
    use super::*;

    #[test]
    fn two_pushers_two_poppers_complete() {
        let ctx = token(5);
        let stack = Arc::new(BoundedLifo::new(50));

        let fast = {
            let stack = Arc::clone(&stack);
            thread::spawn(move || {
                for i in 0..100 {
                    stack.push(i.to_string());
                    thread::sleep(Duration::from_millis(1));
                }
            })
        };
        let slow = {
            let stack = Arc::clone(&stack);
            thread::spawn(move || {
                for i in 0..100 {
                    stack.push(i.to_string());
                    thread::sleep(Duration::from_millis(5));
                }
            })
        };

        let poppers: Vec<_> = (0..2)
            .map(|_| {
                let stack = Arc::clone(&stack);
                let ctx = ctx.clone();
                thread::spawn(move || {
                    for _ in 0..50 {
                        stack.pop(&ctx).expect("pop should not time out");
                    }
                })
            })
            .collect();

        fast.join().unwrap();
        slow.join().unwrap();
        for popper in poppers {
            popper.join().unwrap();
        }
    }
}
