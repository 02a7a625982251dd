// ==============================================
// ASYNC BOUNDED LIFO TESTS (integration)
// ==============================================

#![cfg(feature = "async")]

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use lifokit::builder::LifoBuilder;
use lifokit::error::CancelError;
use lifokit::stack::AsyncBoundedLifo;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn producers_and_consumers_finish_without_timeouts() {
    let stack = Arc::new(AsyncBoundedLifo::new(50));

    let mut producers = Vec::new();
    for delay_ms in [1u64, 5] {
        let stack = Arc::clone(&stack);
        producers.push(tokio::spawn(async move {
            for i in 0..100 {
                stack.push(i.to_string());
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }));
    }

    let mut consumers = Vec::new();
    for _ in 0..2 {
        let stack = Arc::clone(&stack);
        consumers.push(tokio::spawn(async move {
            for _ in 0..50 {
                stack
                    .pop_timeout(Duration::from_secs(5))
                    .await
                    .expect("pop should not time out");
            }
        }));
    }

    for handle in producers.into_iter().chain(consumers) {
        handle.await.unwrap();
    }
    assert_eq!(stack.check_invariants(), Ok(()));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn cancel_releases_all_waiters() {
    let stack: Arc<AsyncBoundedLifo<u32>> = Arc::new(AsyncBoundedLifo::new(2));
    let token = CancellationToken::new();

    let waiters: Vec<_> = (0..8)
        .map(|_| {
            let stack = Arc::clone(&stack);
            let token = token.child_token();
            tokio::spawn(async move { stack.pop(&token).await })
        })
        .collect();

    tokio::time::sleep(Duration::from_millis(20)).await;
    token.cancel();

    for waiter in waiters {
        assert_eq!(waiter.await.unwrap(), Err(CancelError::Cancelled));
    }
    stack.push(1);
    assert_eq!(stack.try_pop(), Some(1));
}

// Every pushed id ends up popped, shed, cleared, or resident, and no id is
// handed out twice while pushes, pops and clears race on the runtime.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn every_item_is_delivered_at_most_once_under_clear() {
    const PUSHERS: u64 = 4;
    const POPPERS: usize = 4;
    const PER_PUSHER: u64 = 2_000;

    let evicted = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&evicted);
    let stack = Arc::new(
        LifoBuilder::new(16)
            .on_evict(move |id: u64| sink.lock().push(id))
            .build_async(),
    );
    let popped = Arc::new(Mutex::new(Vec::new()));
    let cleared = Arc::new(AtomicUsize::new(0));
    let next_id = Arc::new(AtomicU64::new(0));

    let mut pushers = Vec::new();
    for _ in 0..PUSHERS {
        let stack = Arc::clone(&stack);
        let next_id = Arc::clone(&next_id);
        pushers.push(tokio::spawn(async move {
            for i in 0..PER_PUSHER {
                stack.push(next_id.fetch_add(1, Ordering::Relaxed));
                if i % 64 == 0 {
                    tokio::task::yield_now().await;
                }
            }
        }));
    }

    let mut poppers = Vec::new();
    for _ in 0..POPPERS {
        let stack = Arc::clone(&stack);
        let popped = Arc::clone(&popped);
        poppers.push(tokio::spawn(async move {
            let mut local = Vec::new();
            while let Ok(id) = stack.pop_timeout(Duration::from_millis(100)).await {
                local.push(id);
            }
            popped.lock().extend(local);
        }));
    }

    let clearer = {
        let stack = Arc::clone(&stack);
        let cleared = Arc::clone(&cleared);
        tokio::spawn(async move {
            for _ in 0..100 {
                cleared.fetch_add(stack.clear(), Ordering::Relaxed);
                tokio::task::yield_now().await;
            }
        })
    };

    for handle in pushers.into_iter().chain(poppers).chain([clearer]) {
        handle.await.unwrap();
    }

    assert_eq!(stack.available_permits(), stack.len());
    assert_eq!(stack.check_invariants(), Ok(()));

    let mut resident = Vec::new();
    while let Some(id) = stack.try_pop() {
        resident.push(id);
    }

    let popped = popped.lock();
    let evicted = evicted.lock();
    let mut seen = HashSet::new();
    for id in popped.iter().chain(evicted.iter()).chain(resident.iter()) {
        assert!(seen.insert(*id), "id {id} delivered twice");
    }
    let total = PUSHERS * PER_PUSHER;
    assert_eq!(seen.len() as u64 + cleared.load(Ordering::Relaxed) as u64, total);
}

#[tokio::test]
async fn resident_item_wins_over_ready_future() {
    let stack = AsyncBoundedLifo::new(2);
    stack.push("newest");

    assert_eq!(stack.pop_until(async { "stop" }).await, Ok("newest"));
    assert_eq!(stack.pop_until(async { "stop" }).await, Err("stop"));
}
