//! Async bounded LIFO on a tokio runtime.
//!
//! Run with: cargo run --example async_lifo --features async

use std::sync::Arc;
use std::time::Duration;

use lifokit::stack::AsyncBoundedLifo;
use tokio_util::sync::CancellationToken;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() {
    let stack = Arc::new(AsyncBoundedLifo::new(8));
    let shutdown = CancellationToken::new();

    let consumer = {
        let stack = Arc::clone(&stack);
        let shutdown = shutdown.child_token();
        tokio::spawn(async move {
            let mut seen = Vec::new();
            while let Ok(item) = stack.pop(&shutdown).await {
                seen.push(item);
            }
            seen
        })
    };

    for i in 0..32u32 {
        stack.push(i);
        if i % 8 == 7 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    tokio::time::sleep(Duration::from_millis(50)).await;
    shutdown.cancel();

    match consumer.await {
        Ok(seen) => println!("consumed {} items: {seen:?}", seen.len()),
        Err(err) => println!("consumer failed: {err}"),
    }

    match stack.pop_timeout(Duration::from_millis(10)).await {
        Ok(item) => println!("leftover: {item}"),
        Err(err) => println!("drained: {err}"),
    }
}
