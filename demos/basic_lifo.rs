//! Example demonstrating the bounded LIFO stack.
//!
//! Push never blocks: once the stack is full, the **oldest** element is
//! shed to make room. Pop returns the **newest** element and blocks until
//! one arrives or the caller's token fires.
//!
//! Run with: cargo run --example basic_lifo

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use lifokit::prelude::*;

fn main() {
    println!("=== Bounded LIFO Example ===\n");

    let stack = BoundedLifo::new(3);
    println!("Created stack: capacity={}\n", stack.capacity());

    for job in ["job-1", "job-2", "job-3", "job-4", "job-5"] {
        stack.push(job);
        println!("pushed {job:<6} len={}", stack.len());
    }
    println!("\njob-1 and job-2 were shed; newest first:");

    let ctx = CancelToken::with_timeout(Duration::from_secs(1));
    while let Ok(job) = stack.pop(&ctx) {
        println!("  popped {job}");
        if stack.is_empty() {
            break;
        }
    }

    println!("\n=== Blocking Pop ===\n");

    let stack = Arc::new(BoundedLifo::new(4));
    let producer = {
        let stack = Arc::clone(&stack);
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            stack.push(String::from("late arrival"));
        })
    };

    let ctx = CancelToken::with_timeout(Duration::from_secs(2));
    match stack.pop(&ctx) {
        Ok(item) => println!("pop waited and got: {item}"),
        Err(err) => println!("pop gave up: {err}"),
    }
    let _ = producer.join();

    println!("\n=== Deadline ===\n");

    match stack.pop_timeout(Duration::from_millis(20)) {
        Ok(item) => println!("unexpected item: {item}"),
        Err(err) => println!("empty stack, pop returned: {err}"),
    }

    println!("\n=== Cancellation ===\n");

    let root = CancelToken::new();
    let child = root.child_with_timeout(Duration::from_secs(30));
    let waiter = {
        let stack = Arc::clone(&stack);
        thread::spawn(move || stack.pop(&child))
    };
    thread::sleep(Duration::from_millis(20));
    root.cancel();
    if let Ok(result) = waiter.join() {
        println!("waiter on child token returned: {result:?}");
    }
}
