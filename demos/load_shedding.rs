//! Load shedding with a bounded LIFO work queue.
//!
//! A bursty producer outpaces a small worker pool. Workers always serve the
//! freshest request; stale ones are shed at push time and counted by the
//! eviction hook.
//!
//! Run with: cargo run --example load_shedding

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use lifokit::prelude::*;

#[derive(Debug)]
struct Request {
    id: usize,
    arrived: Instant,
}

fn main() {
    let shed = Arc::new(AtomicUsize::new(0));
    let served = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&shed);
    let queue = Arc::new(
        LifoBuilder::new(16)
            .on_evict(move |_stale: Request| {
                counter.fetch_add(1, Ordering::Relaxed);
            })
            .build(),
    );

    let shutdown = CancelToken::new();

    let workers: Vec<_> = (0..3)
        .map(|worker| {
            let queue = Arc::clone(&queue);
            let served = Arc::clone(&served);
            let ctx = shutdown.child();
            thread::spawn(move || {
                while let Ok(req) = queue.pop(&ctx) {
                    let waited = req.arrived.elapsed();
                    thread::sleep(Duration::from_millis(2));
                    served.fetch_add(1, Ordering::Relaxed);
                    if req.id % 100 == 0 {
                        println!("worker {worker}: served #{} after {waited:?}", req.id);
                    }
                }
            })
        })
        .collect();

    for id in 0..1_000 {
        queue.push(Request {
            id,
            arrived: Instant::now(),
        });
        if id % 50 == 49 {
            thread::sleep(Duration::from_millis(10));
        }
    }

    thread::sleep(Duration::from_millis(100));
    shutdown.cancel();
    for worker in workers {
        let _ = worker.join();
    }

    println!(
        "\nserved={} shed={} left={}",
        served.load(Ordering::Relaxed),
        shed.load(Ordering::Relaxed),
        queue.len()
    );
}
