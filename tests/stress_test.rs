//! Stress tests for the taskmill pool

use crossbeam_channel::unbounded;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use taskmill::prelude::*;

fn wait_for(timeout: Duration, mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        thread::sleep(Duration::from_millis(2));
    }
    cond()
}

#[test]
#[ignore] // Run with --ignored flag
fn stress_test_many_small_tasks() {
    let pool = WorkerPool::start(4).unwrap();
    let counter = Arc::new(AtomicUsize::new(0));

    for _ in 0..10_000 {
        let counter = counter.clone();
        pool.execute(move || {
            counter.fetch_add(1, Ordering::Relaxed);
        });
    }

    assert!(wait_for(Duration::from_secs(30), || {
        counter.load(Ordering::Relaxed) == 10_000
    }));

    pool.request_shutdown();
    pool.join();
    assert_eq!(counter.load(Ordering::Relaxed), 10_000);
}

#[test]
#[ignore]
fn stress_test_concurrent_submitters() {
    let pool = Arc::new(WorkerPool::start(4).unwrap());
    let counter = Arc::new(AtomicUsize::new(0));

    let submitters: Vec<_> = (0..8)
        .map(|_| {
            let pool = Arc::clone(&pool);
            let counter = counter.clone();
            thread::spawn(move || {
                for _ in 0..500 {
                    let counter = counter.clone();
                    pool.execute(move || {
                        counter.fetch_add(1, Ordering::Relaxed);
                    });
                }
            })
        })
        .collect();

    for submitter in submitters {
        submitter.join().unwrap();
    }

    assert!(wait_for(Duration::from_secs(30), || {
        counter.load(Ordering::Relaxed) == 4000
    }));

    pool.request_shutdown();
    pool.join();
    assert_eq!(counter.load(Ordering::Relaxed), 4000);
}

#[test]
#[ignore]
fn stress_test_continuation_storm() {
    let pool = WorkerPool::start(4).unwrap();
    let (tx, rx) = unbounded();

    // every continuation lands in the queue before its producer
    let mut producer_tasks = Vec::new();
    for i in 0..200u64 {
        let (producer_task, result) = Task::with_result(move || i);
        let tx = tx.clone();
        pool.submit(Task::continuation(result, move |value: u64| {
            let _ = tx.send(value);
        }));
        producer_tasks.push(producer_task);
    }
    for producer_task in producer_tasks {
        pool.submit(producer_task);
    }
    drop(tx);

    let mut seen: Vec<u64> = Vec::with_capacity(200);
    for _ in 0..200 {
        seen.push(rx.recv_timeout(Duration::from_secs(30)).unwrap());
    }
    seen.sort_unstable();
    assert_eq!(seen, (0..200).collect::<Vec<_>>());

    pool.request_shutdown();
    pool.join();
}

#[test]
#[ignore]
fn stress_test_repeated_pool_cycles() {
    // Repeated bring-up and teardown must not leak threads or wedge
    for iteration in 0..10 {
        let pool = WorkerPool::start(2).unwrap();
        let counter = Arc::new(AtomicUsize::new(0));

        for _ in 0..100 {
            let counter = counter.clone();
            pool.execute(move || {
                counter.fetch_add(1, Ordering::Relaxed);
            });
        }

        assert!(
            wait_for(Duration::from_secs(10), || {
                counter.load(Ordering::Relaxed) == 100
            }),
            "Iteration {}",
            iteration
        );

        pool.request_shutdown();
        pool.join();
    }
}

#[test]
#[ignore]
fn stress_test_deep_recursive_submission() {
    fn descend(pool: &Arc<WorkerPool>, depth: usize, done: crossbeam_channel::Sender<usize>) {
        if depth == 0 {
            let _ = done.send(0);
            return;
        }
        let next = Arc::clone(pool);
        pool.submit(Task::immediate(move || {
            descend(&next, depth - 1, done);
        }));
    }

    let pool = Arc::new(WorkerPool::start(2).unwrap());
    let (tx, rx) = unbounded();

    descend(&pool, 64, tx);
    assert!(rx.recv_timeout(Duration::from_secs(30)).is_ok());

    pool.request_shutdown();
    pool.join();
}

#[test]
#[ignore]
fn stress_test_panic_recovery() {
    let pool = WorkerPool::start(4).unwrap();
    let counter = Arc::new(AtomicUsize::new(0));

    // Mix of panicking and non-panicking tasks
    for i in 0..1000 {
        let counter = counter.clone();
        pool.execute(move || {
            if i % 10 == 0 {
                panic!("Intentional panic");
            }
            counter.fetch_add(1, Ordering::Relaxed);
        });
    }

    assert!(wait_for(Duration::from_secs(30), || {
        counter.load(Ordering::Relaxed) == 900
    }));

    pool.request_shutdown();
    pool.join();

    #[cfg(feature = "telemetry")]
    assert_eq!(pool.metrics().tasks_panicked, 100);
}
