use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::scheduler::ChunkScheduler;

fn chunk(lines: usize) -> Vec<String> {
    vec!["line".to_string(); lines]
}

#[tokio::test]
async fn test_empty_chunk_is_a_noop() {
    let mut scheduler = ChunkScheduler::new(2);
    let ran = Arc::new(AtomicUsize::new(0));
    let ran_in_job = Arc::clone(&ran);

    scheduler
        .process_async(Vec::new(), move |_| {
            ran_in_job.fetch_add(1, Ordering::SeqCst);
        })
        .await;
    scheduler.shutdown().await;

    assert_eq!(ran.load(Ordering::SeqCst), 0);
    assert_eq!(scheduler.active_count(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrency_bound_holds() {
    let mut scheduler = ChunkScheduler::new(2);
    let running = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));

    for _ in 0..8 {
        let running = Arc::clone(&running);
        let peak = Arc::clone(&peak);
        scheduler
            .process_async(chunk(1), move |_| {
                let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                std::thread::sleep(Duration::from_millis(20));
                running.fetch_sub(1, Ordering::SeqCst);
            })
            .await;
        assert!(scheduler.active_count() <= 2);
    }
    scheduler.shutdown().await;

    assert!(peak.load(Ordering::SeqCst) <= 2);
    assert_eq!(scheduler.active_count(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_shutdown_drains_every_worker() {
    let mut scheduler = ChunkScheduler::new(3);
    let finished = Arc::new(AtomicUsize::new(0));

    for _ in 0..10 {
        let finished = Arc::clone(&finished);
        scheduler
            .process_async(chunk(2), move |_| {
                std::thread::sleep(Duration::from_millis(5));
                finished.fetch_add(1, Ordering::SeqCst);
            })
            .await;
    }
    scheduler.shutdown().await;

    assert_eq!(finished.load(Ordering::SeqCst), 10);
    assert_eq!(scheduler.active_count(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_worker_panic_releases_capacity() {
    let mut scheduler = ChunkScheduler::new(1);

    scheduler
        .process_async(chunk(1), |_| panic!("malformed chunk"))
        .await;
    scheduler.shutdown().await;
    assert_eq!(scheduler.active_count(), 0);

    // The pool still admits work after a failure
    let ran = Arc::new(AtomicUsize::new(0));
    let ran_in_job = Arc::clone(&ran);
    scheduler
        .process_async(chunk(1), move |_| {
            ran_in_job.fetch_add(1, Ordering::SeqCst);
        })
        .await;
    scheduler.shutdown().await;

    assert_eq!(ran.load(Ordering::SeqCst), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_submission_order_is_admission_order() {
    let mut scheduler = ChunkScheduler::new(1);
    let order = Arc::new(std::sync::Mutex::new(Vec::new()));

    for i in 0..5 {
        let order = Arc::clone(&order);
        scheduler
            .process_async(chunk(1), move |_| {
                if let Ok(mut order) = order.lock() {
                    order.push(i);
                }
            })
            .await;
    }
    scheduler.shutdown().await;

    assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3, 4]);
}
