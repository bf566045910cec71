//! Stress tests for memdb.
//!
//! These helpers drive a shared [`Store`] from many threads at once.

use memdb_core::{Store, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use crate::fixtures::{User, USERS};

/// Result of a stress test run.
#[derive(Debug, Clone)]
pub struct StressTestResult {
    /// Total operations performed.
    pub total_ops: usize,
    /// Successful operations.
    pub successful_ops: usize,
    /// Failed operations.
    pub failed_ops: usize,
    /// Total duration.
    pub duration: Duration,
    /// Operations per second.
    pub ops_per_second: f64,
}

impl StressTestResult {
    /// Creates a new result.
    pub fn new(successful: usize, failed: usize, duration: Duration) -> Self {
        let total = successful + failed;
        let ops_per_second = if duration.as_secs_f64() > 0.0 {
            total as f64 / duration.as_secs_f64()
        } else {
            0.0
        };

        Self {
            total_ops: total,
            successful_ops: successful,
            failed_ops: failed,
            duration,
            ops_per_second,
        }
    }
}

/// Configuration for stress tests.
#[derive(Debug, Clone)]
pub struct StressConfig {
    /// Number of operations to perform across all threads.
    pub operations: usize,
    /// Number of concurrent threads.
    pub threads: usize,
    /// Number of records added before a mixed workload starts.
    pub record_count: usize,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            operations: 10_000,
            threads: 4,
            record_count: 1_000,
        }
    }
}

/// Identifiers handed out during a concurrent add run.
#[derive(Debug, Clone)]
pub struct ConcurrentAddOutcome {
    /// Counts and timing.
    pub result: StressTestResult,
    /// Every identifier returned by a successful add, in no particular order.
    pub ids: Vec<Value>,
}

/// Adds `config.operations` users to one collection from `config.threads`
/// threads and collects the returned identifiers.
pub fn stress_concurrent_adds(store: Arc<Store>, config: &StressConfig) -> ConcurrentAddOutcome {
    let failed = Arc::new(AtomicUsize::new(0));
    let ids = Arc::new(Mutex::new(Vec::with_capacity(config.operations)));
    let threads = config.threads.max(1);
    let per_thread = config.operations / threads;
    let remainder = config.operations % threads;

    let start = Instant::now();

    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let store = Arc::clone(&store);
            let failed = Arc::clone(&failed);
            let ids = Arc::clone(&ids);
            let count = per_thread + usize::from(t < remainder);

            thread::spawn(move || {
                let mut local = Vec::with_capacity(count);
                for i in 0..count {
                    let mut user = User::new(format!("t{t}-{i}"), (i % 100) as i64);
                    match store.add(USERS, &mut user) {
                        Ok(id) => local.push(id),
                        Err(_) => {
                            failed.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                }
                ids.lock().expect("ids lock poisoned").extend(local);
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    let ids = std::mem::take(&mut *ids.lock().expect("ids lock poisoned"));
    ConcurrentAddOutcome {
        result: StressTestResult::new(ids.len(), failed.load(Ordering::Relaxed), start.elapsed()),
        ids,
    }
}

/// Runs adds, lookups, updates and removes against one collection from
/// several threads.
///
/// Lookups and removes of absent records count as successes: only errors
/// are failures.
pub fn stress_mixed_workload(store: Arc<Store>, config: &StressConfig) -> StressTestResult {
    for n in 0..config.record_count {
        store
            .add(USERS, &mut User::new(format!("seed-{n}"), (n % 100) as i64))
            .expect("Failed to seed user");
    }

    let successful = Arc::new(AtomicUsize::new(0));
    let failed = Arc::new(AtomicUsize::new(0));
    let threads = config.threads.max(1);
    let ops_per_thread = config.operations / threads;
    let span = config.record_count.max(1);

    let start = Instant::now();

    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let store = Arc::clone(&store);
            let successful = Arc::clone(&successful);
            let failed = Arc::clone(&failed);

            thread::spawn(move || {
                for i in 0..ops_per_thread {
                    let id = ((t * ops_per_thread + i) % span + 1).to_string();
                    let result = match i % 4 {
                        0 => store
                            .add(USERS, &mut User::new(format!("t{t}-{i}"), 1))
                            .map(|_| ()),
                        1 => store.find_by_id::<User>(USERS, id.as_str()).map(|_| ()),
                        2 => match store.update(USERS, id.as_str(), &mut User::new("updated", 2)) {
                            Err(e) if e.is_not_found() => Ok(()),
                            other => other,
                        },
                        _ => store.remove::<User>(USERS, id.as_str()).map(|_| ()),
                    };

                    match result {
                        Ok(()) => {
                            successful.fetch_add(1, Ordering::Relaxed);
                        }
                        Err(_) => {
                            failed.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    StressTestResult::new(
        successful.load(Ordering::Relaxed),
        failed.load(Ordering::Relaxed),
        start.elapsed(),
    )
}
