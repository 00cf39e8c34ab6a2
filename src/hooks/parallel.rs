//! Bounded worker pool standing in for "an external `run_processes_parallel`
//! primitive": the driver hands it a list of tasks, built strictly in list
//! order, and the pool runs up to `jobs` of them concurrently. Completion
//! order is whatever the pool schedules; dispatch order (task construction)
//! is always the caller's list order.

use rayon::prelude::*;

use crate::error::{GithookedError, Result};

/// Result of running a single child task.
pub struct TaskOutcome {
    /// True if the child process could not even be spawned.
    pub start_failed: bool,
    /// Raw process exit status; meaningless if `start_failed`.
    pub exit_code: i32,
    /// Captured stderr, handed to `consume_sideband` by the caller.
    pub stderr: Vec<u8>,
}

/// Runs `worker` over every item in `items` using up to `jobs` threads.
/// `items` must already be in dispatch order; the pool may finish them in
/// any order, but construction (the closure call) happens once per item
/// regardless of scheduling.
pub fn run_parallel<T, F>(items: Vec<T>, jobs: usize, worker: F) -> Result<Vec<TaskOutcome>>
where
    T: Send,
    F: Fn(T) -> TaskOutcome + Sync + Send,
{
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs.max(1))
        .build()
        .map_err(|_| GithookedError::Invariant("failed to build hook worker pool"))?;

    let outcomes = pool.install(|| items.into_par_iter().map(&worker).collect());
    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn runs_every_item_and_aggregates_results() {
        let calls = Arc::new(AtomicUsize::new(0));
        let items: Vec<usize> = (0..5).collect();
        let calls_clone = calls.clone();
        let outcomes = run_parallel(items, 2, move |i| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
            TaskOutcome {
                start_failed: false,
                exit_code: (i % 2) as i32,
                stderr: Vec::new(),
            }
        })
        .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 5);
        assert_eq!(outcomes.len(), 5);
    }
}
