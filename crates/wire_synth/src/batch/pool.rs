//! Work-claiming worker pool.
//!
//! Workers pull task indices from one shared atomic counter until the range is
//! exhausted, so slow tasks (levels with many wires) do not stall a fixed
//! partition. Each worker keeps the results of the tasks it claimed; after the
//! join every result is moved into its pre-sized slot, which is written exactly
//! once. The output order is the task order, independent of completion order.
use std::num::NonZeroUsize;
use std::panic;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use tracing::debug;

/// Host parallelism, or one if it cannot be determined.
pub fn default_workers() -> usize {
    thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

/// Run `task(i)` for every `i` in `0..task_count` on up to `workers` threads.
///
/// Blocks until all workers have joined. A panic inside a task is resumed on the
/// calling thread after the join.
pub fn run_claimed<T, F>(workers: usize, task_count: usize, task: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Sync,
{
    if task_count == 0 {
        return Vec::new();
    }
    let workers = workers.clamp(1, task_count);
    let next = AtomicUsize::new(0);
    let mut slots: Vec<Option<T>> = (0..task_count).map(|_| None).collect();

    thread::scope(|scope| {
        let next = &next;
        let task = &task;
        let handles: Vec<_> = (0..workers)
            .map(|worker| {
                scope.spawn(move || {
                    let mut claimed = Vec::new();
                    loop {
                        let i = next.fetch_add(1, Ordering::Relaxed);
                        if i >= task_count {
                            break;
                        }
                        claimed.push((i, task(i)));
                    }
                    debug!("Worker {} finished {} tasks.", worker, claimed.len());
                    claimed
                })
            })
            .collect();

        let mut panicked = None;
        for handle in handles {
            match handle.join() {
                Ok(claimed) => {
                    for (i, result) in claimed {
                        slots[i] = Some(result);
                    }
                }
                Err(payload) => {
                    panicked.get_or_insert(payload);
                }
            }
        }
        if let Some(payload) = panicked {
            panic::resume_unwind(payload);
        }
    });

    slots
        .into_iter()
        .map(|slot| slot.expect("every task index is claimed exactly once"))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Mutex;
    use std::time::Duration;

    use super::*;

    #[test]
    fn results_follow_task_order() {
        // Early tasks sleep longest so they finish last.
        let out = run_claimed(4, 12, |i| {
            thread::sleep(Duration::from_millis((12 - i as u64) * 2));
            i * 10
        });
        assert_eq!(out, (0..12).map(|i| i * 10).collect::<Vec<_>>());
    }

    #[test]
    fn every_task_runs_exactly_once() {
        let seen = Mutex::new(Vec::new());
        let out = run_claimed(8, 100, |i| {
            seen.lock().unwrap().push(i);
            i
        });
        assert_eq!(out.len(), 100);
        let seen = seen.into_inner().unwrap();
        assert_eq!(seen.len(), 100);
        assert_eq!(seen.iter().copied().collect::<HashSet<_>>().len(), 100);
    }

    #[test]
    fn work_spreads_over_threads() {
        let threads = Mutex::new(HashSet::new());
        run_claimed(4, 16, |_| {
            threads.lock().unwrap().insert(thread::current().id());
            thread::sleep(Duration::from_millis(5));
        });
        assert!(threads.into_inner().unwrap().len() > 1);
    }

    #[test]
    fn degenerate_sizes() {
        assert!(run_claimed(4, 0, |i| i).is_empty());
        assert_eq!(run_claimed(0, 3, |i| i + 1), vec![1, 2, 3]);
        assert_eq!(run_claimed(64, 2, |i| i), vec![0, 1]);
    }

    #[test]
    fn default_workers_is_positive() {
        assert!(default_workers() >= 1);
    }

    #[test]
    #[should_panic(expected = "task 3 failed")]
    fn task_panics_propagate() {
        run_claimed(2, 5, |i| {
            if i == 3 {
                panic!("task 3 failed");
            }
            i
        });
    }
}
