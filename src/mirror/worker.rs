// src/mirror/worker.rs
// =============================================================================
// One worker of the pool.
//
// A worker keeps pulling items from the frontier until it has seen the
// queues empty a few times in a row:
//
//   Working --empty--> Retrying(budget) --empty--> Retrying(budget-1) ...
//      ^                     |                            |
//      +------- work --------+                     Retrying(1) --empty--> Exited
//
// Every Retrying state sleeps for the backoff interval before polling again.
// An empty queue does not mean the crawl is over: another worker may be
// about to queue the links it is scanning right now. The backoff window is
// how long we are willing to wait for that to happen. It is a heuristic;
// a worker that exits early just leaves the rest of the work to the others.
//
// A failed download is logged and counted, then the worker moves on. It
// never retries the item and never stops the pool.
// =============================================================================

use std::sync::Arc;

use super::engine::Shared;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// Just processed an item; poll again right away
    Working,
    /// Queues were empty; this many backoff rounds remain
    Retrying(u32),
    Exited,
}

impl WorkerState {
    // Next state after polling the frontier
    pub fn after_poll(self, found_work: bool, budget: u32) -> Self {
        match (self, found_work) {
            (WorkerState::Exited, _) => WorkerState::Exited,
            (_, true) => WorkerState::Working,
            (WorkerState::Working, false) if budget > 0 => WorkerState::Retrying(budget),
            (WorkerState::Retrying(left), false) if left > 1 => WorkerState::Retrying(left - 1),
            (_, false) => WorkerState::Exited,
        }
    }
}

// What a worker did before it exited
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkerReport {
    pub id: usize,
    pub processed: usize,
    pub failed: usize,
}

pub(super) async fn run_worker(id: usize, shared: Arc<Shared>) -> WorkerReport {
    let budget = shared.config.idle_retries;
    let mut report = WorkerReport {
        id,
        ..WorkerReport::default()
    };
    let mut state = WorkerState::Working;

    loop {
        let found_work = match shared.frontier.next() {
            Some(item) => {
                report.processed += 1;
                if let Err(e) = shared.process(id, item).await {
                    report.failed += 1;
                    shared.record_failure(id, &e);
                }
                true
            }
            None => false,
        };

        state = state.after_poll(found_work, budget);
        match state {
            WorkerState::Working => {}
            WorkerState::Retrying(left) => {
                tracing::debug!(worker = id, "no work found, retrying ({left})");
                tokio::time::sleep(shared.config.retry_delay).await;
            }
            WorkerState::Exited => break,
        }
    }

    tracing::info!(
        worker = id,
        processed = report.processed,
        "worker exited due to lack of work"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_work_keeps_worker_busy() {
        assert_eq!(WorkerState::Working.after_poll(true, 3), WorkerState::Working);
        assert_eq!(WorkerState::Retrying(1).after_poll(true, 3), WorkerState::Working);
    }

    #[test]
    fn test_budget_counts_down_then_exits() {
        let mut state = WorkerState::Working;
        let mut seen = Vec::new();
        while state != WorkerState::Exited {
            state = state.after_poll(false, 3);
            seen.push(state);
        }
        assert_eq!(
            seen,
            vec![
                WorkerState::Retrying(3),
                WorkerState::Retrying(2),
                WorkerState::Retrying(1),
                WorkerState::Exited,
            ]
        );
    }

    #[test]
    fn test_work_during_retry_resets_budget() {
        let state = WorkerState::Working
            .after_poll(false, 3)
            .after_poll(false, 3)
            .after_poll(true, 3)
            .after_poll(false, 3);
        assert_eq!(state, WorkerState::Retrying(3));
    }

    #[test]
    fn test_zero_budget_exits_on_first_empty_poll() {
        assert_eq!(WorkerState::Working.after_poll(false, 0), WorkerState::Exited);
    }

    #[test]
    fn test_exited_is_final() {
        assert_eq!(WorkerState::Exited.after_poll(true, 3), WorkerState::Exited);
    }
}
