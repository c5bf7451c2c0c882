//! Flattens nested observer notification.
//!
//! Settling a promise runs its observers, and a chained observer settles
//! the derived promise, which runs that promise's observers, and so on. Run
//! naively this recurses once per link of a `then` chain. Instead, the first
//! notification on a thread drains a thread-local queue, and any
//! notification started while it runs is appended to that queue.

use std::cell::RefCell;
use std::collections::VecDeque;

type Job = Box<dyn FnOnce()>;

thread_local! {
    /// `Some` while this thread is draining notifications.
    static PENDING: RefCell<Option<VecDeque<Job>>> = const { RefCell::new(None) };
}

/// Run `job` now, or after the jobs already queued if this thread is
/// already draining.
pub(super) fn schedule(job: Job) {
    let outermost = PENDING.with(|pending| {
        let mut pending = pending.borrow_mut();
        if let Some(queue) = pending.as_mut() {
            queue.push_back(job);
            return None;
        }
        *pending = Some(VecDeque::new());
        Some(job)
    });
    let Some(job) = outermost else {
        return;
    };

    let _drain = Drain;
    job();
}

fn next() -> Option<Job> {
    PENDING.with(|pending| pending.borrow_mut().as_mut().and_then(VecDeque::pop_front))
}

/// Runs whatever is still queued, then leaves draining mode. Also runs on
/// unwind so queued notifications are not lost.
struct Drain;

impl Drop for Drain {
    fn drop(&mut self) {
        while let Some(job) = next() {
            job();
        }
        PENDING.with(|pending| *pending.borrow_mut() = None);
    }
}
