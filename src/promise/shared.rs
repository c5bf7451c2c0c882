use std::collections::VecDeque;
use std::mem;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use std::task::Waker;

use slab::Slab;

use super::trampoline;
use crate::utils::catch_unwind;
use crate::Error;

/// A callback run once with the settled outcome.
pub(crate) type Observer<T> = Box<dyn FnOnce(&Result<T, Error>) + Send + 'static>;

/// The state shared by every handle to one promise.
///
/// The outcome is written once, while holding `state`, and only read after
/// that. Observers are run outside the lock by whichever thread holds the
/// `notifying` flag, which keeps them in registration order even when some
/// are registered while others are still running.
pub(crate) struct Shared<T> {
    outcome: OnceLock<Result<T, Error>>,
    state: Mutex<State<T>>,
}

struct State<T> {
    observers: VecDeque<Observer<T>>,
    notifying: bool,
    wakers: Slab<Waker>,
}

impl<T> Shared<T> {
    pub(crate) fn new() -> Self {
        Self {
            outcome: OnceLock::new(),
            state: Mutex::new(State {
                observers: VecDeque::new(),
                notifying: false,
                wakers: Slab::new(),
            }),
        }
    }

    pub(crate) fn settled(outcome: Result<T, Error>) -> Self {
        let shared = Self::new();
        shared.outcome.get_or_init(|| outcome);
        shared
    }

    /// The outcome, if the promise has settled.
    #[inline]
    pub(crate) fn outcome(&self) -> Option<&Result<T, Error>> {
        self.outcome.get()
    }

    fn lock(&self) -> MutexGuard<'_, State<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Settle the promise. Returns `false` if it had already settled, in
    /// which case nothing happens.
    ///
    /// Wakers are woken right away. Observers run through the thread's
    /// trampoline, so a settlement made by an observer is only queued.
    pub(crate) fn settle(self: &Arc<Self>, outcome: Result<T, Error>) -> bool
    where
        T: 'static,
    {
        let mut state = self.lock();
        if self.outcome.set(outcome).is_err() {
            return false;
        }
        let run_observers = !state.observers.is_empty();
        state.notifying = run_observers;
        let wakers = mem::take(&mut state.wakers);
        drop(state);

        tracing::trace!(
            fulfilled = matches!(self.outcome(), Some(Ok(_))),
            wakers = wakers.len(),
            "promise settled"
        );
        for (_, waker) in wakers {
            waker.wake();
        }
        if run_observers {
            let this = self.clone();
            trampoline::schedule(Box::new(move || this.notify()));
        }
        true
    }

    /// Register an observer. It runs exactly once: after settlement if the
    /// promise is pending, right away otherwise, and always after every
    /// observer registered before it.
    pub(crate) fn observe(&self, observer: Observer<T>) {
        let mut state = self.lock();
        state.observers.push_back(observer);
        if self.outcome.get().is_none() || state.notifying {
            return;
        }
        state.notifying = true;
        drop(state);
        self.notify();
    }

    /// Drain the observer queue. Only called by the holder of the
    /// `notifying` flag.
    ///
    /// A panicking observer is logged and skipped; the flag is always handed
    /// back once the queue is empty.
    fn notify(&self) {
        let Some(outcome) = self.outcome.get() else {
            return;
        };
        loop {
            let observer = {
                let mut state = self.lock();
                match state.observers.pop_front() {
                    Some(observer) => observer,
                    None => {
                        state.notifying = false;
                        return;
                    }
                }
            };
            if let Err(err) = catch_unwind(|| observer(outcome)) {
                tracing::warn!(%err, "promise observer panicked");
            }
        }
    }

    /// Store `waker` to be woken on settlement, or return the outcome if
    /// the promise already settled.
    ///
    /// `key` identifies this waiter's slot across calls.
    pub(crate) fn register_waker(
        &self,
        key: &mut Option<usize>,
        waker: &Waker,
    ) -> Option<&Result<T, Error>> {
        if let Some(outcome) = self.outcome.get() {
            return Some(outcome);
        }
        let mut state = self.lock();
        if let Some(outcome) = self.outcome.get() {
            return Some(outcome);
        }
        match *key {
            Some(k) if state.wakers.contains(k) => state.wakers[k].clone_from(waker),
            _ => *key = Some(state.wakers.insert(waker.clone())),
        }
        None
    }

    /// Release a waiter's slot.
    pub(crate) fn remove_waker(&self, key: usize) {
        if self.outcome.get().is_some() {
            // Settlement already took every slot.
            return;
        }
        let mut state = self.lock();
        if self.outcome.get().is_none() {
            state.wakers.try_remove(key);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::utils::DummyWaker;
    use std::sync::Mutex as StdMutex;

    fn recorder(log: &Arc<StdMutex<Vec<String>>>, name: &'static str) -> Observer<u32> {
        let log = log.clone();
        Box::new(move |outcome| {
            let entry = match outcome {
                Ok(value) => format!("{name}:{value}"),
                Err(err) => format!("{name}:{err}"),
            };
            log.lock().unwrap().push(entry);
        })
    }

    #[test]
    fn settles_once() {
        let shared = Arc::new(Shared::<u32>::new());
        assert!(shared.outcome().is_none());
        assert!(shared.settle(Ok(1)));
        assert!(!shared.settle(Ok(2)));
        assert!(!shared.settle(Err(Error::Abandoned)));
        assert!(matches!(shared.outcome(), Some(Ok(1))));
    }

    #[test]
    fn observers_run_in_registration_order() {
        let log = Arc::new(StdMutex::new(vec![]));
        let shared = Arc::new(Shared::<u32>::new());
        shared.observe(recorder(&log, "a"));
        shared.observe(recorder(&log, "b"));
        assert!(log.lock().unwrap().is_empty());

        shared.settle(Ok(7));
        shared.observe(recorder(&log, "c"));
        assert_eq!(*log.lock().unwrap(), ["a:7", "b:7", "c:7"]);
    }

    #[test]
    fn observer_registered_while_notifying_runs_last() {
        let log = Arc::new(StdMutex::new(vec![]));
        let shared = Arc::new(Shared::<u32>::new());
        {
            let shared2 = shared.clone();
            let log2 = log.clone();
            shared.observe(Box::new(move |_| {
                shared2.observe(recorder(&log2, "nested"));
            }));
        }
        shared.observe(recorder(&log, "second"));
        shared.settle(Ok(3));
        assert_eq!(*log.lock().unwrap(), ["second:3", "nested:3"]);
    }

    #[test]
    fn wakers_are_woken_once() {
        let shared = Arc::new(Shared::<u32>::new());
        let dummy = Arc::new(DummyWaker::default());
        let waker = Waker::from(dummy.clone());

        let mut key = None;
        assert!(shared.register_waker(&mut key, &waker).is_none());
        let first = key;
        assert!(shared.register_waker(&mut key, &waker).is_none());
        assert_eq!(key, first);

        shared.settle(Ok(9));
        assert_eq!(dummy.count(), 1);
        assert!(matches!(shared.register_waker(&mut key, &waker), Some(Ok(9))));
        shared.remove_waker(key.unwrap());
    }

    #[test]
    fn removed_waker_is_not_woken() {
        let shared = Arc::new(Shared::<u32>::new());
        let dummy = Arc::new(DummyWaker::default());
        let waker = Waker::from(dummy.clone());

        let mut key = None;
        shared.register_waker(&mut key, &waker);
        shared.remove_waker(key.unwrap());
        shared.settle(Ok(1));
        assert_eq!(dummy.count(), 0);
    }
}
