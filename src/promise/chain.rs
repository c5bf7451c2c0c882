//! Callback chaining: `then`, `catch`, `finally` and `map`.
//!
//! Every method registers an observer and returns a derived promise right
//! away. The derived promise settles once the callback has returned; a
//! panicking callback rejects it with [`Error::PanicRecovered`].
//!
//! Callbacks of a promise settled from inside another callback run after
//! that callback returns, on the same thread. A callback should therefore
//! not block waiting for them.

use super::Promise;
use crate::utils::catch_unwind;
use crate::Error;

impl<T> Promise<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Run `on_fulfilled` with the value once the promise fulfills.
    ///
    /// Skipped on rejection. The derived promise carries the original
    /// outcome forward.
    ///
    /// # Examples
    ///
    /// ```
    /// use promisery::Promise;
    /// use std::sync::mpsc;
    ///
    /// let (tx, rx) = mpsc::channel();
    /// let p = Promise::new(|| Ok::<_, std::io::Error>(3));
    /// let next = p.then(move |n| tx.send(*n).unwrap());
    /// assert_eq!(next.wait().unwrap(), 3);
    /// assert_eq!(rx.recv().unwrap(), 3);
    /// ```
    pub fn then<F>(&self, on_fulfilled: F) -> Promise<T>
    where
        F: FnOnce(&T) + Send + 'static,
    {
        self.chain(move |outcome| match outcome {
            Ok(value) => catch_unwind(|| {
                on_fulfilled(value);
                value.clone()
            }),
            Err(err) => Err(err.clone()),
        })
    }

    /// Run `on_rejected` with the error once the promise rejects.
    ///
    /// Skipped on fulfillment. The derived promise carries the original
    /// outcome forward.
    pub fn catch<F>(&self, on_rejected: F) -> Promise<T>
    where
        F: FnOnce(&Error) + Send + 'static,
    {
        self.chain(move |outcome| match outcome {
            Ok(value) => catch_unwind(|| value.clone()),
            Err(err) => catch_unwind(|| on_rejected(err)).and_then(|()| Err(err.clone())),
        })
    }

    /// Run `on_finally` once the promise settles, whatever the outcome.
    pub fn finally<F>(&self, on_finally: F) -> Promise<T>
    where
        F: FnOnce() + Send + 'static,
    {
        self.chain(move |outcome| {
            catch_unwind(|| {
                on_finally();
                outcome.clone()
            })
            .and_then(|outcome| outcome)
        })
    }
}

impl<T> Promise<T>
where
    T: Send + Sync + 'static,
{
    /// Transform the value once the promise fulfills. Rejections pass
    /// through untouched.
    pub fn map<U, F>(&self, f: F) -> Promise<U>
    where
        U: Send + Sync + 'static,
        F: FnOnce(&T) -> U + Send + 'static,
    {
        self.chain(move |outcome| match outcome {
            Ok(value) => catch_unwind(|| f(value)),
            Err(err) => Err(err.clone()),
        })
    }

    fn chain<U, F>(&self, step: F) -> Promise<U>
    where
        U: Send + Sync + 'static,
        F: FnOnce(&Result<T, Error>) -> Result<U, Error> + Send + 'static,
    {
        let (promise, resolver) = Promise::deferred();
        self.shared.observe(Box::new(move |outcome| {
            resolver.settle(step(outcome));
        }));
        promise
    }
}
