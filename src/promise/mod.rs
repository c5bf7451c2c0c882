//! The promise core.
//!
//! A [`Promise`] is a handle to a value that some concurrently running
//! producer will eventually deliver, or fail to. It starts out
//! [`Pending`](Status::Pending) and settles exactly once, to either
//! [`Fulfilled`](Status::Fulfilled) or [`Rejected`](Status::Rejected).
//!
//! # Examples
//!
//! ```
//! use promisery::Promise;
//!
//! let p = Promise::new(|| "42".parse::<u32>());
//! let doubled = p.map(|n| n * 2);
//! assert_eq!(doubled.wait().unwrap(), 84);
//! ```

use core::fmt;
use core::future::{Future, IntoFuture};
use std::error::Error as StdError;
use std::sync::Arc;

use crate::spawn::{Spawn, ThreadSpawner};
use crate::utils::{catch_unwind, CatchUnwind};
use crate::Error;

pub use resolver::Resolver;
pub use wait::Wait;

use shared::Shared;

mod chain;
mod resolver;
mod shared;
mod trampoline;
mod wait;

/// Where a promise is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// The producer has not reported yet.
    Pending,
    /// Settled with a value.
    Fulfilled,
    /// Settled with an [`Error`].
    Rejected,
}

/// The eventual outcome of a concurrent computation.
///
/// `Promise` is a cheap handle: clones observe the same settlement. The
/// producer keeps running even if every handle is dropped.
pub struct Promise<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Promise<T>
where
    T: Send + Sync + 'static,
{
    /// Run `executor` on a new thread and settle with what it returns.
    ///
    /// `Ok` fulfills the promise, `Err` rejects it with
    /// [`Error::Executor`]. A panicking executor rejects it with
    /// [`Error::PanicRecovered`].
    pub fn new<F, E>(executor: F) -> Self
    where
        F: FnOnce() -> Result<T, E> + Send + 'static,
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        Self::new_in(&ThreadSpawner::new(), executor)
    }

    /// Like [`Promise::new`], launching `executor` through `spawner`.
    pub fn new_in<S, F, E>(spawner: &S, executor: F) -> Self
    where
        S: Spawn + ?Sized,
        F: FnOnce() -> Result<T, E> + Send + 'static,
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        let (promise, resolver) = Self::deferred();
        spawner.spawn(Box::new(move || {
            let outcome = match catch_unwind(executor) {
                Ok(Ok(value)) => Ok(value),
                Ok(Err(err)) => Err(Error::executor(err)),
                Err(err) => Err(err),
            };
            resolver.settle(outcome);
        }));
        promise
    }

    /// Drive `future` to completion on a new thread and settle with its
    /// output.
    pub fn from_future<Fut, E>(future: Fut) -> Self
    where
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        Self::from_future_in(&ThreadSpawner::new(), future)
    }

    /// Like [`Promise::from_future`], launching the task through `spawner`.
    pub fn from_future_in<S, Fut, E>(spawner: &S, future: Fut) -> Self
    where
        S: Spawn + ?Sized,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        Self::drive_in(spawner, async move { future.await.map_err(Error::executor) })
    }

    /// Spawn a task blocking on `future`, settling the returned promise with
    /// its output.
    pub(crate) fn drive_in<S, Fut>(spawner: &S, future: Fut) -> Self
    where
        S: Spawn + ?Sized,
        Fut: Future<Output = Result<T, Error>> + Send + 'static,
    {
        let (promise, resolver) = Self::deferred();
        spawner.spawn(Box::new(move || {
            let outcome = futures_lite::future::block_on(CatchUnwind::new(future));
            resolver.settle(outcome);
        }));
        promise
    }

    /// Create a pending promise together with the handle that settles it.
    ///
    /// # Examples
    ///
    /// ```
    /// use promisery::Promise;
    ///
    /// let (promise, resolver) = Promise::deferred();
    /// std::thread::spawn(move || resolver.resolve("done"));
    /// assert_eq!(promise.wait().unwrap(), "done");
    /// ```
    pub fn deferred() -> (Self, Resolver<T>) {
        let shared = Arc::new(Shared::new());
        let resolver = Resolver::new(shared.clone());
        (Self { shared }, resolver)
    }

    /// A promise already fulfilled with `value`.
    pub fn resolve(value: T) -> Self {
        Self::settled_with(Ok(value))
    }

    /// A promise already rejected with `err`.
    pub fn reject(err: Error) -> Self {
        Self::settled_with(Err(err))
    }

    pub(crate) fn settled_with(outcome: Result<T, Error>) -> Self {
        Self {
            shared: Arc::new(Shared::settled(outcome)),
        }
    }
}

impl<T> Promise<T> {
    /// The current status. May be stale as soon as it returns.
    pub fn status(&self) -> Status {
        match self.shared.outcome() {
            None => Status::Pending,
            Some(Ok(_)) => Status::Fulfilled,
            Some(Err(_)) => Status::Rejected,
        }
    }

    /// Returns `true` if the promise has not settled yet.
    pub fn is_pending(&self) -> bool {
        self.shared.outcome().is_none()
    }

    /// Returns `true` if the promise has settled.
    pub fn is_settled(&self) -> bool {
        !self.is_pending()
    }

    /// The outcome, without blocking. `None` while pending.
    pub fn peek(&self) -> Option<&Result<T, Error>> {
        self.shared.outcome()
    }
}

impl<T> Promise<T>
where
    T: Clone,
{
    /// Block the current thread until the promise settles, then return its
    /// outcome.
    ///
    /// This is the only blocking operation of the crate. Async callers
    /// should `.await` the promise instead.
    pub fn wait(&self) -> Result<T, Error> {
        match self.shared.outcome() {
            Some(outcome) => outcome.clone(),
            None => futures_lite::future::block_on(self.settled()),
        }
    }

    /// A future resolving to the outcome once the promise settles.
    pub fn settled(&self) -> Wait<T> {
        Wait::new(self.shared.clone())
    }
}

impl<T> Clone for Promise<T> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<T> fmt::Debug for Promise<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Promise")
            .field("status", &self.status())
            .finish()
    }
}

impl<T> IntoFuture for Promise<T>
where
    T: Clone,
{
    type Output = Result<T, Error>;
    type IntoFuture = Wait<T>;

    fn into_future(self) -> Self::IntoFuture {
        Wait::new(self.shared)
    }
}

impl<T> IntoFuture for &Promise<T>
where
    T: Clone,
{
    type Output = Result<T, Error>;
    type IntoFuture = Wait<T>;

    fn into_future(self) -> Self::IntoFuture {
        self.settled()
    }
}
