use core::fmt;
use std::error::Error as StdError;
use std::sync::Arc;

use super::shared::Shared;
use crate::Error;

/// The settling side of a promise.
///
/// Created by [`Promise::deferred`]. The first call to [`resolve`],
/// [`reject`] or [`settle`] settles the promise and returns `true`; every
/// later call is a no-op returning `false`.
///
/// Dropping a resolver whose promise is still pending rejects the promise
/// with [`Error::Abandoned`].
///
/// [`Promise::deferred`]: crate::Promise::deferred
/// [`resolve`]: Resolver::resolve
/// [`reject`]: Resolver::reject
/// [`settle`]: Resolver::settle
pub struct Resolver<T: 'static> {
    shared: Arc<Shared<T>>,
}

impl<T: 'static> Resolver<T> {
    pub(crate) fn new(shared: Arc<Shared<T>>) -> Self {
        Self { shared }
    }

    /// Fulfill the promise with `value`.
    pub fn resolve(&self, value: T) -> bool {
        self.shared.settle(Ok(value))
    }

    /// Reject the promise with an executor error.
    pub fn reject<E>(&self, err: E) -> bool
    where
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        self.shared.settle(Err(Error::executor(err)))
    }

    /// Settle the promise with `outcome`.
    pub fn settle(&self, outcome: Result<T, Error>) -> bool {
        self.shared.settle(outcome)
    }

    /// Returns `true` once the promise has settled, by this resolver or
    /// otherwise.
    pub fn is_settled(&self) -> bool {
        self.shared.outcome().is_some()
    }
}

impl<T: 'static> fmt::Debug for Resolver<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("settled", &self.is_settled())
            .finish()
    }
}

impl<T: 'static> Drop for Resolver<T> {
    fn drop(&mut self) {
        if self.shared.outcome().is_none() && self.shared.settle(Err(Error::Abandoned)) {
            tracing::debug!("resolver dropped, promise rejected as abandoned");
        }
    }
}
