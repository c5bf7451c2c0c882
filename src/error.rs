//! Errors a promise can reject with.

use core::fmt;
use core::ops::{Deref, DerefMut};
use std::any::Any;
use std::error::Error as StdError;
use std::sync::Arc;

/// The reason a promise was rejected.
///
/// Errors are cheap to clone: every observer of a rejected promise gets its
/// own copy of the same underlying failure.
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The executor returned an error.
    #[error("{0}")]
    Executor(Arc<dyn StdError + Send + Sync>),

    /// The executor, a chained callback, or a coordinating task panicked.
    #[error("panicked: {message}")]
    PanicRecovered {
        /// The panic message, if the payload carried one.
        message: String,
    },

    /// A combinator was handed an input it has no answer for, such as
    /// racing zero promises.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// Every promise passed to [`any()`](crate::any()) rejected.
    #[error("{0}")]
    Aggregate(AggregateError<Error>),

    /// The [`Resolver`](crate::Resolver) was dropped before it settled
    /// its promise.
    #[error("promise abandoned before it was settled")]
    Abandoned,
}

impl Error {
    /// Wrap an executor failure.
    ///
    /// An `err` that already is an [`Error`], for instance one returned by
    /// awaiting another promise, is passed through unchanged.
    pub fn executor<E>(err: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        let err: Box<dyn StdError + Send + Sync> = err.into();
        match err.downcast::<Error>() {
            Ok(err) => *err,
            Err(err) => Self::Executor(Arc::from(err)),
        }
    }

    /// Convert a panic payload caught by [`std::panic::catch_unwind`].
    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(msg) = payload.downcast_ref::<&'static str>() {
            (*msg).to_owned()
        } else if let Some(msg) = payload.downcast_ref::<String>() {
            msg.clone()
        } else {
            String::from("Box<dyn Any>")
        };
        tracing::debug!(%message, "recovered panic");
        Self::PanicRecovered { message }
    }

    /// Returns a reference to the executor's original error if it is of
    /// type `E`.
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: StdError + 'static,
    {
        match self {
            Self::Executor(inner) => inner.downcast_ref::<E>(),
            _ => None,
        }
    }

    /// Returns `true` if this is a [`PanicRecovered`][Self::PanicRecovered] error.
    pub fn is_panic(&self) -> bool {
        matches!(self, Self::PanicRecovered { .. })
    }

    /// Returns the child errors if this is an [`Aggregate`][Self::Aggregate] error.
    pub fn as_aggregate(&self) -> Option<&AggregateError<Error>> {
        match self {
            Self::Aggregate(errors) => Some(errors),
            _ => None,
        }
    }
}

/// A collection of errors, in input order.
#[derive(Clone)]
#[repr(transparent)]
pub struct AggregateError<E> {
    pub(crate) inner: Vec<E>,
}

impl<E> AggregateError<E> {
    pub(crate) fn new(inner: Vec<E>) -> Self {
        Self { inner }
    }

    /// Consume the aggregate, returning the child errors.
    pub fn into_inner(self) -> Vec<E> {
        self.inner
    }
}

impl<E: fmt::Display> fmt::Debug for AggregateError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{self}:")?;

        for (i, err) in self.inner.iter().enumerate() {
            writeln!(f, "- Error {}: {err}", i + 1)?;
        }

        Ok(())
    }
}

impl<E: fmt::Display> fmt::Display for AggregateError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} errors occurred", self.inner.len())
    }
}

impl<E> Deref for AggregateError<E> {
    type Target = Vec<E>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<E> DerefMut for AggregateError<E> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

impl<E: StdError> StdError for AggregateError<E> {}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::{self, ErrorKind};

    #[test]
    fn executor_error_downcasts() {
        let err = Error::executor(io::Error::new(ErrorKind::NotFound, "missing"));
        assert_eq!(err.to_string(), "missing");
        let io = err.downcast_ref::<io::Error>().unwrap();
        assert_eq!(io.kind(), ErrorKind::NotFound);
        assert!(err.downcast_ref::<std::fmt::Error>().is_none());
    }

    #[test]
    fn executor_passes_own_errors_through() {
        let err = Error::executor(Error::InvalidArgument("bad"));
        assert!(matches!(err, Error::InvalidArgument("bad")));
        let err = Error::executor(Error::from_panic(Box::new("boom")));
        assert!(err.is_panic());
    }

    #[test]
    fn panic_payloads() {
        let err = Error::from_panic(Box::new("static str"));
        assert_eq!(err.to_string(), "panicked: static str");
        let err = Error::from_panic(Box::new(String::from("owned")));
        assert!(err.is_panic());
        assert_eq!(err.to_string(), "panicked: owned");
        let err = Error::from_panic(Box::new(42u8));
        assert_eq!(err.to_string(), "panicked: Box<dyn Any>");
    }

    #[test]
    fn aggregate_formatting() {
        let errors = AggregateError::new(vec![Error::executor("oops"), Error::executor("oh no")]);
        assert_eq!(errors.to_string(), "2 errors occurred");
        assert_eq!(
            format!("{errors:?}"),
            "2 errors occurred:\n- Error 1: oops\n- Error 2: oh no\n"
        );
        let err = Error::Aggregate(errors);
        assert_eq!(err.as_aggregate().unwrap().len(), 2);
    }
}
