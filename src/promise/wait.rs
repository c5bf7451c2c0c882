use core::fmt;
use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};
use std::sync::Arc;

use futures_core::future::FusedFuture;

use super::shared::Shared;
use crate::Error;

/// A future which resolves once its promise settles.
///
/// This `struct` is created by awaiting a [`Promise`], or by calling
/// [`Promise::settled`]. See their documentation for more.
///
/// [`Promise`]: crate::Promise
/// [`Promise::settled`]: crate::Promise::settled
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct Wait<T> {
    shared: Arc<Shared<T>>,
    key: Option<usize>,
    done: bool,
}

impl<T> Wait<T> {
    pub(crate) fn new(shared: Arc<Shared<T>>) -> Self {
        Self {
            shared,
            key: None,
            done: false,
        }
    }
}

impl<T> fmt::Debug for Wait<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wait")
            .field("settled", &self.shared.outcome().is_some())
            .field("done", &self.done)
            .finish()
    }
}

impl<T> Future for Wait<T>
where
    T: Clone,
{
    type Output = Result<T, Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        assert!(!this.done, "Futures must not be polled after completing");

        match this.shared.register_waker(&mut this.key, cx.waker()) {
            Some(outcome) => {
                this.done = true;
                this.key = None;
                Poll::Ready(outcome.clone())
            }
            None => Poll::Pending,
        }
    }
}

impl<T> FusedFuture for Wait<T>
where
    T: Clone,
{
    fn is_terminated(&self) -> bool {
        self.done
    }
}

impl<T> Drop for Wait<T> {
    fn drop(&mut self) {
        if let Some(key) = self.key.take() {
            self.shared.remove_waker(key);
        }
    }
}
