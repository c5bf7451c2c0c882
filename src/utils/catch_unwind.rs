use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};
use std::panic::{self, AssertUnwindSafe};

use pin_project::pin_project;

use crate::Error;

/// Run a closure, turning a panic into [`Error::PanicRecovered`].
pub(crate) fn catch_unwind<F, R>(f: F) -> Result<R, Error>
where
    F: FnOnce() -> R,
{
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(Error::from_panic)
}

/// A future which turns a panic inside `poll` into
/// [`Error::PanicRecovered`].
#[must_use = "futures do nothing unless you `.await` or poll them"]
#[pin_project]
#[derive(Debug)]
pub(crate) struct CatchUnwind<Fut> {
    #[pin]
    future: Fut,
}

impl<Fut> CatchUnwind<Fut> {
    pub(crate) fn new(future: Fut) -> Self {
        Self { future }
    }
}

impl<Fut, T> Future for CatchUnwind<Fut>
where
    Fut: Future<Output = Result<T, Error>>,
{
    type Output = Result<T, Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let future = self.project().future;
        match catch_unwind(move || future.poll(cx)) {
            Ok(poll) => poll,
            Err(err) => Poll::Ready(Err(err)),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::future;

    #[test]
    fn passes_output_through() {
        futures_lite::future::block_on(async {
            let res = CatchUnwind::new(future::ready(Ok::<_, Error>(7))).await;
            assert_eq!(res.unwrap(), 7);
        });
    }

    #[test]
    fn captures_panic() {
        futures_lite::future::block_on(async {
            let fut = async {
                if true {
                    panic!("poll failed");
                }
                Ok::<u8, Error>(1)
            };
            let res = CatchUnwind::new(fut).await;
            assert_eq!(res.unwrap_err().to_string(), "panicked: poll failed");
        });
    }

    #[test]
    fn closure_panic() {
        let res = catch_unwind(|| -> u8 { panic!("sync") });
        assert!(res.unwrap_err().is_panic());
        assert_eq!(catch_unwind(|| 3).unwrap(), 3);
    }
}
