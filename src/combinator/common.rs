use core::fmt;
use core::future::Future;
use core::marker::PhantomData;
use core::mem;
use core::pin::Pin;
use core::task::{Context, Poll};

use fixedbitset::FixedBitSet;
use pin_project::pin_project;
use rand::seq::SliceRandom;
use smallvec::SmallVec;

use crate::promise::Wait;
use crate::spawn::Spawn;
use crate::utils::WakerVec;
use crate::{Error, Promise};

/// The completion policy of a combinator.
pub(crate) trait CombinatorBehavior<T> {
    /// Name used in diagnostics.
    const NAME: &'static str;

    /// The value the combined promise fulfills with.
    type Output;

    /// What is kept per input until every input has settled.
    type StoredItem;

    /// Decide what to do with the outcome of input `idx`: keep it, or
    /// settle the combined promise right away.
    fn maybe_return(
        idx: usize,
        res: Result<T, Error>,
    ) -> Result<Self::StoredItem, Result<Self::Output, Error>>;

    /// Every input has settled without an early return. Items are in input
    /// order.
    fn when_completed(items: Vec<Self::StoredItem>) -> Result<Self::Output, Error>;
}

/// Waits on a vec of promises under the policy `B`.
///
/// Every poll takes all inputs woken since the last one, shuffles them and
/// polls them in that order, so simultaneously settled inputs are picked
/// uniformly at random.
#[must_use = "futures do nothing unless you `.await` or poll them"]
#[pin_project]
pub(crate) struct CombinatorVec<T, B>
where
    B: CombinatorBehavior<T>,
{
    consumed: bool,
    pending: usize,
    items: Vec<Option<B::StoredItem>>,
    wakers: WakerVec,
    filled: FixedBitSet,
    awake_list_buffer: SmallVec<[usize; 16]>,
    futures: Vec<Wait<T>>,
    _behavior: PhantomData<fn() -> B>,
}

impl<T, B> CombinatorVec<T, B>
where
    B: CombinatorBehavior<T>,
{
    pub(crate) fn new(futures: Vec<Wait<T>>) -> Self {
        let len = futures.len();
        Self {
            consumed: false,
            pending: len,
            items: std::iter::repeat_with(|| None).take(len).collect(),
            wakers: WakerVec::new(len),
            filled: FixedBitSet::with_capacity(len),
            awake_list_buffer: SmallVec::new(),
            futures,
            _behavior: PhantomData,
        }
    }
}

impl<T, B> fmt::Debug for CombinatorVec<T, B>
where
    B: CombinatorBehavior<T>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CombinatorVec")
            .field("combinator", &B::NAME)
            .field("pending", &self.pending)
            .field("futures", &self.futures)
            .finish()
    }
}

impl<T, B> Future for CombinatorVec<T, B>
where
    T: Clone,
    B: CombinatorBehavior<T>,
{
    type Output = Result<B::Output, Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();

        assert!(!*this.consumed, "Futures must not be polled after completing");

        if *this.pending > 0 {
            {
                let mut readiness = this.wakers.readiness();
                readiness.set_waker(cx.waker());
                if !readiness.any_ready() {
                    // Nothing is ready yet
                    return Poll::Pending;
                }
                readiness.drain_ready(&mut *this.awake_list_buffer);
            }
            this.awake_list_buffer.shuffle(&mut rand::thread_rng());

            for idx in this.awake_list_buffer.drain(..) {
                if this.filled[idx] {
                    // Woken input already settled, don't poll it again.
                    continue;
                }
                let mut cx = Context::from_waker(this.wakers.get(idx));
                if let Poll::Ready(res) = Pin::new(&mut this.futures[idx]).poll(&mut cx) {
                    match B::maybe_return(idx, res) {
                        Ok(store) => {
                            this.items[idx] = Some(store);
                            this.filled.insert(idx);
                            *this.pending -= 1;
                        }
                        Err(ret) => {
                            tracing::trace!(
                                combinator = B::NAME,
                                index = idx,
                                "settled early"
                            );
                            *this.consumed = true;
                            return Poll::Ready(ret);
                        }
                    }
                }
            }
        }

        // Check whether we're all done now or need to keep going.
        if *this.pending == 0 {
            *this.consumed = true;
            let items: Vec<_> = mem::take(this.items).into_iter().flatten().collect();
            debug_assert_eq!(items.len(), this.futures.len());
            tracing::trace!(combinator = B::NAME, inputs = items.len(), "all inputs settled");
            Poll::Ready(B::when_completed(items))
        } else {
            Poll::Pending
        }
    }
}

/// Launch one coordinating task that settles the returned promise per `B`.
pub(crate) fn coordinate<S, T, B>(spawner: &S, promises: Vec<Promise<T>>) -> Promise<B::Output>
where
    S: Spawn + ?Sized,
    T: Clone + Send + Sync + 'static,
    B: CombinatorBehavior<T> + 'static,
    B::Output: Send + Sync + 'static,
    B::StoredItem: Send + 'static,
{
    let futures = promises.iter().map(Promise::settled).collect();
    Promise::drive_in(spawner, CombinatorVec::<T, B>::new(futures))
}
