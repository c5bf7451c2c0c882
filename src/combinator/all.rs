use super::common::{coordinate, CombinatorBehavior};
use super::All as AllTrait;
use crate::spawn::{Spawn, ThreadSpawner};
use crate::{Error, Promise};

/// Fulfills with every value once all inputs fulfill; rejects with the
/// first rejection observed.
pub(crate) struct AllBehavior;

impl<T> CombinatorBehavior<T> for AllBehavior {
    const NAME: &'static str = "all";

    type Output = Vec<T>;
    type StoredItem = T;

    fn maybe_return(_idx: usize, res: Result<T, Error>) -> Result<T, Result<Vec<T>, Error>> {
        res.map_err(Err)
    }

    fn when_completed(items: Vec<T>) -> Result<Vec<T>, Error> {
        Ok(items)
    }
}

/// Wait for every promise to fulfill.
///
/// Fulfills with the values in input order. Rejects as soon as any input
/// rejects; the other inputs keep running and their outcomes are
/// discarded. An empty input fulfills immediately with an empty vec.
///
/// # Examples
///
/// ```
/// use promisery::Promise;
///
/// let a = Promise::new(|| Ok::<_, std::io::Error>(1));
/// let b = Promise::new(|| Ok::<_, std::io::Error>(2));
/// assert_eq!(promisery::all([a, b]).wait().unwrap(), [1, 2]);
/// ```
pub fn all<T, I>(promises: I) -> Promise<Vec<T>>
where
    T: Clone + Send + Sync + 'static,
    I: IntoIterator<Item = Promise<T>>,
{
    all_in(&ThreadSpawner::new(), promises)
}

/// Like [`all()`], launching the coordinating task through `spawner`.
pub fn all_in<S, T, I>(spawner: &S, promises: I) -> Promise<Vec<T>>
where
    S: Spawn + ?Sized,
    T: Clone + Send + Sync + 'static,
    I: IntoIterator<Item = Promise<T>>,
{
    let promises: Vec<_> = promises.into_iter().collect();
    if promises.is_empty() {
        return Promise::resolve(Vec::new());
    }
    coordinate::<_, _, AllBehavior>(spawner, promises)
}

impl<T> AllTrait for Vec<Promise<T>>
where
    T: Clone + Send + Sync + 'static,
{
    type Output = Vec<T>;

    fn all_in<S: Spawn + ?Sized>(self, spawner: &S) -> Promise<Self::Output> {
        all_in(spawner, self)
    }
}

impl<T, const N: usize> AllTrait for [Promise<T>; N]
where
    T: Clone + Send + Sync + 'static,
{
    type Output = Vec<T>;

    fn all_in<S: Spawn + ?Sized>(self, spawner: &S) -> Promise<Self::Output> {
        all_in(spawner, self)
    }
}
