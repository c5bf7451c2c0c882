use core::convert::Infallible;

use super::common::{coordinate, CombinatorBehavior};
use super::Race as RaceTrait;
use crate::spawn::{Spawn, ThreadSpawner};
use crate::{Error, Promise};

/// Settles like the first input to settle.
pub(crate) struct RaceBehavior;

impl<T> CombinatorBehavior<T> for RaceBehavior {
    const NAME: &'static str = "race";

    type Output = T;
    type StoredItem = Infallible;

    fn maybe_return(_idx: usize, res: Result<T, Error>) -> Result<Infallible, Result<T, Error>> {
        Err(res)
    }

    fn when_completed(_items: Vec<Infallible>) -> Result<T, Error> {
        Err(EMPTY)
    }
}

const EMPTY: Error = Error::InvalidArgument("race requires at least one promise");

/// Wait for the first promise to settle.
///
/// The combined promise fulfills or rejects like whichever input settles
/// first. When several inputs have already settled, one of them is chosen
/// uniformly at random. Racing zero promises rejects with
/// [`Error::InvalidArgument`].
pub fn race<T, I>(promises: I) -> Promise<T>
where
    T: Clone + Send + Sync + 'static,
    I: IntoIterator<Item = Promise<T>>,
{
    race_in(&ThreadSpawner::new(), promises)
}

/// Like [`race()`], launching the coordinating task through `spawner`.
pub fn race_in<S, T, I>(spawner: &S, promises: I) -> Promise<T>
where
    S: Spawn + ?Sized,
    T: Clone + Send + Sync + 'static,
    I: IntoIterator<Item = Promise<T>>,
{
    let promises: Vec<_> = promises.into_iter().collect();
    if promises.is_empty() {
        return Promise::reject(EMPTY);
    }
    coordinate::<_, _, RaceBehavior>(spawner, promises)
}

impl<T> RaceTrait for Vec<Promise<T>>
where
    T: Clone + Send + Sync + 'static,
{
    type Output = T;

    fn race_in<S: Spawn + ?Sized>(self, spawner: &S) -> Promise<Self::Output> {
        race_in(spawner, self)
    }
}

impl<T, const N: usize> RaceTrait for [Promise<T>; N]
where
    T: Clone + Send + Sync + 'static,
{
    type Output = T;

    fn race_in<S: Spawn + ?Sized>(self, spawner: &S) -> Promise<Self::Output> {
        race_in(spawner, self)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn fastest_wins() {
        let slow = Promise::new(|| {
            thread::sleep(Duration::from_millis(100));
            Ok::<_, &str>(2)
        });
        let fast = Promise::new(|| {
            thread::sleep(Duration::from_millis(10));
            Ok::<_, &str>(1)
        });
        assert_eq!(vec![fast, slow].race().wait().unwrap(), 1);
    }

    #[test]
    fn first_rejection_wins() {
        let (never, _resolver) = Promise::<u8>::deferred();
        let failing = Promise::<u8>::new(|| Err("lost"));
        let err = race([never, failing]).wait().unwrap_err();
        assert_eq!(err.to_string(), "lost");
    }

    #[test]
    fn empty_is_invalid() {
        let p = race(Vec::<Promise<u8>>::new());
        assert!(matches!(p.wait(), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn fair_among_settled() {
        let mut wins = [0usize; 2];
        for _ in 0..200 {
            let winner = [Promise::resolve(0usize), Promise::resolve(1)].race().wait().unwrap();
            wins[winner] += 1;
        }
        assert!(wins[0] > 0, "first input never won: {wins:?}");
        assert!(wins[1] > 0, "second input never won: {wins:?}");
    }
}
