use super::common::{coordinate, CombinatorBehavior};
use super::Any as AnyTrait;
use crate::error::AggregateError;
use crate::spawn::{Spawn, ThreadSpawner};
use crate::{Error, Promise};

/// Fulfills with the first value; rejects once every input rejected.
pub(crate) struct AnyBehavior;

impl<T> CombinatorBehavior<T> for AnyBehavior {
    const NAME: &'static str = "any";

    type Output = T;
    type StoredItem = Error;

    fn maybe_return(_idx: usize, res: Result<T, Error>) -> Result<Error, Result<T, Error>> {
        match res {
            Ok(value) => Err(Ok(value)),
            Err(err) => Ok(err),
        }
    }

    fn when_completed(errors: Vec<Error>) -> Result<T, Error> {
        Err(Error::Aggregate(AggregateError::new(errors)))
    }
}

/// Wait for the first promise to fulfill.
///
/// Rejections are collected until every input has rejected, at which point
/// the combined promise rejects with [`Error::Aggregate`] holding every
/// child error in input order. Zero inputs reject with
/// [`Error::InvalidArgument`].
///
/// # Examples
///
/// ```
/// use promisery::{Error, Promise};
///
/// let a = Promise::<u8>::new(|| Err("E1"));
/// let b = Promise::<u8>::new(|| Err("E2"));
/// let err = promisery::any([a, b]).wait().unwrap_err();
/// let errors = err.as_aggregate().unwrap();
/// assert_eq!(errors[0].to_string(), "E1");
/// assert_eq!(errors[1].to_string(), "E2");
/// ```
pub fn any<T, I>(promises: I) -> Promise<T>
where
    T: Clone + Send + Sync + 'static,
    I: IntoIterator<Item = Promise<T>>,
{
    any_in(&ThreadSpawner::new(), promises)
}

/// Like [`any()`], launching the coordinating task through `spawner`.
pub fn any_in<S, T, I>(spawner: &S, promises: I) -> Promise<T>
where
    S: Spawn + ?Sized,
    T: Clone + Send + Sync + 'static,
    I: IntoIterator<Item = Promise<T>>,
{
    let promises: Vec<_> = promises.into_iter().collect();
    if promises.is_empty() {
        return Promise::reject(Error::InvalidArgument("any requires at least one promise"));
    }
    coordinate::<_, _, AnyBehavior>(spawner, promises)
}

impl<T> AnyTrait for Vec<Promise<T>>
where
    T: Clone + Send + Sync + 'static,
{
    type Output = T;

    fn any_in<S: Spawn + ?Sized>(self, spawner: &S) -> Promise<Self::Output> {
        any_in(spawner, self)
    }
}

impl<T, const N: usize> AnyTrait for [Promise<T>; N]
where
    T: Clone + Send + Sync + 'static,
{
    type Output = T;

    fn any_in<S: Spawn + ?Sized>(self, spawner: &S) -> Promise<Self::Output> {
        any_in(spawner, self)
    }
}
