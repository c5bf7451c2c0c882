use super::common::{coordinate, CombinatorBehavior};
use super::AllSettled as AllSettledTrait;
use crate::spawn::{Spawn, ThreadSpawner};
use crate::{Error, Promise};

/// Collects every outcome; never rejects.
pub(crate) struct AllSettledBehavior;

impl<T> CombinatorBehavior<T> for AllSettledBehavior {
    const NAME: &'static str = "all_settled";

    type Output = Vec<Result<T, Error>>;
    type StoredItem = Result<T, Error>;

    fn maybe_return(
        _idx: usize,
        res: Result<T, Error>,
    ) -> Result<Result<T, Error>, Result<Self::Output, Error>> {
        Ok(res)
    }

    fn when_completed(items: Vec<Result<T, Error>>) -> Result<Self::Output, Error> {
        Ok(items)
    }
}

/// Wait for every promise to settle, whatever the outcome.
///
/// Fulfills with each input's outcome in input order and never rejects.
/// An empty input fulfills immediately with an empty vec.
///
/// # Examples
///
/// ```
/// use promisery::Promise;
///
/// let ok = Promise::new(|| Ok::<_, &str>(1));
/// let err = Promise::new(|| Err::<i32, _>("E"));
/// let outcomes = promisery::all_settled([ok, err]).wait().unwrap();
/// assert_eq!(*outcomes[0].as_ref().unwrap(), 1);
/// assert_eq!(outcomes[1].as_ref().unwrap_err().to_string(), "E");
/// ```
pub fn all_settled<T, I>(promises: I) -> Promise<Vec<Result<T, Error>>>
where
    T: Clone + Send + Sync + 'static,
    I: IntoIterator<Item = Promise<T>>,
{
    all_settled_in(&ThreadSpawner::new(), promises)
}

/// Like [`all_settled()`], launching the coordinating task through `spawner`.
pub fn all_settled_in<S, T, I>(spawner: &S, promises: I) -> Promise<Vec<Result<T, Error>>>
where
    S: Spawn + ?Sized,
    T: Clone + Send + Sync + 'static,
    I: IntoIterator<Item = Promise<T>>,
{
    let promises: Vec<_> = promises.into_iter().collect();
    if promises.is_empty() {
        return Promise::resolve(Vec::new());
    }
    coordinate::<_, _, AllSettledBehavior>(spawner, promises)
}

impl<T> AllSettledTrait for Vec<Promise<T>>
where
    T: Clone + Send + Sync + 'static,
{
    type Output = Vec<Result<T, Error>>;

    fn all_settled_in<S: Spawn + ?Sized>(self, spawner: &S) -> Promise<Self::Output> {
        all_settled_in(spawner, self)
    }
}

impl<T, const N: usize> AllSettledTrait for [Promise<T>; N]
where
    T: Clone + Send + Sync + 'static,
{
    type Output = Vec<Result<T, Error>>;

    fn all_settled_in<S: Spawn + ?Sized>(self, spawner: &S) -> Promise<Self::Output> {
        all_settled_in(spawner, self)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn mixed_outcomes_in_order() {
        let ok = Promise::new(|| {
            thread::sleep(Duration::from_millis(20));
            Ok::<_, &str>(1)
        });
        let err = Promise::new(|| Err::<i32, _>("E"));
        let outcomes = vec![ok, err].all_settled().wait().unwrap();
        assert_eq!(outcomes.len(), 2);
        assert_eq!(*outcomes[0].as_ref().unwrap(), 1);
        assert_eq!(outcomes[1].as_ref().unwrap_err().to_string(), "E");
    }

    #[test]
    fn empty() {
        let p = all_settled(Vec::<Promise<u8>>::new());
        assert!(p.wait().unwrap().is_empty());
    }

    #[test]
    fn all_rejected_still_fulfills() {
        let outcomes = [
            Promise::<u8>::reject(Error::Abandoned),
            Promise::<u8>::reject(Error::InvalidArgument("x")),
        ]
        .all_settled()
        .wait()
        .unwrap();
        assert!(matches!(outcomes[0], Err(Error::Abandoned)));
        assert!(matches!(outcomes[1], Err(Error::InvalidArgument("x"))));
    }
}
