//! Combinators building one promise out of many.
//!
//! | Name          | Fulfills with      | When does it settle?                            |
//! | ---           | ---                | ---                                             |
//! | [`all()`]         | `Vec<T>`             | All fulfilled, or the first rejection           |
//! | [`race()`]        | `T`                  | The first input to settle, either way           |
//! | [`all_settled()`] | `Vec<Result<T, _>>`  | All settled; never rejects                      |
//! | [`any()`]         | `T`                  | The first fulfillment, or once all rejected     |
//!
//! Outputs are always in input order, whatever order the inputs settle in.
//! Each call launches a single coordinating task which sleeps until an
//! input settles; inputs that settle at the same moment are visited in a
//! uniformly random order, so no input position is favored.
//!
//! The same operations are available as methods on `Vec<Promise<T>>` and
//! `[Promise<T>; N]` through the traits in this module:
//!
//! ```
//! use promisery::prelude::*;
//! use promisery::Promise;
//!
//! let a = Promise::new(|| Ok::<_, std::io::Error>("hello"));
//! let b = Promise::new(|| Ok::<_, std::io::Error>("world"));
//! assert_eq!([a, b].all().wait().unwrap(), ["hello", "world"]);
//! ```

use crate::spawn::{Spawn, ThreadSpawner};
use crate::Promise;

pub use all::{all, all_in};
pub use all_settled::{all_settled, all_settled_in};
pub use any::{any, any_in};
pub use race::{race, race_in};

mod all;
mod all_settled;
mod any;
mod common;
mod race;

/// Wait for all promises to fulfill, or the first to reject.
///
/// See [`all()`] for the exact semantics.
pub trait All {
    /// The value the combined promise fulfills with.
    type Output;

    /// Combine the promises, coordinating on a new thread.
    fn all(self) -> Promise<Self::Output>
    where
        Self: Sized,
    {
        self.all_in(&ThreadSpawner::new())
    }

    /// Combine the promises, coordinating through `spawner`.
    fn all_in<S: Spawn + ?Sized>(self, spawner: &S) -> Promise<Self::Output>;
}

/// Wait for the first promise to settle.
///
/// See [`race()`] for the exact semantics.
pub trait Race {
    /// The value the combined promise fulfills with.
    type Output;

    /// Combine the promises, coordinating on a new thread.
    fn race(self) -> Promise<Self::Output>
    where
        Self: Sized,
    {
        self.race_in(&ThreadSpawner::new())
    }

    /// Combine the promises, coordinating through `spawner`.
    fn race_in<S: Spawn + ?Sized>(self, spawner: &S) -> Promise<Self::Output>;
}

/// Wait for every promise to settle.
///
/// See [`all_settled()`] for the exact semantics.
pub trait AllSettled {
    /// The value the combined promise fulfills with.
    type Output;

    /// Combine the promises, coordinating on a new thread.
    fn all_settled(self) -> Promise<Self::Output>
    where
        Self: Sized,
    {
        self.all_settled_in(&ThreadSpawner::new())
    }

    /// Combine the promises, coordinating through `spawner`.
    fn all_settled_in<S: Spawn + ?Sized>(self, spawner: &S) -> Promise<Self::Output>;
}

/// Wait for the first promise to fulfill, or all to reject.
///
/// See [`any()`] for the exact semantics.
pub trait Any {
    /// The value the combined promise fulfills with.
    type Output;

    /// Combine the promises, coordinating on a new thread.
    fn any(self) -> Promise<Self::Output>
    where
        Self: Sized,
    {
        self.any_in(&ThreadSpawner::new())
    }

    /// Combine the promises, coordinating through `spawner`.
    fn any_in<S: Spawn + ?Sized>(self, spawner: &S) -> Promise<Self::Output>;
}
