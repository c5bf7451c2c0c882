//! Thread-backed promises with callback chaining and combinators.
//!
//! A [`Promise`] runs its producer concurrently the moment it is created and
//! settles exactly once, to a value or an [`Error`]. Callers can observe
//! the outcome with callbacks ([`then`], [`catch`], [`finally`]), block on
//! it with [`wait`], or `.await` it from async code.
//!
//! # Operations
//!
//! This library provides the following operations on collections of
//! promises:
//!
//! - [`all()`]: Wait for all promises to fulfill, or the first to reject.
//! - [`race()`]: Wait for the first promise to settle.
//! - [`all_settled()`]: Wait for every promise to settle, collecting each outcome.
//! - [`any()`]: Wait for the first promise to fulfill, or all to reject.
//!
//! # Examples
//!
//! ```rust
//! use promisery::prelude::*;
//! use promisery::Promise;
//! use std::time::Duration;
//!
//! let fetch = |id: u32, ms: u64| {
//!     Promise::new(move || {
//!         std::thread::sleep(Duration::from_millis(ms));
//!         Ok::<_, std::io::Error>(id)
//!     })
//! };
//!
//! let all = vec![fetch(1, 20), fetch(2, 5), fetch(3, 10)].all();
//! assert_eq!(all.wait().unwrap(), [1, 2, 3]);
//!
//! let first = vec![fetch(1, 200), fetch(2, 5)].race();
//! assert_eq!(first.wait().unwrap(), 2);
//! ```
//!
//! # Executors
//!
//! No global scheduler is involved. By default every producer and every
//! combinator's coordinating task gets its own thread; the `*_in` variants
//! take any [`Spawn`] implementation instead. There is no cancellation: a
//! producer runs to completion even if nobody observes its promise.
//!
//! [`then`]: Promise::then
//! [`catch`]: Promise::catch
//! [`finally`]: Promise::finally
//! [`wait`]: Promise::wait

#![deny(missing_debug_implementations, nonstandard_style)]
#![warn(missing_docs, unreachable_pub)]

mod error;
mod utils;

/// The promisery prelude.
pub mod prelude {
    pub use super::combinator::All as _;
    pub use super::combinator::AllSettled as _;
    pub use super::combinator::Any as _;
    pub use super::combinator::Race as _;
}

pub mod combinator;
pub mod promise;
pub mod spawn;

pub use combinator::{all, all_in, all_settled, all_settled_in, any, any_in, race, race_in};
pub use error::{AggregateError, Error};
pub use promise::{Promise, Resolver, Status, Wait};
pub use spawn::{Spawn, Task, ThreadSpawner};
