//! Utilities to implement the promises and combinators of this crate.

mod catch_unwind;
mod wakers;

pub(crate) use catch_unwind::{catch_unwind, CatchUnwind};
pub(crate) use wakers::WakerVec;

#[cfg(test)]
pub(crate) use wakers::DummyWaker;
