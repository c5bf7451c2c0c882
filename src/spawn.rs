//! Launching executors and coordinating tasks.
//!
//! Promises never reach for a global scheduler. Every operation that needs
//! to run something concurrently has a `*_in` variant taking a [`Spawn`]
//! implementation; the plain variants use [`ThreadSpawner`], which starts
//! one OS thread per task.
//!
//! Any `Fn(Task)` closure is a spawner, so an existing pool plugs in
//! directly:
//!
//! ```
//! use promisery::{Promise, Task};
//!
//! let spawner = |task: Task| {
//!     std::thread::spawn(task);
//! };
//! let p = Promise::new_in(&spawner, || Ok::<_, std::io::Error>(5));
//! assert_eq!(p.wait().unwrap(), 5);
//! ```

use std::fmt;
use std::thread;

/// A unit of work handed to a [`Spawn`] implementation.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Runs tasks concurrently with the caller.
///
/// Implementations must either run the task to completion or drop it. A
/// dropped task rejects its promise with [`Error::Abandoned`], so a task
/// is never silently lost.
///
/// [`Error::Abandoned`]: crate::Error::Abandoned
pub trait Spawn {
    /// Launch `task` without waiting for it.
    fn spawn(&self, task: Task);
}

impl<F> Spawn for F
where
    F: Fn(Task),
{
    fn spawn(&self, task: Task) {
        self(task)
    }
}

/// Spawns every task on a fresh OS thread.
#[derive(Clone, Default)]
pub struct ThreadSpawner {
    name: Option<String>,
    stack_size: Option<usize>,
}

impl ThreadSpawner {
    /// Create a spawner with the platform's thread defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Name every spawned thread.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the stack size, in bytes, of every spawned thread.
    pub fn stack_size(mut self, size: usize) -> Self {
        self.stack_size = Some(size);
        self
    }

    fn builder(&self) -> thread::Builder {
        let mut builder = thread::Builder::new();
        if let Some(name) = &self.name {
            builder = builder.name(name.clone());
        }
        if let Some(size) = self.stack_size {
            builder = builder.stack_size(size);
        }
        builder
    }
}

impl fmt::Debug for ThreadSpawner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThreadSpawner")
            .field("name", &self.name)
            .field("stack_size", &self.stack_size)
            .finish()
    }
}

impl Spawn for ThreadSpawner {
    fn spawn(&self, task: Task) {
        // On failure the closure, and with it the task, is dropped.
        if let Err(err) = self.builder().spawn(task) {
            tracing::warn!(error = %err, "failed to spawn promise thread");
        }
    }
}
