//! Exclusive-access lock around one block engine.
//!
//! [`EngineLock`] hands the engine to one caller at a time through an RAII
//! [`EngineGuard`]. Dropping the guard releases the engine and wakes one
//! waiter, including when the holder unwinds from a panic. The lock records
//! the holding thread so that a second acquisition from the same thread is
//! reported as [`EngineError::ReentrantLock`] instead of deadlocking.

use std::ops::{Deref, DerefMut};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, ThreadId};
use std::time::{Duration, Instant};

use logging::trace_lock;

use crate::error::{EngineError, EngineResult};

#[derive(Debug, Default)]
struct LockState {
    owner: Option<ThreadId>,
    waiters: usize,
}

/// Mutual-exclusion guard serialising every use of one engine.
///
/// # Example
///
/// ```
/// use engine::EngineLock;
///
/// let lock = EngineLock::new(Vec::<u32>::new());
/// {
///     let mut engine = lock.acquire().unwrap();
///     engine.push(7);
///     assert!(lock.try_acquire().is_none());
/// }
/// assert_eq!(*lock.acquire().unwrap(), vec![7]);
/// ```
#[derive(Debug)]
pub struct EngineLock<E> {
    state: Mutex<LockState>,
    released: Condvar,
    engine: Mutex<E>,
}

impl<E> EngineLock<E> {
    /// Wraps `engine` in a free lock.
    #[must_use]
    pub fn new(engine: E) -> Self {
        Self {
            state: Mutex::new(LockState::default()),
            released: Condvar::new(),
            engine: Mutex::new(engine),
        }
    }

    /// Blocks until the engine is free and returns a guard for it.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ReentrantLock`] when the calling thread already
    /// holds the lock.
    pub fn acquire(&self) -> EngineResult<EngineGuard<'_, E>> {
        self.acquire_with(None)
    }

    /// Like [`acquire`](Self::acquire) but gives up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::LockTimeout`] when the engine stays busy for
    /// longer than `timeout`, or [`EngineError::ReentrantLock`].
    pub fn acquire_timeout(&self, timeout: Duration) -> EngineResult<EngineGuard<'_, E>> {
        self.acquire_with(Some(timeout))
    }

    /// Acquires with an optional timeout; `None` waits forever.
    ///
    /// # Errors
    ///
    /// See [`acquire_timeout`](Self::acquire_timeout).
    pub fn acquire_with(&self, timeout: Option<Duration>) -> EngineResult<EngineGuard<'_, E>> {
        let me = thread::current().id();
        let started = Instant::now();
        let deadline = timeout.map(|t| started + t);

        let mut state = self.lock_state();
        if state.owner == Some(me) {
            return Err(EngineError::ReentrantLock);
        }

        state.waiters += 1;
        while state.owner.is_some() {
            state = match deadline {
                None => self
                    .released
                    .wait(state)
                    .unwrap_or_else(PoisonError::into_inner),
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        state.waiters -= 1;
                        let waited = now - started;
                        trace_lock!("gave up after {:?}", waited);
                        return Err(EngineError::LockTimeout { waited });
                    }
                    self.released
                        .wait_timeout(state, deadline - now)
                        .unwrap_or_else(PoisonError::into_inner)
                        .0
                }
            };
        }
        state.waiters -= 1;
        state.owner = Some(me);
        drop(state);

        let waited = started.elapsed();
        trace_lock!("acquired after {:?}", waited);
        Ok(self.guard())
    }

    /// Returns a guard when the engine is free right now, `None` otherwise.
    pub fn try_acquire(&self) -> Option<EngineGuard<'_, E>> {
        let mut state = self.lock_state();
        if state.owner.is_some() {
            return None;
        }
        state.owner = Some(thread::current().id());
        drop(state);
        Some(self.guard())
    }

    /// Returns `true` while some thread holds the engine.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.lock_state().owner.is_some()
    }

    /// Returns `true` when the calling thread holds the engine.
    #[must_use]
    pub fn is_held_by_current_thread(&self) -> bool {
        self.lock_state().owner == Some(thread::current().id())
    }

    /// Number of threads currently blocked in an acquire call.
    #[must_use]
    pub fn waiters(&self) -> usize {
        self.lock_state().waiters
    }

    /// Consumes the lock and returns the engine.
    pub fn into_inner(self) -> E {
        self.engine
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn guard(&self) -> EngineGuard<'_, E> {
        // Only the logical owner reaches this point, so the engine mutex is
        // uncontended apart from a previous guard still dropping its fields.
        let engine = self.engine.lock().unwrap_or_else(PoisonError::into_inner);
        EngineGuard {
            engine,
            lock: self,
            acquired_at: Instant::now(),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, LockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn release(&self, held: Duration) {
        let mut state = self.lock_state();
        state.owner = None;
        let waiters = state.waiters;
        drop(state);
        self.released.notify_one();
        trace_lock!("released after {:?}, {} waiting", held, waiters);
    }
}

/// RAII guard giving exclusive access to the engine; releases on drop.
#[derive(Debug)]
pub struct EngineGuard<'a, E> {
    engine: MutexGuard<'a, E>,
    lock: &'a EngineLock<E>,
    acquired_at: Instant,
}

impl<E> EngineGuard<'_, E> {
    /// How long this guard has been held.
    #[must_use]
    pub fn held_for(&self) -> Duration {
        self.acquired_at.elapsed()
    }
}

impl<E> Deref for EngineGuard<'_, E> {
    type Target = E;

    fn deref(&self) -> &Self::Target {
        &self.engine
    }
}

impl<E> DerefMut for EngineGuard<'_, E> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.engine
    }
}

impl<E> Drop for EngineGuard<'_, E> {
    fn drop(&mut self) {
        self.lock.release(self.acquired_at.elapsed());
    }
}
