//! Serialization of the emit path
//!
//! Rate-limit bookkeeping, rotation and sink writes for one message run inside
//! a single critical section, so lines from concurrent callers never
//! interleave and a drop summary always directly follows its message.

use parking_lot::Mutex;

/// Mutual exclusion around one message's emission
pub trait EmitLock: Send + Sync + 'static {
    /// Run `f` with the lock held
    fn run(&self, f: &mut dyn FnMut());
}

/// Default lock: an in-process mutex
#[derive(Debug, Default)]
pub struct MutexLock(Mutex<()>);

impl MutexLock {
    /// Unlocked mutex
    pub const fn new() -> Self {
        Self(parking_lot::const_mutex(()))
    }
}

impl EmitLock for MutexLock {
    #[inline]
    fn run(&self, f: &mut dyn FnMut()) {
        let _guard = self.0.lock();
        f();
    }
}

/// Adapter for an external lock driven by a callback
///
/// The callback receives `true` to acquire and `false` to release, e.g. to
/// share one lock between several logging systems in the same process.
pub struct FnLock<F> {
    callback: F,
}

impl<F> FnLock<F>
where
    F: Fn(bool) + Send + Sync + 'static,
{
    /// Wrap a lock/unlock callback
    pub const fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> std::fmt::Debug for FnLock<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnLock").finish_non_exhaustive()
    }
}

struct Release<'a, F: Fn(bool)>(&'a F);

impl<F: Fn(bool)> Drop for Release<'_, F> {
    fn drop(&mut self) {
        (self.0)(false);
    }
}

impl<F> EmitLock for FnLock<F>
where
    F: Fn(bool) + Send + Sync + 'static,
{
    fn run(&self, f: &mut dyn FnMut()) {
        (self.callback)(true);
        let _release = Release(&self.callback);
        f();
    }
}
