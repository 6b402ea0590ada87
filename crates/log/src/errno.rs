//! errno preservation around the emit path
//!
//! Callers often log right after a failing system call and then inspect errno;
//! writing the log line must not clobber it.

/// Restores the calling thread's errno on drop
#[derive(Debug)]
#[must_use = "errno is restored when the guard drops"]
pub(crate) struct ErrnoGuard {
    #[cfg(unix)]
    saved: i32,
}

impl ErrnoGuard {
    #[inline]
    pub(crate) fn save() -> Self {
        Self {
            #[cfg(unix)]
            saved: nix::errno::Errno::last_raw(),
        }
    }
}

impl Drop for ErrnoGuard {
    #[inline]
    fn drop(&mut self) {
        #[cfg(unix)]
        nix::errno::Errno::set_raw(self.saved);
    }
}
