//! Memory protection for key material
//!
//! Two best-effort hardening measures:
//!
//! 1. **Core dump prevention** — `setrlimit(RLIMIT_CORE, 0)` so a crash
//!    never writes custodied key bytes to disk.
//! 2. **Memory locking** — `mlock()` on the pages holding jar entries so
//!    the OS cannot swap them out.
//!
//! Failures are logged and tolerated: containers and unprivileged users
//! often forbid both operations, and a custody core that refuses to start
//! there would be worse than one that runs unhardened.

use std::sync::atomic::{AtomicBool, Ordering};

use log::warn;
use zeroize::Zeroize;

static CORE_DUMPS_DISABLED: AtomicBool = AtomicBool::new(false);

/// Disable core dumps for the current process. Idempotent.
///
/// Returns `true` if core dumps are (already) disabled.
pub fn disable_core_dumps() -> bool {
    if CORE_DUMPS_DISABLED.swap(true, Ordering::SeqCst) {
        return true;
    }

    #[cfg(unix)]
    {
        unix::disable_core_dumps_impl()
    }

    #[cfg(not(unix))]
    {
        warn!("core dump prevention not supported on this platform");
        false
    }
}

/// Lock a memory region against swapping.
///
/// # Safety
///
/// `ptr` must point to a valid allocation of at least `len` bytes, and the
/// region must be unlocked before the allocation is freed (or the process
/// exits, which unlocks everything).
pub unsafe fn mlock(ptr: *const u8, len: usize) -> bool {
    if len == 0 {
        return true;
    }

    #[cfg(unix)]
    {
        unix::mlock_impl(ptr, len)
    }

    #[cfg(not(unix))]
    {
        let _ = (ptr, len);
        false
    }
}

/// Unlock a region previously locked with [`mlock`].
///
/// # Safety
///
/// `ptr` and `len` must match a previous `mlock` call.
pub unsafe fn munlock(ptr: *const u8, len: usize) -> bool {
    if len == 0 {
        return true;
    }

    #[cfg(unix)]
    {
        unix::munlock_impl(ptr, len)
    }

    #[cfg(not(unix))]
    {
        let _ = (ptr, len);
        true
    }
}

/// Heap buffer that is locked in memory for its lifetime and zeroed on drop.
///
/// The key jar stages every custodied key in one of these, so entry bytes
/// never reach swap even while the jar's index reallocates around them.
pub struct LockedBuffer {
    data: Vec<u8>,
    locked: bool,
}

impl LockedBuffer {
    /// Copy `bytes` into a fresh locked buffer.
    pub fn from_slice(bytes: &[u8]) -> Self {
        let data = bytes.to_vec();
        let locked = if data.is_empty() {
            true
        } else {
            // SAFETY: data is a live allocation of data.len() bytes, and
            // Drop munlocks it before the Vec is freed.
            unsafe { mlock(data.as_ptr(), data.len()) }
        };
        if !locked {
            warn!("failed to mlock {} bytes; key may be swappable", data.len());
        }
        Self { data, locked }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Whether the lock actually took effect.
    pub fn is_locked(&self) -> bool {
        self.locked
    }
}

impl Drop for LockedBuffer {
    fn drop(&mut self) {
        // Unlock first: zeroizing a Vec also truncates it, which would lose
        // the pointer and length the munlock needs.
        if self.locked && !self.data.is_empty() {
            // SAFETY: matches the mlock in from_slice.
            unsafe {
                munlock(self.data.as_ptr(), self.data.len());
            }
        }
        self.data.zeroize();
    }
}

impl std::fmt::Debug for LockedBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LockedBuffer({} bytes)", self.data.len())
    }
}

#[cfg(unix)]
mod unix {
    use log::warn;

    pub fn disable_core_dumps_impl() -> bool {
        // SAFETY: setrlimit with RLIMIT_CORE=0 is a standard POSIX call.
        unsafe {
            let rlim = libc::rlimit {
                rlim_cur: 0,
                rlim_max: 0,
            };
            if libc::setrlimit(libc::RLIMIT_CORE, &rlim) != 0 {
                warn!(
                    "failed to disable core dumps: {}",
                    std::io::Error::last_os_error()
                );
                return false;
            }
        }
        true
    }

    pub unsafe fn mlock_impl(ptr: *const u8, len: usize) -> bool {
        libc::mlock(ptr as *const libc::c_void, len) == 0
    }

    pub unsafe fn munlock_impl(ptr: *const u8, len: usize) -> bool {
        libc::munlock(ptr as *const libc::c_void, len) == 0
    }
}
