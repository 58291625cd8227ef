use std::sync::{Mutex, MutexGuard, OnceLock};

static MANIFEST_ENV: OnceLock<Mutex<()>> = OnceLock::new();

/// Serializes tests that set or read variables used by manifest expansion.
pub fn env_lock() -> MutexGuard<'static, ()> {
    MANIFEST_ENV
        .get_or_init(Mutex::default)
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}
