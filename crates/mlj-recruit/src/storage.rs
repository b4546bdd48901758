//! Key-value storage port backing client-scoped persistent state.
//!
//! The rate limiter's submission history and the admin console's last-fetch
//! marker both live behind this port. Production binds it to whatever
//! per-client persistent store the platform offers; tests and the bundled
//! service use [`MemoryStorage`].

use std::collections::HashMap;
use std::sync::Mutex;

/// String-keyed storage with the same shape as a browser origin store:
/// synchronous access, explicit removal, no expiry.
pub trait StoragePort: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// Process-lifetime in-memory storage.
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl StoragePort for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().expect("storage mutex poisoned");
        entries.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut entries = self.entries.lock().expect("storage mutex poisoned");
        entries.insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        let mut entries = self.entries.lock().expect("storage mutex poisoned");
        entries.remove(key);
    }
}
