//! Request-scoped field accumulator for canonical request logging.
//!
//! One [`LogContext`] is created per inbound request and handed explicitly
//! through handlers and providers. Anything on the call path can add fields;
//! the owner of the request flushes them once, as a single log line, when the
//! request completes.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;

/// Clones share the same underlying fields.
#[derive(Debug, Clone, Default)]
pub struct LogContext {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    fields: Mutex<BTreeMap<String, Value>>,
    flushed: AtomicBool,
}

impl LogContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`, replacing any earlier value.
    pub fn add(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.lock().insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.lock().get(key).cloned()
    }

    /// Snapshot of every field accumulated so far.
    pub fn fields(&self) -> BTreeMap<String, Value> {
        self.lock().clone()
    }

    /// Hand out the accumulated fields for emission. Returns `Some` on the
    /// first call only, so a request is never logged twice.
    pub fn take_for_flush(&self) -> Option<BTreeMap<String, Value>> {
        if self.inner.flushed.swap(true, Ordering::AcqRel) {
            return None;
        }
        Some(self.fields())
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, Value>> {
        // Fields are plain data; a panic mid-insert cannot leave them torn.
        self.inner
            .fields
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
