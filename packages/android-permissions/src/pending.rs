//! Sinks of requests that have been handed to native code but not yet released.
//!
//! Native code only ever sees an opaque request id. Ids are never reused, so an id that
//! outlives its request (a restored fragment, a late callback) resolves to nothing instead
//! of to someone else's sink.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicI64, Ordering},
        Arc, Mutex,
    },
};

use crate::PermissionRequestResult;

/// Registry of in-flight permission requests, keyed by request id.
pub struct PendingRequests {
    next_id: AtomicI64,
    sinks: Mutex<HashMap<i64, Arc<dyn PermissionRequestResult>>>,
}

impl PendingRequests {
    pub fn new() -> Self {
        Self {
            next_id: AtomicI64::new(1),
            sinks: Mutex::new(HashMap::new()),
        }
    }

    /// Keep `sink` alive until [`release`](Self::release) and return its id.
    ///
    /// Ids start at 1; 0 never names a request.
    pub fn insert(&self, sink: Arc<dyn PermissionRequestResult>) -> i64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.lock().insert(id, sink);
        id
    }

    /// The sink registered under `id`, if the request is still in flight.
    pub fn get(&self, id: i64) -> Option<Arc<dyn PermissionRequestResult>> {
        self.lock().get(&id).cloned()
    }

    /// Drop the sink registered under `id`. Returns `false` for unknown or released ids.
    pub fn release(&self, id: i64) -> bool {
        self.lock().remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<i64, Arc<dyn PermissionRequestResult>>> {
        // A handler panicking elsewhere never leaves the map half-updated.
        self.sinks.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for PendingRequests {
    fn default() -> Self {
        Self::new()
    }
}
