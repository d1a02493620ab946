//! Shared session store with change notifications and scope teardown.

use crate::{AuthenticatedIdentity, SessionSnapshot, SessionStatus};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Callback type for session change notifications.
pub type SessionCallback = Box<dyn Fn(&SessionSnapshot) + Send + Sync>;

struct StoreInner {
    snapshot: Mutex<SessionSnapshot>,
    subscribers: Mutex<Vec<SessionCallback>>,
    disposed: AtomicBool,
}

/// Shared, observable store for the session snapshot.
///
/// The store is the only owner of the snapshot; everything else reads
/// it or subscribes to changes. All mutators become silent no-ops once
/// the owning scope is torn down via [`TeardownHandle::dispose`].
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<StoreInner>,
}

/// Disposer for the store's owning scope.
///
/// After `dispose()`, no store mutation takes effect and no subscriber
/// is notified again, regardless of pending in-flight work.
#[derive(Clone)]
pub struct TeardownHandle {
    inner: Arc<StoreInner>,
}

impl TeardownHandle {
    /// Disable all further mutation and notification.
    pub fn dispose(&self) {
        self.inner.disposed.store(true, Ordering::SeqCst);
        debug!("Session store scope torn down");
    }
}

impl SessionStore {
    /// Create a store holding the initial `Unknown` snapshot.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(StoreInner {
                snapshot: Mutex::new(SessionSnapshot::unknown()),
                subscribers: Mutex::new(Vec::new()),
                disposed: AtomicBool::new(false),
            }),
        }
    }

    /// Handle that tears down this store's owning scope.
    pub fn teardown_handle(&self) -> TeardownHandle {
        TeardownHandle {
            inner: self.inner.clone(),
        }
    }

    /// Current snapshot (cloned).
    pub fn read(&self) -> SessionSnapshot {
        self.inner.snapshot.lock().expect("lock poisoned").clone()
    }

    /// Current status.
    pub fn status(&self) -> SessionStatus {
        self.inner.snapshot.lock().expect("lock poisoned").status
    }

    /// Register a callback invoked whenever the snapshot changes.
    pub fn subscribe(&self, callback: SessionCallback) {
        self.inner
            .subscribers
            .lock()
            .expect("lock poisoned")
            .push(callback);
    }

    /// Record a validated identity and mark the session authenticated.
    pub fn apply(&self, identity: AuthenticatedIdentity) {
        self.mutate(SessionSnapshot::authenticated(identity));
    }

    /// Drop any identity and mark the session unauthenticated.
    pub fn clear(&self) {
        self.mutate(SessionSnapshot::unauthenticated());
    }

    /// Mark the first check as in flight.
    ///
    /// Only transitions `Unknown -> Checking`; a settled status is never
    /// clobbered, so re-validating an authenticated session does not
    /// flicker the UI back into a loading state.
    pub fn mark_checking(&self) {
        if self.inner.disposed.load(Ordering::SeqCst) {
            return;
        }
        let changed = {
            let mut snapshot = self.inner.snapshot.lock().expect("lock poisoned");
            if snapshot.status == SessionStatus::Unknown {
                snapshot.status = SessionStatus::Checking;
                Some(snapshot.clone())
            } else {
                None
            }
        };
        if let Some(snapshot) = changed {
            self.notify(&snapshot);
        }
    }

    fn mutate(&self, next: SessionSnapshot) {
        if self.inner.disposed.load(Ordering::SeqCst) {
            debug!("Ignoring session store write after teardown");
            return;
        }
        let changed = {
            let mut snapshot = self.inner.snapshot.lock().expect("lock poisoned");
            if *snapshot == next {
                None
            } else {
                debug!(
                    old_status = ?snapshot.status,
                    new_status = ?next.status,
                    "Session snapshot changed"
                );
                *snapshot = next.clone();
                Some(next)
            }
        };
        if let Some(snapshot) = changed {
            self.notify(&snapshot);
        }
    }

    fn notify(&self, snapshot: &SessionSnapshot) {
        let subscribers = self.inner.subscribers.lock().expect("lock poisoned");
        for callback in subscribers.iter() {
            callback(snapshot);
        }
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
