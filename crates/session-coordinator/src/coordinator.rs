//! Facade tying the store, ledger, checker, and scheduler together.

use std::sync::Arc;

use tracing::{debug, info, warn};

use credential_client::CredentialApiHandle;
use session_state::{SessionCallback, SessionSnapshot, SessionStatus, SessionStore, TeardownHandle};

use crate::checker::SessionChecker;
use crate::config::CoordinatorConfig;
use crate::ledger::GenerationLedger;
use crate::scheduler::{RevalidationScheduler, Trigger};

/// Client-side session coordinator.
///
/// Owns the session store and the cancellation ledger, and exposes the
/// operations the host embeds: lifecycle triggers, logout, and teardown.
/// Cloning is cheap; clones share all state.
#[derive(Clone)]
pub struct SessionCoordinator {
    store: SessionStore,
    ledger: Arc<GenerationLedger>,
    scheduler: Arc<RevalidationScheduler>,
    api: CredentialApiHandle,
    teardown: TeardownHandle,
}

impl SessionCoordinator {
    pub fn new(config: CoordinatorConfig, api: CredentialApiHandle) -> Self {
        let store = SessionStore::new();
        let teardown = store.teardown_handle();
        let ledger = Arc::new(GenerationLedger::new());
        let checker = Arc::new(SessionChecker::new(
            Arc::clone(&api),
            store.clone(),
            Arc::clone(&ledger),
            config.clone(),
        ));
        let scheduler = Arc::new(RevalidationScheduler::new(
            store.clone(),
            Arc::clone(&ledger),
            checker,
            config,
        ));
        Self {
            store,
            ledger,
            scheduler,
            api,
            teardown,
        }
    }

    /// Current session snapshot.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.store.read()
    }

    pub fn status(&self) -> SessionStatus {
        self.store.status()
    }

    /// Register a callback invoked on every session change.
    pub fn subscribe(&self, callback: SessionCallback) {
        self.store.subscribe(callback);
    }

    /// Feed a host lifecycle trigger to the scheduler.
    pub fn notify(&self, trigger: Trigger) {
        self.scheduler.notify(trigger);
    }

    /// Log out. The local session is cleared even if the server call
    /// fails; the server cookie then dies of old age on its own.
    pub async fn logout(&self) {
        let generation = self.ledger.begin_new();
        debug!(generation = %generation, "Logout requested");
        if let Err(err) = self.api.logout().await {
            warn!(error = %err, "Server logout failed, clearing local session anyway");
        }
        self.store.clear();
        info!("Logged out");
    }

    /// Drop to unauthenticated immediately without contacting the server.
    /// Used when the host learns out-of-band that the session is dead.
    pub fn force_clear(&self) {
        self.ledger.begin_new();
        self.store.clear();
        debug!("Session force-cleared");
    }

    /// Detach the coordinator from its host. In-flight runs become stale
    /// and the store stops mutating and notifying.
    pub fn teardown(&self) {
        self.ledger.begin_new();
        self.teardown.dispose();
        debug!("Coordinator torn down");
    }
}
