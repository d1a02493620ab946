//! Turns host lifecycle triggers into scheduled check runs.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use session_state::{SessionStatus, SessionStore};

use crate::checker::{CheckReason, SessionChecker};
use crate::config::CoordinatorConfig;
use crate::ledger::GenerationLedger;

/// Host lifecycle events the coordinator reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// The coordinator was just mounted by the host.
    Mount,
    /// The page/window became visible again.
    VisibilityRegained,
    /// The window regained input focus.
    WindowFocused,
}

/// Decides whether a trigger warrants a check run and schedules it.
///
/// Focus and visibility triggers only revalidate an already-authenticated
/// session; if the user is logged out or a check is already settling, a
/// background flicker should not start network traffic.
pub struct RevalidationScheduler {
    store: SessionStore,
    ledger: Arc<GenerationLedger>,
    checker: Arc<SessionChecker>,
    config: CoordinatorConfig,
}

impl RevalidationScheduler {
    pub fn new(
        store: SessionStore,
        ledger: Arc<GenerationLedger>,
        checker: Arc<SessionChecker>,
        config: CoordinatorConfig,
    ) -> Self {
        Self {
            store,
            ledger,
            checker,
            config,
        }
    }

    /// React to a host trigger. Returns immediately; any run happens on a
    /// spawned task.
    pub fn notify(&self, trigger: Trigger) {
        match trigger {
            Trigger::Mount => {
                if self.config.suppress_initial_check {
                    debug!("Initial session check suppressed by configuration");
                    return;
                }
                self.spawn_run(CheckReason::Mount, Duration::ZERO);
            }
            Trigger::VisibilityRegained | Trigger::WindowFocused => {
                if self.store.status() != SessionStatus::Authenticated {
                    debug!(?trigger, "Ignoring trigger, session not authenticated");
                    return;
                }
                self.spawn_run(CheckReason::Revalidation, self.config.focus_settle);
            }
        }
    }

    fn spawn_run(&self, reason: CheckReason, settle: Duration) {
        // Mint the generation before the settle sleep so a later trigger
        // supersedes this run even while it is still debouncing.
        let generation = self.ledger.begin_new();
        debug!(generation = %generation, ?reason, "Scheduling session check");
        let checker = Arc::clone(&self.checker);
        tokio::spawn(async move {
            if !settle.is_zero() {
                tokio::time::sleep(settle).await;
            }
            checker.run(generation, reason).await;
        });
    }
}
