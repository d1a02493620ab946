//! Session check state machine and the runner that drives it.
//!
//! A check run is modeled as an explicit finite state machine rather than
//! ad-hoc booleans scattered through the retry loop.
//!
//! ## State Diagram
//!
//! ```text
//! ┌─────────────────┐
//! │      Idle       │ (initial)
//! └────────┬────────┘
//!          │ RefreshFirst / FetchFirst
//!          ▼
//! ┌─────────────────┐  RefreshSettled   ┌─────────────────┐
//! │ ProactiveRefresh│ ────────────────► │  IdentityFetch  │ ◄─┐
//! └────────┬────────┘                   └────────┬────────┘   │ FetchRetry
//!          │ RefreshRetry (self)                 │ ───────────┘
//!          │ Superseded                          │
//!          ▼                                     │ IdentityConfirmed ──► Authenticated
//!     Superseded ◄───────────────────────────────┤ Superseded ─────────► Superseded
//!                                                │ CredentialRejected
//!                                                │ RetriesExhausted
//!                                                │ UnexpectedResponse
//!                                                ▼
//!                                          Unauthenticated
//! ```
//!
//! A single retry counter is shared by the refresh and fetch phases so the
//! whole run stays bounded by `max_retries`.

use std::sync::Arc;

use rust_fsm::*;
use tracing::{debug, info, warn};

use credential_client::{CredentialApiHandle, IdentityProfile, RefreshOutcome};
use session_state::{AuthenticatedIdentity, SessionStore};

use crate::config::CoordinatorConfig;
use crate::ledger::{Generation, GenerationLedger};

state_machine! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub run_machine(Idle)

    Idle => {
        RefreshFirst => ProactiveRefresh,
        FetchFirst => IdentityFetch
    },
    ProactiveRefresh => {
        RefreshRetry => ProactiveRefresh,
        RefreshSettled => IdentityFetch,
        Superseded => Superseded
    },
    IdentityFetch => {
        FetchRetry => IdentityFetch,
        IdentityConfirmed => Authenticated,
        CredentialRejected => Unauthenticated,
        RetriesExhausted => Unauthenticated,
        UnexpectedResponse => Unauthenticated,
        Superseded => Superseded
    }
}

pub use run_machine::Input as RunMachineInput;
pub use run_machine::State as RunMachineState;
pub use run_machine::StateMachine as RunMachine;

/// Why a check run was started. Controls the proactive-refresh phase and
/// the identity request timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckReason {
    /// First check after the coordinator is mounted. No credential refresh
    /// up front; a generous timeout since nothing is on screen yet.
    Mount,
    /// Re-validation after the window regained focus or visibility. The
    /// credential may have expired while we were backgrounded, so refresh
    /// it before asking who we are.
    Revalidation,
}

impl CheckReason {
    fn refreshes_first(self) -> bool {
        matches!(self, CheckReason::Revalidation)
    }
}

/// Terminal outcome of one check run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunResolution {
    Authenticated,
    Unauthenticated,
    /// A newer run was scheduled while this one was in flight; no store
    /// mutation was performed for this outcome.
    Superseded,
}

/// Executes check runs against the credential API and publishes the result
/// to the session store.
pub struct SessionChecker {
    api: CredentialApiHandle,
    store: SessionStore,
    ledger: Arc<GenerationLedger>,
    config: CoordinatorConfig,
}

impl SessionChecker {
    pub fn new(
        api: CredentialApiHandle,
        store: SessionStore,
        ledger: Arc<GenerationLedger>,
        config: CoordinatorConfig,
    ) -> Self {
        Self {
            api,
            store,
            ledger,
            config,
        }
    }

    /// Run one full check. Returns how the run resolved; the session store
    /// is updated as a side effect unless the run was superseded.
    pub async fn run(&self, generation: Generation, reason: CheckReason) -> RunResolution {
        let mut machine = RunMachine::new();
        let mut attempt: u32 = 0;
        let mut refresh_attempted = false;

        debug!(generation = %generation, ?reason, "Session check started");
        self.store.mark_checking();

        if reason.refreshes_first() {
            self.advance(&mut machine, RunMachineInput::RefreshFirst);
            loop {
                if !self.ledger.is_current(generation) {
                    return self.bail_superseded(&mut machine, generation);
                }
                match self.api.refresh().await {
                    RefreshOutcome::TransientFailure if attempt < self.config.max_retries => {
                        let delay = self.config.refresh_backoff.delay_for_attempt(attempt);
                        debug!(
                            generation = %generation,
                            attempt,
                            delay_ms = delay.as_millis() as u64,
                            "Credential refresh failed transiently, retrying"
                        );
                        attempt += 1;
                        self.advance(&mut machine, RunMachineInput::RefreshRetry);
                        tokio::time::sleep(delay).await;
                    }
                    outcome => {
                        if matches!(
                            outcome,
                            RefreshOutcome::Refreshed | RefreshOutcome::NoCredential
                        ) {
                            refresh_attempted = true;
                        }
                        if outcome == RefreshOutcome::Refreshed {
                            // Give the refreshed credential cookie time to land
                            // before the identity endpoint sees the request.
                            tokio::time::sleep(self.config.refresh_settle).await;
                        }
                        self.advance(&mut machine, RunMachineInput::RefreshSettled);
                        break;
                    }
                }
            }
        } else {
            self.advance(&mut machine, RunMachineInput::FetchFirst);
        }

        let timeout = match reason {
            CheckReason::Mount => self.config.initial_identity_timeout,
            CheckReason::Revalidation => self.config.revalidation_identity_timeout,
        };

        loop {
            if !self.ledger.is_current(generation) {
                return self.bail_superseded(&mut machine, generation);
            }
            match self.api.fetch_identity(timeout).await {
                Ok(profile) => {
                    if !self.ledger.is_current(generation) {
                        return self.bail_superseded(&mut machine, generation);
                    }
                    self.advance(&mut machine, RunMachineInput::IdentityConfirmed);
                    info!(
                        generation = %generation,
                        user_id = %profile.user_id,
                        "Session confirmed"
                    );
                    self.store.apply(identity_from_profile(profile));
                    return RunResolution::Authenticated;
                }
                Err(err) if err.is_unauthorized() => {
                    if !refresh_attempted {
                        if !self.ledger.is_current(generation) {
                            return self.bail_superseded(&mut machine, generation);
                        }
                        refresh_attempted = true;
                        debug!(
                            generation = %generation,
                            "Identity rejected, attempting credential refresh"
                        );
                        let outcome = self.api.refresh().await;
                        if !self.ledger.is_current(generation) {
                            return self.bail_superseded(&mut machine, generation);
                        }
                        if outcome == RefreshOutcome::Refreshed
                            && attempt < self.config.max_retries
                        {
                            attempt += 1;
                            self.advance(&mut machine, RunMachineInput::FetchRetry);
                            tokio::time::sleep(self.config.reauth_settle).await;
                            continue;
                        }
                    }
                    if !self.ledger.is_current(generation) {
                        return self.bail_superseded(&mut machine, generation);
                    }
                    self.advance(&mut machine, RunMachineInput::CredentialRejected);
                    info!(generation = %generation, "Credential rejected, session cleared");
                    self.store.clear();
                    return RunResolution::Unauthenticated;
                }
                Err(err) if err.is_transient() => {
                    if attempt < self.config.max_retries {
                        let delay = self.config.retry_backoff.delay_for_attempt(attempt);
                        debug!(
                            generation = %generation,
                            attempt,
                            delay_ms = delay.as_millis() as u64,
                            error = %err,
                            "Identity fetch failed transiently, retrying"
                        );
                        attempt += 1;
                        self.advance(&mut machine, RunMachineInput::FetchRetry);
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    if !self.ledger.is_current(generation) {
                        return self.bail_superseded(&mut machine, generation);
                    }
                    self.advance(&mut machine, RunMachineInput::RetriesExhausted);
                    warn!(
                        generation = %generation,
                        retries = self.config.max_retries,
                        error = %err,
                        "Retries exhausted, treating session as logged out"
                    );
                    self.store.clear();
                    return RunResolution::Unauthenticated;
                }
                Err(err) => {
                    if !self.ledger.is_current(generation) {
                        return self.bail_superseded(&mut machine, generation);
                    }
                    self.advance(&mut machine, RunMachineInput::UnexpectedResponse);
                    warn!(
                        generation = %generation,
                        error = %err,
                        "Unexpected identity response, session cleared"
                    );
                    self.store.clear();
                    return RunResolution::Unauthenticated;
                }
            }
        }
    }

    fn advance(&self, machine: &mut RunMachine, input: RunMachineInput) {
        // The runner only issues inputs valid for the current state; a
        // rejection here is a bug in the runner, not a recoverable error.
        if machine.consume(&input).is_err() {
            warn!(?input, state = ?machine.state(), "Rejected session check transition");
        }
    }

    fn bail_superseded(&self, machine: &mut RunMachine, generation: Generation) -> RunResolution {
        self.advance(machine, RunMachineInput::Superseded);
        debug!(generation = %generation, "Session check superseded, discarding");
        RunResolution::Superseded
    }
}

fn identity_from_profile(profile: IdentityProfile) -> AuthenticatedIdentity {
    AuthenticatedIdentity {
        user_id: profile.user_id,
        username: profile.username,
        team_id: profile.team_id,
        roles: profile.roles.into_iter().collect(),
        is_team_admin: profile.is_team_admin,
    }
}
