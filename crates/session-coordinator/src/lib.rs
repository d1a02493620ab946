//! Session revalidation coordinator for the Tempora client.
//!
//! This crate provides:
//! - A generation ledger for cooperative cancellation of stale check runs
//! - Capped exponential backoff policies for transient failures
//! - An explicit FSM-based session checker (proactive refresh + identity fetch)
//! - A scheduler turning host lifecycle triggers into check runs
//! - The `SessionCoordinator` facade the host embeds

mod backoff;
mod checker;
mod config;
mod coordinator;
mod ledger;
mod scheduler;

pub use backoff::BackoffPolicy;
pub use checker::run_machine;
pub use checker::{
    CheckReason, RunMachine, RunMachineInput, RunMachineState, RunResolution, SessionChecker,
};
pub use config::CoordinatorConfig;
pub use coordinator::SessionCoordinator;
pub use ledger::{Generation, GenerationLedger};
pub use scheduler::{RevalidationScheduler, Trigger};
