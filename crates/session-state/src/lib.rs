//! Session state for the Tempora client.
//!
//! This crate provides:
//! - The authoritative snapshot of who is logged in (`SessionSnapshot`)
//! - A shared store with observer-style change notifications (`SessionStore`)
//! - Explicit scope teardown so nothing mutates state after the owning
//!   coordinator is gone (`TeardownHandle`)

mod snapshot;
mod store;

pub use snapshot::{AuthenticatedIdentity, SessionSnapshot, SessionStatus};
pub use store::{SessionCallback, SessionStore, TeardownHandle};
