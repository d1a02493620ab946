//! The session snapshot data model.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The client's belief about the current user's authentication state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Nothing is known yet (before the first check resolves).
    Unknown,
    /// The first check is in flight.
    Checking,
    /// A credential was validated against the identity endpoint.
    Authenticated,
    /// No valid credential exists (or validation conclusively failed).
    Unauthenticated,
}

/// Identity fields of an authenticated user.
///
/// Present in a snapshot only while `status == Authenticated`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedIdentity {
    /// Opaque user identifier.
    pub user_id: String,
    /// Display/login name.
    pub username: String,
    /// Opaque team identifier.
    pub team_id: String,
    /// Role names (unique, order irrelevant).
    pub roles: BTreeSet<String>,
    /// Whether the user administers their team.
    pub is_team_admin: bool,
}

/// Authoritative snapshot of who is logged in.
///
/// `identity` is `Some` if and only if `status == Authenticated`; the
/// store's mutators maintain that pairing, so consumers never observe a
/// half-authenticated state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Current authentication status.
    pub status: SessionStatus,
    /// Identity fields, present only when authenticated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity: Option<AuthenticatedIdentity>,
}

impl SessionSnapshot {
    /// The initial snapshot: nothing known, no identity.
    pub fn unknown() -> Self {
        Self {
            status: SessionStatus::Unknown,
            identity: None,
        }
    }

    /// Snapshot for a validated identity.
    pub fn authenticated(identity: AuthenticatedIdentity) -> Self {
        Self {
            status: SessionStatus::Authenticated,
            identity: Some(identity),
        }
    }

    /// Snapshot for a conclusively logged-out session.
    pub fn unauthenticated() -> Self {
        Self {
            status: SessionStatus::Unauthenticated,
            identity: None,
        }
    }

    /// Returns true if the user has a validated session.
    pub fn is_authenticated(&self) -> bool {
        self.status == SessionStatus::Authenticated
    }

    /// Returns true while the session state is still being determined.
    pub fn is_settling(&self) -> bool {
        matches!(self.status, SessionStatus::Unknown | SessionStatus::Checking)
    }

    /// Username of the authenticated user, if any.
    pub fn username(&self) -> Option<&str> {
        self.identity.as_ref().map(|i| i.username.as_str())
    }

    /// Returns true if the authenticated user holds the given role.
    pub fn has_role(&self, role: &str) -> bool {
        self.identity
            .as_ref()
            .is_some_and(|i| i.roles.contains(role))
    }
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self::unknown()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> AuthenticatedIdentity {
        AuthenticatedIdentity {
            user_id: "u-1".to_string(),
            username: "alice".to_string(),
            team_id: "T1".to_string(),
            roles: ["Admin".to_string()].into_iter().collect(),
            is_team_admin: true,
        }
    }

    #[test]
    fn default_snapshot_is_unknown_with_no_identity() {
        let snapshot = SessionSnapshot::default();
        assert_eq!(snapshot.status, SessionStatus::Unknown);
        assert!(snapshot.identity.is_none());
        assert!(snapshot.is_settling());
        assert!(!snapshot.is_authenticated());
    }

    #[test]
    fn authenticated_snapshot_carries_identity() {
        let snapshot = SessionSnapshot::authenticated(identity());
        assert!(snapshot.is_authenticated());
        assert!(!snapshot.is_settling());
        assert_eq!(snapshot.username(), Some("alice"));
        assert!(snapshot.has_role("Admin"));
        assert!(!snapshot.has_role("Viewer"));
    }

    #[test]
    fn unauthenticated_snapshot_has_no_identity() {
        let snapshot = SessionSnapshot::unauthenticated();
        assert_eq!(snapshot.status, SessionStatus::Unauthenticated);
        assert!(snapshot.identity.is_none());
        assert!(snapshot.username().is_none());
        assert!(!snapshot.has_role("Admin"));
    }

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_string(&SessionStatus::Unauthenticated).unwrap();
        assert_eq!(json, "\"unauthenticated\"");
        let back: SessionStatus = serde_json::from_str("\"checking\"").unwrap();
        assert_eq!(back, SessionStatus::Checking);
    }

    #[test]
    fn snapshot_serialization_omits_missing_identity() {
        let json = serde_json::to_string(&SessionSnapshot::unknown()).unwrap();
        assert!(!json.contains("identity"));

        let json = serde_json::to_string(&SessionSnapshot::authenticated(identity())).unwrap();
        assert!(json.contains("\"username\":\"alice\""));
        assert!(json.contains("\"teamId\"") || json.contains("\"team_id\""));
    }
}
