//! Wire types for the credential API.

use serde::Deserialize;

/// Profile returned by `GET /identity` when the credential is valid.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityProfile {
    /// Opaque user identifier.
    pub user_id: String,
    /// Display/login name.
    pub username: String,
    /// Opaque team identifier.
    pub team_id: String,
    /// Role names.
    #[serde(default)]
    pub roles: Vec<String>,
    /// Whether the user administers their team.
    #[serde(default)]
    pub is_team_admin: bool,
}

/// Classified outcome of `POST /refresh`.
///
/// Classification is total: a refresh attempt never surfaces an error,
/// the caller branches on the outcome instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Endpoint returned success; a renewed credential cookie was set.
    /// Callers should allow a short settle delay before the next
    /// identity check so the cookie propagates.
    Refreshed,
    /// Endpoint returned 401/403: no valid refresh credential exists.
    /// Not worth retrying, but an access credential may independently
    /// still be valid.
    NoCredential,
    /// Network-level failure with no authentication verdict; retryable.
    TransientFailure,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_profile_deserializes_camel_case() {
        let json = r#"{
            "userId": "u-42",
            "username": "alice",
            "teamId": "T1",
            "roles": ["Admin", "Member"],
            "isTeamAdmin": true
        }"#;

        let profile: IdentityProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.user_id, "u-42");
        assert_eq!(profile.username, "alice");
        assert_eq!(profile.team_id, "T1");
        assert_eq!(profile.roles, vec!["Admin", "Member"]);
        assert!(profile.is_team_admin);
    }

    #[test]
    fn identity_profile_defaults_optional_fields() {
        let json = r#"{"userId": "u-1", "username": "bob", "teamId": "T2"}"#;
        let profile: IdentityProfile = serde_json::from_str(json).unwrap();
        assert!(profile.roles.is_empty());
        assert!(!profile.is_team_admin);
    }

    #[test]
    fn identity_profile_rejects_missing_user_id() {
        let json = r#"{"username": "bob", "teamId": "T2"}"#;
        let result: Result<IdentityProfile, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}
