//! ProfileStore port for consolidated profile persistence

use async_trait::async_trait;

use crate::domain::foundation::{ChildName, DomainError, ErrorCode, ProfileId};
use crate::domain::profile::{ConsolidatedProfile, ProfileVersion};

/// Repository for consolidated learning profiles.
///
/// Implementations must enforce optimistic concurrency on `save`:
/// - a profile not yet stored is accepted only at version 1
/// - a stored profile is replaced only by `stored.version + 1`
/// - a new profile is refused while another profile exists for the same child
///
/// Anything else fails with `ErrorCode::StaleProfileVersion` and leaves the
/// stored profile untouched.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Load a profile by ID.
    async fn load(&self, id: ProfileId) -> Result<Option<ConsolidatedProfile>, DomainError>;

    /// Persist a profile, enforcing version-match-or-reject.
    async fn save(&self, profile: &ConsolidatedProfile) -> Result<(), DomainError>;

    /// Find the oldest profile for a child, if any.
    async fn find_by_child_name(
        &self,
        child_name: &ChildName,
    ) -> Result<Option<ConsolidatedProfile>, DomainError>;
}

/// Shared version check for store adapters.
///
/// `stored` is the version currently persisted, `None` when the profile is new.
pub fn check_save_version(
    id: ProfileId,
    stored: Option<ProfileVersion>,
    incoming: ProfileVersion,
) -> Result<(), DomainError> {
    let expected = stored.map_or_else(ProfileVersion::initial, |v| v.increment());
    if incoming == expected {
        return Ok(());
    }

    Err(DomainError::new(
        ErrorCode::StaleProfileVersion,
        format!(
            "Profile {} cannot be saved at version {}; store expects version {}",
            id, incoming, expected
        ),
    )
    .with_detail("profile_id", id.to_string())
    .with_detail("expected_version", expected.to_string())
    .with_detail("actual_version", incoming.to_string()))
}

/// Shared one-profile-per-child check for saving a new profile.
///
/// `holder` is the profile currently stored for the child, if any. Two first
/// submissions racing for the same child both see no profile; the loser gets
/// `StaleProfileVersion` here and merges into the winner on retry.
pub fn check_child_unclaimed(
    id: ProfileId,
    child_name: &ChildName,
    holder: Option<ProfileId>,
) -> Result<(), DomainError> {
    match holder {
        Some(holder) if holder != id => Err(DomainError::new(
            ErrorCode::StaleProfileVersion,
            format!("Child {} already has profile {}", child_name, holder),
        )
        .with_detail("profile_id", id.to_string())
        .with_detail("existing_profile_id", holder.to_string())),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Compile-time check that trait is object-safe
    #[allow(dead_code)]
    fn assert_object_safe(_: &dyn ProfileStore) {}

    fn v(n: u32) -> ProfileVersion {
        ProfileVersion::from_u32(n).unwrap()
    }

    #[test]
    fn new_profile_must_start_at_version_one() {
        let id = ProfileId::new();
        assert!(check_save_version(id, None, v(1)).is_ok());

        let err = check_save_version(id, None, v(2)).unwrap_err();
        assert_eq!(err.code, ErrorCode::StaleProfileVersion);
    }

    #[test]
    fn stored_profile_accepts_only_next_version() {
        let id = ProfileId::new();
        assert!(check_save_version(id, Some(v(3)), v(4)).is_ok());
        assert!(check_save_version(id, Some(v(3)), v(3)).is_err());
        assert!(check_save_version(id, Some(v(3)), v(5)).is_err());
    }

    #[test]
    fn second_profile_for_child_is_stale() {
        let child = ChildName::new("Maya").unwrap();
        let (winner, loser) = (ProfileId::new(), ProfileId::new());

        assert!(check_child_unclaimed(winner, &child, None).is_ok());
        assert!(check_child_unclaimed(winner, &child, Some(winner)).is_ok());

        let err = check_child_unclaimed(loser, &child, Some(winner)).unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(
            err.details.get("existing_profile_id"),
            Some(&winner.to_string())
        );
    }

    #[test]
    fn stale_save_is_retryable() {
        let err = check_save_version(ProfileId::new(), Some(v(2)), v(2)).unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(err.details.get("expected_version"), Some(&"3".to_string()));
    }
}
