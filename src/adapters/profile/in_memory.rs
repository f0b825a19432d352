//! In-memory ProfileStore for tests and the `memory` storage backend.
//!
//! Uses `.expect()` on lock operations which will panic if locks are
//! poisoned. Profiles are lost when the process exits.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::foundation::{ChildName, DomainError, ProfileId};
use crate::domain::profile::ConsolidatedProfile;
use crate::ports::{check_child_unclaimed, check_save_version, ProfileStore};

/// In-memory profile store.
///
/// # Panics
///
/// Methods may panic if the internal lock is poisoned.
#[derive(Default)]
pub struct InMemoryProfileStore {
    profiles: RwLock<HashMap<ProfileId, ConsolidatedProfile>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored profiles.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn len(&self) -> usize {
        self.profiles
            .read()
            .expect("InMemoryProfileStore: lock poisoned")
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All stored profiles ordered by creation time.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn all(&self) -> Vec<ConsolidatedProfile> {
        let mut profiles: Vec<_> = self
            .profiles
            .read()
            .expect("InMemoryProfileStore: lock poisoned")
            .values()
            .cloned()
            .collect();
        profiles.sort_by_key(|p| (p.created_at(), p.id()));
        profiles
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn load(&self, id: ProfileId) -> Result<Option<ConsolidatedProfile>, DomainError> {
        Ok(self
            .profiles
            .read()
            .expect("InMemoryProfileStore: lock poisoned")
            .get(&id)
            .cloned())
    }

    async fn save(&self, profile: &ConsolidatedProfile) -> Result<(), DomainError> {
        let mut profiles = self
            .profiles
            .write()
            .expect("InMemoryProfileStore: write lock poisoned");

        let stored = profiles.get(&profile.id()).map(|p| p.version());
        check_save_version(profile.id(), stored, profile.version())?;
        if stored.is_none() {
            let holder = profiles
                .values()
                .find(|p| p.child_name() == profile.child_name())
                .map(|p| p.id());
            check_child_unclaimed(profile.id(), profile.child_name(), holder)?;
        }

        profiles.insert(profile.id(), profile.clone());
        Ok(())
    }

    async fn find_by_child_name(
        &self,
        child_name: &ChildName,
    ) -> Result<Option<ConsolidatedProfile>, DomainError> {
        Ok(self
            .all()
            .into_iter()
            .find(|p| p.child_name() == child_name))
    }
}
