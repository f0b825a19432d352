//! Filesystem adapter for ProfileStore
//!
//! Each profile is one JSON document at `{base_dir}/profiles/{profile_id}.json`,
//! wrapped in an envelope carrying a SHA-256 checksum of the profile body.
//! The body is kept as raw JSON so the checksum covers the exact bytes on
//! disk.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;

use crate::domain::foundation::{ChildName, DomainError, ErrorCode, ProfileId};
use crate::domain::profile::ConsolidatedProfile;
use crate::ports::{check_child_unclaimed, check_save_version, ProfileStore};

/// Errors from the filesystem layer, mapped to `DomainError` at the port.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Corrupt profile file {path}: {reason}")]
    Corrupt { path: String, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<StorageError> for DomainError {
    fn from(err: StorageError) -> Self {
        DomainError::new(ErrorCode::StorageError, err.to_string())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ProfileEnvelope {
    checksum: String,
    profile: Box<RawValue>,
}

/// Filesystem-based profile store.
///
/// Writes go through a temporary file and a rename so a reader never sees a
/// half-written profile. A process-wide write lock serializes the
/// version check and the write.
pub struct FsProfileStore {
    base_dir: PathBuf,
    write_lock: Mutex<()>,
}

impl FsProfileStore {
    /// Create new filesystem store with base directory
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    fn profiles_dir(&self) -> PathBuf {
        self.base_dir.join("profiles")
    }

    fn file_path(&self, id: ProfileId) -> PathBuf {
        self.profiles_dir().join(format!("{}.json", id))
    }

    fn compute_checksum(content: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    async fn read_file(&self, path: &Path) -> Result<Option<ConsolidatedProfile>, StorageError> {
        let content = match fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StorageError::IoError(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        let envelope: ProfileEnvelope = serde_json::from_str(&content)?;
        if Self::compute_checksum(envelope.profile.get()) != envelope.checksum {
            return Err(StorageError::Corrupt {
                path: path.display().to_string(),
                reason: "checksum mismatch".to_string(),
            });
        }

        Ok(Some(serde_json::from_str(envelope.profile.get())?))
    }

    async fn write_file(&self, profile: &ConsolidatedProfile) -> Result<(), StorageError> {
        let path = self.file_path(profile.id());
        fs::create_dir_all(self.profiles_dir())
            .await
            .map_err(|e| StorageError::IoError(format!("Failed to create directory: {}", e)))?;

        let body = serde_json::to_string(profile)?;
        let envelope = ProfileEnvelope {
            checksum: Self::compute_checksum(&body),
            profile: RawValue::from_string(body)?,
        };
        let content = serde_json::to_string_pretty(&envelope)?;

        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, content)
            .await
            .map_err(|e| StorageError::IoError(format!("Failed to write temporary file: {}", e)))?;
        fs::rename(&temp_path, &path)
            .await
            .map_err(|e| StorageError::IoError(format!("Failed to rename file: {}", e)))?;

        Ok(())
    }
}

#[async_trait]
impl ProfileStore for FsProfileStore {
    async fn load(&self, id: ProfileId) -> Result<Option<ConsolidatedProfile>, DomainError> {
        Ok(self.read_file(&self.file_path(id)).await?)
    }

    async fn save(&self, profile: &ConsolidatedProfile) -> Result<(), DomainError> {
        let _guard = self.write_lock.lock().await;

        let stored = self
            .read_file(&self.file_path(profile.id()))
            .await?
            .map(|p| p.version());
        check_save_version(profile.id(), stored, profile.version())?;
        if stored.is_none() {
            let holder = self
                .find_by_child_name(profile.child_name())
                .await?
                .map(|p| p.id());
            check_child_unclaimed(profile.id(), profile.child_name(), holder)?;
        }

        self.write_file(profile).await?;
        tracing::debug!(
            profile_id = %profile.id(),
            version = %profile.version(),
            "Wrote profile file"
        );
        Ok(())
    }

    async fn find_by_child_name(
        &self,
        child_name: &ChildName,
    ) -> Result<Option<ConsolidatedProfile>, DomainError> {
        let mut entries = match fs::read_dir(self.profiles_dir()).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StorageError::IoError(format!("Failed to list profiles: {}", e)).into())
            }
        };

        let mut oldest: Option<ConsolidatedProfile> = None;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StorageError::IoError(format!("Failed to list profiles: {}", e)))?
        {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let Some(profile) = self.read_file(&path).await? else {
                continue;
            };
            if profile.child_name() != child_name {
                continue;
            }
            let is_older = oldest
                .as_ref()
                .map_or(true, |o| (profile.created_at(), profile.id()) < (o.created_at(), o.id()));
            if is_older {
                oldest = Some(profile);
            }
        }

        Ok(oldest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::assessment::{
        Assessment, QuizType, RespondentType, ScoringVersion, SkillScores,
    };
    use crate::domain::consolidation::ProfileConsolidator;
    use tempfile::TempDir;

    fn seeded(child: &str) -> ConsolidatedProfile {
        let assessment = Assessment::new(
            ChildName::new(child).unwrap(),
            QuizType::parent_home(),
            RespondentType::Parent,
            ScoringVersion::Clp2,
            SkillScores::from_pairs([("Communication", 2.5), ("Creative Innovation", 1.0)])
                .unwrap(),
        )
        .with_respondent_name("Dana");
        ProfileConsolidator::default()
            .consolidate(None, &assessment)
            .unwrap()
            .profile
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let store = FsProfileStore::new(temp_dir.path());
        let profile = seeded("Maya");

        store.save(&profile).await.unwrap();
        assert!(store.file_path(profile.id()).exists());

        let loaded = store.load(profile.id()).await.unwrap();
        assert_eq!(loaded, Some(profile));
    }

    #[tokio::test]
    async fn test_load_nonexistent() {
        let temp_dir = TempDir::new().unwrap();
        let store = FsProfileStore::new(temp_dir.path());

        assert!(store.load(ProfileId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_stale_save_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let store = FsProfileStore::new(temp_dir.path());
        let profile = seeded("Maya");

        store.save(&profile).await.unwrap();
        let err = store.save(&profile).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::StaleProfileVersion);
    }

    #[tokio::test]
    async fn test_second_profile_for_child_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let store = FsProfileStore::new(temp_dir.path());
        let first = seeded("Maya");
        store.save(&first).await.unwrap();

        let err = store.save(&seeded("Maya")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::StaleProfileVersion);

        let found = store
            .find_by_child_name(&ChildName::new("Maya").unwrap())
            .await
            .unwrap();
        assert_eq!(found.map(|p| p.id()), Some(first.id()));
    }

    #[tokio::test]
    async fn test_inexact_floats_survive_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = FsProfileStore::new(temp_dir.path());
        let consolidator = ProfileConsolidator::default();

        let parent = Assessment::new(
            ChildName::new("Maya").unwrap(),
            QuizType::parent_home(),
            RespondentType::Parent,
            ScoringVersion::Legacy,
            SkillScores::from_pairs([("Math", 3.3), ("Literacy", 1.7)]).unwrap(),
        );
        let first = consolidator.consolidate(None, &parent).unwrap().profile;
        store.save(&first).await.unwrap();

        let teacher = Assessment::new(
            ChildName::new("Maya").unwrap(),
            QuizType::teacher_classroom(),
            RespondentType::Teacher,
            ScoringVersion::Legacy,
            SkillScores::from_pairs([("Math", 2.9), ("Literacy", 4.1)]).unwrap(),
        );
        let second = consolidator
            .consolidate(Some(&first), &teacher)
            .unwrap()
            .profile;
        store.save(&second).await.unwrap();

        let loaded = store.load(second.id()).await.unwrap();
        assert_eq!(loaded, Some(second));
    }

    #[tokio::test]
    async fn test_tampered_file_detected() {
        let temp_dir = TempDir::new().unwrap();
        let store = FsProfileStore::new(temp_dir.path());
        let profile = seeded("Maya");
        store.save(&profile).await.unwrap();

        let path = store.file_path(profile.id());
        let content = std::fs::read_to_string(&path).unwrap();
        std::fs::write(&path, content.replace("Maya", "Mia")).unwrap();

        let err = store.load(profile.id()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::StorageError);
    }

    #[tokio::test]
    async fn test_find_by_child_name() {
        let temp_dir = TempDir::new().unwrap();
        let store = FsProfileStore::new(temp_dir.path());
        assert!(store
            .find_by_child_name(&ChildName::new("Maya").unwrap())
            .await
            .unwrap()
            .is_none());

        let maya = seeded("Maya");
        store.save(&maya).await.unwrap();
        store.save(&seeded("Leo")).await.unwrap();

        let found = store
            .find_by_child_name(&ChildName::new("Maya").unwrap())
            .await
            .unwrap();
        assert_eq!(found.map(|p| p.id()), Some(maya.id()));
    }

    #[test]
    fn test_compute_checksum() {
        let checksum = FsProfileStore::compute_checksum("test content");
        assert_eq!(checksum.len(), 64);
        assert_eq!(checksum, FsProfileStore::compute_checksum("test content"));
        assert_ne!(checksum, FsProfileStore::compute_checksum("other content"));
    }
}
