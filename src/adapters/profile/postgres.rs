//! PostgreSQL adapter for ProfileStore

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{ChildName, DomainError, ErrorCode, ProfileId};
use crate::domain::profile::{ConsolidatedProfile, ProfileVersion};
use crate::ports::{check_child_unclaimed, check_save_version, ProfileStore};

/// PostgreSQL implementation of ProfileStore.
///
/// The aggregate is stored whole in a JSONB `document` column. Version checks
/// happen inside the write statement (`WHERE version = $n - 1`), so two
/// writers racing on the same profile cannot both succeed. A unique index on
/// `child_name` does the same for two first submissions for one child.
pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply pending schema migrations.
    pub async fn migrate(&self) -> Result<(), DomainError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Migration failed: {}", e))
            })
    }

    fn from_db_row(row: &sqlx::postgres::PgRow) -> Result<ConsolidatedProfile, DomainError> {
        let document: serde_json::Value = row.get("document");
        serde_json::from_value(document).map_err(|e| {
            DomainError::new(
                ErrorCode::InternalError,
                format!("Failed to deserialize profile: {}", e),
            )
        })
    }

    async fn stored_version(&self, id: ProfileId) -> Result<Option<i32>, DomainError> {
        let row = sqlx::query("SELECT version FROM learning_profiles WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(row.map(|r| r.get("version")))
    }

    async fn holder_of(&self, child_name: &ChildName) -> Result<Option<ProfileId>, DomainError> {
        let row = sqlx::query("SELECT id FROM learning_profiles WHERE child_name = $1")
            .bind(child_name.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(row.map(|r| ProfileId::from_uuid(r.get("id"))))
    }
}

fn db_error(e: sqlx::Error) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, format!("Database error: {}", e))
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn load(&self, id: ProfileId) -> Result<Option<ConsolidatedProfile>, DomainError> {
        let row = sqlx::query("SELECT document FROM learning_profiles WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;

        match row {
            Some(row) => Ok(Some(Self::from_db_row(&row)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, profile: &ConsolidatedProfile) -> Result<(), DomainError> {
        let document = serde_json::to_value(profile).map_err(|e| {
            DomainError::new(
                ErrorCode::InternalError,
                format!("Failed to serialize profile: {}", e),
            )
        })?;
        let version = profile.version().as_u32() as i32;

        let result = if version == 1 {
            sqlx::query(
                r#"
                INSERT INTO learning_profiles (
                    id, child_name, version, scoring_version, total_assessments,
                    confidence_percentage, completeness_percentage, document,
                    created_at, updated_at
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(profile.id().as_uuid())
            .bind(profile.child_name().as_str())
            .bind(version)
            .bind(profile.scoring_version().to_string())
            .bind(profile.total_assessments() as i32)
            .bind(profile.confidence_percentage().value())
            .bind(profile.completeness_percentage().value())
            .bind(&document)
            .bind(*profile.created_at().as_datetime())
            .bind(*profile.updated_at().as_datetime())
            .execute(&self.pool)
            .await
            .map_err(db_error)?
        } else {
            sqlx::query(
                r#"
                UPDATE learning_profiles
                SET version = $2,
                    scoring_version = $3,
                    total_assessments = $4,
                    confidence_percentage = $5,
                    completeness_percentage = $6,
                    document = $7,
                    updated_at = $8
                WHERE id = $1 AND version = $2 - 1
                "#,
            )
            .bind(profile.id().as_uuid())
            .bind(version)
            .bind(profile.scoring_version().to_string())
            .bind(profile.total_assessments() as i32)
            .bind(profile.confidence_percentage().value())
            .bind(profile.completeness_percentage().value())
            .bind(&document)
            .bind(*profile.updated_at().as_datetime())
            .execute(&self.pool)
            .await
            .map_err(db_error)?
        };

        if result.rows_affected() == 0 {
            let stored = self
                .stored_version(profile.id())
                .await?
                .and_then(|v| ProfileVersion::from_u32(v as u32).ok());
            check_save_version(profile.id(), stored, profile.version())?;
            if stored.is_none() {
                let holder = self.holder_of(profile.child_name()).await?;
                check_child_unclaimed(profile.id(), profile.child_name(), holder)?;
            }
            // Row changed between the write and the re-read.
            return Err(DomainError::new(
                ErrorCode::StaleProfileVersion,
                "Profile was modified by another process",
            )
            .with_detail("profile_id", profile.id().to_string()));
        }

        Ok(())
    }

    async fn find_by_child_name(
        &self,
        child_name: &ChildName,
    ) -> Result<Option<ConsolidatedProfile>, DomainError> {
        let row = sqlx::query(
            "SELECT document FROM learning_profiles WHERE child_name = $1 ORDER BY created_at, id LIMIT 1",
        )
        .bind(child_name.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        match row {
            Some(row) => Ok(Some(Self::from_db_row(&row)?)),
            None => Ok(None),
        }
    }
}
