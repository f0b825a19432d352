//! Consolidation configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::{ConfigError, ValidationError};
use crate::domain::consolidation::{ConsolidationPolicy, WeightingTable};

/// Consolidation configuration
///
/// The weighting table is versioned data. When `weighting_table_path` is set
/// it replaces the table in `policy` with the YAML document at that path.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConsolidationConfig {
    /// Standalone YAML weighting table
    #[serde(default)]
    pub weighting_table_path: Option<PathBuf>,

    #[serde(default)]
    pub policy: ConsolidationPolicy,
}

impl ConsolidationConfig {
    /// Resolve the effective policy, reading the weighting table file if one
    /// is configured.
    pub fn build_policy(&self) -> Result<ConsolidationPolicy, ConfigError> {
        let policy = match &self.weighting_table_path {
            Some(path) => {
                let yaml =
                    std::fs::read_to_string(path).map_err(|source| ConfigError::WeightingTableIo {
                        path: path.display().to_string(),
                        source,
                    })?;
                let table = WeightingTable::from_yaml_str(&yaml)?;
                tracing::info!(
                    path = %path.display(),
                    version = %table.version,
                    rules = table.rules.len(),
                    "Loaded weighting table"
                );
                self.policy.clone().with_weighting(table)
            }
            None => self.policy.clone(),
        };
        policy.validate().map_err(ValidationError::from)?;
        Ok(policy)
    }

    /// Validate consolidation configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.policy.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_uses_builtin_table() {
        let config = ConsolidationConfig::default();
        let policy = config.build_policy().unwrap();
        assert_eq!(policy.weighting, WeightingTable::builtin().clone());
    }

    #[test]
    fn test_table_file_replaces_weighting() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
version: district-2026
default:
  base_weight: 0.5
  confidence_boost: 20
rules:
  - quiz_type: parent_home
    base_weight: 0.7
    confidence_boost: 30
"#
        )
        .unwrap();

        let config = ConsolidationConfig {
            weighting_table_path: Some(file.path().to_path_buf()),
            ..Default::default()
        };
        let policy = config.build_policy().unwrap();

        assert_eq!(policy.weighting.version, "district-2026");
        assert_eq!(policy.weighting.rules.len(), 1);
    }

    #[test]
    fn test_missing_table_file() {
        let config = ConsolidationConfig {
            weighting_table_path: Some(PathBuf::from("/nonexistent/weights.yaml")),
            ..Default::default()
        };
        assert!(matches!(
            config.build_policy(),
            Err(ConfigError::WeightingTableIo { .. })
        ));
    }
}
