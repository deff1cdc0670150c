//! Rewrite plans: the old-key to shared-key mapping tables, loaded from JSON
//! plan files instead of being hard-coded per maintenance batch.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{RewriteError, RewriteResult};

/// Replacement target for one old key.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Target {
    /// Replace the key argument in place.
    Key(String),
    /// Replace the key argument and append a literal suffix after the call,
    /// e.g. `t('shared.common.siteName') + ' - Admin Panel'`.
    WithSuffix {
        /// Replacement key.
        key: String,
        /// Literal text concatenated after the rewritten call.
        suffix: String,
    },
}

impl Target {
    /// The replacement key.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Key(key) | Self::WithSuffix { key, .. } => key,
        }
    }

    /// The concatenated suffix, when present.
    #[must_use]
    pub const fn suffix(&self) -> Option<&String> {
        match self {
            Self::Key(_) => None,
            Self::WithSuffix { suffix, .. } => Some(suffix),
        }
    }
}

/// A validated old-key to target mapping table.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct RewritePlan {
    /// Old translation key to replacement target.
    pub mappings: BTreeMap<String, Target>,
}

impl RewritePlan {
    /// Load and validate a plan from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not a valid plan
    /// document, or contains an invalid mapping.
    pub fn load(path: &Path) -> RewriteResult<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|source| RewriteError::io("read_plan", path, source))?;
        let plan: Self = serde_json::from_str(&raw).map_err(|source| RewriteError::PlanParse {
            path: path.to_path_buf(),
            source,
        })?;
        plan.validate()?;
        Ok(plan)
    }

    /// Build a plan from an in-memory mapping table.
    ///
    /// # Errors
    ///
    /// Returns an error if the table is empty or contains an invalid mapping.
    pub fn new(mappings: BTreeMap<String, Target>) -> RewriteResult<Self> {
        let plan = Self { mappings };
        plan.validate()?;
        Ok(plan)
    }

    /// Look up the target for an old key.
    #[must_use]
    pub fn target(&self, old_key: &str) -> Option<&Target> {
        self.mappings.get(old_key)
    }

    fn validate(&self) -> RewriteResult<()> {
        if self.mappings.is_empty() {
            return Err(RewriteError::PlanEmpty);
        }
        for (old, target) in &self.mappings {
            if old.trim().is_empty() {
                return Err(RewriteError::invalid_mapping(old, "old key is blank"));
            }
            if target.key().trim().is_empty() {
                return Err(RewriteError::invalid_mapping(old, "replacement key is blank"));
            }
            if old == target.key() {
                // An identity mapping would match its own output and re-apply
                // any suffix on every run.
                return Err(RewriteError::invalid_mapping(old, "key maps to itself"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use tempfile::TempDir;

    #[test]
    fn plan_parses_bare_and_suffixed_targets() -> Result<(), Box<dyn Error>> {
        let raw = r#"{
            "mappings": {
                "dialectic.lobby.actions.copyLink": "shared.actions.copyLink",
                "admin.login.subtitle": {
                    "key": "shared.common.siteName",
                    "suffix": " - Admin Panel"
                }
            }
        }"#;
        let plan: RewritePlan = serde_json::from_str(raw)?;
        plan.validate()?;

        let bare = plan
            .target("dialectic.lobby.actions.copyLink")
            .ok_or("bare mapping missing")?;
        assert_eq!(bare.key(), "shared.actions.copyLink");
        assert!(bare.suffix().is_none());

        let suffixed = plan.target("admin.login.subtitle").ok_or("suffixed mapping missing")?;
        assert_eq!(suffixed.key(), "shared.common.siteName");
        assert_eq!(suffixed.suffix().map(String::as_str), Some(" - Admin Panel"));
        Ok(())
    }

    #[test]
    fn load_round_trips_through_disk() -> Result<(), Box<dyn Error>> {
        let temp = TempDir::new()?;
        let path = temp.path().join("plan.json");
        fs::write(
            &path,
            r#"{ "mappings": { "old.key": "shared.common.email" } }"#,
        )?;
        let plan = RewritePlan::load(&path)?;
        assert_eq!(plan.mappings.len(), 1);
        Ok(())
    }

    #[test]
    fn load_reports_missing_and_malformed_plans() -> Result<(), Box<dyn Error>> {
        let temp = TempDir::new()?;
        let missing = temp.path().join("missing.json");
        let err = RewritePlan::load(&missing).expect_err("missing plan should fail");
        assert!(matches!(err, RewriteError::Io { operation: "read_plan", .. }));

        let malformed = temp.path().join("plan.json");
        fs::write(&malformed, r#"{ "mappings": ["not", "a", "map"] }"#)?;
        let err = RewritePlan::load(&malformed).expect_err("malformed plan should fail");
        assert!(matches!(err, RewriteError::PlanParse { .. }));
        Ok(())
    }

    #[test]
    fn validation_rejects_degenerate_mappings() {
        let err = RewritePlan::new(BTreeMap::new()).expect_err("empty plan should fail");
        assert!(matches!(err, RewriteError::PlanEmpty));

        let mut mappings = BTreeMap::new();
        mappings.insert("same.key".to_string(), Target::Key("same.key".to_string()));
        let err = RewritePlan::new(mappings).expect_err("identity mapping should fail");
        assert!(
            matches!(err, RewriteError::InvalidMapping { reason: "key maps to itself", .. })
        );

        let mut mappings = BTreeMap::new();
        mappings.insert("old.key".to_string(), Target::Key("  ".to_string()));
        let err = RewritePlan::new(mappings).expect_err("blank target should fail");
        assert!(
            matches!(err, RewriteError::InvalidMapping { reason: "replacement key is blank", .. })
        );
    }

    #[test]
    fn identity_mapping_with_suffix_is_rejected() {
        // Would re-append the suffix on every run.
        let mut mappings = BTreeMap::new();
        mappings.insert(
            "shared.common.siteName".to_string(),
            Target::WithSuffix {
                key: "shared.common.siteName".to_string(),
                suffix: " - Admin Panel".to_string(),
            },
        );
        let err = RewritePlan::new(mappings).expect_err("identity mapping should fail");
        assert!(matches!(err, RewriteError::InvalidMapping { reason: "key maps to itself", .. }));
    }
}
