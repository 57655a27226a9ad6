//! Errors raised while committing pending actions.

use combat_content::CatalogError;
use combat_core::{ComponentRef, ConfigError, ErrorSeverity, HookError, UnitId};

/// A pending action the pipeline could not apply.
///
/// Commit failures skip that one action; the rest of the queue still applies.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum CommitError {
    #[error("unit {0} does not exist")]
    UnknownUnit(UnitId),

    #[error("unit {unit} has no skill '{skill}'")]
    UnknownSkill { unit: UnitId, skill: String },

    #[error("component {0} not found")]
    UnknownComponent(ComponentRef),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl HookError for CommitError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownUnit(_) | Self::UnknownSkill { .. } | Self::UnknownComponent(_) => {
                ErrorSeverity::Internal
            }
            Self::Catalog(_) | Self::Config(_) => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownUnit(_) => "COMMIT_UNKNOWN_UNIT",
            Self::UnknownSkill { .. } => "COMMIT_UNKNOWN_SKILL",
            Self::UnknownComponent(_) => "COMMIT_UNKNOWN_COMPONENT",
            Self::Catalog(_) => "COMMIT_CATALOG",
            Self::Config(_) => "COMMIT_CONFIG",
        }
    }
}
