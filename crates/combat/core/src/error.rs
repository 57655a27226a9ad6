//! Common error infrastructure for combat-core.
//!
//! The framework distinguishes three failure families:
//!
//! - [`ConfigError`]: a component value has the wrong shape or names an unknown
//!   component. Detected at attach time and fatal to that attachment only.
//! - [`EvalError`](crate::env::EvalError): the expression evaluator failed at
//!   combat time. Always caught by the calling component and replaced with a
//!   default.
//! - [`HandlerError`]: anything else going wrong inside a hook. Caught by the
//!   dispatcher, which discards that invocation's effects and keeps going.
//!
//! None of them aborts a combat resolution.

use crate::component::{ComponentId, ConfigShape};
use crate::env::{EvalError, OracleError};
use crate::types::UnitId;

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorSeverity {
    /// The operation degraded to a default and the caller may continue.
    Recoverable,

    /// Invalid input (content data, configuration) that must be fixed at the source.
    Validation,

    /// Unexpected inconsistency between the host and the framework.
    Internal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }
}

/// Common trait for all combat-core errors.
///
/// - All error enums implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait HookError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Malformed component configuration, rejected when the component is attached.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown component '{0}'")]
    UnknownComponent(ComponentId),

    #[error("component '{component}' expects a {expected} value, got {found}")]
    ShapeMismatch {
        component: ComponentId,
        expected: ConfigShape,
        found: &'static str,
    },

    #[error("component '{component}' is already attached to '{entity}'")]
    AlreadyAttached { component: ComponentId, entity: String },
}

impl HookError for ConfigError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownComponent(_) => "CONFIG_UNKNOWN_COMPONENT",
            Self::ShapeMismatch { .. } => "CONFIG_SHAPE_MISMATCH",
            Self::AlreadyAttached { .. } => "CONFIG_ALREADY_ATTACHED",
        }
    }
}

/// Errors raised while registering definitions into a component library.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum RegistrationError {
    #[error("component id '{0}' is already registered")]
    DuplicateId(ComponentId),

    #[error("default value of '{component}' does not fit its {shape} shape")]
    DefaultShapeMismatch {
        component: ComponentId,
        shape: ConfigShape,
    },
}

impl HookError for RegistrationError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateId(_) => "REGISTER_DUPLICATE_ID",
            Self::DefaultShapeMismatch { .. } => "REGISTER_DEFAULT_SHAPE",
        }
    }
}

/// Failure inside a single hook invocation.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum HandlerError {
    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    Eval(#[from] EvalError),

    #[error("unit {0} is not known to the host")]
    UnknownUnit(UnitId),

    #[error("component '{component}' holds a value that is not a {expected}")]
    InvalidValue {
        component: ComponentId,
        expected: ConfigShape,
    },

    #[error("component state '{key}' is missing")]
    MissingState { key: &'static str },

    #[error("{0}")]
    Failed(String),
}

impl HookError for HandlerError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Oracle(_) | Self::UnknownUnit(_) | Self::MissingState { .. } => {
                ErrorSeverity::Internal
            }
            Self::Eval(_) | Self::Failed(_) => ErrorSeverity::Recoverable,
            Self::InvalidValue { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Oracle(_) => "HANDLER_ORACLE",
            Self::Eval(_) => "HANDLER_EVAL",
            Self::UnknownUnit(_) => "HANDLER_UNKNOWN_UNIT",
            Self::InvalidValue { .. } => "HANDLER_INVALID_VALUE",
            Self::MissingState { .. } => "HANDLER_MISSING_STATE",
            Self::Failed(_) => "HANDLER_FAILED",
        }
    }
}

/// Result type returned by every phase hook.
pub type HookResult = Result<(), HandlerError>;
