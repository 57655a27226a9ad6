//! Oracle access errors.

use crate::error::{ErrorSeverity, HookError};
use crate::types::{ItemUid, Position, UnitId};

/// Errors that occur when a hook reaches for a collaborator the host did
/// not provide, or asks about something the collaborator does not know.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum OracleError {
    #[error("BoardOracle not available")]
    BoardNotAvailable,

    #[error("UnitOracle not available")]
    UnitsNotAvailable,

    #[error("ItemOracle not available")]
    ItemsNotAvailable,

    #[error("ExpressionEvaluator not available")]
    EvaluatorNotAvailable,

    #[error("EventSink not available")]
    EventsNotAvailable,

    #[error("unit {0} not found")]
    UnitNotFound(UnitId),

    #[error("item {0} not found")]
    ItemNotFound(ItemUid),

    #[error("position {0} is out of board bounds")]
    PositionOutOfBounds(Position),
}

impl HookError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        use OracleError::*;
        match self {
            BoardNotAvailable | UnitsNotAvailable | ItemsNotAvailable | EvaluatorNotAvailable
            | EventsNotAvailable => ErrorSeverity::Internal,
            UnitNotFound(_) | ItemNotFound(_) | PositionOutOfBounds(_) => {
                ErrorSeverity::Validation
            }
        }
    }

    fn error_code(&self) -> &'static str {
        use OracleError::*;
        match self {
            BoardNotAvailable => "ORACLE_BOARD_NOT_AVAILABLE",
            UnitsNotAvailable => "ORACLE_UNITS_NOT_AVAILABLE",
            ItemsNotAvailable => "ORACLE_ITEMS_NOT_AVAILABLE",
            EvaluatorNotAvailable => "ORACLE_EVALUATOR_NOT_AVAILABLE",
            EventsNotAvailable => "ORACLE_EVENTS_NOT_AVAILABLE",
            UnitNotFound(_) => "ORACLE_UNIT_NOT_FOUND",
            ItemNotFound(_) => "ORACLE_ITEM_NOT_FOUND",
            PositionOutOfBounds(_) => "ORACLE_POSITION_OUT_OF_BOUNDS",
        }
    }
}
