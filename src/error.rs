use thiserror::Error;

use crate::expression::ExpressionError;
use crate::types::ActionError;

/// Unified error type for the crate's fallible entry points.
///
/// Expression failures never surface from
/// [`RuleEngineExecution::run()`](crate::RuleEngineExecution::run); they are
/// logged and the expression evaluates to an empty string. This type covers
/// caller misuse at the engine boundary and wraps the lower-level errors for
/// hosts that validate rules or build actions ahead of time.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("{target} to evaluate has no identifier")]
    MissingTarget { target: &'static str },

    #[error(transparent)]
    Expression(#[from] ExpressionError),

    #[error(transparent)]
    Action(#[from] ActionError),
}
