//! Expression evaluation: parse rule text, then interpret it with an
//! [`ExpressionVisitor`].

mod visitor;

use thiserror::Error;
use tracing::debug;

pub use visitor::ExpressionVisitor;

use crate::parse::{parse, ParseError};
use crate::types::{EvalError, RuleValueType, SupplementaryData, ValueMap};

/// Client name stored in the `environment` variable by Android clients.
pub const ANDROID_CLIENT: &str = "android";

/// Supplementary data key holding the Android API level of the client.
pub const ANDROID_VERSION: &str = "android_version";

/// First API level that understands the full expression syntax.
const MODERN_API_LEVEL: i64 = 21;

/// Failure of one expression.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExpressionError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Eval(#[from] EvalError),
}

/// Whether expressions must be parsed in legacy mode: the value-map names
/// the Android client and the supplementary data reports an API level
/// below 21. A version that is not an integer never selects legacy mode.
#[must_use]
pub fn legacy_mode(values: &ValueMap, supplementary: &SupplementaryData) -> bool {
    if values.environment() != Some(ANDROID_CLIENT) {
        return false;
    }
    let legacy = supplementary
        .first(ANDROID_VERSION)
        .and_then(|version| version.trim().parse::<i64>().ok())
        .is_some_and(|level| level < MODERN_API_LEVEL);
    debug!(legacy, "android client detected");
    legacy
}

/// Evaluate expression text and render the result.
///
/// Empty text yields an empty string without parsing. Legacy mode is
/// decided from the visitor's current value-map on every call.
///
/// # Errors
///
/// Returns [`ExpressionError::Parse`] for syntax errors and
/// [`ExpressionError::Eval`] for failures while interpreting.
pub fn evaluate(
    expression: &str,
    visitor: &ExpressionVisitor<'_>,
) -> Result<String, ExpressionError> {
    if expression.trim().is_empty() {
        return Ok(String::new());
    }
    let legacy = legacy_mode(visitor.values(), visitor.supplementary());
    let node = parse(expression, legacy)?;
    Ok(visitor.visit(&node)?.to_string())
}

/// Type-check expression text without evaluating it. Empty text is text.
///
/// # Errors
///
/// Returns the first parse or type error found.
pub fn describe(
    expression: &str,
    visitor: &ExpressionVisitor<'_>,
) -> Result<RuleValueType, ExpressionError> {
    if expression.trim().is_empty() {
        return Ok(RuleValueType::Text);
    }
    let node = parse(expression, false)?;
    Ok(visitor.describe(&node)?)
}
