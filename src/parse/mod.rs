mod error;
mod grammar;

pub use error::ParseError;

use crate::types::ExprNode;

/// Parse expression text into an [`ExprNode`] tree.
///
/// In `legacy` mode the keyword operators `and`, `or` and `not` are not
/// recognised; only their symbolic forms parse.
///
/// Nesting of parentheses, unary operators and function calls is limited
/// to 64 levels and the resulting tree to a height of 256; deeper text is a
/// syntax error rather than unbounded recursion.
///
/// # Errors
///
/// Returns [`ParseError`] if the input is not a valid expression.
pub fn parse(text: &str, legacy: bool) -> Result<ExprNode, ParseError> {
    use winnow::Parser;
    let mode = grammar::Mode::new(legacy);
    (|input: &mut &str| grammar::expr(input, mode))
        .parse(text)
        .map_err(|e| ParseError::new(text, e.to_string()))
}
