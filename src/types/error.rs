use thiserror::Error;

use super::value::RuleValueType;

/// Failures raised while interpreting a parsed expression.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("expected a {expected} value, found '{found}'")]
    TypeMismatch {
        expected: RuleValueType,
        found: String,
    },

    #[error("unknown function '{name}'")]
    UnknownFunction { name: String },

    #[error("function '{function}' expects {expected} argument(s), got {found}")]
    Arity {
        function: String,
        expected: String,
        found: usize,
    },

    #[error("function '{function}' expects a program rule variable argument")]
    NotAVariable { function: String },

    #[error("invalid number format '{value}'")]
    InvalidNumber { value: String },

    #[error("unknown variable '{name}'")]
    UnknownVariable { name: String },

    #[error("division by zero")]
    DivisionByZero,
}

/// Rejected rule action construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("{action}: content, data and field must not all be empty")]
    EmptyMessage { action: &'static str },

    #[error("assign: either field or content must be set")]
    MissingAssignTarget,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_mismatch_message() {
        let err = EvalError::TypeMismatch {
            expected: RuleValueType::Numeric,
            found: "abc".into(),
        };
        assert_eq!(err.to_string(), "expected a numeric value, found 'abc'");
    }

    #[test]
    fn arity_message() {
        let err = EvalError::Arity {
            function: "d2:count".into(),
            expected: "1".into(),
            found: 3,
        };
        assert_eq!(
            err.to_string(),
            "function 'd2:count' expects 1 argument(s), got 3"
        );
    }

    #[test]
    fn invalid_number_message() {
        let err = EvalError::InvalidNumber { value: "x1".into() };
        assert_eq!(err.to_string(), "invalid number format 'x1'");
    }

    #[test]
    fn empty_message_action() {
        let err = ActionError::EmptyMessage {
            action: "warning on completion",
        };
        assert_eq!(
            err.to_string(),
            "warning on completion: content, data and field must not all be empty"
        );
    }
}
