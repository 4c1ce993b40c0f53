//! Built-in `d2:` functions and the registry that dispatches calls to them.

mod numeric;
mod text;
mod variable;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::expression::ExpressionVisitor;
use crate::types::{unwrap_variable_name, EvalError, ExprNode, RuleValueType, Value};

pub use numeric::{Ceil, Floor, Round, ZeroOrPositive, ZeroPositiveValueCount, Zing};
pub use text::{Concatenate, Length};
pub use variable::{Count, CountIfValue, CountIfZeroPositive, HasValue};

/// Prefix every function name carries in expression text.
pub const FUNCTION_PREFIX: &str = "d2:";

/// A function callable from rule expressions.
///
/// `describe` must apply the same arity and type checks as `evaluate`
/// without needing real data; it backs static validation of rule text.
pub trait RuleFunction: Send + Sync {
    /// Compute the function's value against the visitor's current state.
    ///
    /// # Errors
    ///
    /// Returns an [`EvalError`] for bad arity, bad argument types, or
    /// argument values the function cannot accept.
    fn evaluate(&self, args: &[ExprNode], visitor: &ExpressionVisitor<'_>)
        -> Result<Value, EvalError>;

    /// Report the type the function would return for these arguments.
    ///
    /// # Errors
    ///
    /// Returns an [`EvalError`] for bad arity or bad argument types.
    fn describe(
        &self,
        args: &[ExprNode],
        visitor: &ExpressionVisitor<'_>,
    ) -> Result<RuleValueType, EvalError>;
}

/// Name to implementation mapping consulted by the expression visitor.
///
/// [`FunctionRegistry::default()`] holds the built-in library;
/// [`FunctionRegistry::empty()`] holds nothing.
#[derive(Clone)]
pub struct FunctionRegistry {
    functions: HashMap<String, Arc<dyn RuleFunction>>,
}

impl FunctionRegistry {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            functions: HashMap::new(),
        }
    }

    /// Register `function` under `name`. The `d2:` prefix is added when
    /// missing; an existing entry with the same name is replaced.
    pub fn register(&mut self, name: &str, function: impl RuleFunction + 'static) {
        self.functions.insert(qualified(name), Arc::new(function));
    }

    /// Look up a function by the name used in expression text.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn RuleFunction> {
        self.functions.get(name).map(AsRef::as_ref)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register("count", Count);
        registry.register("countIfValue", CountIfValue);
        registry.register("countIfZeroPos", CountIfZeroPositive);
        registry.register("hasValue", HasValue);
        registry.register("oizp", ZeroOrPositive);
        registry.register("zpvc", ZeroPositiveValueCount);
        registry.register("zing", Zing);
        registry.register("floor", Floor);
        registry.register("ceil", Ceil);
        registry.register("round", Round);
        registry.register("concatenate", Concatenate);
        registry.register("length", Length);
        registry
    }
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionRegistry")
            .field("functions", &self.names())
            .finish()
    }
}

fn qualified(name: &str) -> String {
    if name.starts_with(FUNCTION_PREFIX) {
        name.to_owned()
    } else {
        format!("{FUNCTION_PREFIX}{name}")
    }
}

// -- Argument helpers shared by the built-ins -------------------------------

pub(crate) fn expect_arity(
    function: &str,
    args: &[ExprNode],
    expected: usize,
) -> Result<(), EvalError> {
    if args.len() == expected {
        return Ok(());
    }
    Err(EvalError::Arity {
        function: qualified(function),
        expected: expected.to_string(),
        found: args.len(),
    })
}

pub(crate) fn expect_min_arity(
    function: &str,
    args: &[ExprNode],
    min: usize,
) -> Result<(), EvalError> {
    if args.len() >= min {
        return Ok(());
    }
    Err(EvalError::Arity {
        function: qualified(function),
        expected: format!("at least {min}"),
        found: args.len(),
    })
}

/// The variable named by an argument: a variable reference, or a text
/// literal holding a (possibly decorated) variable name.
pub(crate) fn variable_name<'n>(function: &str, arg: &'n ExprNode) -> Result<&'n str, EvalError> {
    match arg {
        ExprNode::Variable { name, .. } => Ok(name),
        ExprNode::Literal(Value::Text(name)) => Ok(unwrap_variable_name(name)),
        _ => Err(EvalError::NotAVariable {
            function: qualified(function),
        }),
    }
}

/// Describe every argument and reject booleans where numbers are required.
pub(crate) fn describe_numeric_args(
    args: &[ExprNode],
    visitor: &ExpressionVisitor<'_>,
) -> Result<(), EvalError> {
    for arg in args {
        let value_type = visitor.describe(arg)?;
        if value_type == RuleValueType::Boolean {
            return Err(EvalError::TypeMismatch {
                expected: RuleValueType::Numeric,
                found: value_type.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Answer;

    impl RuleFunction for Answer {
        fn evaluate(
            &self,
            _args: &[ExprNode],
            _visitor: &ExpressionVisitor<'_>,
        ) -> Result<Value, EvalError> {
            Ok(Value::Number(42.0))
        }

        fn describe(
            &self,
            _args: &[ExprNode],
            _visitor: &ExpressionVisitor<'_>,
        ) -> Result<RuleValueType, EvalError> {
            Ok(RuleValueType::Numeric)
        }
    }

    #[test]
    fn default_registry_has_builtins() {
        let registry = FunctionRegistry::default();
        for name in ["d2:count", "d2:countIfZeroPos", "d2:oizp", "d2:zpvc", "d2:concatenate"] {
            assert!(registry.contains(name), "missing {name}");
        }
        assert_eq!(registry.len(), 12);
    }

    #[test]
    fn empty_registry() {
        let registry = FunctionRegistry::empty();
        assert!(registry.is_empty());
        assert!(registry.get("d2:count").is_none());
    }

    #[test]
    fn register_adds_prefix() {
        let mut registry = FunctionRegistry::empty();
        registry.register("answer", Answer);
        assert!(registry.contains("d2:answer"));
        registry.register("d2:other", Answer);
        assert_eq!(registry.names(), vec!["d2:answer", "d2:other"]);
    }

    #[test]
    fn arity_errors_name_the_function() {
        let err = expect_arity("count", &[], 1).unwrap_err();
        assert_eq!(
            err.to_string(),
            "function 'd2:count' expects 1 argument(s), got 0"
        );
        let err = expect_min_arity("zpvc", &[], 1).unwrap_err();
        assert_eq!(
            err.to_string(),
            "function 'd2:zpvc' expects at least 1 argument(s), got 0"
        );
    }

    #[test]
    fn variable_name_accepts_references_and_text() {
        let reference = ExprNode::Variable {
            kind: crate::types::VariableKind::ProgramRule,
            name: "weight".into(),
        };
        assert_eq!(variable_name("count", &reference).unwrap(), "weight");
        let text = ExprNode::Literal(Value::Text("#{weight}".into()));
        assert_eq!(variable_name("count", &text).unwrap(), "weight");
        let number = ExprNode::Literal(Value::Number(1.0));
        assert!(matches!(
            variable_name("count", &number),
            Err(EvalError::NotAVariable { .. })
        ));
    }
}
