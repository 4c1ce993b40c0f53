use super::{expect_arity, RuleFunction};
use crate::expression::ExpressionVisitor;
use crate::types::{EvalError, ExprNode, RuleValueType, Value};

/// `d2:concatenate(expr, ...)`: rendered arguments joined together.
#[derive(Debug, Clone, Copy, Default)]
pub struct Concatenate;

impl RuleFunction for Concatenate {
    fn evaluate(
        &self,
        args: &[ExprNode],
        visitor: &ExpressionVisitor<'_>,
    ) -> Result<Value, EvalError> {
        let mut joined = String::new();
        for arg in args {
            joined.push_str(&visitor.visit(arg)?.to_string());
        }
        Ok(Value::Text(joined))
    }

    fn describe(
        &self,
        args: &[ExprNode],
        visitor: &ExpressionVisitor<'_>,
    ) -> Result<RuleValueType, EvalError> {
        for arg in args {
            visitor.describe(arg)?;
        }
        Ok(RuleValueType::Text)
    }
}

/// `d2:length(expr)`: number of characters in the rendered argument.
#[derive(Debug, Clone, Copy, Default)]
pub struct Length;

impl RuleFunction for Length {
    fn evaluate(
        &self,
        args: &[ExprNode],
        visitor: &ExpressionVisitor<'_>,
    ) -> Result<Value, EvalError> {
        expect_arity("length", args, 1)?;
        let rendered = visitor.visit(&args[0])?.to_string();
        Ok(Value::from(rendered.chars().count()))
    }

    fn describe(
        &self,
        args: &[ExprNode],
        visitor: &ExpressionVisitor<'_>,
    ) -> Result<RuleValueType, EvalError> {
        expect_arity("length", args, 1)?;
        visitor.describe(&args[0])?;
        Ok(RuleValueType::Numeric)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functions::FunctionRegistry;
    use crate::parse::parse;
    use crate::types::{SupplementaryData, ValueMap};

    fn eval(text: &str) -> Result<String, EvalError> {
        let functions = FunctionRegistry::default();
        let values = ValueMap::new();
        let supplementary = SupplementaryData::new();
        let visitor = ExpressionVisitor::new(&functions, &values, &supplementary);
        visitor
            .visit(&parse(text, false).unwrap())
            .map(|v| v.to_string())
    }

    #[test]
    fn concatenate_renders_each_argument() {
        assert_eq!(eval("d2:concatenate('a', 1, true)").unwrap(), "a1true");
        assert_eq!(eval("d2:concatenate()").unwrap(), "");
    }

    #[test]
    fn length_counts_characters() {
        assert_eq!(eval("d2:length('héllo')").unwrap(), "5");
        assert_eq!(eval("d2:length(100)").unwrap(), "3");
    }
}
