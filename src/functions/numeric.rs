use super::{describe_numeric_args, expect_arity, expect_min_arity, RuleFunction};
use crate::expression::ExpressionVisitor;
use crate::types::{parse_number, EvalError, ExprNode, RuleValueType, Value};

/// `d2:oizp(expr)`: 1 when the argument is a number `>= 0`, otherwise 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroOrPositive;

impl RuleFunction for ZeroOrPositive {
    fn evaluate(
        &self,
        args: &[ExprNode],
        visitor: &ExpressionVisitor<'_>,
    ) -> Result<Value, EvalError> {
        expect_arity("oizp", args, 1)?;
        let rendered = visitor.visit(&args[0])?.to_string();
        let hit = parse_number(&rendered).is_some_and(|n| n >= 0.0);
        Ok(Value::Number(if hit { 1.0 } else { 0.0 }))
    }

    fn describe(
        &self,
        args: &[ExprNode],
        visitor: &ExpressionVisitor<'_>,
    ) -> Result<RuleValueType, EvalError> {
        expect_arity("oizp", args, 1)?;
        visitor.describe(&args[0])?;
        Ok(RuleValueType::Numeric)
    }
}

/// `d2:zpvc(expr, ...)`: how many arguments are numbers `>= 0`.
///
/// Every argument must be numeric; the first that is not fails the call.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroPositiveValueCount;

impl RuleFunction for ZeroPositiveValueCount {
    fn evaluate(
        &self,
        args: &[ExprNode],
        visitor: &ExpressionVisitor<'_>,
    ) -> Result<Value, EvalError> {
        expect_min_arity("zpvc", args, 1)?;
        let mut count = 0_usize;
        for arg in args {
            if visitor.visit(arg)?.to_number_arg()? >= 0.0 {
                count += 1;
            }
        }
        Ok(Value::from(count))
    }

    fn describe(
        &self,
        args: &[ExprNode],
        visitor: &ExpressionVisitor<'_>,
    ) -> Result<RuleValueType, EvalError> {
        expect_min_arity("zpvc", args, 1)?;
        describe_numeric_args(args, visitor)?;
        Ok(RuleValueType::Numeric)
    }
}

/// Single numeric argument mapped through `op`.
fn unary_numeric(
    function: &str,
    args: &[ExprNode],
    visitor: &ExpressionVisitor<'_>,
    op: fn(f64) -> f64,
) -> Result<Value, EvalError> {
    expect_arity(function, args, 1)?;
    let n = visitor.visit(&args[0])?.to_number_arg()?;
    Ok(Value::Number(op(n)))
}

fn round_half_up(n: f64) -> f64 {
    (n + 0.5).floor()
}

fn describe_unary_numeric(
    function: &str,
    args: &[ExprNode],
    visitor: &ExpressionVisitor<'_>,
) -> Result<RuleValueType, EvalError> {
    expect_arity(function, args, 1)?;
    describe_numeric_args(args, visitor)?;
    Ok(RuleValueType::Numeric)
}

/// `d2:zing(expr)`: the number, with negatives replaced by 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct Zing;

impl RuleFunction for Zing {
    fn evaluate(
        &self,
        args: &[ExprNode],
        visitor: &ExpressionVisitor<'_>,
    ) -> Result<Value, EvalError> {
        unary_numeric("zing", args, visitor, |n| n.max(0.0))
    }

    fn describe(
        &self,
        args: &[ExprNode],
        visitor: &ExpressionVisitor<'_>,
    ) -> Result<RuleValueType, EvalError> {
        describe_unary_numeric("zing", args, visitor)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Floor;

impl RuleFunction for Floor {
    fn evaluate(
        &self,
        args: &[ExprNode],
        visitor: &ExpressionVisitor<'_>,
    ) -> Result<Value, EvalError> {
        unary_numeric("floor", args, visitor, f64::floor)
    }

    fn describe(
        &self,
        args: &[ExprNode],
        visitor: &ExpressionVisitor<'_>,
    ) -> Result<RuleValueType, EvalError> {
        describe_unary_numeric("floor", args, visitor)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Ceil;

impl RuleFunction for Ceil {
    fn evaluate(
        &self,
        args: &[ExprNode],
        visitor: &ExpressionVisitor<'_>,
    ) -> Result<Value, EvalError> {
        unary_numeric("ceil", args, visitor, f64::ceil)
    }

    fn describe(
        &self,
        args: &[ExprNode],
        visitor: &ExpressionVisitor<'_>,
    ) -> Result<RuleValueType, EvalError> {
        describe_unary_numeric("ceil", args, visitor)
    }
}

/// `d2:round(expr)`: nearest integer, halves towards positive infinity.
#[derive(Debug, Clone, Copy, Default)]
pub struct Round;

impl RuleFunction for Round {
    fn evaluate(
        &self,
        args: &[ExprNode],
        visitor: &ExpressionVisitor<'_>,
    ) -> Result<Value, EvalError> {
        unary_numeric("round", args, visitor, round_half_up)
    }

    fn describe(
        &self,
        args: &[ExprNode],
        visitor: &ExpressionVisitor<'_>,
    ) -> Result<RuleValueType, EvalError> {
        describe_unary_numeric("round", args, visitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functions::FunctionRegistry;
    use crate::parse::parse;
    use crate::types::{RuleVariableValue, SupplementaryData, ValueMap};

    fn eval(text: &str) -> Result<String, EvalError> {
        let functions = FunctionRegistry::default();
        let values = ValueMap::new()
            .with("weight", RuleVariableValue::single("-3", RuleValueType::Numeric))
            .with("label", RuleVariableValue::single("abc", RuleValueType::Text));
        let supplementary = SupplementaryData::new();
        let visitor = ExpressionVisitor::new(&functions, &values, &supplementary);
        visitor
            .visit(&parse(text, false).unwrap())
            .map(|v| v.to_string())
    }

    fn describe(text: &str) -> Result<RuleValueType, EvalError> {
        let functions = FunctionRegistry::default();
        let values = ValueMap::new();
        let supplementary = SupplementaryData::new();
        let visitor = ExpressionVisitor::new(&functions, &values, &supplementary);
        visitor.describe(&parse(text, false).unwrap())
    }

    #[test]
    fn zero_or_positive() {
        assert_eq!(eval("d2:oizp(0)").unwrap(), "1");
        assert_eq!(eval("d2:oizp(7)").unwrap(), "1");
        assert_eq!(eval("d2:oizp(-1)").unwrap(), "0");
        assert_eq!(eval("d2:oizp(#{weight})").unwrap(), "0");
        assert_eq!(eval("d2:oizp('abc')").unwrap(), "0");
    }

    #[test]
    fn zero_positive_value_count() {
        assert_eq!(eval("d2:zpvc(0, -1, 2, 3)").unwrap(), "3");
        assert_eq!(eval("d2:zpvc(#{weight})").unwrap(), "0");
        assert_eq!(eval("d2:zpvc('4', -4)").unwrap(), "1");
    }

    #[test]
    fn zero_positive_value_count_rejects_text() {
        assert_eq!(
            eval("d2:zpvc(1, #{label})"),
            Err(EvalError::InvalidNumber {
                value: "abc".into()
            })
        );
    }

    #[test]
    fn zero_positive_value_count_needs_an_argument() {
        assert!(matches!(eval("d2:zpvc()"), Err(EvalError::Arity { .. })));
        assert!(matches!(describe("d2:zpvc()"), Err(EvalError::Arity { .. })));
    }

    #[test]
    fn rounding_family() {
        assert_eq!(eval("d2:zing(-5)").unwrap(), "0");
        assert_eq!(eval("d2:zing(5.5)").unwrap(), "5.5");
        assert_eq!(eval("d2:floor(2.7)").unwrap(), "2");
        assert_eq!(eval("d2:ceil(2.1)").unwrap(), "3");
        assert_eq!(eval("d2:round(2.5)").unwrap(), "3");
        assert_eq!(eval("d2:round(2.4)").unwrap(), "2");
        assert_eq!(eval("d2:round(-2.5)").unwrap(), "-2");
        assert_eq!(eval("d2:round(-2.6)").unwrap(), "-3");
        assert_eq!(eval("d2:round(-0.4)").unwrap(), "0");
    }

    #[test]
    fn describe_numeric_functions() {
        assert_eq!(describe("d2:floor(1.5)").unwrap(), RuleValueType::Numeric);
        assert_eq!(describe("d2:zpvc(1, 2)").unwrap(), RuleValueType::Numeric);
        assert!(matches!(
            describe("d2:floor(true)"),
            Err(EvalError::TypeMismatch { .. })
        ));
    }
}
