use super::{expect_arity, variable_name, RuleFunction};
use crate::expression::ExpressionVisitor;
use crate::types::{parse_number, EvalError, ExprNode, RuleValueType, Value};

/// `d2:count(var)`: number of recorded candidates, 0 for unknown variables.
#[derive(Debug, Clone, Copy, Default)]
pub struct Count;

impl RuleFunction for Count {
    fn evaluate(
        &self,
        args: &[ExprNode],
        visitor: &ExpressionVisitor<'_>,
    ) -> Result<Value, EvalError> {
        expect_arity("count", args, 1)?;
        let name = variable_name("count", &args[0])?;
        let count = visitor.variable(name).map_or(0, |v| v.candidates().len());
        Ok(Value::from(count))
    }

    fn describe(
        &self,
        args: &[ExprNode],
        _visitor: &ExpressionVisitor<'_>,
    ) -> Result<RuleValueType, EvalError> {
        expect_arity("count", args, 1)?;
        variable_name("count", &args[0])?;
        Ok(RuleValueType::Numeric)
    }
}

/// `d2:countIfValue(var, value)`: candidates equal to the rendered value.
#[derive(Debug, Clone, Copy, Default)]
pub struct CountIfValue;

impl RuleFunction for CountIfValue {
    fn evaluate(
        &self,
        args: &[ExprNode],
        visitor: &ExpressionVisitor<'_>,
    ) -> Result<Value, EvalError> {
        expect_arity("countIfValue", args, 2)?;
        let name = variable_name("countIfValue", &args[0])?;
        let wanted = visitor.visit(&args[1])?.to_string();
        let count = visitor.variable(name).map_or(0, |v| {
            v.candidates()
                .iter()
                .filter(|candidate| **candidate == wanted)
                .count()
        });
        Ok(Value::from(count))
    }

    fn describe(
        &self,
        args: &[ExprNode],
        visitor: &ExpressionVisitor<'_>,
    ) -> Result<RuleValueType, EvalError> {
        expect_arity("countIfValue", args, 2)?;
        variable_name("countIfValue", &args[0])?;
        visitor.describe(&args[1])?;
        Ok(RuleValueType::Numeric)
    }
}

/// `d2:countIfZeroPos(var)`: candidates that are numbers `>= 0`.
///
/// A candidate that is not a number fails the whole call.
#[derive(Debug, Clone, Copy, Default)]
pub struct CountIfZeroPositive;

impl RuleFunction for CountIfZeroPositive {
    fn evaluate(
        &self,
        args: &[ExprNode],
        visitor: &ExpressionVisitor<'_>,
    ) -> Result<Value, EvalError> {
        expect_arity("countIfZeroPos", args, 1)?;
        let name = variable_name("countIfZeroPos", &args[0])?;
        let Some(variable) = visitor.variable(name) else {
            return Ok(Value::from(0_usize));
        };
        let mut count = 0_usize;
        for candidate in variable.candidates() {
            let n = parse_number(candidate).ok_or_else(|| EvalError::InvalidNumber {
                value: candidate.clone(),
            })?;
            if n >= 0.0 {
                count += 1;
            }
        }
        Ok(Value::from(count))
    }

    fn describe(
        &self,
        args: &[ExprNode],
        _visitor: &ExpressionVisitor<'_>,
    ) -> Result<RuleValueType, EvalError> {
        expect_arity("countIfZeroPos", args, 1)?;
        variable_name("countIfZeroPos", &args[0])?;
        Ok(RuleValueType::Numeric)
    }
}

/// `d2:hasValue(var)`: whether the variable holds a non-empty value.
#[derive(Debug, Clone, Copy, Default)]
pub struct HasValue;

impl RuleFunction for HasValue {
    fn evaluate(
        &self,
        args: &[ExprNode],
        visitor: &ExpressionVisitor<'_>,
    ) -> Result<Value, EvalError> {
        expect_arity("hasValue", args, 1)?;
        let name = variable_name("hasValue", &args[0])?;
        let present = visitor
            .variable(name)
            .and_then(|v| v.value())
            .is_some_and(|value| !value.is_empty());
        Ok(Value::Bool(present))
    }

    fn describe(
        &self,
        args: &[ExprNode],
        _visitor: &ExpressionVisitor<'_>,
    ) -> Result<RuleValueType, EvalError> {
        expect_arity("hasValue", args, 1)?;
        variable_name("hasValue", &args[0])?;
        Ok(RuleValueType::Boolean)
    }
}
