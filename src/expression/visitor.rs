use std::cmp::Ordering;

use crate::functions::FunctionRegistry;
use crate::types::{
    BinaryOp, EvalError, ExprNode, RuleValueType, RuleVariableValue, SupplementaryData, UnaryOp,
    Value, ValueMap,
};

/// Interprets an [`ExprNode`] tree against one value-map snapshot.
///
/// Bound to the function registry, the current value-map and the
/// supplementary data. Cheap to construct; the executor builds one per
/// expression so that calculated-variable writes are seen by later rules.
#[derive(Debug, Clone, Copy)]
pub struct ExpressionVisitor<'a> {
    functions: &'a FunctionRegistry,
    values: &'a ValueMap,
    supplementary: &'a SupplementaryData,
}

impl<'a> ExpressionVisitor<'a> {
    #[must_use]
    pub fn new(
        functions: &'a FunctionRegistry,
        values: &'a ValueMap,
        supplementary: &'a SupplementaryData,
    ) -> Self {
        Self {
            functions,
            values,
            supplementary,
        }
    }

    #[must_use]
    pub fn values(&self) -> &'a ValueMap {
        self.values
    }

    #[must_use]
    pub fn supplementary(&self) -> &'a SupplementaryData {
        self.supplementary
    }

    /// Look up a variable by bare name.
    #[must_use]
    pub fn variable(&self, name: &str) -> Option<&'a RuleVariableValue> {
        self.values.get(name)
    }

    /// Evaluate `node` to a value.
    ///
    /// # Errors
    ///
    /// Returns an [`EvalError`] on type mismatches, unknown functions,
    /// division by zero, or any error raised by a function.
    pub fn visit(&self, node: &ExprNode) -> Result<Value, EvalError> {
        match node {
            ExprNode::Literal(value) => Ok(value.clone()),
            ExprNode::Variable { name, .. } => Ok(self
                .values
                .get(name)
                .map_or_else(|| Value::Text(String::new()), RuleVariableValue::typed_value)),
            ExprNode::Unary { op, operand } => {
                let value = self.visit(operand)?;
                match op {
                    UnaryOp::Not => Ok(Value::Bool(!value.as_bool()?)),
                    UnaryOp::Negate => Ok(Value::Number(-value.as_number()?)),
                    UnaryOp::Plus => Ok(Value::Number(value.as_number()?)),
                }
            }
            ExprNode::Binary { op, left, right } => self.visit_binary(*op, left, right),
            ExprNode::Function { name, args } => self
                .functions
                .get(name)
                .ok_or_else(|| EvalError::UnknownFunction { name: name.clone() })?
                .evaluate(args, self),
        }
    }

    fn visit_binary(
        &self,
        op: BinaryOp,
        left: &ExprNode,
        right: &ExprNode,
    ) -> Result<Value, EvalError> {
        // Logical operators short-circuit: the right side is not evaluated
        // once the left side decides the result.
        match op {
            BinaryOp::And => {
                if !self.visit(left)?.as_bool()? {
                    return Ok(Value::Bool(false));
                }
                return Ok(Value::Bool(self.visit(right)?.as_bool()?));
            }
            BinaryOp::Or => {
                if self.visit(left)?.as_bool()? {
                    return Ok(Value::Bool(true));
                }
                return Ok(Value::Bool(self.visit(right)?.as_bool()?));
            }
            _ => {}
        }

        let lhs = self.visit(left)?;
        let rhs = self.visit(right)?;
        apply(op, &lhs, &rhs)
    }

    /// Report the type `node` would evaluate to, applying the same operand
    /// checks as [`visit`](Self::visit) without real data.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::UnknownVariable`] for references missing from the
    /// value-map, [`EvalError::UnknownFunction`], or any type error.
    pub fn describe(&self, node: &ExprNode) -> Result<RuleValueType, EvalError> {
        match node {
            ExprNode::Literal(value) => Ok(value.value_type()),
            ExprNode::Variable { name, .. } => self
                .values
                .get(name)
                .map(RuleVariableValue::value_type)
                .ok_or_else(|| EvalError::UnknownVariable { name: name.clone() }),
            ExprNode::Unary { op, operand } => {
                let operand = self.describe(operand)?;
                match op {
                    UnaryOp::Not => {
                        reject(operand, RuleValueType::Numeric, RuleValueType::Boolean)?;
                        Ok(RuleValueType::Boolean)
                    }
                    UnaryOp::Negate | UnaryOp::Plus => {
                        reject(operand, RuleValueType::Boolean, RuleValueType::Numeric)?;
                        Ok(RuleValueType::Numeric)
                    }
                }
            }
            ExprNode::Binary { op, left, right } => {
                let lhs = self.describe(left)?;
                let rhs = self.describe(right)?;
                match op {
                    BinaryOp::And | BinaryOp::Or => {
                        reject(lhs, RuleValueType::Numeric, RuleValueType::Boolean)?;
                        reject(rhs, RuleValueType::Numeric, RuleValueType::Boolean)?;
                        Ok(RuleValueType::Boolean)
                    }
                    BinaryOp::Eq | BinaryOp::Neq => Ok(RuleValueType::Boolean),
                    BinaryOp::Lt | BinaryOp::Lte | BinaryOp::Gt | BinaryOp::Gte => {
                        reject(lhs, RuleValueType::Boolean, RuleValueType::Numeric)?;
                        reject(rhs, RuleValueType::Boolean, RuleValueType::Numeric)?;
                        Ok(RuleValueType::Boolean)
                    }
                    BinaryOp::Add
                    | BinaryOp::Sub
                    | BinaryOp::Mul
                    | BinaryOp::Div
                    | BinaryOp::Mod => {
                        reject(lhs, RuleValueType::Boolean, RuleValueType::Numeric)?;
                        reject(rhs, RuleValueType::Boolean, RuleValueType::Numeric)?;
                        Ok(RuleValueType::Numeric)
                    }
                }
            }
            ExprNode::Function { name, args } => self
                .functions
                .get(name)
                .ok_or_else(|| EvalError::UnknownFunction { name: name.clone() })?
                .describe(args, self),
        }
    }
}

fn apply(op: BinaryOp, lhs: &Value, rhs: &Value) -> Result<Value, EvalError> {
    let result = match op {
        BinaryOp::And => Value::Bool(lhs.as_bool()? && rhs.as_bool()?),
        BinaryOp::Or => Value::Bool(lhs.as_bool()? || rhs.as_bool()?),
        BinaryOp::Eq => Value::Bool(lhs.loose_eq(rhs)?),
        BinaryOp::Neq => Value::Bool(!lhs.loose_eq(rhs)?),
        BinaryOp::Lt => Value::Bool(lhs.loose_cmp(rhs)? == Some(Ordering::Less)),
        BinaryOp::Lte => Value::Bool(matches!(
            lhs.loose_cmp(rhs)?,
            Some(Ordering::Less | Ordering::Equal)
        )),
        BinaryOp::Gt => Value::Bool(lhs.loose_cmp(rhs)? == Some(Ordering::Greater)),
        BinaryOp::Gte => Value::Bool(matches!(
            lhs.loose_cmp(rhs)?,
            Some(Ordering::Greater | Ordering::Equal)
        )),
        BinaryOp::Add => Value::Number(lhs.as_number()? + rhs.as_number()?),
        BinaryOp::Sub => Value::Number(lhs.as_number()? - rhs.as_number()?),
        BinaryOp::Mul => Value::Number(lhs.as_number()? * rhs.as_number()?),
        BinaryOp::Div | BinaryOp::Mod => {
            let divisor = rhs.as_number()?;
            if divisor == 0.0 {
                return Err(EvalError::DivisionByZero);
            }
            let dividend = lhs.as_number()?;
            Value::Number(if op == BinaryOp::Div {
                dividend / divisor
            } else {
                dividend % divisor
            })
        }
    };
    Ok(result)
}

/// Fail when `found` is the type an operator can never accept.
fn reject(
    found: RuleValueType,
    forbidden: RuleValueType,
    expected: RuleValueType,
) -> Result<(), EvalError> {
    if found == forbidden {
        return Err(EvalError::TypeMismatch {
            expected,
            found: found.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse;

    fn eval_with(values: &ValueMap, text: &str) -> Result<Value, EvalError> {
        let functions = FunctionRegistry::default();
        let supplementary = SupplementaryData::new();
        let visitor = ExpressionVisitor::new(&functions, values, &supplementary);
        visitor.visit(&parse(text, false).unwrap())
    }

    fn eval(text: &str) -> Result<Value, EvalError> {
        eval_with(&ValueMap::new(), text)
    }

    fn describe_with(values: &ValueMap, text: &str) -> Result<RuleValueType, EvalError> {
        let functions = FunctionRegistry::default();
        let supplementary = SupplementaryData::new();
        let visitor = ExpressionVisitor::new(&functions, values, &supplementary);
        visitor.describe(&parse(text, false).unwrap())
    }

    #[test]
    fn arithmetic() {
        assert_eq!(eval("1 + 2 * 3").unwrap(), Value::Number(7.0));
        assert_eq!(eval("(1 + 2) * 3").unwrap(), Value::Number(9.0));
        assert_eq!(eval("10 / 4").unwrap(), Value::Number(2.5));
        assert_eq!(eval("10 % 4").unwrap(), Value::Number(2.0));
        assert_eq!(eval("-3 + 1").unwrap(), Value::Number(-2.0));
    }

    #[test]
    fn division_by_zero() {
        assert_eq!(eval("1 / 0"), Err(EvalError::DivisionByZero));
        assert_eq!(eval("1 % 0"), Err(EvalError::DivisionByZero));
    }

    #[test]
    fn comparisons() {
        assert_eq!(eval("2 > 1").unwrap(), Value::Bool(true));
        assert_eq!(eval("2 <= 1").unwrap(), Value::Bool(false));
        assert_eq!(eval("'10' > '9'").unwrap(), Value::Bool(true));
        assert_eq!(eval("'b' > 'a'").unwrap(), Value::Bool(true));
        assert_eq!(eval("'abc' == 'abc'").unwrap(), Value::Bool(true));
        assert_eq!(eval("'5' == 5").unwrap(), Value::Bool(true));
        assert_eq!(eval("1 != 1").unwrap(), Value::Bool(false));
    }

    #[test]
    fn logical_operators_short_circuit() {
        // The right side would fail with a type mismatch if evaluated.
        assert_eq!(eval("false && 1").unwrap(), Value::Bool(false));
        assert_eq!(eval("true || 1").unwrap(), Value::Bool(true));
        assert!(eval("true && 1").is_err());
    }

    #[test]
    fn not_requires_boolean() {
        assert_eq!(eval("!false").unwrap(), Value::Bool(true));
        assert!(matches!(
            eval("!1"),
            Err(EvalError::TypeMismatch {
                expected: RuleValueType::Boolean,
                ..
            })
        ));
    }

    #[test]
    fn arithmetic_on_text_fails() {
        assert!(matches!(
            eval("'abc' + 1"),
            Err(EvalError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn variables_resolve_by_declared_type() {
        let values = ValueMap::new()
            .with("weight", RuleVariableValue::single("12.5", RuleValueType::Numeric))
            .with("pregnant", RuleVariableValue::single("true", RuleValueType::Boolean))
            .with("empty", RuleVariableValue::empty(RuleValueType::Numeric));
        assert_eq!(
            eval_with(&values, "#{weight} * 2").unwrap(),
            Value::Number(25.0)
        );
        assert_eq!(
            eval_with(&values, "#{pregnant} && true").unwrap(),
            Value::Bool(true)
        );
        assert_eq!(eval_with(&values, "#{empty}").unwrap(), Value::Number(0.0));
    }

    #[test]
    fn unknown_variable_is_empty_text() {
        assert_eq!(eval("#{missing}").unwrap(), Value::Text(String::new()));
    }

    #[test]
    fn unknown_function() {
        assert_eq!(
            eval("d2:nope(1)"),
            Err(EvalError::UnknownFunction {
                name: "d2:nope".into()
            })
        );
    }

    #[test]
    fn describe_types() {
        let values = ValueMap::new()
            .with("weight", RuleVariableValue::single("1", RuleValueType::Numeric))
            .with("name", RuleVariableValue::single("", RuleValueType::Text));
        assert_eq!(
            describe_with(&values, "#{weight} + 1").unwrap(),
            RuleValueType::Numeric
        );
        assert_eq!(
            describe_with(&values, "#{weight} > 1 && true").unwrap(),
            RuleValueType::Boolean
        );
        assert_eq!(
            describe_with(&values, "#{name}").unwrap(),
            RuleValueType::Text
        );
        assert_eq!(
            describe_with(&values, "d2:count(#{weight})").unwrap(),
            RuleValueType::Numeric
        );
    }

    #[test]
    fn describe_rejects_bad_operands() {
        let values = ValueMap::new();
        assert!(matches!(
            describe_with(&values, "true + 1"),
            Err(EvalError::TypeMismatch { .. })
        ));
        assert!(matches!(
            describe_with(&values, "1 && true"),
            Err(EvalError::TypeMismatch { .. })
        ));
        assert_eq!(
            describe_with(&values, "#{missing}"),
            Err(EvalError::UnknownVariable {
                name: "missing".into()
            })
        );
    }
}
