use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, debug_span, error, warn};

use crate::expression::{self, ExpressionError, ExpressionVisitor};
use crate::functions::FunctionRegistry;
use crate::types::{
    unwrap_variable_name, Rule, RuleAction, RuleEffect, RuleValueType, RuleVariableValue,
    SupplementaryData, ValueMap,
};

/// Rules in evaluation order: ascending priority, rules without a priority
/// last, ties in declaration order.
pub(crate) fn execution_order(rules: &[Rule]) -> Vec<&Rule> {
    let mut ordered: Vec<&Rule> = rules.iter().collect();
    ordered.sort_by_key(|rule| (rule.priority.is_none(), rule.priority));
    ordered
}

/// Run `rules` against `values`, threading calculated-variable writes from
/// each fired rule into every rule evaluated after it.
pub(crate) fn execute(
    rules: &[Rule],
    mut values: ValueMap,
    functions: &FunctionRegistry,
    supplementary: &SupplementaryData,
) -> Vec<RuleEffect> {
    let span = debug_span!("execute", rules = rules.len());
    let _guard = span.enter();

    let mut effects = Vec::new();
    for rule in execution_order(rules) {
        debug!(rule = %rule.name, priority = ?rule.priority, "evaluating rule");
        let condition = process(&rule.condition, &values, functions, supplementary);
        if !is_truthy(&condition) {
            continue;
        }

        for action in &rule.actions {
            let data = process(action.data(), &values, functions, supplementary);

            if let Some(target) = action.calculated_target() {
                let name = unwrap_variable_name(target).to_owned();
                let value_type = declared_type(&values, &name);
                debug!(variable = %name, value = %data, "calculated variable assigned");
                values.insert(name, RuleVariableValue::single(data, value_type));
                continue;
            }

            if let RuleAction::Assign { field, .. } = action {
                let value_type = declared_type(&values, field);
                values.insert(field.clone(), RuleVariableValue::single(data.clone(), value_type));
            }
            effects.push(RuleEffect::new(action.clone(), data));
        }
    }

    debug!(effects = effects.len(), "rule execution finished");
    effects
}

/// Evaluate one expression, degrading every failure to an empty string.
fn process(
    expression: &str,
    values: &ValueMap,
    functions: &FunctionRegistry,
    supplementary: &SupplementaryData,
) -> String {
    if expression.is_empty() {
        return String::new();
    }
    let visitor = ExpressionVisitor::new(functions, values, supplementary);
    match panic::catch_unwind(AssertUnwindSafe(|| expression::evaluate(expression, &visitor))) {
        Ok(Ok(result)) => result,
        Ok(Err(ExpressionError::Parse(err))) => {
            warn!(expression, error = %err, "expression not executed: syntax error");
            String::new()
        }
        Ok(Err(ExpressionError::Eval(err))) => {
            error!(expression, error = %err, "expression evaluation failed");
            String::new()
        }
        Err(_) => {
            error!(expression, "expression evaluation panicked");
            String::new()
        }
    }
}

fn is_truthy(condition: &str) -> bool {
    condition == "true"
}

/// Keep the declared type of a known variable; new entries are text.
fn declared_type(values: &ValueMap, name: &str) -> RuleValueType {
    values
        .get(name)
        .map_or(RuleValueType::Text, RuleVariableValue::value_type)
}
