use std::collections::HashMap;
use std::fmt;

use super::action::RuleAction;
use super::expr::unwrap_variable_name;
use super::rule::{Rule, RuleBuilder};
use super::supplementary::SupplementaryData;
use super::value::RuleValueType;
use super::value_map::ValueMap;
use super::variable::RuleVariable;
use super::variable_value::RuleVariableValue;
use crate::expression::{self, ExpressionError, ExpressionVisitor};
use crate::functions::{FunctionRegistry, RuleFunction};
use crate::value_map_builder::ENVIRONMENT_VARIABLES;

/// Builder for constructing a [`RuleEngineContext`].
///
/// # Example
///
/// ```
/// use program_rules::{RuleAction, RuleEngineContext, RuleValueType, RuleVariable};
///
/// let context = RuleEngineContext::builder()
///     .variable(RuleVariable::current_event("weight", "DE_WEIGHT", RuleValueType::Numeric))
///     .rule("underweight", |r| {
///         r.priority(1)
///             .when("#{weight} < 2.5")
///             .action(RuleAction::display_text("Low birth weight: ", "#{weight}"))
///     })
///     .build();
/// assert_eq!(context.rules().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct RuleEngineContextBuilder {
    rules: Vec<Rule>,
    variables: Vec<RuleVariable>,
    constants: HashMap<String, String>,
    supplementary: SupplementaryData,
    functions: FunctionRegistry,
}

impl RuleEngineContextBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a rule through a closure over [`RuleBuilder`].
    ///
    /// A rule whose closure never calls `.when()` has an empty condition and
    /// never fires.
    #[must_use]
    pub fn rule(mut self, name: &str, f: impl FnOnce(RuleBuilder) -> RuleBuilder) -> Self {
        self.rules.push(f(RuleBuilder::new(name)).build());
        self
    }

    /// Append already-built rules, e.g. deserialized from host storage.
    #[must_use]
    pub fn rules(mut self, rules: impl IntoIterator<Item = Rule>) -> Self {
        self.rules.extend(rules);
        self
    }

    #[must_use]
    pub fn variable(mut self, variable: RuleVariable) -> Self {
        self.variables.push(variable);
        self
    }

    #[must_use]
    pub fn variables(mut self, variables: impl IntoIterator<Item = RuleVariable>) -> Self {
        self.variables.extend(variables);
        self
    }

    /// Declare a constant, referenced as `C{id}` and always numeric.
    #[must_use]
    pub fn constant(mut self, id: impl Into<String>, value: impl Into<String>) -> Self {
        self.constants.insert(id.into(), value.into());
        self
    }

    /// Add a supplementary data entry, e.g. the client's platform version.
    #[must_use]
    pub fn supplementary<I, S>(mut self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.supplementary.insert(key, values);
        self
    }

    /// Register an extra function, callable as `d2:<name>(...)`.
    #[must_use]
    pub fn function(mut self, name: &str, function: impl RuleFunction + 'static) -> Self {
        self.functions.register(name, function);
        self
    }

    #[must_use]
    pub fn build(self) -> RuleEngineContext {
        RuleEngineContext {
            rules: self.rules,
            variables: self.variables,
            constants: self.constants,
            supplementary: self.supplementary,
            functions: self.functions,
        }
    }
}

/// Everything that stays fixed across evaluations: rules, declared
/// variables, constants, supplementary data and the function registry.
///
/// Immutable once built and designed to live behind `Arc`, shared by every
/// [`RuleEngine`](super::RuleEngine) and thread that evaluates with it.
#[derive(Debug, Clone)]
pub struct RuleEngineContext {
    rules: Vec<Rule>,
    variables: Vec<RuleVariable>,
    constants: HashMap<String, String>,
    supplementary: SupplementaryData,
    functions: FunctionRegistry,
}

impl RuleEngineContext {
    #[must_use]
    pub fn builder() -> RuleEngineContextBuilder {
        RuleEngineContextBuilder::new()
    }

    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    #[must_use]
    pub fn variables(&self) -> &[RuleVariable] {
        &self.variables
    }

    #[must_use]
    pub fn constants(&self) -> &HashMap<String, String> {
        &self.constants
    }

    #[must_use]
    pub fn supplementary(&self) -> &SupplementaryData {
        &self.supplementary
    }

    #[must_use]
    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }

    /// Rule names in the order the engine evaluates them.
    #[must_use]
    pub fn execution_order(&self) -> Vec<&str> {
        crate::execute::execution_order(&self.rules)
            .into_iter()
            .map(|r| r.name.as_str())
            .collect()
    }

    /// Type-check an expression against the declared variables, constants
    /// and environment variables, without any program data.
    ///
    /// # Errors
    ///
    /// Returns the first [`ExpressionError`] found: a syntax error, an
    /// unknown variable or function, or an operand of the wrong type.
    pub fn describe(&self, expression: &str) -> Result<RuleValueType, ExpressionError> {
        let values = self.placeholder_values();
        let visitor = ExpressionVisitor::new(&self.functions, &values, &self.supplementary);
        expression::describe(expression, &visitor)
    }

    /// Type-check every condition and action expression, in evaluation
    /// order. Returns the name of the first offending rule with its error.
    ///
    /// # Errors
    ///
    /// Returns `(rule name, error)` for the first expression that fails.
    pub fn validate(&self) -> Result<(), (String, ExpressionError)> {
        let values = self.placeholder_values();
        let visitor = ExpressionVisitor::new(&self.functions, &values, &self.supplementary);
        for rule in crate::execute::execution_order(&self.rules) {
            let expressions = std::iter::once(rule.condition.as_str())
                .chain(rule.actions.iter().map(RuleAction::data));
            for text in expressions {
                expression::describe(text, &visitor).map_err(|err| (rule.name.clone(), err))?;
            }
        }
        Ok(())
    }

    /// Value map holding a type-appropriate placeholder for every name an
    /// expression could reference. Calculated-variable targets of assign
    /// actions count as declared text variables.
    fn placeholder_values(&self) -> ValueMap {
        let mut values = ValueMap::new();
        let mut put = |name: &str, value_type: RuleValueType| {
            values.insert(name, RuleVariableValue::single(value_type.placeholder(), value_type));
        };
        for (name, value_type) in ENVIRONMENT_VARIABLES {
            put(name, value_type);
        }
        for id in self.constants.keys() {
            put(id, RuleValueType::Numeric);
        }
        let targets = self
            .rules
            .iter()
            .flat_map(|r| &r.actions)
            .filter_map(RuleAction::calculated_target);
        for target in targets {
            put(unwrap_variable_name(target), RuleValueType::Text);
        }
        for variable in &self.variables {
            put(&variable.name, variable.value_type);
        }
        values
    }
}

impl fmt::Display for RuleEngineContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RuleEngineContext({} rules, {} variables, {} constants)",
            self.rules.len(),
            self.variables.len(),
            self.constants.len(),
        )
    }
}
