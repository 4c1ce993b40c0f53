use super::action::RuleAction;

/// A program rule: a condition expression and the actions it triggers.
///
/// Rules are usually declared through
/// [`RuleEngineContextBuilder::rule()`](super::RuleEngineContextBuilder::rule).
/// Lower `priority` values run first; rules without a priority run after all
/// prioritized rules, keeping their declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rule {
    pub name: String,
    pub priority: Option<i32>,
    pub condition: String,
    pub actions: Vec<RuleAction>,
}

impl Rule {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Intermediate builder passed to the rule definition closure.
#[derive(Debug)]
pub struct RuleBuilder {
    rule: Rule,
}

impl RuleBuilder {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            rule: Rule::new(name),
        }
    }

    /// Set the condition expression. Without one the rule never fires.
    #[must_use]
    pub fn when(mut self, condition: &str) -> Self {
        condition.clone_into(&mut self.rule.condition);
        self
    }

    #[must_use]
    pub fn priority(mut self, priority: i32) -> Self {
        self.rule.priority = Some(priority);
        self
    }

    /// Append an action; actions run in the order they are added.
    #[must_use]
    pub fn action(mut self, action: RuleAction) -> Self {
        self.rule.actions.push(action);
        self
    }

    pub(crate) fn build(self) -> Rule {
        self.rule
    }
}
