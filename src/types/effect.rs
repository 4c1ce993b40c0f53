use std::fmt;

use super::action::RuleAction;

/// A fired action paired with its rendered data.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct RuleEffect {
    action: RuleAction,
    data: String,
}

impl fmt::Display for RuleEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = \"{}\"", self.action.kind(), self.data)
    }
}

impl RuleEffect {
    pub fn new(action: RuleAction, data: impl Into<String>) -> Self {
        Self {
            action,
            data: data.into(),
        }
    }

    #[must_use]
    pub fn action(&self) -> &RuleAction {
        &self.action
    }

    #[must_use]
    pub fn data(&self) -> &str {
        &self.data
    }
}
