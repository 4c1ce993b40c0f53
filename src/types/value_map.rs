use std::collections::HashMap;

use super::variable_value::RuleVariableValue;

/// Key under which the trigger environment is stored.
pub const ENVIRONMENT: &str = "environment";

/// Variable name to [`RuleVariableValue`] mapping threaded through one
/// evaluation run. A missing key means the variable is unknown.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueMap {
    values: HashMap<String, RuleVariableValue>,
}

impl ValueMap {
    /// Create an empty value map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: RuleVariableValue) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert or replace the entry for `name`.
    pub fn insert(&mut self, name: impl Into<String>, value: RuleVariableValue) {
        self.values.insert(name.into(), value);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RuleVariableValue> {
        self.values.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The trigger environment's client name, if one was recorded.
    #[must_use]
    pub fn environment(&self) -> Option<&str> {
        self.get(ENVIRONMENT).and_then(RuleVariableValue::value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RuleVariableValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, RuleVariableValue)> for ValueMap {
    fn from_iter<T: IntoIterator<Item = (String, RuleVariableValue)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RuleValueType;

    #[test]
    fn insert_replaces_entry() {
        let mut map = ValueMap::new().with("x", RuleVariableValue::single("1", RuleValueType::Text));
        map.insert("x", RuleVariableValue::single("2", RuleValueType::Text));
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("x").and_then(RuleVariableValue::value), Some("2"));
    }

    #[test]
    fn missing_is_unknown() {
        let map = ValueMap::new();
        assert!(map.get("nope").is_none());
        assert!(map.is_empty());
    }

    #[test]
    fn environment_lookup() {
        let map = ValueMap::new().with(
            ENVIRONMENT,
            RuleVariableValue::new("android", RuleValueType::Text),
        );
        assert_eq!(map.environment(), Some("android"));
    }
}
