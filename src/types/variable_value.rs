use super::value::{RuleValueType, Value};

/// The value of one rule variable: a primary value, its declared type, and
/// every known occurrence of it (newest first).
///
/// Immutable once built. A calculated-variable write replaces the whole
/// record in the [`ValueMap`](super::ValueMap) instead of mutating it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleVariableValue {
    value: Option<String>,
    value_type: RuleValueType,
    candidates: Vec<String>,
}

impl RuleVariableValue {
    /// A value with no recorded candidates.
    pub fn new(value: impl Into<String>, value_type: RuleValueType) -> Self {
        Self {
            value: Some(value.into()),
            value_type,
            candidates: Vec::new(),
        }
    }

    /// A value whose only candidate is itself.
    pub fn single(value: impl Into<String>, value_type: RuleValueType) -> Self {
        let value = value.into();
        Self {
            candidates: vec![value.clone()],
            value: Some(value),
            value_type,
        }
    }

    /// A declared variable for which no data exists.
    #[must_use]
    pub fn empty(value_type: RuleValueType) -> Self {
        Self {
            value: None,
            value_type,
            candidates: Vec::new(),
        }
    }

    /// Replace the candidate history.
    #[must_use]
    pub fn with_candidates<I, S>(mut self, candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.candidates = candidates.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    #[must_use]
    pub fn value_type(&self) -> RuleValueType {
        self.value_type
    }

    #[must_use]
    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// The primary value resolved against the declared type, falling back to
    /// the type default when there is no data.
    #[must_use]
    pub fn typed_value(&self) -> Value {
        match &self.value {
            Some(raw) => Value::typed(raw, self.value_type),
            None => self.value_type.default_value(),
        }
    }
}
