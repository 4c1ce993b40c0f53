use super::value::RuleValueType;

/// Where a rule variable takes its value from.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "source", rename_all = "snake_case"))]
pub enum VariableSource {
    /// The data element in the event being evaluated.
    CurrentEvent { data_element: String },
    /// The data element in the newest event that has it.
    NewestEvent { data_element: String },
    /// The data element in the newest event of one program stage.
    NewestEventInStage {
        data_element: String,
        program_stage: String,
    },
    /// The data element in the newest event dated before the current one.
    PreviousEvent { data_element: String },
    /// A tracked entity attribute on the enrollment.
    Attribute { attribute: String },
    /// Produced by assign actions during evaluation.
    Calculated,
}

/// A named, typed slot that expressions can reference.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RuleVariable {
    pub name: String,
    pub value_type: RuleValueType,
    pub source: VariableSource,
}

impl RuleVariable {
    pub fn current_event(
        name: impl Into<String>,
        data_element: impl Into<String>,
        value_type: RuleValueType,
    ) -> Self {
        Self {
            name: name.into(),
            value_type,
            source: VariableSource::CurrentEvent {
                data_element: data_element.into(),
            },
        }
    }

    pub fn newest_event(
        name: impl Into<String>,
        data_element: impl Into<String>,
        value_type: RuleValueType,
    ) -> Self {
        Self {
            name: name.into(),
            value_type,
            source: VariableSource::NewestEvent {
                data_element: data_element.into(),
            },
        }
    }

    pub fn newest_event_in_stage(
        name: impl Into<String>,
        data_element: impl Into<String>,
        program_stage: impl Into<String>,
        value_type: RuleValueType,
    ) -> Self {
        Self {
            name: name.into(),
            value_type,
            source: VariableSource::NewestEventInStage {
                data_element: data_element.into(),
                program_stage: program_stage.into(),
            },
        }
    }

    pub fn previous_event(
        name: impl Into<String>,
        data_element: impl Into<String>,
        value_type: RuleValueType,
    ) -> Self {
        Self {
            name: name.into(),
            value_type,
            source: VariableSource::PreviousEvent {
                data_element: data_element.into(),
            },
        }
    }

    pub fn attribute(
        name: impl Into<String>,
        attribute: impl Into<String>,
        value_type: RuleValueType,
    ) -> Self {
        Self {
            name: name.into(),
            value_type,
            source: VariableSource::Attribute {
                attribute: attribute.into(),
            },
        }
    }

    pub fn calculated(name: impl Into<String>, value_type: RuleValueType) -> Self {
        Self {
            name: name.into(),
            value_type,
            source: VariableSource::Calculated,
        }
    }
}
