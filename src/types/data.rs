use std::fmt;

use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum EventStatus {
    #[default]
    Active,
    Completed,
    Visited,
    #[cfg_attr(feature = "serde", serde(rename = "SCHEDULE"))]
    Scheduled,
    Overdue,
    Skipped,
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EventStatus::Active => "ACTIVE",
            EventStatus::Completed => "COMPLETED",
            EventStatus::Visited => "VISITED",
            EventStatus::Scheduled => "SCHEDULE",
            EventStatus::Overdue => "OVERDUE",
            EventStatus::Skipped => "SKIPPED",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum EnrollmentStatus {
    #[default]
    Active,
    Completed,
    Cancelled,
}

impl fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EnrollmentStatus::Active => "ACTIVE",
            EnrollmentStatus::Completed => "COMPLETED",
            EnrollmentStatus::Cancelled => "CANCELLED",
        };
        write!(f, "{s}")
    }
}

/// One data element value captured in an event.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RuleDataValue {
    pub data_element: String,
    pub value: String,
}

/// Snapshot of one event, as provided by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RuleEvent {
    pub event: String,
    pub program_stage: String,
    pub status: EventStatus,
    pub event_date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub organisation_unit: String,
    pub data_values: Vec<RuleDataValue>,
}

impl RuleEvent {
    pub fn new(
        event: impl Into<String>,
        program_stage: impl Into<String>,
        event_date: NaiveDate,
    ) -> Self {
        Self {
            event: event.into(),
            program_stage: program_stage.into(),
            status: EventStatus::Active,
            event_date,
            due_date: None,
            organisation_unit: String::new(),
            data_values: Vec::new(),
        }
    }

    #[must_use]
    pub fn status(mut self, status: EventStatus) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    #[must_use]
    pub fn organisation_unit(mut self, organisation_unit: impl Into<String>) -> Self {
        self.organisation_unit = organisation_unit.into();
        self
    }

    #[must_use]
    pub fn data_value(mut self, data_element: impl Into<String>, value: impl Into<String>) -> Self {
        self.data_values.push(RuleDataValue {
            data_element: data_element.into(),
            value: value.into(),
        });
        self
    }

    /// Value captured for `data_element`, if any.
    #[must_use]
    pub fn value_of(&self, data_element: &str) -> Option<&str> {
        self.data_values
            .iter()
            .find(|dv| dv.data_element == data_element)
            .map(|dv| dv.value.as_str())
    }
}

/// One tracked entity attribute value on an enrollment.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RuleAttributeValue {
    pub attribute: String,
    pub value: String,
}

/// Snapshot of one enrollment, as provided by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RuleEnrollment {
    pub enrollment: String,
    pub incident_date: NaiveDate,
    pub enrollment_date: NaiveDate,
    pub status: EnrollmentStatus,
    pub organisation_unit: String,
    pub attribute_values: Vec<RuleAttributeValue>,
}

impl RuleEnrollment {
    pub fn new(enrollment: impl Into<String>, enrollment_date: NaiveDate) -> Self {
        Self {
            enrollment: enrollment.into(),
            incident_date: enrollment_date,
            enrollment_date,
            status: EnrollmentStatus::Active,
            organisation_unit: String::new(),
            attribute_values: Vec::new(),
        }
    }

    #[must_use]
    pub fn incident_date(mut self, incident_date: NaiveDate) -> Self {
        self.incident_date = incident_date;
        self
    }

    #[must_use]
    pub fn status(mut self, status: EnrollmentStatus) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn organisation_unit(mut self, organisation_unit: impl Into<String>) -> Self {
        self.organisation_unit = organisation_unit.into();
        self
    }

    #[must_use]
    pub fn attribute(mut self, attribute: impl Into<String>, value: impl Into<String>) -> Self {
        self.attribute_values.push(RuleAttributeValue {
            attribute: attribute.into(),
            value: value.into(),
        });
        self
    }

    /// Value recorded for `attribute`, if any.
    #[must_use]
    pub fn value_of(&self, attribute: &str) -> Option<&str> {
        self.attribute_values
            .iter()
            .find(|av| av.attribute == attribute)
            .map(|av| av.value.as_str())
    }
}
