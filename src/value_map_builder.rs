use std::collections::HashMap;

use chrono::NaiveDate;

use crate::types::{
    RuleEnrollment, RuleEvent, RuleValueType, RuleVariable, RuleVariableValue, TriggerEnvironment,
    ValueMap, VariableSource, ENVIRONMENT,
};

pub(crate) const CURRENT_DATE: &str = "current_date";
pub(crate) const EVENT_COUNT: &str = "event_count";
pub(crate) const EVENT_ID: &str = "event_id";
pub(crate) const EVENT_DATE: &str = "event_date";
pub(crate) const EVENT_STATUS: &str = "event_status";
pub(crate) const DUE_DATE: &str = "due_date";
pub(crate) const PROGRAM_STAGE_ID: &str = "program_stage_id";
pub(crate) const ENROLLMENT_ID: &str = "enrollment_id";
pub(crate) const ENROLLMENT_DATE: &str = "enrollment_date";
pub(crate) const INCIDENT_DATE: &str = "incident_date";
pub(crate) const ENROLLMENT_STATUS: &str = "enrollment_status";
pub(crate) const ORG_UNIT: &str = "org_unit";

/// Every environment variable the builder can seed, with its type.
pub(crate) const ENVIRONMENT_VARIABLES: [(&str, RuleValueType); 13] = [
    (CURRENT_DATE, RuleValueType::Date),
    (ENVIRONMENT, RuleValueType::Text),
    (EVENT_COUNT, RuleValueType::Numeric),
    (EVENT_ID, RuleValueType::Text),
    (EVENT_DATE, RuleValueType::Date),
    (EVENT_STATUS, RuleValueType::Text),
    (DUE_DATE, RuleValueType::Date),
    (PROGRAM_STAGE_ID, RuleValueType::Text),
    (ENROLLMENT_ID, RuleValueType::Text),
    (ENROLLMENT_DATE, RuleValueType::Date),
    (INCIDENT_DATE, RuleValueType::Date),
    (ENROLLMENT_STATUS, RuleValueType::Text),
    (ORG_UNIT, RuleValueType::Text),
];

/// Seeds the initial [`ValueMap`] for one evaluation target.
///
/// Events are kept newest first; candidates therefore list the newest
/// occurrence first.
pub(crate) struct ValueMapBuilder<'a> {
    variables: &'a [RuleVariable],
    constants: &'a HashMap<String, String>,
    events: Vec<&'a RuleEvent>,
    trigger_environment: Option<TriggerEnvironment>,
    today: NaiveDate,
}

impl<'a> ValueMapBuilder<'a> {
    pub(crate) fn new(
        variables: &'a [RuleVariable],
        constants: &'a HashMap<String, String>,
        events: &'a [RuleEvent],
        trigger_environment: Option<TriggerEnvironment>,
    ) -> Self {
        Self {
            variables,
            constants,
            events: events.iter().collect(),
            trigger_environment,
            today: chrono::Local::now().date_naive(),
        }
    }

    #[cfg(test)]
    fn today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Value map for evaluating `event`. The event joins the sibling events,
    /// replacing any sibling with the same identifier.
    pub(crate) fn for_event(
        mut self,
        event: &'a RuleEvent,
        enrollment: Option<&'a RuleEnrollment>,
    ) -> ValueMap {
        self.events.retain(|e| e.event != event.event);
        self.events.push(event);
        self.build(Some(event), enrollment)
    }

    pub(crate) fn for_enrollment(self, enrollment: &'a RuleEnrollment) -> ValueMap {
        self.build(None, Some(enrollment))
    }

    fn build(
        mut self,
        current: Option<&'a RuleEvent>,
        enrollment: Option<&'a RuleEnrollment>,
    ) -> ValueMap {
        // Stable: events sharing a date keep their input order.
        self.events.sort_by(|a, b| b.event_date.cmp(&a.event_date));

        let mut values = ValueMap::new();
        self.seed_environment(&mut values, current, enrollment);
        for (id, value) in self.constants {
            let constant = RuleVariableValue::single(value.clone(), RuleValueType::Numeric);
            values.insert(id.clone(), constant);
        }
        for variable in self.variables {
            values.insert(variable.name.clone(), self.resolve(variable, current, enrollment));
        }
        values
    }

    fn seed_environment(
        &self,
        values: &mut ValueMap,
        current: Option<&RuleEvent>,
        enrollment: Option<&RuleEnrollment>,
    ) {
        let mut put = |name: &str, value: String, value_type: RuleValueType| {
            values.insert(name, RuleVariableValue::single(value, value_type));
        };

        put(CURRENT_DATE, self.today.to_string(), RuleValueType::Date);
        if let Some(environment) = self.trigger_environment {
            put(ENVIRONMENT, environment.client_name().to_owned(), RuleValueType::Text);
        }
        put(EVENT_COUNT, self.events.len().to_string(), RuleValueType::Numeric);

        if let Some(event) = current {
            put(EVENT_ID, event.event.clone(), RuleValueType::Text);
            put(EVENT_DATE, event.event_date.to_string(), RuleValueType::Date);
            put(EVENT_STATUS, event.status.to_string(), RuleValueType::Text);
            put(PROGRAM_STAGE_ID, event.program_stage.clone(), RuleValueType::Text);
            if let Some(due_date) = event.due_date {
                put(DUE_DATE, due_date.to_string(), RuleValueType::Date);
            }
            if !event.organisation_unit.is_empty() {
                put(ORG_UNIT, event.organisation_unit.clone(), RuleValueType::Text);
            }
        }

        if let Some(enrollment) = enrollment {
            put(ENROLLMENT_ID, enrollment.enrollment.clone(), RuleValueType::Text);
            put(ENROLLMENT_DATE, enrollment.enrollment_date.to_string(), RuleValueType::Date);
            put(INCIDENT_DATE, enrollment.incident_date.to_string(), RuleValueType::Date);
            put(ENROLLMENT_STATUS, enrollment.status.to_string(), RuleValueType::Text);
            if current.is_none() && !enrollment.organisation_unit.is_empty() {
                put(ORG_UNIT, enrollment.organisation_unit.clone(), RuleValueType::Text);
            }
        }
    }

    fn resolve(
        &self,
        variable: &RuleVariable,
        current: Option<&RuleEvent>,
        enrollment: Option<&RuleEnrollment>,
    ) -> RuleVariableValue {
        let value_type = variable.value_type;
        match &variable.source {
            VariableSource::CurrentEvent { data_element } => {
                let candidates = self.candidates(data_element, |_| true);
                let value = match current.and_then(|e| e.value_of(data_element)) {
                    Some(value) => RuleVariableValue::new(value, value_type),
                    None => RuleVariableValue::empty(value_type),
                };
                value.with_candidates(candidates)
            }
            VariableSource::NewestEvent { data_element } => {
                self.newest(data_element, value_type, |_| true)
            }
            VariableSource::NewestEventInStage {
                data_element,
                program_stage,
            } => self.newest(data_element, value_type, |e| {
                e.program_stage == *program_stage
            }),
            VariableSource::PreviousEvent { data_element } => match current {
                Some(current) => self.newest(data_element, value_type, |e| {
                    e.event != current.event && e.event_date < current.event_date
                }),
                None => RuleVariableValue::empty(value_type),
            },
            VariableSource::Attribute { attribute } => {
                match enrollment.and_then(|e| e.value_of(attribute)) {
                    Some(value) => RuleVariableValue::single(value, value_type),
                    None => RuleVariableValue::empty(value_type),
                }
            }
            VariableSource::Calculated => RuleVariableValue::empty(value_type),
        }
    }

    fn candidates(&self, data_element: &str, filter: impl Fn(&RuleEvent) -> bool) -> Vec<String> {
        self.events
            .iter()
            .filter(|e| filter(**e))
            .filter_map(|e| e.value_of(data_element))
            .map(str::to_owned)
            .collect()
    }

    fn newest(
        &self,
        data_element: &str,
        value_type: RuleValueType,
        filter: impl Fn(&RuleEvent) -> bool,
    ) -> RuleVariableValue {
        let candidates = self.candidates(data_element, filter);
        match candidates.first().cloned() {
            Some(value) => RuleVariableValue::new(value, value_type).with_candidates(candidates),
            None => RuleVariableValue::empty(value_type),
        }
    }
}
