use std::sync::Arc;

use tracing::debug;

use super::context::RuleEngineContext;
use super::data::{RuleEnrollment, RuleEvent};
use super::effect::RuleEffect;
use super::environment::TriggerEnvironment;
use super::rule::Rule;
use super::value_map::ValueMap;
use crate::error::EngineError;
use crate::value_map_builder::ValueMapBuilder;

/// Builder for a [`RuleEngine`].
#[derive(Debug)]
pub struct RuleEngineBuilder {
    context: Arc<RuleEngineContext>,
    events: Vec<RuleEvent>,
    enrollment: Option<RuleEnrollment>,
    trigger_environment: Option<TriggerEnvironment>,
}

impl RuleEngineBuilder {
    /// Sibling events visible to every evaluation.
    #[must_use]
    pub fn events(mut self, events: impl IntoIterator<Item = RuleEvent>) -> Self {
        self.events.extend(events);
        self
    }

    /// Enrollment the events belong to, used when evaluating an event.
    #[must_use]
    pub fn enrollment(mut self, enrollment: RuleEnrollment) -> Self {
        self.enrollment = Some(enrollment);
        self
    }

    #[must_use]
    pub fn trigger_environment(mut self, environment: TriggerEnvironment) -> Self {
        self.trigger_environment = Some(environment);
        self
    }

    #[must_use]
    pub fn build(self) -> RuleEngine {
        RuleEngine {
            context: self.context,
            events: self.events,
            enrollment: self.enrollment,
            trigger_environment: self.trigger_environment,
        }
    }
}

/// Evaluates the rules of a shared [`RuleEngineContext`] against events
/// and enrollments.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use chrono::NaiveDate;
/// use program_rules::{RuleAction, RuleEngine, RuleEngineContext, RuleEvent};
///
/// let context = Arc::new(
///     RuleEngineContext::builder()
///         .rule("greet", |r| {
///             r.priority(1)
///                 .when("true")
///                 .action(RuleAction::display_text("", "'hello'"))
///         })
///         .build(),
/// );
/// let engine = RuleEngine::builder(context).build();
/// let event = RuleEvent::new("ev1", "stage", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
///
/// let effects = engine.evaluate_event(&event).unwrap().run();
/// assert_eq!(effects.len(), 1);
/// assert_eq!(effects[0].data(), "hello");
/// ```
#[derive(Debug, Clone)]
pub struct RuleEngine {
    context: Arc<RuleEngineContext>,
    events: Vec<RuleEvent>,
    enrollment: Option<RuleEnrollment>,
    trigger_environment: Option<TriggerEnvironment>,
}

impl RuleEngine {
    #[must_use]
    pub fn builder(context: Arc<RuleEngineContext>) -> RuleEngineBuilder {
        RuleEngineBuilder {
            context,
            events: Vec::new(),
            enrollment: None,
            trigger_environment: None,
        }
    }

    #[must_use]
    pub fn context(&self) -> &RuleEngineContext {
        &self.context
    }

    #[must_use]
    pub fn events(&self) -> &[RuleEvent] {
        &self.events
    }

    #[must_use]
    pub fn enrollment(&self) -> Option<&RuleEnrollment> {
        self.enrollment.as_ref()
    }

    #[must_use]
    pub fn trigger_environment(&self) -> Option<TriggerEnvironment> {
        self.trigger_environment
    }

    /// Prepare an evaluation of every context rule against `event`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::MissingTarget`] when the event has no identifier.
    pub fn evaluate_event(&self, event: &RuleEvent) -> Result<RuleEngineExecution, EngineError> {
        self.prepare_event(event, None)
    }

    /// Like [`evaluate_event`](Self::evaluate_event), restricted to `rules`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::MissingTarget`] when the event has no identifier.
    pub fn evaluate_event_with(
        &self,
        event: &RuleEvent,
        rules: &[Rule],
    ) -> Result<RuleEngineExecution, EngineError> {
        self.prepare_event(event, Some(rules))
    }

    /// Prepare an evaluation of every context rule against `enrollment`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::MissingTarget`] when the enrollment has no
    /// identifier.
    pub fn evaluate_enrollment(
        &self,
        enrollment: &RuleEnrollment,
    ) -> Result<RuleEngineExecution, EngineError> {
        self.prepare_enrollment(enrollment, None)
    }

    /// Like [`evaluate_enrollment`](Self::evaluate_enrollment), restricted
    /// to `rules`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::MissingTarget`] when the enrollment has no
    /// identifier.
    pub fn evaluate_enrollment_with(
        &self,
        enrollment: &RuleEnrollment,
        rules: &[Rule],
    ) -> Result<RuleEngineExecution, EngineError> {
        self.prepare_enrollment(enrollment, Some(rules))
    }

    fn prepare_event(
        &self,
        event: &RuleEvent,
        rules: Option<&[Rule]>,
    ) -> Result<RuleEngineExecution, EngineError> {
        if event.event.trim().is_empty() {
            return Err(EngineError::MissingTarget { target: "event" });
        }
        debug!(event = %event.event, "preparing event evaluation");
        let values = self
            .value_map_builder()
            .for_event(event, self.enrollment.as_ref());
        Ok(self.execution(values, rules))
    }

    fn prepare_enrollment(
        &self,
        enrollment: &RuleEnrollment,
        rules: Option<&[Rule]>,
    ) -> Result<RuleEngineExecution, EngineError> {
        if enrollment.enrollment.trim().is_empty() {
            return Err(EngineError::MissingTarget {
                target: "enrollment",
            });
        }
        debug!(enrollment = %enrollment.enrollment, "preparing enrollment evaluation");
        let values = self.value_map_builder().for_enrollment(enrollment);
        Ok(self.execution(values, rules))
    }

    fn value_map_builder(&self) -> ValueMapBuilder<'_> {
        ValueMapBuilder::new(
            self.context.variables(),
            self.context.constants(),
            &self.events,
            self.trigger_environment,
        )
    }

    fn execution(&self, values: ValueMap, rules: Option<&[Rule]>) -> RuleEngineExecution {
        RuleEngineExecution {
            context: Arc::clone(&self.context),
            rules: rules.map(<[Rule]>::to_vec),
            values,
        }
    }
}

/// A prepared evaluation. Owns everything it needs, so it can be moved to
/// another thread and run there.
#[derive(Debug)]
#[must_use = "an execution does nothing until `run` is called"]
pub struct RuleEngineExecution {
    context: Arc<RuleEngineContext>,
    rules: Option<Vec<Rule>>,
    values: ValueMap,
}

impl RuleEngineExecution {
    /// The value map the evaluation starts from.
    #[must_use]
    pub fn values(&self) -> &ValueMap {
        &self.values
    }

    /// Evaluate the rules and return the effects in evaluation order.
    #[must_use]
    pub fn run(self) -> Vec<RuleEffect> {
        let rules = self.rules.as_deref().unwrap_or(self.context.rules());
        crate::execute::execute(
            rules,
            self.values,
            self.context.functions(),
            self.context.supplementary(),
        )
    }
}
