//! Program rule engine.
//!
//! Rules pair a condition expression with actions. The engine seeds a value
//! map from an event or enrollment, evaluates rules in priority order, and
//! returns the [`RuleEffect`]s of the rules that fired. Assign actions without
//! a target field write calculated variables that later rules can read.
//!
//! Expression failures never abort a run: a failing expression evaluates to
//! an empty string and is reported through [`tracing`].

mod error;
mod execute;
pub mod expression;
pub mod functions;
pub mod parse;
mod types;
mod value_map_builder;

pub use error::EngineError;
pub use expression::{ExpressionError, ExpressionVisitor};
pub use functions::{FunctionRegistry, RuleFunction};
pub use parse::ParseError;
pub use types::{
    unwrap_variable_name, ActionError, BinaryOp, DisplayLocation, EnrollmentStatus, EvalError,
    EventStatus, ExprNode, Rule, RuleAction, RuleAttributeValue, RuleBuilder, RuleDataValue,
    RuleEffect, RuleEngine, RuleEngineBuilder, RuleEngineContext, RuleEngineContextBuilder,
    RuleEngineExecution, RuleEnrollment, RuleEvent, RuleValueType, RuleVariable,
    RuleVariableValue, SupplementaryData, TriggerEnvironment, UnaryOp, Value, ValueMap,
    VariableKind, VariableSource, ENVIRONMENT,
};
