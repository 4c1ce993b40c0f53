mod action;
mod context;
mod data;
mod effect;
mod engine;
mod environment;
mod error;
mod expr;
mod rule;
mod supplementary;
mod value;
mod value_map;
mod variable;
mod variable_value;

pub use action::{DisplayLocation, RuleAction};
pub use context::{RuleEngineContext, RuleEngineContextBuilder};
pub use data::{
    EnrollmentStatus, EventStatus, RuleAttributeValue, RuleDataValue, RuleEnrollment, RuleEvent,
};
pub use effect::RuleEffect;
pub use engine::{RuleEngine, RuleEngineBuilder, RuleEngineExecution};
pub use environment::TriggerEnvironment;
pub use error::{ActionError, EvalError};
pub use expr::{unwrap_variable_name, BinaryOp, ExprNode, UnaryOp, VariableKind};
pub use rule::{Rule, RuleBuilder};
pub use supplementary::SupplementaryData;
pub(crate) use value::parse_number;
pub use value::{RuleValueType, Value};
pub use value_map::{ValueMap, ENVIRONMENT};
pub use variable::{RuleVariable, VariableSource};
pub use variable_value::RuleVariableValue;
