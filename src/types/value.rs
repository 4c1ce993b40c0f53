use std::cmp::Ordering;
use std::fmt;

use super::error::EvalError;

/// Declared type of a rule variable or of an expression result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum RuleValueType {
    #[default]
    Text,
    Numeric,
    Boolean,
    Date,
}

impl RuleValueType {
    /// Value used in place of a declared variable that has no data.
    #[must_use]
    pub fn default_value(self) -> Value {
        match self {
            RuleValueType::Numeric => Value::Number(0.0),
            RuleValueType::Boolean => Value::Bool(false),
            RuleValueType::Text | RuleValueType::Date => Value::Text(String::new()),
        }
    }

    /// Placeholder text used when type-checking without real data.
    pub(crate) fn placeholder(self) -> &'static str {
        match self {
            RuleValueType::Numeric => "1",
            RuleValueType::Boolean => "true",
            RuleValueType::Text => "",
            RuleValueType::Date => "2000-01-01",
        }
    }
}

impl fmt::Display for RuleValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleValueType::Text => write!(f, "text"),
            RuleValueType::Numeric => write!(f, "numeric"),
            RuleValueType::Boolean => write!(f, "boolean"),
            RuleValueType::Date => write!(f, "date"),
        }
    }
}

/// A value produced while evaluating an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A 64-bit floating-point number.
    Number(f64),
    /// A boolean value.
    Bool(bool),
    /// A UTF-8 string.
    Text(String),
}

impl Value {
    /// Resolve a stored variable value according to its declared type.
    ///
    /// Numeric text becomes a number and `true`/`false` become booleans;
    /// anything that does not fit the declared type stays text.
    #[must_use]
    pub fn typed(raw: &str, value_type: RuleValueType) -> Value {
        match value_type {
            RuleValueType::Numeric => match parse_number(raw) {
                Some(n) => Value::Number(n),
                None => Value::Text(raw.to_owned()),
            },
            RuleValueType::Boolean => match raw {
                "true" => Value::Bool(true),
                "false" => Value::Bool(false),
                _ => Value::Text(raw.to_owned()),
            },
            RuleValueType::Text | RuleValueType::Date => Value::Text(raw.to_owned()),
        }
    }

    /// The type this value would be declared with.
    #[must_use]
    pub fn value_type(&self) -> RuleValueType {
        match self {
            Value::Number(_) => RuleValueType::Numeric,
            Value::Bool(_) => RuleValueType::Boolean,
            Value::Text(_) => RuleValueType::Text,
        }
    }

    /// Coerce to a number. Text must parse as a number; booleans never coerce.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::TypeMismatch`] when the value is not numeric.
    pub fn as_number(&self) -> Result<f64, EvalError> {
        match self {
            Value::Number(n) => Ok(*n),
            Value::Text(s) => parse_number(s).ok_or_else(|| self.mismatch(RuleValueType::Numeric)),
            Value::Bool(_) => Err(self.mismatch(RuleValueType::Numeric)),
        }
    }

    /// Coerce to a boolean. Only `true`/`false` text coerces.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::TypeMismatch`] when the value is not boolean.
    pub fn as_bool(&self) -> Result<bool, EvalError> {
        match self {
            Value::Bool(b) => Ok(*b),
            Value::Text(s) if s == "true" => Ok(true),
            Value::Text(s) if s == "false" => Ok(false),
            _ => Err(self.mismatch(RuleValueType::Boolean)),
        }
    }

    /// Parse as a number for functions that only accept numeric arguments.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::InvalidNumber`] carrying the rendered value.
    pub fn to_number_arg(&self) -> Result<f64, EvalError> {
        match self {
            Value::Number(n) => Ok(*n),
            other => {
                let rendered = other.to_string();
                parse_number(&rendered).ok_or(EvalError::InvalidNumber { value: rendered })
            }
        }
    }

    /// Whether this value is numeric, or text that parses as a number.
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        match self {
            Value::Number(_) => true,
            Value::Text(s) => parse_number(s).is_some(),
            Value::Bool(_) => false,
        }
    }

    /// Equality used by `==` and `!=`.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::TypeMismatch`] when a boolean is compared with a
    /// value that does not coerce to a boolean.
    pub fn loose_eq(&self, other: &Value) -> Result<bool, EvalError> {
        match (self, other) {
            (Value::Bool(_), _) | (_, Value::Bool(_)) => Ok(self.as_bool()? == other.as_bool()?),
            _ if self.is_numeric() && other.is_numeric() => {
                Ok(self.as_number()? == other.as_number()?)
            }
            _ => Ok(self.to_string() == other.to_string()),
        }
    }

    /// Ordering used by `<`, `<=`, `>`, `>=`: numeric when both sides are
    /// numeric, lexical otherwise. Returns `None` for NaN comparisons.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::TypeMismatch`] when either side is a boolean.
    pub fn loose_cmp(&self, other: &Value) -> Result<Option<Ordering>, EvalError> {
        if let Value::Bool(_) = self {
            return Err(self.mismatch(RuleValueType::Numeric));
        }
        if let Value::Bool(_) = other {
            return Err(other.mismatch(RuleValueType::Numeric));
        }
        if self.is_numeric() && other.is_numeric() {
            return Ok(self.as_number()?.partial_cmp(&other.as_number()?));
        }
        Ok(Some(self.to_string().cmp(&other.to_string())))
    }

    fn mismatch(&self, expected: RuleValueType) -> EvalError {
        EvalError::TypeMismatch {
            expected,
            found: self.to_string(),
        }
    }
}

pub(crate) fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok()
}

/// Render a number the way rule effects expect: whole numbers drop the
/// fractional part (`4.0` renders as `4`).
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub(crate) fn render_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        return (n as i64).to_string();
    }
    n.to_string()
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Number(v)
    }
}

impl From<i64> for Value {
    #[allow(clippy::cast_precision_loss)]
    fn from(v: i64) -> Self {
        Value::Number(v as f64)
    }
}

impl From<usize> for Value {
    #[allow(clippy::cast_precision_loss)]
    fn from(v: usize) -> Self {
        Value::Number(v as f64)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(v) => write!(f, "{}", render_number(*v)),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Text(v) => write!(f, "{v}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_numbers_render_without_fraction() {
        assert_eq!(Value::Number(4.0).to_string(), "4");
        assert_eq!(Value::Number(-12.0).to_string(), "-12");
        assert_eq!(Value::Number(-0.0).to_string(), "0");
    }

    #[test]
    fn fractional_numbers_render_naturally() {
        assert_eq!(Value::Number(4.5).to_string(), "4.5");
        assert_eq!(Value::Number(f64::NAN).to_string(), "NaN");
    }

    #[test]
    fn display() {
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::Text("hello".into()).to_string(), "hello");
    }

    #[test]
    fn typed_numeric() {
        assert_eq!(Value::typed("12", RuleValueType::Numeric), Value::Number(12.0));
        assert_eq!(
            Value::typed("twelve", RuleValueType::Numeric),
            Value::Text("twelve".into())
        );
    }

    #[test]
    fn typed_boolean() {
        assert_eq!(Value::typed("true", RuleValueType::Boolean), Value::Bool(true));
        assert_eq!(Value::typed("yes", RuleValueType::Boolean), Value::Text("yes".into()));
    }

    #[test]
    fn typed_text_keeps_numeric_text() {
        assert_eq!(Value::typed("5", RuleValueType::Text), Value::Text("5".into()));
    }

    #[test]
    fn numeric_text_coerces() {
        assert_eq!(Value::from(" 2.5 ").as_number().unwrap(), 2.5);
        assert!(Value::from("abc").as_number().is_err());
        assert!(Value::Bool(true).as_number().is_err());
    }

    #[test]
    fn bool_text_coerces() {
        assert!(Value::from("true").as_bool().unwrap());
        assert!(!Value::from("false").as_bool().unwrap());
        assert!(Value::from("TRUE").as_bool().is_err());
        assert!(Value::Number(1.0).as_bool().is_err());
    }

    #[test]
    fn loose_eq_numeric_text() {
        assert!(Value::from("5").loose_eq(&Value::Number(5.0)).unwrap());
        assert!(Value::from("5.0").loose_eq(&Value::from("5")).unwrap());
        assert!(!Value::from("a").loose_eq(&Value::from("b")).unwrap());
    }

    #[test]
    fn loose_eq_bool_mismatch() {
        assert!(Value::Bool(true).loose_eq(&Value::from("true")).unwrap());
        assert!(Value::Bool(true).loose_eq(&Value::Number(1.0)).is_err());
    }

    #[test]
    fn loose_cmp_numeric_and_lexical() {
        assert_eq!(
            Value::from("10").loose_cmp(&Value::Number(9.0)).unwrap(),
            Some(Ordering::Greater)
        );
        assert_eq!(
            Value::from("10").loose_cmp(&Value::from("9a")).unwrap(),
            Some(Ordering::Less)
        );
        assert!(Value::Bool(true).loose_cmp(&Value::Number(1.0)).is_err());
    }

    #[test]
    fn number_argument_rejects_text() {
        assert_eq!(Value::from("-3").to_number_arg().unwrap(), -3.0);
        assert!(matches!(
            Value::from("abc").to_number_arg(),
            Err(EvalError::InvalidNumber { value }) if value == "abc"
        ));
    }
}
