//! Parameter constraint checking.
//!
//! Every configuration value is declared with a [`Constraint`]; a value that
//! fails its constraint produces an error naming the parameter and the
//! expected kind.

use std::fmt;

use crate::{StormError, StormResult};

/// Declared kind of a configuration value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// Finite number strictly greater than zero.
    Positive,
    /// Finite number greater than or equal to zero.
    NonNegative,
    /// Integer strictly greater than zero.
    PositiveInteger,
    /// Integer greater than or equal to zero.
    NonNegativeInteger,
    /// `true` / `false`.
    Boolean,
    /// Comma-separated list of finite numbers.
    Array,
}

impl Constraint {
    /// Human-readable description used in error messages.
    pub fn describe(&self) -> &'static str {
        match self {
            Constraint::Positive => "a positive number",
            Constraint::NonNegative => "a non-negative number",
            Constraint::PositiveInteger => "a positive integer",
            Constraint::NonNegativeInteger => "a non-negative integer",
            Constraint::Boolean => "a boolean",
            Constraint::Array => "an array of numbers",
        }
    }

    /// Parse a raw token and check it against this constraint.
    pub fn parse(&self, param: &str, raw: &str) -> StormResult<ParamValue> {
        let raw = raw.trim();
        let value = match self {
            Constraint::Boolean => ParamValue::Bool(parse_bool(raw).ok_or_else(|| {
                StormError::invalid(param, self.describe(), format!("'{}'", raw))
            })?),
            Constraint::Array => {
                let trimmed = raw.trim_start_matches('[').trim_end_matches(']');
                let values = if trimmed.trim().is_empty() {
                    Vec::new()
                } else {
                    trimmed
                        .split(',')
                        .map(|s| s.trim().parse::<f64>())
                        .collect::<Result<Vec<_>, _>>()
                        .map_err(|_| {
                            StormError::invalid(param, self.describe(), format!("'{}'", raw))
                        })?
                };
                ParamValue::Array(values)
            }
            _ => ParamValue::Number(raw.parse::<f64>().map_err(|_| {
                StormError::invalid(param, self.describe(), format!("'{}'", raw))
            })?),
        };
        self.check(param, &value)?;
        Ok(value)
    }

    /// Check an already-typed value against this constraint.
    pub fn check(&self, param: &str, value: &ParamValue) -> StormResult<()> {
        let ok = match (self, value) {
            (Constraint::Positive, ParamValue::Number(v)) => v.is_finite() && *v > 0.0,
            (Constraint::NonNegative, ParamValue::Number(v)) => v.is_finite() && *v >= 0.0,
            (Constraint::PositiveInteger, ParamValue::Number(v)) => {
                v.is_finite() && *v >= 1.0 && v.fract() == 0.0
            }
            (Constraint::NonNegativeInteger, ParamValue::Number(v)) => {
                v.is_finite() && *v >= 0.0 && v.fract() == 0.0
            }
            (Constraint::Boolean, ParamValue::Bool(_)) => true,
            (Constraint::Array, ParamValue::Array(values)) => values.iter().all(|v| v.is_finite()),
            _ => false,
        };

        if ok {
            Ok(())
        } else {
            Err(StormError::invalid(param, self.describe(), value))
        }
    }
}

/// A typed configuration value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Number(f64),
    Bool(bool),
    Array(Vec<f64>),
}

impl ParamValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn into_array(self) -> Option<Vec<f64>> {
        match self {
            ParamValue::Array(values) => Some(values),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Number(v) => write!(f, "{}", v),
            ParamValue::Bool(b) => write!(f, "{}", b),
            ParamValue::Array(values) => write!(f, "{:?}", values),
        }
    }
}

/// Shorthand: check a number against a constraint.
pub fn check_number(param: &str, constraint: Constraint, value: f64) -> StormResult<()> {
    constraint.check(param, &ParamValue::Number(value))
}

/// Shorthand: check an array against the array constraint, then each element
/// against `element`.
pub fn check_array(param: &str, element: Constraint, values: &[f64]) -> StormResult<()> {
    Constraint::Array.check(param, &ParamValue::Array(values.to_vec()))?;
    for &v in values {
        if element.check(param, &ParamValue::Number(v)).is_err() {
            return Err(StormError::invalid(
                param,
                format!("an array of {}s", element.describe().trim_start_matches("a ")),
                format!("{:?}", values),
            ));
        }
    }
    Ok(())
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
