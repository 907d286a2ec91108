use super::{SchemaMeta, meta_builders};
use crate::error::SchemaError;
use crate::value::Value;

/// Number schema.
///
/// Bounds and allowed values are checked against the parsed number before
/// integer coercion floors it.
#[derive(Debug, Clone, Default)]
pub struct NumberSchema {
    pub(super) meta: SchemaMeta,
    min: Option<f64>,
    max: Option<f64>,
    allowed: Vec<f64>,
    to_integer: bool,
}

meta_builders!(NumberSchema);

impl NumberSchema {
    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn one_of(mut self, values: impl IntoIterator<Item = f64>) -> Self {
        self.allowed = values.into_iter().collect();
        self
    }

    /// Floors the accepted value.
    pub fn to_integer(mut self) -> Self {
        self.to_integer = true;
        self
    }

    pub fn allowed(&self) -> &[f64] {
        &self.allowed
    }

    pub(crate) fn check(&self, raw: &str) -> Result<Value, SchemaError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(SchemaError::EmptyNumber);
        }

        let number: f64 = trimmed
            .parse()
            .ok()
            .filter(|n: &f64| n.is_finite())
            .ok_or_else(|| SchemaError::NotANumber(raw.to_string()))?;

        if let Some(min) = self.min.filter(|&min| number < min) {
            return Err(SchemaError::BelowMinimum { min, value: number });
        }
        if let Some(max) = self.max.filter(|&max| number > max) {
            return Err(SchemaError::AboveMaximum { max, value: number });
        }

        if !self.allowed.is_empty() && !self.allowed.contains(&number) {
            let allowed: Vec<String> = self.allowed.iter().map(ToString::to_string).collect();
            return Err(SchemaError::NotInEnum {
                value: number.to_string(),
                allowed: allowed.join(", "),
            });
        }

        Ok(Value::Number(if self.to_integer {
            number.floor()
        } else {
            number
        }))
    }
}
