use super::{SchemaMeta, meta_builders};
use crate::error::SchemaError;
use crate::value::Value;

/// Boolean schema: `true`/`yes` and `false`/`no`, in any casing.
#[derive(Debug, Clone, Default)]
pub struct BooleanSchema {
    pub(super) meta: SchemaMeta,
}

meta_builders!(BooleanSchema);

impl BooleanSchema {
    pub(crate) fn check(&self, raw: &str) -> Result<Value, SchemaError> {
        match raw.trim().to_lowercase().as_str() {
            "true" | "yes" => Ok(Value::Boolean(true)),
            "false" | "no" => Ok(Value::Boolean(false)),
            other => Err(SchemaError::NotABoolean(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::boolean;

    #[test]
    fn test_accepts_any_casing() {
        assert_eq!(boolean().check("YeS"), Ok(Value::Boolean(true)));
        assert_eq!(boolean().check("TRUE"), Ok(Value::Boolean(true)));
        assert_eq!(boolean().check(" fAlSe "), Ok(Value::Boolean(false)));
        assert_eq!(boolean().check("no"), Ok(Value::Boolean(false)));
    }

    #[test]
    fn test_no_fuzzy_matching() {
        assert_eq!(
            boolean().check("maybe"),
            Err(SchemaError::NotABoolean("maybe".into()))
        );
        assert!(boolean().check("1").is_err());
        assert!(boolean().check("y").is_err());
    }
}
