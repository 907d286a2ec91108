use super::{Primitive, SchemaMeta, meta_builders};
use crate::error::SchemaError;
use crate::value::Value;

/// A variable-length list of one primitive kind.
#[derive(Debug, Clone)]
pub struct ArraySchema {
    pub(super) meta: SchemaMeta,
    item: Box<Primitive>,
    min_length: Option<usize>,
    max_length: Option<usize>,
}

meta_builders!(ArraySchema);

impl ArraySchema {
    pub(super) fn new(item: Primitive) -> Self {
        Self {
            meta: SchemaMeta::default(),
            item: Box::new(item.into_bare()),
            min_length: None,
            max_length: None,
        }
    }

    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    pub fn item(&self) -> &Primitive {
        &self.item
    }

    pub(crate) fn check(&self, raw: &[String]) -> Result<Value, SchemaError> {
        check_length(raw.len(), self.min_length, self.max_length)?;
        raw.iter()
            .map(|item| self.item.parse(item))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::List)
    }
}

/// A fixed-length list validated position by position.
#[derive(Debug, Clone)]
pub struct TupleSchema {
    pub(super) meta: SchemaMeta,
    items: Vec<Primitive>,
}

meta_builders!(TupleSchema);

impl TupleSchema {
    pub(super) fn new(items: Vec<Primitive>) -> Self {
        Self {
            meta: SchemaMeta::default(),
            items: items.into_iter().map(Primitive::into_bare).collect(),
        }
    }

    pub fn items(&self) -> &[Primitive] {
        &self.items
    }

    pub(crate) fn check(&self, raw: &[String]) -> Result<Value, SchemaError> {
        if raw.len() != self.items.len() {
            return Err(SchemaError::TupleArity {
                expected: self.items.len(),
                found: raw.len(),
            });
        }

        self.items
            .iter()
            .zip(raw)
            .map(|(schema, item)| schema.parse(item))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::List)
    }
}

/// Checks a list length against optional bounds.
pub(crate) fn check_length(
    len: usize,
    min: Option<usize>,
    max: Option<usize>,
) -> Result<(), SchemaError> {
    if let Some(min) = min.filter(|&min| len < min) {
        return Err(SchemaError::TooFewItems { min });
    }
    if let Some(max) = max.filter(|&max| len > max) {
        return Err(SchemaError::TooManyItems { max });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{array, boolean, number, string, tuple};

    fn raw(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_array_keeps_order() {
        let schema = array(number());
        assert_eq!(
            schema.check(&raw(&["3", "1", "2"])),
            Ok(Value::from(vec![3, 1, 2]))
        );
    }

    #[test]
    fn test_array_length_bounds() {
        let schema = array(string()).min_length(2).max_length(3);
        assert_eq!(
            schema.check(&raw(&["a"])),
            Err(SchemaError::TooFewItems { min: 2 })
        );
        assert_eq!(
            schema.check(&raw(&["a", "b", "c", "d"])),
            Err(SchemaError::TooManyItems { max: 3 })
        );
        assert!(schema.check(&raw(&["a", "b"])).is_ok());
    }

    #[test]
    fn test_array_first_item_error_wins() {
        let schema = array(number());
        assert_eq!(
            schema.check(&raw(&["1", "x", "y"])),
            Err(SchemaError::NotANumber("x".into()))
        );
    }

    #[test]
    fn test_tuple_arity_and_positions() {
        let schema = tuple([Primitive::from(string()), number().into(), boolean().into()]);
        assert_eq!(
            schema.check(&raw(&["a", "2"])),
            Err(SchemaError::TupleArity {
                expected: 3,
                found: 2
            })
        );
        assert_eq!(
            schema.check(&raw(&["a", "2", "yes"])),
            Ok(Value::List(vec![
                Value::from("a"),
                Value::from(2),
                Value::from(true)
            ]))
        );
        assert_eq!(
            schema.check(&raw(&["a", "b", "yes"])),
            Err(SchemaError::NotANumber("b".into()))
        );
    }
}
