//! Ordered flag tables.

use crate::schema::Schema;

/// Flag name to schema, in declaration order.
///
/// Names are unique: inserting an existing name replaces its schema in
/// place, which is also how inherited global flags are overridden.
#[derive(Debug, Clone, Default)]
pub struct FlagTable {
    entries: Vec<(String, Schema)>,
}

impl FlagTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a flag, returning the replaced schema.
    pub fn insert(&mut self, name: impl Into<String>, schema: impl Into<Schema>) -> Option<Schema> {
        let name = name.into();
        let schema = schema.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => Some(std::mem::replace(slot, schema)),
            None => {
                self.entries.push((name, schema));
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, schema)| schema)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Schema)> {
        self.entries
            .iter()
            .map(|(name, schema)| (name.as_str(), schema))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `self` with `overrides` merged on top.
    ///
    /// Keys keep the position they first appeared at; values from
    /// `overrides` win.
    pub fn merged(&self, overrides: &FlagTable) -> FlagTable {
        let mut merged = self.clone();
        for (name, schema) in overrides.iter() {
            merged.insert(name, schema.clone());
        }
        merged
    }
}

impl<N, S> FromIterator<(N, S)> for FlagTable
where
    N: Into<String>,
    S: Into<Schema>,
{
    fn from_iter<I: IntoIterator<Item = (N, S)>>(iter: I) -> Self {
        let mut table = FlagTable::new();
        for (name, schema) in iter {
            table.insert(name, schema);
        }
        table
    }
}
