//! Column mappings and composite-key criteria.

use serde::{Deserialize, Serialize};

use shopforge_core::Record;

/// One mapped column: entity field ↔ external column label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub field: String,
    pub label: String,
}

/// Ordered mapping from entity field to column label.
///
/// Used field → label on export and label → field on import. A field appears
/// at most once; mapping it again replaces its label in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnMapping(Vec<Column>);

impl ColumnMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identity mapping over every field `R` declares, in declaration order.
    pub fn for_record<R: Record>() -> Self {
        R::fields().iter().map(|f| (f.name, f.name)).collect()
    }

    pub fn with(mut self, field: impl Into<String>, label: impl Into<String>) -> Self {
        self.insert(field, label);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, label: impl Into<String>) {
        let field = field.into();
        let label = label.into();
        match self.0.iter_mut().find(|c| c.field == field) {
            Some(existing) => existing.label = label,
            None => self.0.push(Column { field, label }),
        }
    }

    pub fn label_for(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|c| c.field == field)
            .map(|c| c.label.as_str())
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.label_for(field).is_some()
    }

    /// Labels in mapping order; the default export header.
    pub fn labels(&self) -> Vec<String> {
        self.0.iter().map(|c| c.label.clone()).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Column> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<F, L> FromIterator<(F, L)> for ColumnMapping
where
    F: Into<String>,
    L: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (F, L)>>(iter: I) -> Self {
        let mut mapping = Self::new();
        for (field, label) in iter {
            mapping.insert(field, label);
        }
        mapping
    }
}

impl<'a> IntoIterator for &'a ColumnMapping {
    type Item = &'a Column;
    type IntoIter = std::slice::Iter<'a, Column>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Ordered set of fields whose values together identify an entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct SearchCriteria(Vec<String>);

impl SearchCriteria {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut criteria = Self::default();
        for field in fields {
            let field = field.into();
            if !criteria.contains(&field) {
                criteria.0.push(field);
            }
        }
        criteria
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.iter().any(|f| f == field)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<String>> for SearchCriteria {
    fn from(fields: Vec<String>) -> Self {
        Self::new(fields)
    }
}

impl From<SearchCriteria> for Vec<String> {
    fn from(criteria: SearchCriteria) -> Self {
        criteria.0
    }
}
