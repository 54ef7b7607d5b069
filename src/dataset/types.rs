use compact_str::CompactString;
use serde::Serialize;

/// Label used for records with a missing or empty attribute.
pub const UNKNOWN_CATEGORY: &str = "unknown";

/// Index into the record store's dimension table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DimensionId(pub u16);

impl DimensionId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One hierarchy level: a user-selected dimension or the terminal category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKey {
    /// The innermost level (e.g. road-user type)
    TerminalCategory,
    /// A selectable attribute (e.g. age group, gender)
    Dimension(DimensionId),
}

impl GroupKey {
    /// The group this record falls into. Missing and empty values map to "unknown".
    pub fn label<'a>(&self, record: &'a Record) -> &'a str {
        let raw = match self {
            GroupKey::TerminalCategory => record.category.as_deref(),
            GroupKey::Dimension(id) => record.attribute(*id),
        };
        match raw {
            Some(value) if !value.is_empty() => value,
            _ => UNKNOWN_CATEGORY,
        }
    }
}

/// A flat categorized record with a single numeric measure.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Measure summed into node values (always finite and >= 0 once stored)
    pub measure: f64,
    /// Terminal category attribute
    pub category: Option<CompactString>,
    /// Dimension attributes, indexed by [`DimensionId`]
    pub attributes: Vec<Option<CompactString>>,
}

impl Record {
    pub fn new(category: &str, measure: f64) -> Self {
        Self {
            measure,
            category: Some(CompactString::new(category)),
            attributes: Vec::new(),
        }
    }

    /// Set a dimension attribute (builder).
    pub fn with_attribute(mut self, id: DimensionId, value: &str) -> Self {
        if self.attributes.len() <= id.index() {
            self.attributes.resize(id.index() + 1, None);
        }
        self.attributes[id.index()] = Some(CompactString::new(value));
        self
    }

    pub fn attribute(&self, id: DimensionId) -> Option<&str> {
        self.attributes.get(id.index()).and_then(|v| v.as_deref())
    }
}
