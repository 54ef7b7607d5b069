pub mod types;

use compact_str::CompactString;
use serde_json::Value;

use self::types::{DimensionId, Record};
use crate::error::{Result, SunburstError};

/// Column mapping used when ingesting tabular rows.
#[derive(Debug, Clone)]
pub struct DatasetSchema {
    /// Column holding the numeric measure
    pub measure_column: String,
    /// Column holding the terminal category
    pub category_column: String,
    /// (column, dimension name) pairs, in dimension-id order
    pub dimensions: Vec<(String, String)>,
}

impl Default for DatasetSchema {
    /// Column names of the processed hospitalisation export.
    fn default() -> Self {
        Self {
            measure_column: "Sum(Hospitalisations)".to_string(),
            category_column: "Road_User".to_string(),
            dimensions: vec![
                ("Age_Group".to_string(), "age".to_string()),
                ("Gender".to_string(), "gender".to_string()),
            ],
        }
    }
}

/// Immutable-once-loaded set of records plus the table of dimension names.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    dimensions: Vec<CompactString>,
    records: Vec<Record>,
}

impl RecordStore {
    /// Create an empty store knowing the given dimension names.
    pub fn new(dimension_names: &[&str]) -> Self {
        Self {
            dimensions: dimension_names.iter().map(|n| CompactString::new(n)).collect(),
            records: Vec::new(),
        }
    }

    /// Add a record. Rejects measures that are negative or not finite, and
    /// attributes for dimensions the store does not know.
    pub fn push(&mut self, record: Record) -> Result<()> {
        let row = self.records.len();
        if !record.measure.is_finite() || record.measure < 0.0 {
            return Err(SunburstError::InvalidRecord {
                row,
                reason: format!("measure {} is not a finite non-negative number", record.measure),
            });
        }
        if record.attributes.len() > self.dimensions.len() {
            return Err(SunburstError::InvalidRecord {
                row,
                reason: format!(
                    "{} attributes but only {} dimensions are defined",
                    record.attributes.len(),
                    self.dimensions.len()
                ),
            });
        }
        self.records.push(record);
        Ok(())
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn total_measure(&self) -> f64 {
        self.records.iter().map(|r| r.measure).sum()
    }

    /// Look up a dimension by name.
    pub fn dimension(&self, name: &str) -> Option<DimensionId> {
        self.dimensions
            .iter()
            .position(|d| d.as_str() == name)
            .map(|i| DimensionId(i as u16))
    }

    pub fn dimension_name(&self, id: DimensionId) -> Option<&str> {
        self.dimensions.get(id.index()).map(|d| d.as_str())
    }

    pub fn dimension_count(&self) -> usize {
        self.dimensions.len()
    }

    /// Resolve an ordered list of dimension names (e.g. from a checkbox panel).
    pub fn resolve_dimensions(&self, names: &[&str]) -> Result<Vec<DimensionId>> {
        names
            .iter()
            .map(|name| {
                self.dimension(name)
                    .ok_or_else(|| SunburstError::UnknownDimension(name.to_string()))
            })
            .collect()
    }

    /// A new store holding the records accepted by `keep`, with the same dimensions.
    pub fn filtered(&self, keep: impl Fn(&Record) -> bool) -> Self {
        Self {
            dimensions: self.dimensions.clone(),
            records: self.records.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }

    /// Build a store from a JSON array of row objects.
    pub fn from_json_str(schema: &DatasetSchema, json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json).map_err(|e| SunburstError::InvalidRecord {
            row: 0,
            reason: format!("malformed JSON: {e}"),
        })?;
        match value {
            Value::Array(rows) => Self::from_json_rows(schema, &rows),
            _ => Err(SunburstError::InvalidRecord {
                row: 0,
                reason: "expected a JSON array of row objects".to_string(),
            }),
        }
    }

    /// Build a store from row objects using the schema's column mapping.
    ///
    /// Unparseable measures are logged and counted as zero so a single bad
    /// cell never drops the whole dataset.
    pub fn from_json_rows(schema: &DatasetSchema, rows: &[Value]) -> Result<Self> {
        let names: Vec<&str> = schema.dimensions.iter().map(|(_, name)| name.as_str()).collect();
        let mut store = RecordStore::new(&names);

        for (row, value) in rows.iter().enumerate() {
            let Some(object) = value.as_object() else {
                return Err(SunburstError::InvalidRecord {
                    row,
                    reason: "row is not an object".to_string(),
                });
            };

            let measure = match parse_measure(object.get(&schema.measure_column)) {
                Some(m) => m,
                None => {
                    tracing::warn!(
                        "Row {}: unusable measure in column '{}', counting as 0",
                        row,
                        schema.measure_column
                    );
                    0.0
                }
            };

            let record = Record {
                measure,
                category: cell_text(object.get(&schema.category_column)),
                attributes: schema
                    .dimensions
                    .iter()
                    .map(|(column, _)| cell_text(object.get(column)))
                    .collect(),
            };
            store.push(record)?;
        }

        tracing::info!(
            "Loaded {} records ({} dimensions, total measure {})",
            store.len(),
            store.dimension_count(),
            store.total_measure()
        );
        Ok(store)
    }
}

fn parse_measure(cell: Option<&Value>) -> Option<f64> {
    let parsed = match cell? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) if s.trim().is_empty() => 0.0,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        Value::Null => 0.0,
        _ => return None,
    };
    (parsed.is_finite() && parsed >= 0.0).then_some(parsed)
}

fn cell_text(cell: Option<&Value>) -> Option<CompactString> {
    match cell? {
        Value::String(s) => Some(CompactString::new(s)),
        Value::Number(n) => Some(CompactString::new(n.to_string())),
        Value::Bool(b) => Some(CompactString::new(b.to_string())),
        _ => None,
    }
}
