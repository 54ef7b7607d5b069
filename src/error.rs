/// Errors and recoverable conditions raised by the sunburst pipeline.
///
/// None of these are fatal for the chart: the facade in [`crate::app`]
/// degrades to an empty state or a root focus and logs the condition.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SunburstError {
    /// No records left after filtering.
    #[error("No data available: the record set is empty")]
    EmptyDataset,

    /// A focus path could not be located in a rebuilt tree.
    #[error("Focus path '{path}' is not present in the rebuilt tree")]
    UnresolvedFocus {
        /// Path of the previous focus, names joined by '-'.
        path: String,
    },

    /// A node (or the whole tree) sums to zero.
    #[error("Node '{path}' has a total value of zero; children are split evenly")]
    DegenerateValue {
        /// Path of the zero-valued node.
        path: String,
    },

    /// More grouping dimensions than the chart supports.
    #[error("At most {max} grouping dimensions are supported, got {requested}")]
    TooManyDimensions {
        /// Number of dimensions requested.
        requested: usize,
        /// Supported maximum.
        max: usize,
    },

    /// Aggregation threshold outside the open interval (0, 1).
    #[error("Aggregation threshold must be within (0, 1), got {0}")]
    InvalidThreshold(f64),

    /// A dimension selector that the record store does not know.
    #[error("Unknown dimension: {0}")]
    UnknownDimension(String),

    /// A record rejected at ingestion.
    #[error("Invalid record at row {row}: {reason}")]
    InvalidRecord {
        /// Zero-based row index.
        row: usize,
        /// What was wrong with it.
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, SunburstError>;
