// Public library interface for sunburst-rs
// The debug CLI tool and integration tests use the core modules through here

pub mod app;
pub mod config;
pub mod dataset;
pub mod error;
pub mod layout;
pub mod render;
pub mod tree;
pub mod ui;

pub use app::{ChartPhase, SunburstChart};
pub use config::{AggregationPolicy, SunburstConfig};
pub use dataset::types::{DimensionId, Record};
pub use dataset::{DatasetSchema, RecordStore};
pub use error::{Result, SunburstError};
pub use render::RenderAdapter;
