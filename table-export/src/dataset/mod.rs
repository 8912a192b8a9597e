//! Dataset provider interface
//!
//! Everything the exporter knows about a dataset comes through
//! [`DatasetProvider`]: field descriptors, the provider version, and the two
//! cursor shapes older and newer providers expose.

mod field;
pub mod geojson;
#[cfg(test)]
pub mod memory;
mod provider;
mod value;
mod version;

pub use field::{FieldDescriptor, FieldType};
pub use geojson::GeoJsonProvider;
pub use provider::{DatasetProvider, ProjectedCursor, ProviderError, Row, StepCursor, StepRow};
pub use value::{Value, parse_date};
pub use version::ProviderVersion;
