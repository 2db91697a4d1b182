//! Data structures for annotated proteomic matrices.

mod annotated_matrix;
mod metadata;
mod reader;

pub use annotated_matrix::AnnotatedMatrix;
pub use metadata::{is_present, Axis, MetadataTable, MISSING_MARKERS};
pub use reader::{MatrixReader, TsvReader};
