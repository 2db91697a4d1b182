//! Selection primitives for annotated matrices.

pub mod flagged;
pub mod select;

pub use flagged::{extract_flagged, report_flagged, FlagReport};
pub use select::{exclude_where, matching_indices, select_fields, select_where, FieldCondition};
