//! Bulk import: positional records resolved through an explicit registry,
//! ordered by reference dependency and committed as one stamped batch.

mod plan;
mod registry;

pub use plan::ImportPlan;
pub use registry::{IMPORT_REGISTRY, ImportKind, ImportRegistry};
