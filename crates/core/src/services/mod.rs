//! Service layer that ties a byte store to the analysis components.

pub mod inspector;

pub use inspector::FileInspector;
