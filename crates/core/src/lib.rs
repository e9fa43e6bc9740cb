//! bytelens-core
//!
//! Core library for byte-level inspection of arbitrary files: signature
//! detection, byte statistics, repeated-pattern discovery, hex rendering,
//! reports, comparison and simple byte transforms.
//!
//! All substantive logic lives here so it is testable and reusable from
//! multiple frontends. File access goes through the [`store::ByteStore`]
//! trait, so every component also works on in-memory buffers.

pub mod analysis;
pub mod config;
pub mod error;
pub mod hexview;
pub mod model;
pub mod report;
pub mod services;
pub mod store;
pub mod transform;

pub use error::{InspectError, InspectResult};
pub use services::FileInspector;

/// Returns the library version as encoded at compile time.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
