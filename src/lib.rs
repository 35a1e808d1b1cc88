//! Peach Flux - Rowing telemetry parsing and analysis
//!
//! Flux turns a Peach PowerLine CSV export into typed records through a
//! deterministic pipeline: section extraction → normalization → analysis
//! (per-athlete averages, force curves, periodic windows) → session import.
//!
//! ## Modules
//!
//! - **Parsing**: `adapters` splits the export into raw string rows
//! - **Normalization**: `normalizer`, `seats` and `coerce` build numeric records
//! - **Analysis**: `averages`, `force_curve` and `periodic`
//! - **Import**: `import` assembles the records a store persists

pub mod adapters;
pub mod averages;
pub mod coerce;
pub mod config;
pub mod error;
pub mod force_curve;
pub mod import;
pub mod normalizer;
pub mod periodic;
pub mod pipeline;
pub mod seats;
pub mod types;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use config::{AnalysisConfig, ConfigOverrides, FluxConfig, ParserConfig};
pub use error::FluxError;
pub use import::{import_session, ImportOptions};
pub use pipeline::{import_export, parse_export, FluxProcessor};

/// Library version
pub const PEACH_FLUX_VERSION: &str = env!("CARGO_PKG_VERSION");
