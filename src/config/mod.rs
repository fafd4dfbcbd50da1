//! Run options subsystem.
//!
//! # Data Flow
//! ```text
//! JSON / TOML document     environment variables
//!     → loader.rs              → env.rs
//!            ↘                ↙
//!        Options layers (every field optional)
//!     → merge.rs (later layer wins per field)
//!     → validation.rs (semantic checks on the result)
//!     → resolved Options, shared read-only (eg. via Arc)
//! ```
//!
//! # Design Decisions
//! - "Unset" is `None`; an explicit zero or empty container is a value
//! - Merge never validates and cannot fail
//! - Validation separates syntactic (serde) from semantic checks

pub mod env;
pub mod loader;
pub mod merge;
pub mod schema;
pub mod validation;

pub use loader::{load_options, resolve, ConfigError};
pub use schema::{IpNet, Options, Stage, Thresholds};
pub use validation::{validate_options, ValidationError};
