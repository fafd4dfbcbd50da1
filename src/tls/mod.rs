//! TLS connection constraints subsystem.
//!
//! # Data Flow
//! ```text
//! raw config (JSON / TOML / env text)
//!     → symbols.rs (name ⇄ wire code tables)
//!     → version.rs (protocol version ranges)
//!     → cipher.rs (cipher-suite allow-lists)
//!     → auth.rs (client certificates, parsed once)
//!     → typed values stored on Options
//! ```
//!
//! # Design Decisions
//! - Every decode is fail-fast and names the offending input
//! - Encoding is the exact inverse of decoding
//! - Only the certificate cache holds mutable state, behind a `OnceLock`

pub mod auth;
pub mod cipher;
pub mod error;
pub mod symbols;
pub mod version;

pub use auth::{CertificateHandle, ClientCertificate, ClientCertificateFields};
pub use cipher::{CipherSuiteId, CipherSuiteList};
pub use error::{TlsError, TlsResult};
pub use version::{ProtocolVersion, VersionRange};
