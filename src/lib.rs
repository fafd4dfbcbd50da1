//! Run options and TLS connection constraints.
//!
//! Decodes symbolic TLS constraints (protocol version ranges, cipher-suite
//! allow-lists, client certificates) into the codes a TLS stack negotiates
//! with, and merges layered run options where every field is optional.

pub mod config;
pub mod tls;

pub use config::schema::Options;
pub use config::ConfigError;
pub use tls::{ClientCertificate, CipherSuiteList, TlsError, VersionRange};
