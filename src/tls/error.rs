//! Error definitions for TLS constraint decoding.

use thiserror::Error;

use super::version::ProtocolVersion;

/// Errors produced while decoding or encoding TLS constraints.
///
/// All of these are deterministic input-validation failures: retrying the
/// same input yields the same error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TlsError {
    /// A protocol version name that is not in the symbol table.
    #[error("unknown TLS version: {0}")]
    UnknownVersionName(String),

    /// A cipher-suite name that is not in the symbol table.
    #[error("unknown cipher suite: {0}")]
    UnknownCipherSuite(String),

    /// A cipher-suite code with no symbolic name, found while encoding.
    #[error("cipher suite 0x{0:04x} has no symbolic name")]
    UnknownCipherSuiteId(u16),

    /// Both bounds of a version range are set and `min` is above `max`.
    #[error("TLS version range is inverted: min {min} is above max {max}")]
    InvertedVersionRange {
        min: ProtocolVersion,
        max: ProtocolVersion,
    },

    /// Malformed PEM, a missing certificate or key, or a key/cert mismatch.
    #[error("invalid client certificate: {reason}")]
    CertificateParse { reason: String },

    /// Input matches none of the accepted shapes.
    #[error("malformed {what}: expected {expected}, got {got}")]
    MalformedShape {
        what: &'static str,
        expected: &'static str,
        got: String,
    },
}

/// Result type for TLS constraint decoding.
pub type TlsResult<T> = Result<T, TlsError>;
