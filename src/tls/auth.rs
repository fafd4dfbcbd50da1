//! Client certificates presented to specific hosts.
//!
//! # Responsibilities
//! - Hold the PEM certificate chain, PEM private key and host patterns
//! - Parse the pair once into a rustls `CertifiedKey` and memoize it
//! - Pick the certificate for a given host name
//!
//! # Design Decisions
//! - Deserializing parses eagerly so bad certificates fail at load time
//! - The parse outcome (including an error) lives in a `OnceLock`: exactly
//!   one parse runs even under concurrent first access, and every caller
//!   sees the same handle or the same error
//! - Key material is never printed by `Debug`

use std::fmt;
use std::io::Cursor;
use std::sync::{Arc, OnceLock};

use rustls::crypto::CryptoProvider;
use rustls::sign::CertifiedKey;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use wildmatch::WildMatch;

use super::error::{TlsError, TlsResult};

/// A parsed certificate chain with its signing key.
pub type CertificateHandle = Arc<CertifiedKey>;

/// Serialized form of a client certificate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ClientCertificateFields {
    /// Certificate chain as PEM, including "-----BEGIN CERTIFICATE-----".
    #[serde(default)]
    pub cert: String,

    /// Private key as PEM.
    #[serde(default)]
    pub key: String,

    /// Hosts to present the certificate to. May contain wildcards, eg. "*.example.com".
    #[serde(default)]
    pub domains: Vec<String>,
}

/// A TLS client certificate to present to certain hosts.
#[derive(Clone)]
pub struct ClientCertificate {
    fields: ClientCertificateFields,
    parsed: OnceLock<TlsResult<CertificateHandle>>,
}

impl ClientCertificate {
    /// Create an unparsed certificate. Nothing is checked until [`parse`](Self::parse).
    pub fn new(cert: impl Into<String>, key: impl Into<String>, domains: Vec<String>) -> Self {
        Self::from_fields(ClientCertificateFields {
            cert: cert.into(),
            key: key.into(),
            domains,
        })
    }

    pub fn from_fields(fields: ClientCertificateFields) -> Self {
        Self {
            fields,
            parsed: OnceLock::new(),
        }
    }

    /// Create and parse in one step.
    pub fn load(fields: ClientCertificateFields) -> TlsResult<Self> {
        let cert = Self::from_fields(fields);
        cert.parse()?;
        Ok(cert)
    }

    /// The parsed certificate, parsing on first call.
    pub fn parse(&self) -> TlsResult<CertificateHandle> {
        self.parsed
            .get_or_init(|| parse_key_pair(&self.fields.cert, &self.fields.key).map(Arc::new))
            .clone()
    }

    pub fn cert_pem(&self) -> &str {
        &self.fields.cert
    }

    pub fn key_pem(&self) -> &str {
        &self.fields.key
    }

    pub fn domains(&self) -> &[String] {
        &self.fields.domains
    }

    pub fn fields(&self) -> &ClientCertificateFields {
        &self.fields
    }

    /// Whether this certificate should be presented to `host`.
    pub fn matches_host(&self, host: &str) -> bool {
        let host = host.trim_end_matches('.').to_ascii_lowercase();
        self.fields
            .domains
            .iter()
            .any(|pattern| host_matches(&pattern.to_ascii_lowercase(), &host))
    }
}

/// Glob match: `*` spans any run of characters (dots included), `?` one.
fn host_matches(pattern: &str, host: &str) -> bool {
    WildMatch::new(pattern).matches(host)
}

fn parse_key_pair(cert_pem: &str, key_pem: &str) -> TlsResult<CertifiedKey> {
    let chain = rustls_pemfile::certs(&mut Cursor::new(cert_pem.as_bytes()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| parse_error(format!("malformed certificate PEM: {e}")))?;
    if chain.is_empty() {
        return Err(parse_error("no certificate found in PEM data"));
    }

    let key = rustls_pemfile::private_key(&mut Cursor::new(key_pem.as_bytes()))
        .map_err(|e| parse_error(format!("malformed private key PEM: {e}")))?
        .ok_or_else(|| parse_error("no private key found in PEM data"))?;

    let provider = CryptoProvider::get_default()
        .cloned()
        .unwrap_or_else(|| Arc::new(rustls::crypto::ring::default_provider()));
    let signing_key = provider
        .key_provider
        .load_private_key(key)
        .map_err(|e| parse_error(format!("unsupported private key: {e}")))?;

    let certified_key = CertifiedKey::new(chain, signing_key);
    certified_key
        .keys_match()
        .map_err(|e| parse_error(format!("private key does not match certificate: {e}")))?;

    tracing::debug!(chain_len = certified_key.cert.len(), "Parsed client certificate");
    Ok(certified_key)
}

fn parse_error(reason: impl Into<String>) -> TlsError {
    TlsError::CertificateParse {
        reason: reason.into(),
    }
}

impl fmt::Debug for ClientCertificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCertificate")
            .field("domains", &self.fields.domains)
            .field("parsed", &matches!(self.parsed.get(), Some(Ok(_))))
            .finish_non_exhaustive()
    }
}

/// Equality compares the PEM data and host patterns, not the parse cache.
impl PartialEq for ClientCertificate {
    fn eq(&self, other: &Self) -> bool {
        self.fields == other.fields
    }
}

impl Eq for ClientCertificate {}

impl Serialize for ClientCertificate {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ClientCertificate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let fields = ClientCertificateFields::deserialize(deserializer)?;
        Self::load(fields).map_err(de::Error::custom)
    }
}
