//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::io::Write;

use tempfile::NamedTempFile;

/// Self-signed ECDSA P-256 certificate for `client.example.com`.
pub const CLIENT_CERT: &str = include_str!("../fixtures/client.crt");

/// PKCS#8 private key matching [`CLIENT_CERT`].
pub const CLIENT_KEY: &str = include_str!("../fixtures/client.key");

/// PKCS#8 private key that does not match [`CLIENT_CERT`].
pub const OTHER_KEY: &str = include_str!("../fixtures/other.key");

/// JSON for a `tlsAuth` entry with the given key and domains.
pub fn tls_auth_json(key: &str, domains: &[&str]) -> serde_json::Value {
    serde_json::json!({
        "cert": CLIENT_CERT,
        "key": key,
        "domains": domains,
    })
}

/// Write `content` to a temporary file with the given extension.
pub fn write_options_file(extension: &str, content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(&format!(".{extension}"))
        .tempfile()
        .unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
