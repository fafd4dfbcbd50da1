//! Static name ⇄ code tables for protocol versions and cipher suites.
//!
//! # Design Decisions
//! - Tables are module constants: built at compile time, never mutated,
//!   safe for unsynchronized concurrent reads
//! - Lookups are linear scans; the tables are a few dozen entries
//! - Names are matched exactly (versions are lowercase, suites uppercase)

use super::cipher::CipherSuiteId;
use super::version::ProtocolVersion;

/// Every named protocol version. `Unspecified` has no entry; it maps to `""`.
pub const VERSIONS: &[(&str, ProtocolVersion)] = &[
    ("ssl3.0", ProtocolVersion::Ssl30),
    ("tls1.0", ProtocolVersion::Tls10),
    ("tls1.1", ProtocolVersion::Tls11),
    ("tls1.2", ProtocolVersion::Tls12),
    ("tls1.3", ProtocolVersion::Tls13),
];

/// Every named cipher suite with its IANA code.
pub const CIPHER_SUITES: &[(&str, u16)] = &[
    // TLS 1.0 - 1.2
    ("TLS_RSA_WITH_RC4_128_SHA", 0x0005),
    ("TLS_RSA_WITH_3DES_EDE_CBC_SHA", 0x000a),
    ("TLS_RSA_WITH_AES_128_CBC_SHA", 0x002f),
    ("TLS_RSA_WITH_AES_256_CBC_SHA", 0x0035),
    ("TLS_RSA_WITH_AES_128_CBC_SHA256", 0x003c),
    ("TLS_RSA_WITH_AES_128_GCM_SHA256", 0x009c),
    ("TLS_RSA_WITH_AES_256_GCM_SHA384", 0x009d),
    ("TLS_ECDHE_ECDSA_WITH_RC4_128_SHA", 0xc007),
    ("TLS_ECDHE_ECDSA_WITH_AES_128_CBC_SHA", 0xc009),
    ("TLS_ECDHE_ECDSA_WITH_AES_256_CBC_SHA", 0xc00a),
    ("TLS_ECDHE_RSA_WITH_RC4_128_SHA", 0xc011),
    ("TLS_ECDHE_RSA_WITH_3DES_EDE_CBC_SHA", 0xc012),
    ("TLS_ECDHE_RSA_WITH_AES_128_CBC_SHA", 0xc013),
    ("TLS_ECDHE_RSA_WITH_AES_256_CBC_SHA", 0xc014),
    ("TLS_ECDHE_ECDSA_WITH_AES_128_CBC_SHA256", 0xc023),
    ("TLS_ECDHE_RSA_WITH_AES_128_CBC_SHA256", 0xc027),
    ("TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256", 0xc02f),
    ("TLS_ECDHE_ECDSA_WITH_AES_128_GCM_SHA256", 0xc02b),
    ("TLS_ECDHE_RSA_WITH_AES_256_GCM_SHA384", 0xc030),
    ("TLS_ECDHE_ECDSA_WITH_AES_256_GCM_SHA384", 0xc02c),
    ("TLS_ECDHE_RSA_WITH_CHACHA20_POLY1305", 0xcca8),
    ("TLS_ECDHE_ECDSA_WITH_CHACHA20_POLY1305", 0xcca9),
    // TLS 1.3
    ("TLS_AES_128_GCM_SHA256", 0x1301),
    ("TLS_AES_256_GCM_SHA384", 0x1302),
    ("TLS_CHACHA20_POLY1305_SHA256", 0x1303),
];

/// Look up a protocol version by its symbolic name.
///
/// The empty string is not a name; callers decide what it means.
pub fn version_from_name(name: &str) -> Option<ProtocolVersion> {
    VERSIONS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|&(_, v)| v)
}

/// Symbolic name of a protocol version. `Unspecified` maps to `""`.
pub fn version_name(version: ProtocolVersion) -> &'static str {
    VERSIONS
        .iter()
        .find(|(_, v)| *v == version)
        .map(|&(n, _)| n)
        .unwrap_or("")
}

/// Look up a cipher suite by its symbolic name.
pub fn cipher_suite_from_name(name: &str) -> Option<CipherSuiteId> {
    CIPHER_SUITES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|&(_, code)| CipherSuiteId(code))
}

/// Symbolic name of a cipher-suite code, if it has one.
pub fn cipher_suite_name(id: CipherSuiteId) -> Option<&'static str> {
    CIPHER_SUITES
        .iter()
        .find(|(_, code)| *code == id.0)
        .map(|&(n, _)| n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_version_round_trip() {
        for &(name, version) in VERSIONS {
            assert_eq!(version_from_name(name), Some(version));
            assert_eq!(version_name(version), name);
        }
    }

    #[test]
    fn test_unspecified_is_empty_name() {
        assert_eq!(version_name(ProtocolVersion::Unspecified), "");
        assert_eq!(version_from_name(""), None);
    }

    #[test]
    fn test_version_names_are_case_sensitive() {
        assert_eq!(version_from_name("TLS1.2"), None);
        assert_eq!(version_from_name("tls1.4"), None);
    }

    #[test]
    fn test_cipher_round_trip() {
        for &(name, code) in CIPHER_SUITES {
            let id = cipher_suite_from_name(name).unwrap();
            assert_eq!(id.0, code);
            assert_eq!(cipher_suite_name(id), Some(name));
        }
    }

    #[test]
    fn test_tables_have_no_duplicates() {
        let names: HashSet<_> = CIPHER_SUITES.iter().map(|(n, _)| n).collect();
        let codes: HashSet<_> = CIPHER_SUITES.iter().map(|(_, c)| c).collect();
        assert_eq!(names.len(), CIPHER_SUITES.len());
        assert_eq!(codes.len(), CIPHER_SUITES.len());
    }

    #[test]
    fn test_unknown_cipher() {
        assert_eq!(cipher_suite_from_name("NOT_A_REAL_SUITE"), None);
        assert_eq!(cipher_suite_name(CipherSuiteId(0xffff)), None);
    }
}
