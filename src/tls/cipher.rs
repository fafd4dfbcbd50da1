//! Cipher-suite allow-lists.
//!
//! Decoded from an ordered list of symbolic names and re-encoded to the
//! same names in the same order. Duplicates are preserved.

use std::fmt;

use serde::de::{self, Deserializer};
use serde::ser::{self, SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};

use super::error::{TlsError, TlsResult};
use super::symbols;

/// A cipher-suite wire code as negotiated in the TLS handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CipherSuiteId(pub u16);

impl CipherSuiteId {
    pub fn name(self) -> Option<&'static str> {
        symbols::cipher_suite_name(self)
    }
}

impl From<u16> for CipherSuiteId {
    fn from(code: u16) -> Self {
        Self(code)
    }
}

impl From<CipherSuiteId> for u16 {
    fn from(id: CipherSuiteId) -> Self {
        id.0
    }
}

impl From<CipherSuiteId> for rustls::CipherSuite {
    fn from(id: CipherSuiteId) -> Self {
        rustls::CipherSuite::from(id.0)
    }
}

impl fmt::Display for CipherSuiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "0x{:04x}", self.0),
        }
    }
}

/// Ordered list of allowed cipher suites.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CipherSuiteList(Vec<CipherSuiteId>);

impl CipherSuiteList {
    /// Decode names in order. Stops at the first unknown name.
    pub fn decode<I, S>(names: I) -> TlsResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .map(|name| {
                let name = name.as_ref();
                symbols::cipher_suite_from_name(name)
                    .ok_or_else(|| TlsError::UnknownCipherSuite(name.to_string()))
            })
            .collect::<TlsResult<Vec<_>>>()
            .map(Self)
    }

    /// Encode back to symbolic names, preserving order.
    pub fn encode(&self) -> TlsResult<Vec<&'static str>> {
        self.0
            .iter()
            .map(|&id| id.name().ok_or(TlsError::UnknownCipherSuiteId(id.0)))
            .collect()
    }

    pub fn ids(&self) -> &[CipherSuiteId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The list as rustls cipher-suite identifiers.
    pub fn to_rustls(&self) -> Vec<rustls::CipherSuite> {
        self.0.iter().map(|&id| id.into()).collect()
    }

    /// Whether `suite` is on the allow-list.
    pub fn allows(&self, suite: rustls::CipherSuite) -> bool {
        let code = u16::from(suite);
        self.0.iter().any(|id| id.0 == code)
    }
}

impl From<Vec<CipherSuiteId>> for CipherSuiteList {
    fn from(ids: Vec<CipherSuiteId>) -> Self {
        Self(ids)
    }
}

impl Serialize for CipherSuiteList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let names = self.encode().map_err(ser::Error::custom)?;
        let mut seq = serializer.serialize_seq(Some(names.len()))?;
        for name in names {
            seq.serialize_element(name)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for CipherSuiteList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let names = Vec::<String>::deserialize(deserializer)?;
        Self::decode(&names).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_preserves_order_and_duplicates() {
        let list = CipherSuiteList::decode([
            "TLS_ECDHE_RSA_WITH_RC4_128_SHA",
            "TLS_AES_128_GCM_SHA256",
            "TLS_ECDHE_RSA_WITH_RC4_128_SHA",
        ])
        .unwrap();
        assert_eq!(
            list.ids(),
            &[CipherSuiteId(0xc011), CipherSuiteId(0x1301), CipherSuiteId(0xc011)]
        );
    }

    #[test]
    fn test_decode_unknown_fails_fast() {
        let err =
            CipherSuiteList::decode(["TLS_AES_128_GCM_SHA256", "NOT_A_REAL_SUITE", "ALSO_BAD"])
                .unwrap_err();
        assert_eq!(err, TlsError::UnknownCipherSuite("NOT_A_REAL_SUITE".into()));
    }

    #[test]
    fn test_encode_reverses_decode() {
        let names = ["TLS_RSA_WITH_AES_256_CBC_SHA", "TLS_ECDHE_ECDSA_WITH_CHACHA20_POLY1305"];
        let list = CipherSuiteList::decode(names).unwrap();
        assert_eq!(list.encode().unwrap(), names);
    }

    #[test]
    fn test_encode_unnamed_code() {
        let list = CipherSuiteList::from(vec![CipherSuiteId(0x1301), CipherSuiteId(0xfafa)]);
        assert_eq!(list.encode().unwrap_err(), TlsError::UnknownCipherSuiteId(0xfafa));
        assert!(serde_json::to_string(&list).is_err());
    }

    #[test]
    fn test_serde_json() {
        let list: CipherSuiteList =
            serde_json::from_str(r#"["TLS_ECDHE_RSA_WITH_RC4_128_SHA"]"#).unwrap();
        assert_eq!(list.ids(), &[CipherSuiteId(0xc011)]);
        assert_eq!(
            serde_json::to_string(&list).unwrap(),
            r#"["TLS_ECDHE_RSA_WITH_RC4_128_SHA"]"#
        );

        let err = serde_json::from_str::<CipherSuiteList>(r#"["NOT_A_REAL_SUITE"]"#).unwrap_err();
        assert!(err.to_string().contains("unknown cipher suite: NOT_A_REAL_SUITE"));
    }

    #[test]
    fn test_empty_list_is_distinct_from_absent() {
        let list: Option<CipherSuiteList> = serde_json::from_str("[]").unwrap();
        assert_eq!(list, Some(CipherSuiteList::default()));
        let list: Option<CipherSuiteList> = serde_json::from_str("null").unwrap();
        assert_eq!(list, None);
    }

    #[test]
    fn test_rustls_interop() {
        let list = CipherSuiteList::decode(["TLS_AES_256_GCM_SHA384"]).unwrap();
        assert_eq!(list.to_rustls(), vec![rustls::CipherSuite::TLS13_AES_256_GCM_SHA384]);
        assert!(list.allows(rustls::CipherSuite::TLS13_AES_256_GCM_SHA384));
        assert!(!list.allows(rustls::CipherSuite::TLS13_AES_128_GCM_SHA256));
    }
}
