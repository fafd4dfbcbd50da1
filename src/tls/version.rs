//! Protocol versions and version-range constraints.
//!
//! # Wire Forms
//! ```text
//! "tls1.2"                          → { min: tls1.2, max: tls1.2 }
//! { "min": "tls1.0", "max": "" }    → { min: tls1.0, max: any }
//! ""  / absent bound                → unspecified (any)
//! ```
//! Encoding always produces the `{min, max}` object.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::{TlsError, TlsResult};
use super::symbols;

/// A TLS/SSL protocol revision. Ordered by wire code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u16)]
pub enum ProtocolVersion {
    /// No constraint; any version is acceptable.
    #[default]
    Unspecified = 0,
    Ssl30 = 0x0300,
    Tls10 = 0x0301,
    Tls11 = 0x0302,
    Tls12 = 0x0303,
    Tls13 = 0x0304,
}

impl ProtocolVersion {
    /// Decode a symbolic name. The empty string is `Unspecified`.
    pub fn decode(name: &str) -> TlsResult<Self> {
        if name.is_empty() {
            return Ok(Self::Unspecified);
        }
        symbols::version_from_name(name)
            .ok_or_else(|| TlsError::UnknownVersionName(name.to_string()))
    }

    /// Symbolic name; `""` for `Unspecified`.
    pub fn name(self) -> &'static str {
        symbols::version_name(self)
    }

    /// The wire code a TLS stack negotiates with (0 when unspecified).
    pub const fn wire_code(self) -> u16 {
        self as u16
    }

    pub fn is_specified(self) -> bool {
        self != Self::Unspecified
    }

    /// The matching rustls protocol version, for the revisions rustls implements.
    pub fn to_rustls(self) -> Option<&'static rustls::SupportedProtocolVersion> {
        match self {
            Self::Tls12 => Some(&rustls::version::TLS12),
            Self::Tls13 => Some(&rustls::version::TLS13),
            _ => None,
        }
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unspecified => f.write_str("any"),
            v => f.write_str(v.name()),
        }
    }
}

impl FromStr for ProtocolVersion {
    type Err = TlsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

impl Serialize for ProtocolVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for ProtocolVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Self::decode(&name).map_err(de::Error::custom)
    }
}

/// An allowed range of protocol versions. Either bound may be unspecified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct VersionRange {
    /// Minimum allowed version, unspecified = any.
    pub min: ProtocolVersion,
    /// Maximum allowed version, unspecified = any.
    pub max: ProtocolVersion,
}

impl VersionRange {
    /// A range pinned to exactly one version.
    pub fn single(version: ProtocolVersion) -> Self {
        Self {
            min: version,
            max: version,
        }
    }

    /// Build a range, rejecting `min > max` when both are specified.
    pub fn new(min: ProtocolVersion, max: ProtocolVersion) -> TlsResult<Self> {
        let range = Self { min, max };
        range.check_order()?;
        Ok(range)
    }

    /// Decode either a scalar version name or a `{min, max}` object.
    pub fn decode(input: &Value) -> TlsResult<Self> {
        match input {
            Value::Object(fields) => Self::new(
                decode_bound(fields.get("min"), "TLS version range min")?,
                decode_bound(fields.get("max"), "TLS version range max")?,
            ),
            Value::String(name) => Ok(Self::single(ProtocolVersion::decode(name)?)),
            other => Err(TlsError::MalformedShape {
                what: "TLS version range",
                expected: "a version name or a {min, max} object",
                got: describe(other),
            }),
        }
    }

    /// Whether `version` falls within this range.
    pub fn contains(&self, version: ProtocolVersion) -> bool {
        (!self.min.is_specified() || version >= self.min)
            && (!self.max.is_specified() || version <= self.max)
    }

    /// The rustls protocol versions permitted by this range.
    pub fn rustls_versions(&self) -> Vec<&'static rustls::SupportedProtocolVersion> {
        [ProtocolVersion::Tls12, ProtocolVersion::Tls13]
            .into_iter()
            .filter(|v| self.contains(*v))
            .filter_map(ProtocolVersion::to_rustls)
            .collect()
    }

    fn check_order(&self) -> TlsResult<()> {
        if self.min.is_specified() && self.max.is_specified() && self.min > self.max {
            return Err(TlsError::InvertedVersionRange {
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

impl<'de> Deserialize<'de> for VersionRange {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::decode(&value).map_err(de::Error::custom)
    }
}

fn decode_bound(bound: Option<&Value>, what: &'static str) -> TlsResult<ProtocolVersion> {
    match bound {
        None | Some(Value::Null) => Ok(ProtocolVersion::Unspecified),
        Some(Value::String(name)) => ProtocolVersion::decode(name),
        Some(other) => Err(TlsError::MalformedShape {
            what,
            expected: "a version name",
            got: describe(other),
        }),
    }
}

/// Short description of a JSON value for diagnostics.
pub(crate) fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("boolean {b}"),
        Value::Number(n) => format!("number {n}"),
        Value::String(s) => format!("string {s:?}"),
        Value::Array(items) => format!("array of {} items", items.len()),
        Value::Object(_) => "object".to_string(),
    }
}
