//! Run options schema.
//!
//! Every field is independently optional. Scalars use `Option<T>` so that
//! "unset" is distinct from an explicit zero value; containers use
//! `Option<Vec<_>>` / `Option<BTreeMap<_, _>>` so that "not provided" is
//! distinct from "provided but empty".

use std::collections::BTreeMap;
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::tls::{CipherSuiteList, ClientCertificate, VersionRange};

/// Options for a test run.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Options {
    /// Should the run start in a paused state?
    pub paused: Option<bool>,

    /// Initial VUs, max VUs, duration cap, iteration cap, and stages.
    pub vus: Option<i64>,
    pub vus_max: Option<i64>,
    #[serde(with = "duration_opt")]
    pub duration: Option<Duration>,
    pub iterations: Option<i64>,
    pub stages: Option<Vec<Stage>>,

    /// Limit HTTP requests per second.
    pub rps: Option<i64>,

    /// How many HTTP redirects to follow.
    pub max_redirects: Option<i64>,

    /// Default User-Agent for HTTP requests.
    pub user_agent: Option<String>,

    /// Parallel batch requests allowed, in total and per host.
    pub batch: Option<i64>,
    pub batch_per_host: Option<i64>,

    /// Log all HTTP requests and responses ("headers" or "full").
    pub http_debug: Option<String>,

    /// Accept invalid or untrusted TLS certificates.
    #[serde(rename = "insecureSkipTLSVerify")]
    pub insecure_skip_tls_verify: Option<bool>,

    /// TLS cipher suites, versions and client certificates.
    pub tls_cipher_suites: Option<CipherSuiteList>,
    pub tls_version: Option<VersionRange>,
    #[serde(rename = "tlsAuth")]
    pub tls_auth: Option<Vec<ClientCertificate>>,

    /// Treat warnings (eg. failed HTTP requests) as errors.
    pub throw: Option<bool>,

    /// Thresholds keyed by metric name, eg. `"http_req_duration{status:200}"`.
    pub thresholds: Option<BTreeMap<String, Thresholds>>,

    /// IP ranges the run may not contact.
    #[serde(rename = "blacklistIPs")]
    pub blacklist_ips: Option<Vec<IpNet>>,

    /// DNS overrides.
    pub hosts: Option<BTreeMap<String, IpAddr>>,

    /// Do not reuse connections between iterations.
    pub no_connection_reuse: Option<bool>,

    /// Opaque values for third-party collectors. Not settable from env.
    #[serde(rename = "ext")]
    pub external: Option<BTreeMap<String, Value>>,

    /// Trend statistics shown in the end-of-run summary.
    #[serde(alias = "SummaryTrendStats")]
    pub summary_trend_stats: Option<Vec<String>>,
}

impl Options {
    /// The first client certificate whose domain patterns match `host`.
    pub fn client_certificate_for(&self, host: &str) -> Option<&ClientCertificate> {
        self.tls_auth
            .as_deref()?
            .iter()
            .find(|cert| cert.matches_host(host))
    }

    /// Whether `ip` falls inside any blacklisted range.
    pub fn is_blacklisted(&self, ip: IpAddr) -> bool {
        self.blacklist_ips
            .as_deref()
            .is_some_and(|nets| nets.iter().any(|net| net.contains(ip)))
    }
}

/// One ramping stage: reach `target` VUs over `duration`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Stage {
    #[serde(with = "duration_opt")]
    pub duration: Option<Duration>,
    pub target: Option<i64>,
}

/// Parses `"30s"` or `"30s:10"`.
impl FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (duration, target) = match s.split_once(':') {
            Some((d, t)) => (d, Some(t)),
            None => (s, None),
        };
        let duration = parse_duration(duration.trim())
            .map_err(|e| format!("invalid stage duration {duration:?}: {e}"))?;
        let target = target
            .map(|t| t.trim().parse::<i64>())
            .transpose()
            .map_err(|e| format!("invalid stage target in {s:?}: {e}"))?;
        Ok(Self {
            duration: Some(duration),
            target,
        })
    }
}

/// Threshold expressions for a single metric, eg. `["p(95)<500"]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Thresholds(pub Vec<String>);

/// Error for CIDR range text that does not parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid CIDR range: {0}")]
pub struct InvalidCidr(pub String);

/// An IP network in CIDR notation. The address is stored masked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IpNet {
    addr: IpAddr,
    prefix_len: u8,
}

impl IpNet {
    pub fn new(addr: IpAddr, prefix_len: u8) -> Result<Self, InvalidCidr> {
        let max = if addr.is_ipv4() { 32 } else { 128 };
        if prefix_len > max {
            return Err(InvalidCidr(format!("{addr}/{prefix_len}")));
        }
        Ok(Self {
            addr: mask(addr, prefix_len),
            prefix_len,
        })
    }

    pub fn addr(&self) -> IpAddr {
        self.addr
    }

    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    /// IPv4-mapped IPv6 addresses (`::ffff:a.b.c.d`) match IPv4 networks.
    pub fn contains(&self, ip: IpAddr) -> bool {
        let ip = match (ip, self.addr) {
            (IpAddr::V6(v6), IpAddr::V4(_)) => v6.to_ipv4_mapped().map_or(ip, IpAddr::V4),
            _ => ip,
        };
        ip.is_ipv4() == self.addr.is_ipv4() && mask(ip, self.prefix_len) == self.addr
    }
}

fn mask(addr: IpAddr, prefix_len: u8) -> IpAddr {
    match addr {
        IpAddr::V4(v4) => {
            let bits = u32::from(v4);
            let mask = u32::MAX.checked_shl(32 - u32::from(prefix_len)).unwrap_or(0);
            IpAddr::V4((bits & mask).into())
        }
        IpAddr::V6(v6) => {
            let bits = u128::from(v6);
            let mask = u128::MAX.checked_shl(128 - u32::from(prefix_len)).unwrap_or(0);
            IpAddr::V6((bits & mask).into())
        }
    }
}

impl FromStr for IpNet {
    type Err = InvalidCidr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidCidr(s.to_string());
        let (addr, len) = s.split_once('/').ok_or_else(invalid)?;
        let addr: IpAddr = addr.parse().map_err(|_| invalid())?;
        let len: u8 = len.parse().map_err(|_| invalid())?;
        Self::new(addr, len).map_err(|_| invalid())
    }
}

impl fmt::Display for IpNet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.addr, self.prefix_len)
    }
}

impl Serialize for IpNet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for IpNet {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Parse a human-readable duration such as `"30s"` or `"1m30s"`.
pub fn parse_duration(text: &str) -> Result<Duration, humantime::DurationError> {
    humantime::parse_duration(text)
}

/// Serde adapter: `Option<Duration>` as a humantime string.
mod duration_opt {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => serializer.collect_str(&humantime::format_duration(*d)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|text| super::parse_duration(&text).map_err(serde::de::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn test_default_is_all_unset() {
        let options = Options::default();
        assert_eq!(options.vus, None);
        assert_eq!(options.stages, None);
        assert_eq!(options.tls_version, None);
    }

    #[test]
    fn test_zero_value_is_set() {
        let options: Options =
            serde_json::from_str(r#"{"paused": false, "vus": 0, "stages": []}"#).unwrap();
        assert_eq!(options.paused, Some(false));
        assert_eq!(options.vus, Some(0));
        assert_eq!(options.stages, Some(vec![]));
        assert_eq!(options.hosts, None);
    }

    #[test]
    fn test_json_field_names() {
        let options: Options = serde_json::from_str(
            r#"{
                "vusMax": 20,
                "duration": "1m30s",
                "insecureSkipTLSVerify": true,
                "tlsCipherSuites": ["TLS_ECDHE_RSA_WITH_RC4_128_SHA"],
                "tlsVersion": "tls1.2",
                "blacklistIPs": ["10.0.0.0/8"],
                "hosts": {"test.local": "127.0.0.1"},
                "ext": {"cloud": {"name": "demo"}},
                "SummaryTrendStats": ["avg", "p(95)"]
            }"#,
        )
        .unwrap();
        assert_eq!(options.vus_max, Some(20));
        assert_eq!(options.duration, Some(Duration::from_secs(90)));
        assert_eq!(options.insecure_skip_tls_verify, Some(true));
        assert_eq!(options.tls_cipher_suites.unwrap().len(), 1);
        assert_eq!(options.hosts.unwrap()["test.local"], IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert!(options.external.unwrap().contains_key("cloud"));
        assert_eq!(options.summary_trend_stats.unwrap(), vec!["avg", "p(95)"]);
    }

    #[test]
    fn test_duration_round_trip() {
        let options = Options {
            duration: Some(Duration::from_secs(90)),
            ..Default::default()
        };
        let text = serde_json::to_string(&options).unwrap();
        let back: Options = serde_json::from_str(&text).unwrap();
        assert_eq!(back.duration, Some(Duration::from_secs(90)));
    }

    #[test]
    fn test_stage_from_str() {
        let stage: Stage = "30s:10".parse().unwrap();
        assert_eq!(stage.duration, Some(Duration::from_secs(30)));
        assert_eq!(stage.target, Some(10));

        let stage: Stage = "2m".parse().unwrap();
        assert_eq!(stage.target, None);

        assert!("soon:10".parse::<Stage>().is_err());
        assert!("30s:many".parse::<Stage>().is_err());
    }

    #[test]
    fn test_ip_net() {
        let net: IpNet = "10.1.2.3/8".parse().unwrap();
        assert_eq!(net.to_string(), "10.0.0.0/8");
        assert!(net.contains("10.200.0.1".parse().unwrap()));
        assert!(!net.contains("11.0.0.1".parse().unwrap()));
        assert!(!net.contains("::1".parse().unwrap()));

        let all: IpNet = "0.0.0.0/0".parse().unwrap();
        assert!(all.contains("192.168.1.1".parse().unwrap()));

        let v6: IpNet = "fd00::/8".parse().unwrap();
        assert!(v6.contains("fd12::1".parse().unwrap()));

        assert!("10.0.0.0/33".parse::<IpNet>().is_err());
        assert!("10.0.0.0".parse::<IpNet>().is_err());
    }

    #[test]
    fn test_is_blacklisted() {
        let options = Options {
            blacklist_ips: Some(vec!["192.168.0.0/16".parse().unwrap()]),
            ..Default::default()
        };
        assert!(options.is_blacklisted("192.168.10.1".parse().unwrap()));
        assert!(!options.is_blacklisted("8.8.8.8".parse().unwrap()));
        assert!(!Options::default().is_blacklisted("8.8.8.8".parse().unwrap()));
    }

    #[test]
    fn test_is_blacklisted_ipv4_mapped() {
        let options = Options {
            blacklist_ips: Some(vec!["10.0.0.0/8".parse().unwrap()]),
            ..Default::default()
        };
        assert!(options.is_blacklisted("10.1.2.3".parse().unwrap()));
        assert!(options.is_blacklisted("::ffff:10.1.2.3".parse().unwrap()));
        assert!(!options.is_blacklisted("::ffff:11.1.2.3".parse().unwrap()));
        assert!(!options.is_blacklisted("::1".parse().unwrap()));

        // IPv6 networks still compare natively.
        let net: IpNet = "::ffff:0:0/96".parse().unwrap();
        assert!(net.contains("::ffff:10.1.2.3".parse().unwrap()));
        assert!(!net.contains("10.1.2.3".parse().unwrap()));
    }
}
