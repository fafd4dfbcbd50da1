//! Environment-variable bindings for options.
//!
//! Each field has a binding name; the variable read is `{PREFIX}_{BINDING}`
//! upper-cased (eg. `LOAD_VUS_MAX`). An unset variable leaves the field
//! unset. `ext` has no binding.
//!
//! | Binding                    | Format                                  |
//! |----------------------------|-----------------------------------------|
//! | booleans                   | `true` / `false` / `1` / `0`            |
//! | integers                   | decimal                                 |
//! | `duration`                 | `30s`, `1m30s`                          |
//! | `stages`                   | `30s:10,1m:20`                          |
//! | `tls_cipher_suites`        | comma-separated names                   |
//! | `tls_version`              | `tls1.2` or `{"min":…,"max":…}`         |
//! | `tlsauth`, `thresholds`, `hosts` | JSON                              |
//! | `blacklist_ips`, `summary_trend_stats` | comma-separated           |

use std::collections::BTreeMap;
use std::convert::Infallible;
use std::fmt::Display;
use std::net::IpAddr;

use serde_json::Value;

use crate::config::loader::ConfigError;
use crate::config::schema::{parse_duration, IpNet, Options, Stage, Thresholds};
use crate::tls::{CipherSuiteList, ClientCertificate, VersionRange};

struct EnvSource<'a, F> {
    prefix: &'a str,
    lookup: F,
}

impl<F> EnvSource<'_, F>
where
    F: Fn(&str) -> Option<String>,
{
    fn var_name(&self, binding: &str) -> String {
        if self.prefix.is_empty() {
            binding.to_uppercase()
        } else {
            format!("{}_{}", self.prefix, binding).to_uppercase()
        }
    }

    fn get<T, E, P>(&self, binding: &str, parse: P) -> Result<Option<T>, ConfigError>
    where
        E: Display,
        P: FnOnce(&str) -> Result<T, E>,
    {
        let var = self.var_name(binding);
        let Some(raw) = (self.lookup)(&var) else {
            return Ok(None);
        };
        match parse(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!(var = %var, "Rejected environment override");
                Err(ConfigError::Env {
                    var,
                    reason: e.to_string(),
                })
            }
        }
    }
}

impl Options {
    /// Read options from the process environment.
    pub fn from_env(prefix: &str) -> Result<Options, ConfigError> {
        Self::from_env_with(prefix, |name| std::env::var(name).ok())
    }

    /// Read options through `lookup`, which maps a variable name to its value.
    pub fn from_env_with<F>(prefix: &str, lookup: F) -> Result<Options, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = EnvSource { prefix, lookup };
        Ok(Options {
            paused: env.get("paused", parse_bool)?,
            vus: env.get("vus", parse_int)?,
            vus_max: env.get("vus_max", parse_int)?,
            duration: env.get("duration", |s| parse_duration(s.trim()))?,
            iterations: env.get("iterations", parse_int)?,
            stages: env.get("stages", parse_stages)?,
            rps: env.get("rps", parse_int)?,
            max_redirects: env.get("max_redirects", parse_int)?,
            user_agent: env.get("user_agent", parse_string)?,
            batch: env.get("batch", parse_int)?,
            batch_per_host: env.get("batch_per_host", parse_int)?,
            http_debug: env.get("http_debug", parse_string)?,
            insecure_skip_tls_verify: env.get("insecure_skip_tls_verify", parse_bool)?,
            tls_cipher_suites: env.get("tls_cipher_suites", |s| {
                CipherSuiteList::decode(split_list(s))
            })?,
            tls_version: env.get("tls_version", parse_version_range)?,
            tls_auth: env.get("tlsauth", |s| serde_json::from_str::<Vec<ClientCertificate>>(s))?,
            throw: env.get("throw", parse_bool)?,
            thresholds: env.get("thresholds", |s| {
                serde_json::from_str::<BTreeMap<String, Thresholds>>(s)
            })?,
            blacklist_ips: env.get("blacklist_ips", |s| {
                split_list(s).map(str::parse::<IpNet>).collect::<Result<Vec<_>, _>>()
            })?,
            hosts: env.get("hosts", |s| serde_json::from_str::<BTreeMap<String, IpAddr>>(s))?,
            no_connection_reuse: env.get("no_connection_reuse", parse_bool)?,
            external: None,
            summary_trend_stats: env.get("summary_trend_stats", |s| {
                Ok::<_, Infallible>(split_list(s).map(String::from).collect())
            })?,
        })
    }
}

fn parse_bool(s: &str) -> Result<bool, String> {
    match s.trim() {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
        other => Err(format!("expected a boolean, got {other:?}")),
    }
}

fn parse_int(s: &str) -> Result<i64, std::num::ParseIntError> {
    s.trim().parse()
}

fn parse_string(s: &str) -> Result<String, Infallible> {
    Ok(s.to_string())
}

fn parse_stages(s: &str) -> Result<Vec<Stage>, String> {
    split_list(s).map(str::parse).collect()
}

fn parse_version_range(s: &str) -> Result<VersionRange, String> {
    let s = s.trim();
    let value = if s.starts_with('{') {
        serde_json::from_str::<Value>(s).map_err(|e| e.to_string())?
    } else {
        Value::String(s.to_string())
    };
    VersionRange::decode(&value).map_err(|e| e.to_string())
}

/// Comma-separated items, trimmed. An empty value is an empty list.
fn split_list(s: &str) -> impl Iterator<Item = &str> {
    s.split(',').map(str::trim).filter(|item| !item.is_empty())
}
