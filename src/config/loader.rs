//! Options loading from text, disk and layered sources.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::Options;
use crate::config::validation::{validate_options, ValidationError};

/// Error type for options loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("unsupported options file format: {0}")]
    UnsupportedFormat(String),

    /// An environment variable holds a value that does not parse.
    #[error("invalid value in {var}: {reason}")]
    Env { var: String, reason: String },

    #[error("validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl Options {
    /// Parse options from a JSON document.
    pub fn from_json_str(text: &str) -> Result<Options, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Parse options from a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Options, ConfigError> {
        Ok(toml::from_str(text)?)
    }
}

/// Load one options layer from a `.json` or `.toml` file.
///
/// The layer is not validated on its own; see [`resolve`].
pub fn load_options(path: &Path) -> Result<Options, ConfigError> {
    let content = fs::read_to_string(path)?;

    let options = match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Options::from_json_str(&content),
        Some("toml") => Options::from_toml_str(&content),
        _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
    };

    match &options {
        Ok(_) => tracing::info!(path = %path.display(), "Options layer loaded"),
        Err(e) => tracing::warn!(path = %path.display(), error = %e, "Rejected options layer"),
    }
    options
}

/// Merge layers left to right and validate the result.
pub fn resolve<I>(layers: I) -> Result<Options, ConfigError>
where
    I: IntoIterator<Item = Options>,
{
    let options = Options::layered(layers);
    validate_options(&options).map_err(ConfigError::Validation)?;
    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_toml_str() {
        let options = Options::from_toml_str(
            r#"
            vus = 10
            duration = "30s"
            tlsVersion = { min = "tls1.1", max = "tls1.3" }
            tlsCipherSuites = ["TLS_AES_128_GCM_SHA256"]
            "#,
        )
        .unwrap();
        assert_eq!(options.vus, Some(10));
        assert_eq!(options.tls_version.unwrap().max, crate::tls::ProtocolVersion::Tls13);
        assert_eq!(options.tls_cipher_suites.unwrap().len(), 1);
    }

    #[test]
    fn test_from_json_str_reports_unknown_version() {
        let err = Options::from_json_str(r#"{"tlsVersion": "tls9.9"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
        assert!(err.to_string().contains("unknown TLS version: tls9.9"));
    }

    #[test]
    fn test_resolve_validates_merged_result() {
        let base = Options {
            vus_max: Some(5),
            ..Default::default()
        };
        let over = Options {
            vus: Some(10),
            ..Default::default()
        };
        let err = resolve([base, over]).unwrap_err();
        assert!(err.to_string().contains("vus: 10 exceeds vusMax 5"));
    }
}
