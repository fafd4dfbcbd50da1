//! Options validation.
//!
//! # Responsibilities
//! - Semantic validation (serde and the TLS decoders handle syntax)
//! - Value ranges: counts are never negative
//! - Cross-field checks: `vus` does not exceed `vusMax`
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Runs on the resolved options, never on an individual layer, since a
//!   layer may rely on another layer for a related field

use std::fmt;

use crate::config::schema::Options;

/// A single semantic problem with a set of options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// JSON name of the offending field.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate resolved options.
pub fn validate_options(options: &Options) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let counts = [
        ("vus", options.vus),
        ("vusMax", options.vus_max),
        ("iterations", options.iterations),
        ("rps", options.rps),
        ("maxRedirects", options.max_redirects),
        ("batch", options.batch),
        ("batchPerHost", options.batch_per_host),
    ];
    for (field, value) in counts {
        if let Some(v) = value.filter(|v| *v < 0) {
            errors.push(ValidationError::new(field, format!("must not be negative, got {v}")));
        }
    }

    if let (Some(vus), Some(vus_max)) = (options.vus, options.vus_max) {
        if vus > vus_max {
            errors.push(ValidationError::new(
                "vus",
                format!("{vus} exceeds vusMax {vus_max}"),
            ));
        }
    }

    for (i, stage) in options.stages.iter().flatten().enumerate() {
        if stage.duration.is_none() {
            errors.push(ValidationError::new(format!("stages[{i}]"), "duration is required"));
        }
        if let Some(target) = stage.target.filter(|t| *t < 0) {
            errors.push(ValidationError::new(
                format!("stages[{i}]"),
                format!("target must not be negative, got {target}"),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
