//! Layered override merge.
//!
//! # Responsibilities
//! - Combine a base `Options` with an override, field by field
//! - Fold any number of layers strictly left to right
//!
//! # Design Decisions
//! - A field set in the override replaces the base field wholesale; lists,
//!   maps and nested values are never merged element-wise
//! - An unset override field never clobbers the base
//! - The override is destructured exhaustively, so adding a field to
//!   `Options` without merging it fails to compile
//! - No validation happens here; merge cannot fail

use crate::config::schema::Options;

macro_rules! override_set_fields {
    ($base:ident, $opts:expr; $($field:ident),+ $(,)?) => {{
        let Options { $($field),+ } = $opts;
        $(
            if $field.is_some() {
                $base.$field = $field;
            }
        )+
    }};
}

impl Options {
    /// Returns the result of overwriting any fields with those set on `opts`.
    ///
    /// ```
    /// use run_options::Options;
    ///
    /// let a = Options { vus: Some(10), vus_max: Some(10), ..Default::default() };
    /// let b = Options { vus: Some(5), ..Default::default() };
    /// let merged = a.apply(b);
    /// assert_eq!(merged.vus, Some(5));
    /// assert_eq!(merged.vus_max, Some(10));
    /// ```
    #[must_use]
    pub fn apply(self, opts: Options) -> Options {
        let mut merged = self;
        override_set_fields!(merged, opts;
            paused,
            vus,
            vus_max,
            duration,
            iterations,
            stages,
            rps,
            max_redirects,
            user_agent,
            batch,
            batch_per_host,
            http_debug,
            insecure_skip_tls_verify,
            tls_cipher_suites,
            tls_version,
            tls_auth,
            throw,
            thresholds,
            blacklist_ips,
            hosts,
            no_connection_reuse,
            external,
            summary_trend_stats,
        );
        merged
    }

    /// Fold layers left to right; later layers win per field.
    pub fn layered<I>(layers: I) -> Options
    where
        I: IntoIterator<Item = Options>,
    {
        let mut count = 0usize;
        let merged = layers.into_iter().fold(Options::default(), |acc, layer| {
            count += 1;
            acc.apply(layer)
        });
        tracing::debug!(layers = count, "Merged option layers");
        merged
    }
}
