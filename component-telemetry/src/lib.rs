//! Observability utilities for flowkit binaries.

#![warn(missing_docs, clippy::pedantic)]

pub mod tracing_support {
    //! Structured tracing helpers.

    use thiserror::Error;
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::filter::ParseError;

    /// Result alias for telemetry setup.
    pub type TelemetryResult<T> = Result<T, TelemetryError>;

    /// Errors raised while installing the tracing subscriber.
    #[derive(Debug, Error)]
    pub enum TelemetryError {
        /// The fallback filter directive does not parse.
        #[error("invalid log filter `{directive}`: {source}")]
        InvalidFilter {
            /// Directive that failed to parse.
            directive: String,
            /// Parser error.
            source: ParseError,
        },

        /// A global subscriber is already installed.
        #[error("tracing subscriber already installed: {reason}")]
        AlreadyInitialized {
            /// Error reported by the subscriber registry.
            reason: String,
        },
    }

    /// Builds the filter used by [`init`].
    ///
    /// `RUST_LOG` wins when set and valid; otherwise `default_directive`
    /// applies.
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryError::InvalidFilter`] if `default_directive` is
    /// needed and does not parse.
    pub fn env_filter(default_directive: &str) -> TelemetryResult<EnvFilter> {
        EnvFilter::try_from_default_env().or_else(|_| {
            EnvFilter::try_new(default_directive).map_err(|source| TelemetryError::InvalidFilter {
                directive: default_directive.to_owned(),
                source,
            })
        })
    }

    /// Installs a formatted subscriber as the global default.
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryError::InvalidFilter`] for a bad fallback directive
    /// and [`TelemetryError::AlreadyInitialized`] when a subscriber is already
    /// installed.
    pub fn init(default_directive: &str) -> TelemetryResult<()> {
        let filter = env_filter(default_directive)?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .try_init()
            .map_err(|err| TelemetryError::AlreadyInitialized {
                reason: err.to_string(),
            })
    }

}
