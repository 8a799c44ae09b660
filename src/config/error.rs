use anyerror::AnyError;

/// Error variants related to configuration.
#[derive(Debug, thiserror::Error)]
#[derive(PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to parse configuration from command-line arguments.
    #[error("ParseError: {source} while parsing ({args:?})")]
    ParseError {
        /// The underlying parse error.
        source: AnyError,
        /// The arguments that failed to parse.
        args: Vec<String>,
    },

    /// A rate window must be able to retain at least one sample.
    #[error("rate_window_capacity must be > 0")]
    RateWindowCapacityIs0,
}
