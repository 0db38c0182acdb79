//! Error types for delay distributions, the registry and the consistency check

/// Errors raised while building, loading, resolving or validating delay distributions.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A distribution descriptor is malformed: unknown `type`, missing or ill-typed
    /// field, or parameters that violate a variant's invariants.
    #[error("invalid delay distribution configuration: {0}")]
    InvalidConfiguration(String),

    /// A distribution config source could not be located.
    #[error("distribution config file '{name}' not found: {source}")]
    FileNotFound {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// A distribution config source exists but could not be read.
    #[error("failed to read distribution config file '{name}': {source}")]
    Read {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// A distribution config source is not a valid document.
    #[error("failed to parse distribution config file '{name}': {reason}")]
    Parse { name: String, reason: String },

    /// A file based distribution references a key the registry does not hold.
    #[error("cannot find file based distribution with key '{key}'")]
    LookupFailure { key: String },

    /// One or more mappings reference file based distribution keys that are not defined.
    #[error(
        "the following distribution keys are configured in mappings but do not exist in the distribution config files: {}",
        .keys.join(", ")
    )]
    MissingKeys { keys: Vec<String> },
}

impl Error {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }

    /// Keys reported by [`Error::MissingKeys`], empty for every other kind.
    pub fn missing_keys(&self) -> &[String] {
        match self {
            Self::MissingKeys { keys } => keys,
            _ => &[],
        }
    }
}
