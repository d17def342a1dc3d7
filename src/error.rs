use thiserror::Error;

/// Result alias used across the library.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// More words were requested than the vocabulary holds.
    #[error("requested {requested} words but only {available} are available")]
    InsufficientData { requested: usize, available: usize },

    /// Programming or configuration mistake caught before a session starts.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("error reading vocabulary or config: {0}")]
    Io(#[from] std::io::Error),

    #[error("error parsing json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to initialise logging: {0}")]
    Logging(String),
}

impl Error {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidConfiguration(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_data_message() {
        let err = Error::InsufficientData {
            requested: 20,
            available: 15,
        };
        assert_eq!(
            err.to_string(),
            "requested 20 words but only 15 are available"
        );
    }

    #[test]
    fn test_invalid_helper() {
        let err = Error::invalid("odd tile count");
        assert!(matches!(err, Error::InvalidConfiguration(ref m) if m == "odd tile count"));
    }

    #[test]
    fn test_json_error_converts() {
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{");
        let err: Error = parse.unwrap_err().into();
        assert!(matches!(err, Error::Json(_)));
    }
}
