use thiserror::Error;

/// Failure to turn a provider payload into display rows.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("missing {0}")]
    Missing(&'static str),

    #[error("invalid {0}")]
    Invalid(&'static str),

    #[error("malformed payload: {0}")]
    Payload(#[source] serde_json::Error),
}
