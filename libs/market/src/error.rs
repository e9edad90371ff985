use thiserror::Error;

/// Failure taxonomy for provider fetches.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error("symbol empty or not recognized by the provider")]
    InvalidSymbol,
    #[error("provider unavailable: {0}")]
    ProviderUnavailable(String),
    #[error("unexpected response shape: {0}")]
    UnexpectedShape(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::UnexpectedShape(err.to_string())
        } else {
            Self::ProviderUnavailable(err.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    #[error("cannot render an empty series")]
    EmptySeries,
    #[error("value field {0:?} missing from every point")]
    MissingField(&'static str),
    #[error("chart backend failed: {0}")]
    Backend(String),
}
