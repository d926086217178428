use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("alert payload must be a JSON object")]
    NotAnObject,
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("unsupported action {0:?}, expected buy or sell")]
    InvalidAction(String),
    #[error("symbol must not be empty")]
    EmptySymbol,
    #[error("symbol must be a string, got {0}")]
    InvalidSymbol(String),
    #[error("field `{field}` is not a valid number: {value}")]
    InvalidNumber { field: &'static str, value: String },
    #[error("quantity must be greater than zero, got {0}")]
    NonPositiveQuantity(String),
}

#[derive(Debug, Error)]
pub enum SigningError {
    #[error("api secret is empty")]
    EmptySecret,
    #[error("invalid signing key: {0}")]
    InvalidKey(String),
    #[error("failed to encode order body: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Every way a single alert can fail on its way to the exchange.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Signing(#[from] SigningError),
    #[error("exchange unreachable: {message}")]
    Transport { message: String, timed_out: bool },
    #[error("exchange rejected order ({code}): {message}")]
    Exchange { code: i64, message: String },
}

impl RelayError {
    pub fn kind(&self) -> &'static str {
        match self {
            RelayError::Validation(_) => "validation",
            RelayError::Signing(_) => "signing",
            RelayError::Transport { .. } => "transport",
            RelayError::Exchange { .. } => "exchange",
        }
    }
}

impl From<reqwest::Error> for RelayError {
    fn from(err: reqwest::Error) -> Self {
        RelayError::Transport {
            timed_out: err.is_timeout(),
            message: err.to_string(),
        }
    }
}
