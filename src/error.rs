use thiserror::Error;

#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Bootstrap error: {0}")]
    Bootstrap(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Filament position {0} is out of range")]
    OutOfRange(usize),

    #[error("Exchange rate unavailable: {0}")]
    RateUnavailable(String),

    #[error("Exchange rate fetch failed: {0}")]
    RateFetchFailed(String),
}

impl From<QuoteError> for String {
    fn from(err: QuoteError) -> Self {
        err.to_string()
    }
}
