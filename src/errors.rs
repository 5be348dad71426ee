use thiserror::Error;

/// Error type covering trip state, persistence, and remote lookup failures.
#[derive(Debug, Error)]
pub enum TripError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("at least one day must remain in the trip")]
    LastDateRemaining,
    #[error("date `{0}` is not part of the trip")]
    DateNotFound(String),
    #[error("itinerary entry {id} not found on {date}")]
    EntryNotFound { date: String, id: i64 },
    #[error("expense {0} not found")]
    ExpenseNotFound(i64),
    #[error("shopping item #{index} out of range (list has {len} items)")]
    ShoppingIndexOutOfRange { index: usize, len: usize },
    #[error("import file is malformed: {0}")]
    MalformedImport(String),
    #[error("invalid exchange rate: {0}")]
    InvalidRate(f64),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("remote lookup failed: {0}")]
    Remote(String),
    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, TripError>;

impl From<reqwest::Error> for TripError {
    fn from(err: reqwest::Error) -> Self {
        TripError::Remote(err.to_string())
    }
}
