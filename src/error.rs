use thiserror::Error;

/// Why a numeric text field cannot be used yet.
///
/// These are expected while the user is still typing. The engine absorbs them
/// where they occur and never surfaces them to the page.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("field is empty")]
    Empty,

    #[error("not a number: {0:?}")]
    NotANumber(String),

    #[error("{value} is not above {min}")]
    OutOfRange { value: f64, min: f64 },
}

#[derive(Debug, Error)]
pub enum CalculatorError {
    #[error("number of houses must be between 2 and 5, got {0}")]
    LegCount(usize),

    #[error("house index {0} is out of range")]
    LegIndex(usize),

    #[error("invalid settings query: {0}")]
    Query(#[from] serde_urlencoded::de::Error),

    #[error("unknown log level {0:?}")]
    LogLevel(String),

    #[error("logging already initialised: {0}")]
    Logging(String),
}
