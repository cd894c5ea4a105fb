/// Errors surfaced by the timeline engine.
///
/// None of these are fatal to rendering: callers log them and fall back to a
/// default view.
#[derive(Debug, Clone, PartialEq)]
pub enum TimelineError {
    InvalidRecord { id: String, reason: String },
    Storage(String),
    Serialization(String),
}

impl std::fmt::Display for TimelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimelineError::InvalidRecord { id, reason } => {
                write!(f, "Invalid claim record '{}': {}", id, reason)
            }
            TimelineError::Storage(msg) => write!(f, "Storage Error: {}", msg),
            TimelineError::Serialization(msg) => write!(f, "Serialization Error: {}", msg),
        }
    }
}

impl std::error::Error for TimelineError {}

impl From<serde_json::Error> for TimelineError {
    fn from(err: serde_json::Error) -> Self {
        TimelineError::Serialization(err.to_string())
    }
}

pub type TimelineResult<T> = Result<T, TimelineError>;
