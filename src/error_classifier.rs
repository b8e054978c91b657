use crate::api::error::ApiError;
use crate::logging::LogLevel;

#[derive(Debug, Clone)]
pub struct ErrorClassifier;

impl ErrorClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn classify_fetch_error(&self, error: &ApiError) -> LogLevel {
        if let ApiError::Decode(_) = error {
            // Malformed responses won't fix themselves on the next tick
            return LogLevel::Error;
        }
        match error.status() {
            // Throttling, the next tick retries anyway
            Some(429) => LogLevel::Debug,
            // Auth problems need the operator
            Some(401 | 403) => LogLevel::Error,
            Some(500..=599) => LogLevel::Warn,
            // Network issues - usually temporary
            _ => LogLevel::Warn,
        }
    }
}

impl Default for ErrorClassifier {
    fn default() -> Self {
        Self::new()
    }
}
