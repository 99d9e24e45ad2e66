//! Error types for Vicinity operations

use thiserror::Error;

/// Place-directory collaborator errors.
///
/// These are fatal on the request path: a failed directory call fails the
/// whole request, since there is no raw-candidate fallback.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("Directory request failed with status {status}: {message}")]
    RequestFailed { status: u16, message: String },

    #[error("Directory transport error: {message}")]
    Transport { message: String },

    #[error("Directory request timed out")]
    Timeout,

    #[error("Invalid directory response: {reason}")]
    InvalidResponse { reason: String },
}

/// Insight-engine collaborator errors.
///
/// Recovered per item: a failed enhancement call degrades that single
/// record to the fallback, never the batch.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InsightError {
    #[error("Insight engine request failed with status {status}: {message}")]
    RequestFailed { status: u16, message: String },

    #[error("Insight engine transport error: {message}")]
    Transport { message: String },

    #[error("Insight engine request timed out")]
    Timeout,

    #[error("Invalid insight engine response: {reason}")]
    InvalidResponse { reason: String },
}

/// Cache store errors.
///
/// Always recovered locally: a failed read is a miss, a failed write is
/// skipped. The cache is a latency optimization, never a correctness
/// dependency.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CacheError {
    #[error("Cache store unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("Cache serialization failed: {reason}")]
    Serialization { reason: String },
}

/// Query validation errors. Fail fast, before any downstream call.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum QueryError {
    #[error("Latitude and longitude are required")]
    MissingCoordinates,

    #[error("Invalid value for {field}: {value}")]
    InvalidCoordinate { field: &'static str, value: f64 },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration field: {field}")]
    MissingRequired { field: String },

    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Master error type for all Vicinity errors.
#[derive(Debug, Clone, Error)]
pub enum VicinityError {
    #[error("Directory error: {0}")]
    Directory(#[from] DirectoryError),

    #[error("Insight error: {0}")]
    Insight(#[from] InsightError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Query error: {0}")]
    Query(#[from] QueryError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias used across the workspace.
pub type VicinityResult<T> = Result<T, VicinityError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_error_display() {
        let err = DirectoryError::RequestFailed {
            status: 502,
            message: "bad gateway".to_string(),
        };
        let display = format!("{}", err);
        assert!(display.contains("502"));
        assert!(display.contains("bad gateway"));
    }

    #[test]
    fn test_master_error_from_conversions() {
        let err: VicinityError = DirectoryError::Timeout.into();
        assert!(matches!(err, VicinityError::Directory(DirectoryError::Timeout)));

        let err: VicinityError = CacheError::Unavailable {
            reason: "connection refused".to_string(),
        }
        .into();
        assert!(matches!(err, VicinityError::Cache(_)));

        let err: VicinityError = QueryError::MissingCoordinates.into();
        assert!(format!("{}", err).contains("Latitude and longitude"));
    }

    #[test]
    fn test_insight_error_is_not_fatal_taxonomy() {
        // The recoverable and fatal upstream paths are distinct types, so a
        // match on VicinityError can never confuse them.
        let fatal: VicinityError = DirectoryError::Timeout.into();
        let recoverable: VicinityError = InsightError::Timeout.into();
        assert!(matches!(fatal, VicinityError::Directory(_)));
        assert!(matches!(recoverable, VicinityError::Insight(_)));
    }
}
