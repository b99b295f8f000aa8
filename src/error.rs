/// Error types for the schedule grid.
///
/// Configuration errors are fatal at startup. Query errors are caught by the
/// controller and surfaced through its state. Malformed appointments are
/// recovered locally by the placement resolver.

/// Errors produced by configuration, queries and record validation.
#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    #[error("invalid calendar config: {0}")]
    InvalidConfig(String),

    #[error("query failed: {0}")]
    QueryFailure(String),

    #[error("query cancelled")]
    QueryCancelled,

    #[error("malformed appointment {id}: end time must be after start time")]
    MalformedAppointment { id: String },

    #[error("failed to read config file: {0}")]
    ConfigIo(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
