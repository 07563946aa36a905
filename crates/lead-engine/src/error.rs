use thiserror::Error;

/// Distribution engine errors
#[derive(Error, Debug)]
pub enum DistributionError {
    /// Database errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Already exists
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Slot contention exhausted the configured retries; the caller may retry
    #[error("Contention: {0}")]
    Contention(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DistributionError {
    /// Create a new Config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new InvalidInput error
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a new NotFound error
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a new AlreadyExists error
    pub fn already_exists<S: Into<String>>(msg: S) -> Self {
        Self::AlreadyExists(msg.into())
    }

    /// Create a new Contention error
    pub fn contention<S: Into<String>>(msg: S) -> Self {
        Self::Contention(msg.into())
    }

    /// Create a new Internal error
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether the caller can reasonably retry the failed attempt
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Contention(_) | Self::Database(_))
    }
}

/// Result type for distribution operations
pub type Result<T> = std::result::Result<T, DistributionError>;
