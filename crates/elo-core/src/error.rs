//! Error types for elo-core

use thiserror::Error;

/// Result type alias for ELO operations
pub type Result<T> = std::result::Result<T, EloError>;

/// ELO error types
#[derive(Error, Debug)]
pub enum EloError {
    #[error("Encryption failed: {0}")]
    EncryptionError(String),

    #[error("Decryption failed: {0}")]
    DecryptionError(String),

    #[error("Invalid key file: {0}")]
    InvalidKey(String),

    #[error("Credential prompt failed: {0}")]
    PromptError(String),

    #[error("Database connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Invalid input: {0}")]
    ValidationError(String),

    #[error("Settings error: {0}")]
    SettingsError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl EloError {
    /// Whether the stored credential file could not be read back with the current key
    pub fn is_decryption(&self) -> bool {
        matches!(self, EloError::DecryptionError(_))
    }
}
