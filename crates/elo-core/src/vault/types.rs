//! Vault data types

use serde::{Deserialize, Serialize};

use crate::crypto::SecretString;

/// Decrypted database login
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
    pub connection_string: String,
}

/// What the user types when (re-)registering
#[derive(Debug, Clone)]
pub struct LoginInput {
    pub username: String,
    pub password: SecretString,
}

impl LoginInput {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::new(password),
        }
    }
}

/// On-disk form of `db_config.json`; every value is an encrypted token
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct CredentialFile {
    pub user: String,
    pub password: String,
    pub dsn: String,
}
