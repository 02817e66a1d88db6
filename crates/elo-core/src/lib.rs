//! # elo-core
//!
//! Core of the ELO civil-defense incident register:
//! - AES-256-GCM field encryption with a locally stored key
//! - Credential vault that bootstraps the database connection
//! - Settings, reporting capability and input validation
//! - Store for users, neighborhoods and incidents (CRUD, search, JSON export)

pub mod crypto;
pub mod db;
pub mod error;
pub mod report;
pub mod settings;
pub mod validation;
pub mod vault;

pub use crypto::{decrypt_string, encrypt_string, SecretString, VaultKey};
pub use db::{Incident, IncidentField, Neighborhood, NewIncident, NewNeighborhood, NewUser, Store, User};
pub use error::{EloError, Result};
pub use report::{Level, MemoryReporter, Reporter};
pub use settings::{DatabaseDriver, DatabaseSettings, Settings, SettingsManager};
pub use vault::{
    ConnectFailure, Connector, CredentialPrompt, CredentialVault, Credentials, LoginInput,
    SqlConnector,
};
