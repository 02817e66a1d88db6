//! Credential vault
//!
//! Keeps the database login in `db_config.json`, each field sealed under the
//! key in `key.key`, and turns it into a live connection on startup.

mod acquire;
mod connector;
mod manager;
mod types;

pub use acquire::{plan_bootstrap, Bootstrap, CredentialPrompt};
pub use connector::{connection_url, ConnectFailure, Connector, SqlConnector};
pub use manager::CredentialVault;
pub use types::{Credentials, LoginInput};
