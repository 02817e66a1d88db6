//! Credential vault: key file, encrypted login file, connection bootstrap

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::acquire::{plan_bootstrap, Bootstrap, CredentialPrompt};
use super::connector::Connector;
use super::types::{CredentialFile, Credentials};
use crate::crypto::{decrypt_string, encrypt_string, SecretString, VaultKey};
use crate::error::{EloError, Result};
use crate::report::Reporter;

const KEY_FILE: &str = "key.key";
const CREDENTIAL_FILE: &str = "db_config.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attempt {
    First,
    Retry,
}

/// Owns `key.key` and `db_config.json` inside one directory
pub struct CredentialVault {
    vault_dir: PathBuf,
    /// Connection string derived from static configuration
    connection_string: String,
    reporter: Arc<dyn Reporter>,
}

impl CredentialVault {
    pub fn new(
        vault_dir: impl Into<PathBuf>,
        connection_string: impl Into<String>,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        Self {
            vault_dir: vault_dir.into(),
            connection_string: connection_string.into(),
            reporter,
        }
    }

    pub fn key_path(&self) -> PathBuf {
        self.vault_dir.join(KEY_FILE)
    }

    pub fn credentials_path(&self) -> PathBuf {
        self.vault_dir.join(CREDENTIAL_FILE)
    }

    /// Return the vault key, generating and persisting it on first use
    pub async fn ensure_key(&self) -> Result<VaultKey> {
        let path = self.key_path();

        if !path.exists() {
            tokio::fs::create_dir_all(&self.vault_dir).await?;
            let key = VaultKey::generate();
            write_private(&path, key.as_bytes()).await?;
            info!("Generated new vault key at {:?}", path);
        }

        let bytes = tokio::fs::read(&path).await?;
        VaultKey::from_slice(&bytes).ok_or_else(|| {
            EloError::InvalidKey(format!(
                "{} holds {} bytes, expected 32",
                path.display(),
                bytes.len()
            ))
        })
    }

    /// Encrypt the three fields separately and replace the credential file
    pub async fn save_credentials(
        &self,
        username: &str,
        password: &str,
        connection_string: &str,
    ) -> Result<()> {
        let key = self.ensure_key().await?;

        let file = CredentialFile {
            user: encrypt_string(username, &key)?,
            password: encrypt_string(password, &key)?,
            dsn: encrypt_string(connection_string, &key)?,
        };
        let contents = serde_json::to_string_pretty(&file)?;

        let path = self.credentials_path();
        write_private(&path, contents.as_bytes()).await?;

        debug!("Saved credentials to {:?}", path);
        Ok(())
    }

    /// Decrypt the stored login; `None` when nothing has been saved yet
    pub async fn load_credentials(&self) -> Result<Option<Credentials>> {
        let path = self.credentials_path();

        if !path.exists() {
            debug!("No credential file at {:?}", path);
            return Ok(None);
        }

        let contents = tokio::fs::read_to_string(&path).await?;
        let file: CredentialFile = serde_json::from_str(&contents).map_err(|e| {
            EloError::DecryptionError(format!("{} is not a credential file: {}", path.display(), e))
        })?;

        let key = self.ensure_key().await?;
        Ok(Some(Credentials {
            username: decrypt_string(&file.user, &key)?,
            password: SecretString::new(decrypt_string(&file.password, &key)?),
            connection_string: decrypt_string(&file.dsn, &key)?,
        }))
    }

    /// Forget the stored login. The key is kept.
    pub async fn clear_credentials(&self) -> Result<bool> {
        let path = self.credentials_path();
        if !path.exists() {
            return Ok(false);
        }

        tokio::fs::remove_file(&path).await?;
        info!("Removed credential file {:?}", path);
        Ok(true)
    }

    /// Prompt for a login, store it with the configured connection string, read it back
    async fn register(&self, prompt: &dyn CredentialPrompt) -> Result<Credentials> {
        self.reporter.info("Database login registration");
        let login = prompt.prompt_login()?;

        self.save_credentials(
            &login.username,
            login.password.expose(),
            &self.connection_string,
        )
        .await?;
        self.reporter.success("Login saved.");

        self.load_credentials().await?.ok_or_else(|| {
            EloError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "credential file vanished right after saving",
            ))
        })
    }

    /// Hand back a live connection, registering or re-registering the login as needed.
    ///
    /// A rejected connection triggers exactly one new prompt and one more
    /// attempt. Any other error (filesystem, undecryptable file, prompt) is
    /// returned immediately.
    pub async fn acquire_connection<C: Connector>(
        &self,
        connector: &C,
        prompt: &dyn CredentialPrompt,
    ) -> Result<C::Connection> {
        let mut credentials = match plan_bootstrap(self.load_credentials().await?) {
            Bootstrap::UseStored(credentials) => credentials,
            Bootstrap::Register => self.register(prompt).await?,
        };

        let mut attempt = Attempt::First;
        loop {
            match connector.connect(&credentials).await {
                Ok(conn) => {
                    info!("Database connection established ({:?} attempt)", attempt);
                    self.reporter.success("Connected to the database.");
                    return Ok(conn);
                }
                Err(failure) => {
                    self.reporter
                        .error(&format!("Connection failed: {}", failure));

                    match attempt {
                        Attempt::First => {
                            warn!("Stored credentials rejected: {}", failure);
                            self.reporter
                                .warning("Please register your database credentials again.");
                            credentials = self.register(prompt).await?;
                            attempt = Attempt::Retry;
                        }
                        Attempt::Retry => {
                            return Err(EloError::ConnectionFailed(failure.reason));
                        }
                    }
                }
            }
        }
    }
}

/// Write through a temp file that is made owner-only before it is renamed into place
async fn write_private(path: &Path, contents: &[u8]) -> Result<()> {
    let temp_path = path.with_extension("tmp");
    tokio::fs::write(&temp_path, contents).await?;
    restrict_permissions(&temp_path).await?;
    tokio::fs::rename(&temp_path, path).await?;
    Ok(())
}

#[cfg(unix)]
async fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)).await?;
    Ok(())
}

#[cfg(not(unix))]
async fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}
