//! Key and secret holders that wipe themselves on drop

use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Length of the vault key in bytes (AES-256)
pub const KEY_LEN: usize = 32;

/// Symmetric key guarding the credential file
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct VaultKey {
    key: [u8; KEY_LEN],
}

impl VaultKey {
    /// Fresh random key from the OS RNG
    pub fn generate() -> Self {
        let mut key = [0u8; KEY_LEN];
        OsRng.fill_bytes(&mut key);
        Self { key }
    }

    /// Key from raw file contents; `None` unless exactly 32 bytes
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        let key: [u8; KEY_LEN] = slice.try_into().ok()?;
        Some(Self { key })
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.key
    }
}

impl std::fmt::Debug for VaultKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("VaultKey([REDACTED])")
    }
}

/// Decrypted secret (the database password) - zeroed when dropped
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecretString {
    value: String,
}

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self { value: value.into() }
    }

    /// Get the secret value (use carefully)
    pub fn expose(&self) -> &str {
        &self.value
    }
}

impl From<String> for SecretString {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl std::fmt::Debug for SecretString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretString([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_keys_differ() {
        assert_ne!(VaultKey::generate(), VaultKey::generate());
    }

    #[test]
    fn test_from_slice_requires_exact_length() {
        let bytes = [7u8; KEY_LEN];
        assert_eq!(VaultKey::from_slice(&bytes).unwrap().as_bytes(), &bytes);

        assert!(VaultKey::from_slice(&bytes[..16]).is_none());
        assert!(VaultKey::from_slice(&[0u8; 33]).is_none());
    }

    #[test]
    fn test_debug_is_redacted() {
        let key = VaultKey::from_slice(&[0xAB; KEY_LEN]).unwrap();
        assert!(!format!("{:?}", key).contains("171"));

        let secret = SecretString::new("hunter2");
        assert_eq!(secret.expose(), "hunter2");
        assert!(!format!("{:?}", secret).contains("hunter2"));
    }
}
