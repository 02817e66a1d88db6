//! Cryptographic primitives for the credential vault
//!
//! This module provides:
//! - AES-256-GCM authenticated encryption of individual fields
//! - Key and secret types that are zeroed on drop

mod encryption;
mod secure_memory;

pub use encryption::{decrypt, decrypt_string, encrypt, encrypt_string, EncryptedData};
pub use secure_memory::{SecretString, VaultKey};
