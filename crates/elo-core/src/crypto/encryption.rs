//! Field-level AES-256-GCM encryption
//!
//! Every credential field is sealed on its own and stored as a token:
//! `{iv_hex}:{auth_tag_hex}:{ciphertext_hex}`
//! - IV: 12 random bytes per token
//! - Auth tag: 16 bytes
//! - Ciphertext: same length as the plaintext

use std::fmt;
use std::str::FromStr;

use aes_gcm::{
    aead::{Aead, AeadCore, KeyInit, OsRng},
    Aes256Gcm, Key, Nonce,
};

use super::VaultKey;
use crate::error::{EloError, Result};

const IV_LEN: usize = 12;
const TAG_LEN: usize = 16;

/// One sealed field: IV, GCM tag and ciphertext
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedData {
    pub iv: [u8; IV_LEN],
    pub auth_tag: [u8; TAG_LEN],
    pub ciphertext: Vec<u8>,
}

impl fmt::Display for EncryptedData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            hex::encode(self.iv),
            hex::encode(self.auth_tag),
            hex::encode(&self.ciphertext)
        )
    }
}

impl FromStr for EncryptedData {
    type Err = EloError;

    fn from_str(token: &str) -> Result<Self> {
        let mut parts = token.trim().split(':');
        let (iv, tag, body) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(iv), Some(tag), Some(body), None) => (iv, tag, body),
            _ => {
                return Err(EloError::DecryptionError(
                    "malformed token: expected iv:tag:ciphertext".to_string(),
                ))
            }
        };

        Ok(Self {
            iv: decode_fixed::<IV_LEN>(iv, "IV")?,
            auth_tag: decode_fixed::<TAG_LEN>(tag, "auth tag")?,
            ciphertext: hex::decode(body)
                .map_err(|e| EloError::DecryptionError(format!("invalid ciphertext hex: {}", e)))?,
        })
    }
}

fn decode_fixed<const N: usize>(part: &str, what: &str) -> Result<[u8; N]> {
    let bytes = hex::decode(part)
        .map_err(|e| EloError::DecryptionError(format!("invalid {} hex: {}", what, e)))?;
    bytes.try_into().map_err(|bytes: Vec<u8>| {
        EloError::DecryptionError(format!(
            "invalid {} length: expected {}, got {}",
            what,
            N,
            bytes.len()
        ))
    })
}

fn cipher(key: &VaultKey) -> Aes256Gcm {
    Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()))
}

/// Seal `plaintext` under `key` with a fresh random IV
pub fn encrypt(plaintext: &[u8], key: &VaultKey) -> Result<EncryptedData> {
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    // aes-gcm returns ciphertext || tag
    let sealed = cipher(key)
        .encrypt(&nonce, plaintext)
        .map_err(|e| EloError::EncryptionError(e.to_string()))?;

    if sealed.len() < TAG_LEN {
        return Err(EloError::EncryptionError("sealed output too short".to_string()));
    }
    let (ciphertext, tag) = sealed.split_at(sealed.len() - TAG_LEN);

    let mut iv = [0u8; IV_LEN];
    iv.copy_from_slice(nonce.as_slice());
    let mut auth_tag = [0u8; TAG_LEN];
    auth_tag.copy_from_slice(tag);

    Ok(EncryptedData {
        iv,
        auth_tag,
        ciphertext: ciphertext.to_vec(),
    })
}

/// Open a sealed field. Fails on a wrong key or any tampering.
pub fn decrypt(sealed: &EncryptedData, key: &VaultKey) -> Result<Vec<u8>> {
    let mut payload = Vec::with_capacity(sealed.ciphertext.len() + TAG_LEN);
    payload.extend_from_slice(&sealed.ciphertext);
    payload.extend_from_slice(&sealed.auth_tag);

    cipher(key)
        .decrypt(Nonce::from_slice(&sealed.iv), payload.as_slice())
        .map_err(|_| {
            EloError::DecryptionError("authentication failed (wrong key or corrupted data)".to_string())
        })
}

/// Encrypt a string field into its token form
pub fn encrypt_string(plaintext: &str, key: &VaultKey) -> Result<String> {
    Ok(encrypt(plaintext.as_bytes(), key)?.to_string())
}

/// Decrypt a token back into the original string
pub fn decrypt_string(token: &str, key: &VaultKey) -> Result<String> {
    let sealed: EncryptedData = token.parse()?;
    String::from_utf8(decrypt(&sealed, key)?)
        .map_err(|e| EloError::DecryptionError(format!("invalid UTF-8: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_roundtrip() {
        let key = VaultKey::generate();
        for plaintext in ["", "elo_app", "p@ss w0rd!", "postgres://db.local:5432/elo"] {
            let token = encrypt_string(plaintext, &key).unwrap();
            assert_eq!(decrypt_string(&token, &key).unwrap(), plaintext);
        }
    }

    #[test]
    fn test_token_shape() {
        let key = VaultKey::generate();
        let token = encrypt_string("abc", &key).unwrap();

        let parts: Vec<&str> = token.split(':').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].len(), IV_LEN * 2);
        assert_eq!(parts[1].len(), TAG_LEN * 2);
        assert_eq!(parts[2].len(), 6);
    }

    #[test]
    fn test_same_plaintext_gets_fresh_iv() {
        let key = VaultKey::generate();

        let first = encrypt(b"secret", &key).unwrap();
        let second = encrypt(b"secret", &key).unwrap();

        assert_ne!(first.iv, second.iv);
        assert_ne!(first, second);
    }

    #[test]
    fn test_other_key_is_rejected() {
        let token = encrypt_string("elo-password", &VaultKey::generate()).unwrap();

        let result = decrypt_string(&token, &VaultKey::generate());
        assert!(matches!(result, Err(EloError::DecryptionError(_))));
    }

    #[test]
    fn test_tampering_is_rejected() {
        let key = VaultKey::generate();
        let sealed = encrypt(b"secret data", &key).unwrap();

        let mut flipped_body = sealed.clone();
        flipped_body.ciphertext[0] ^= 0x01;
        assert!(decrypt(&flipped_body, &key).is_err());

        let mut flipped_tag = sealed;
        flipped_tag.auth_tag[15] ^= 0x80;
        assert!(decrypt(&flipped_tag, &key).is_err());
    }

    #[test]
    fn test_malformed_tokens() {
        for token in ["", "abc", "00:11", "00:11:22:33", "zz:zz:zz", "0011:2233:4455"] {
            assert!(token.parse::<EncryptedData>().is_err(), "accepted {:?}", token);
        }
    }
}
