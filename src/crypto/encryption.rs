//INFO: Encryption utilities for Parley
//NOTE: Uses AES-256-GCM for encrypting the access token before it reaches the database

use aes_gcm::{
    aead::{Aead, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use anyhow::{anyhow, Context, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use rand::RngCore;
use std::path::Path;

//INFO: Length of the encryption key in bytes (256 bits)
const KEY_LENGTH: usize = 32;

//INFO: Length of the nonce in bytes (96 bits for GCM)
const NONCE_LENGTH: usize = 12;

const TAG_LENGTH: usize = 16;

//INFO: Symmetric cipher bound to one key file
#[derive(Clone)]
pub struct TokenCipher {
    key: [u8; KEY_LENGTH],
}

impl std::fmt::Debug for TokenCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCipher").finish_non_exhaustive()
    }
}

impl TokenCipher {
    //INFO: Builds a cipher from raw key bytes
    pub fn from_key(key: [u8; KEY_LENGTH]) -> Self {
        Self { key }
    }

    //INFO: Loads the key stored at `key_path`, generating it on first use
    //NOTE: The key lives next to the database; for production, consider using OS keyring
    pub fn load_or_create(key_path: &Path) -> Result<Self> {
        if key_path.exists() {
            let key_bytes = std::fs::read(key_path).context("Failed to read encryption key")?;

            if key_bytes.len() != KEY_LENGTH {
                return Err(anyhow!("Invalid encryption key length"));
            }

            let mut key = [0u8; KEY_LENGTH];
            key.copy_from_slice(&key_bytes);
            return Ok(Self { key });
        }

        let mut key = [0u8; KEY_LENGTH];
        OsRng.fill_bytes(&mut key);

        if let Some(parent) = key_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create key directory")?;
        }

        std::fs::write(key_path, key).context("Failed to write encryption key")?;
        restrict_permissions(key_path)?;

        Ok(Self { key })
    }

    //INFO: Encrypts a plaintext value
    //NOTE: Returns base64-encoded ciphertext with nonce prepended
    pub fn encrypt(&self, plaintext: &str) -> Result<String> {
        let cipher = Aes256Gcm::new_from_slice(&self.key)
            .map_err(|e| anyhow!("Failed to create cipher: {}", e))?;

        let mut nonce_bytes = [0u8; NONCE_LENGTH];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|e| anyhow!("Encryption failed: {}", e))?;

        let mut combined = Vec::with_capacity(NONCE_LENGTH + ciphertext.len());
        combined.extend_from_slice(&nonce_bytes);
        combined.extend_from_slice(&ciphertext);

        Ok(BASE64.encode(&combined))
    }

    //INFO: Decrypts a base64-encoded ciphertext produced by `encrypt`
    pub fn decrypt(&self, encrypted: &str) -> Result<String> {
        let combined = BASE64
            .decode(encrypted)
            .context("Failed to decode base64")?;

        //INFO: Nonce plus at least the GCM tag
        if combined.len() < NONCE_LENGTH + TAG_LENGTH {
            return Err(anyhow!("Encrypted data too short"));
        }

        let (nonce_bytes, ciphertext) = combined.split_at(NONCE_LENGTH);
        let nonce = Nonce::from_slice(nonce_bytes);

        let cipher = Aes256Gcm::new_from_slice(&self.key)
            .map_err(|e| anyhow!("Failed to create cipher: {}", e))?;

        let plaintext_bytes = cipher
            .decrypt(nonce, ciphertext)
            .map_err(|e| anyhow!("Decryption failed: {}", e))?;

        String::from_utf8(plaintext_bytes).context("Decrypted data is not valid UTF-8")
    }
}

#[cfg(unix)]
fn restrict_permissions(key_path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(key_path, std::fs::Permissions::from_mode(0o600))
        .context("Failed to restrict key file permissions")
}

#[cfg(not(unix))]
fn restrict_permissions(_key_path: &Path) -> Result<()> {
    Ok(())
}
