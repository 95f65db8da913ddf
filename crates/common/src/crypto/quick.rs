//! Salted AES-GCM string sealing.

use std::fmt;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::Rng;

use super::aes::{aes_gcm_decrypt, aes_gcm_encrypt, GCM_NONCE_SIZE};
use crate::error::{CommonError, CommonResult};

/// Random string of uppercase ASCII letters.
#[must_use]
pub fn random_string(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len).map(|_| char::from(rng.gen_range(b'A'..=b'Z'))).collect()
}

/// Seals short strings into `$<salt>$<base64url>` tokens.
///
/// The salt is a fresh 12-letter nonce per call, so sealing the same input
/// twice yields different tokens.
#[derive(Clone)]
pub struct QuickCipher {
    key: Vec<u8>,
}

impl fmt::Debug for QuickCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuickCipher").field("key", &"[REDACTED]").finish()
    }
}

impl QuickCipher {
    /// # Errors
    /// Fails unless the key is 16, 24 or 32 bytes.
    pub fn new(key: impl Into<Vec<u8>>) -> CommonResult<Self> {
        let key = key.into();
        if !matches!(key.len(), 16 | 24 | 32) {
            return Err(CommonError::validation(
                "key",
                format!("key must be 16, 24 or 32 bytes, got {}", key.len()),
            ));
        }
        Ok(Self { key })
    }

    /// # Errors
    /// Propagates cipher failures.
    pub fn encrypt(&self, msg: &str) -> CommonResult<String> {
        let salt = random_string(GCM_NONCE_SIZE);
        let crypt = aes_gcm_encrypt(msg.as_bytes(), &self.key, salt.as_bytes())?;
        Ok(format!("${salt}${}", URL_SAFE_NO_PAD.encode(crypt)))
    }

    /// # Errors
    /// Fails on a malformed token, a wrong key or non UTF-8 plaintext.
    pub fn decrypt(&self, token: &str) -> CommonResult<String> {
        let parts: Vec<&str> = token.split('$').collect();
        let [_, salt, body] = parts.as_slice() else {
            return Err(CommonError::validation("token", "expected $salt$payload"));
        };
        let crypt = URL_SAFE_NO_PAD
            .decode(body)
            .map_err(|e| CommonError::serialization_format("base64", e.to_string()))?;
        let plain = aes_gcm_decrypt(&crypt, &self.key, salt.as_bytes())?;
        String::from_utf8(plain)
            .map_err(|e| CommonError::serialization_format("utf-8", e.to_string()))
    }
}
