//! Key material for asynchronous directory exports.
//!
//! The service encrypts export files with AES-256-CBC. The IV is the first
//! 16 key bytes and the plaintext is PKCS#7 padded to a multiple of 32.

use std::fmt;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use super::aes::{
    aes_cbc_decrypt_unpadded, aes_cbc_encrypt_unpadded, pkcs7_pad, pkcs7_unpad, BLOCK_SIZE,
};
use super::quick::random_string;
use crate::error::{CommonError, CommonResult};

/// Length of the raw AES key.
pub const EXPORT_KEY_LEN: usize = 32;

const EXPORT_PADDING_BLOCK: usize = 32;

/// 32-byte AES key used for export jobs.
#[derive(Clone, PartialEq, Eq)]
pub struct ExportKey([u8; EXPORT_KEY_LEN]);

impl ExportKey {
    /// Random key drawn from uppercase letters.
    #[must_use]
    pub fn generate() -> Self {
        let mut key = [0u8; EXPORT_KEY_LEN];
        key.copy_from_slice(random_string(EXPORT_KEY_LEN).as_bytes());
        Self(key)
    }

    /// # Errors
    /// Fails unless `raw` is exactly 32 bytes.
    pub fn from_raw(raw: &str) -> CommonResult<Self> {
        let bytes: [u8; EXPORT_KEY_LEN] = raw.as_bytes().try_into().map_err(|_| {
            CommonError::validation(
                "aes_key",
                format!("export key must be {EXPORT_KEY_LEN} bytes, got {}", raw.len()),
            )
        })?;
        Ok(Self(bytes))
    }

    /// Parse the 43-character form sent to the service.
    ///
    /// # Errors
    /// Fails on invalid base64 or a decoded length other than 32.
    pub fn from_encoding_aes_key(encoded: &str) -> CommonResult<Self> {
        let decoded = URL_SAFE_NO_PAD
            .decode(encoded.trim_end_matches('='))
            .map_err(|e| CommonError::serialization_format("base64", e.to_string()))?;
        let bytes: [u8; EXPORT_KEY_LEN] = decoded.as_slice().try_into().map_err(|_| {
            CommonError::validation(
                "encoding_aeskey",
                format!("decoded key must be {EXPORT_KEY_LEN} bytes, got {}", decoded.len()),
            )
        })?;
        Ok(Self(bytes))
    }

    /// Value of the `encoding_aeskey` request field.
    #[must_use]
    pub fn encoding_aes_key(&self) -> String {
        URL_SAFE_NO_PAD.encode(self.0)
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; EXPORT_KEY_LEN] {
        &self.0
    }

    /// Decrypt a downloaded export file.
    ///
    /// # Errors
    /// Fails on misaligned data or invalid padding.
    pub fn decrypt_export(&self, data: &[u8]) -> CommonResult<Vec<u8>> {
        let plain = aes_cbc_decrypt_unpadded(data, &self.0, Some(&self.0[..BLOCK_SIZE]))?;
        pkcs7_unpad(&plain, EXPORT_PADDING_BLOCK).inspect_err(|err| {
            tracing::warn!(size = data.len(), error = %err, "export file padding is invalid");
        })
    }

    /// Encrypt in the export file layout. Inverse of [`Self::decrypt_export`].
    ///
    /// # Errors
    /// Propagates cipher failures.
    pub fn encrypt_export(&self, plain: &[u8]) -> CommonResult<Vec<u8>> {
        let padded = pkcs7_pad(plain, EXPORT_PADDING_BLOCK)?;
        aes_cbc_encrypt_unpadded(&padded, &self.0, Some(&self.0[..BLOCK_SIZE]))
    }
}

impl fmt::Debug for ExportKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ExportKey").field(&"[REDACTED]").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoding_is_43_chars_and_reversible() {
        let key = ExportKey::generate();
        let encoded = key.encoding_aes_key();
        assert_eq!(encoded.len(), 43);
        assert_eq!(ExportKey::from_encoding_aes_key(&encoded).unwrap(), key);
    }

    #[test]
    fn from_raw_checks_length() {
        assert!(ExportKey::from_raw("ABCDEFGHIJKLMNOPQRSTUVWXYZABCDEF").is_ok());
        assert!(ExportKey::from_raw("too-short").is_err());
    }

    #[test]
    fn export_layout_pads_to_32() {
        let key = ExportKey::from_raw("ABCDEFGHIJKLMNOPQRSTUVWXYZABCDEF").unwrap();
        let plain = br#"{"userid":"zhangsan"}"#;
        let crypt = key.encrypt_export(plain).unwrap();
        assert_eq!(crypt.len(), 32);

        let raw = aes_cbc_decrypt_unpadded(&crypt, key.as_bytes(), Some(&key.as_bytes()[..16]))
            .unwrap();
        assert!(raw[plain.len()..].iter().all(|&b| b == 11));
        assert_eq!(key.decrypt_export(&crypt).unwrap(), plain);
    }

    #[test]
    fn decrypt_rejects_truncated_data() {
        let key = ExportKey::generate();
        assert!(key.decrypt_export(&[0u8; 17]).is_err());
    }

    #[test]
    fn debug_is_redacted() {
        let key = ExportKey::from_raw("ABCDEFGHIJKLMNOPQRSTUVWXYZABCDEF").unwrap();
        assert!(!format!("{key:?}").contains("ABCDEF"));
    }
}
