//! Symmetric cipher helpers and export key material.

pub mod aes;
pub mod export_key;
pub mod quick;

pub use aes::{
    aes_cbc_decrypt, aes_cbc_decrypt_unpadded, aes_cbc_encrypt, aes_cbc_encrypt_unpadded,
    aes_cfb_decrypt, aes_cfb_encrypt, aes_gcm_decrypt, aes_gcm_encrypt, pkcs7_pad, pkcs7_unpad,
};
pub use export_key::{ExportKey, EXPORT_KEY_LEN};
pub use quick::{random_string, QuickCipher};
