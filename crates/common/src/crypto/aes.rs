//! AES helpers over CBC, CFB and GCM with PKCS#7 padding.
//!
//! Keys may be 16, 24 or 32 bytes (AES-128/192/256). CBC and CFB take an
//! optional 16-byte IV that defaults to all zeros. GCM takes a 12-byte nonce
//! and emits `nonce || ciphertext || tag`.

use aes::cipher::generic_array::GenericArray;
use aes::cipher::{
    AsyncStreamCipher, BlockCipher, BlockDecryptMut, BlockEncryptMut, KeyInit, KeyIvInit,
};
use aes::{Aes128, Aes192, Aes256};
use aes_gcm::aead::consts::U12;
use aes_gcm::aead::Aead;
use aes_gcm::{Aes128Gcm, Aes256Gcm, AesGcm};

use crate::error::{CommonError, CommonResult};

/// AES block size in bytes.
pub const BLOCK_SIZE: usize = 16;

/// GCM nonce size in bytes.
pub const GCM_NONCE_SIZE: usize = 12;

const GCM_TAG_SIZE: usize = 16;

type Aes192Gcm = AesGcm<Aes192, U12>;

/// Append PKCS#7 padding up to the next multiple of `block_size`.
///
/// A full block of padding is added when `data` is already aligned.
///
/// # Errors
/// Fails when `block_size` is outside `1..=255`, the range a pad byte can encode.
pub fn pkcs7_pad(data: &[u8], block_size: usize) -> CommonResult<Vec<u8>> {
    let pad_block = u8::try_from(block_size)
        .ok()
        .filter(|&size| size > 0)
        .ok_or_else(|| CommonError::crypto("pad", format!("invalid block size {block_size}")))?;
    // the remainder is below block_size, which fits in a u8
    #[allow(clippy::cast_possible_truncation)]
    let padding = pad_block - (data.len() % block_size) as u8;
    let mut padded = Vec::with_capacity(data.len() + usize::from(padding));
    padded.extend_from_slice(data);
    padded.resize(data.len() + usize::from(padding), padding);
    Ok(padded)
}

/// Strip PKCS#7 padding.
///
/// # Errors
/// Fails when the data is empty, the pad value is zero or larger than
/// `block_size`, or the pad bytes disagree.
pub fn pkcs7_unpad(data: &[u8], block_size: usize) -> CommonResult<Vec<u8>> {
    let Some(&last) = data.last() else {
        return Err(CommonError::crypto("unpad", "empty input"));
    };
    let padding = usize::from(last);
    if padding == 0 || padding > block_size || padding > data.len() {
        return Err(CommonError::crypto("unpad", format!("invalid padding length {padding}")));
    }
    let (body, pad) = data.split_at(data.len() - padding);
    if pad.iter().any(|&b| b != last) {
        return Err(CommonError::crypto("unpad", "inconsistent padding bytes"));
    }
    Ok(body.to_vec())
}

fn resolve_iv(iv: Option<&[u8]>) -> CommonResult<[u8; BLOCK_SIZE]> {
    match iv {
        None => Ok([0u8; BLOCK_SIZE]),
        Some(iv) => iv.try_into().map_err(|_| {
            CommonError::crypto("iv", format!("iv must be {BLOCK_SIZE} bytes, got {}", iv.len()))
        }),
    }
}

fn invalid_key(operation: &str, len: usize) -> CommonError {
    CommonError::crypto(operation, format!("invalid key size {len}"))
}

fn cbc_encrypt_blocks<C>(key: &[u8], iv: &[u8], buf: &mut [u8]) -> CommonResult<()>
where
    C: BlockEncryptMut + BlockCipher + KeyInit,
{
    let mut mode = cbc::Encryptor::<C>::new_from_slices(key, iv)
        .map_err(|e| CommonError::crypto("cbc_encrypt", e.to_string()))?;
    for chunk in buf.chunks_exact_mut(BLOCK_SIZE) {
        mode.encrypt_block_mut(GenericArray::from_mut_slice(chunk));
    }
    Ok(())
}

fn cbc_decrypt_blocks<C>(key: &[u8], iv: &[u8], buf: &mut [u8]) -> CommonResult<()>
where
    C: BlockDecryptMut + BlockCipher + KeyInit,
{
    let mut mode = cbc::Decryptor::<C>::new_from_slices(key, iv)
        .map_err(|e| CommonError::crypto("cbc_decrypt", e.to_string()))?;
    for chunk in buf.chunks_exact_mut(BLOCK_SIZE) {
        mode.decrypt_block_mut(GenericArray::from_mut_slice(chunk));
    }
    Ok(())
}

/// AES-CBC encrypt with PKCS#7 padding.
///
/// # Errors
/// Fails on a key that is not 16, 24 or 32 bytes or an IV that is not 16 bytes.
pub fn aes_cbc_encrypt(msg: &[u8], key: &[u8], iv: Option<&[u8]>) -> CommonResult<Vec<u8>> {
    aes_cbc_encrypt_unpadded(&pkcs7_pad(msg, BLOCK_SIZE)?, key, iv)
}

/// AES-CBC encrypt a block-aligned message as is.
///
/// # Errors
/// Fails on bad key/IV sizes or a message that is not block aligned.
pub fn aes_cbc_encrypt_unpadded(
    msg: &[u8],
    key: &[u8],
    iv: Option<&[u8]>,
) -> CommonResult<Vec<u8>> {
    let iv = resolve_iv(iv)?;
    if msg.len() % BLOCK_SIZE != 0 {
        return Err(CommonError::crypto("cbc_encrypt", "error plain size"));
    }
    let mut buf = msg.to_vec();
    match key.len() {
        16 => cbc_encrypt_blocks::<Aes128>(key, &iv, &mut buf)?,
        24 => cbc_encrypt_blocks::<Aes192>(key, &iv, &mut buf)?,
        32 => cbc_encrypt_blocks::<Aes256>(key, &iv, &mut buf)?,
        n => return Err(invalid_key("cbc_encrypt", n)),
    }
    Ok(buf)
}

/// AES-CBC decrypt without removing padding.
///
/// # Errors
/// Fails on bad key/IV sizes or a ciphertext that is not block aligned.
pub fn aes_cbc_decrypt_unpadded(
    crypt: &[u8],
    key: &[u8],
    iv: Option<&[u8]>,
) -> CommonResult<Vec<u8>> {
    let iv = resolve_iv(iv)?;
    if crypt.len() % BLOCK_SIZE != 0 {
        return Err(CommonError::crypto("cbc_decrypt", "error crypt size"));
    }
    let mut buf = crypt.to_vec();
    match key.len() {
        16 => cbc_decrypt_blocks::<Aes128>(key, &iv, &mut buf)?,
        24 => cbc_decrypt_blocks::<Aes192>(key, &iv, &mut buf)?,
        32 => cbc_decrypt_blocks::<Aes256>(key, &iv, &mut buf)?,
        n => return Err(invalid_key("cbc_decrypt", n)),
    }
    Ok(buf)
}

/// AES-CBC decrypt and strip PKCS#7 padding.
///
/// # Errors
/// Fails on bad key/IV sizes, misaligned ciphertext or invalid padding.
pub fn aes_cbc_decrypt(crypt: &[u8], key: &[u8], iv: Option<&[u8]>) -> CommonResult<Vec<u8>> {
    let plain = aes_cbc_decrypt_unpadded(crypt, key, iv)?;
    pkcs7_unpad(&plain, BLOCK_SIZE)
}

fn cfb_apply<C>(key: &[u8], iv: &[u8], buf: &mut [u8], encrypt: bool) -> CommonResult<()>
where
    C: BlockEncryptMut + BlockCipher + KeyInit,
{
    if encrypt {
        cfb_mode::Encryptor::<C>::new_from_slices(key, iv)
            .map_err(|e| CommonError::crypto("cfb_encrypt", e.to_string()))?
            .encrypt(buf);
    } else {
        cfb_mode::Decryptor::<C>::new_from_slices(key, iv)
            .map_err(|e| CommonError::crypto("cfb_decrypt", e.to_string()))?
            .decrypt(buf);
    }
    Ok(())
}

fn cfb_dispatch(key: &[u8], iv: &[u8], buf: &mut [u8], encrypt: bool) -> CommonResult<()> {
    match key.len() {
        16 => cfb_apply::<Aes128>(key, iv, buf, encrypt),
        24 => cfb_apply::<Aes192>(key, iv, buf, encrypt),
        32 => cfb_apply::<Aes256>(key, iv, buf, encrypt),
        n => Err(invalid_key(if encrypt { "cfb_encrypt" } else { "cfb_decrypt" }, n)),
    }
}

/// AES-CFB128 encrypt. The message is PKCS#7 padded first.
///
/// # Errors
/// Fails on bad key or IV sizes.
pub fn aes_cfb_encrypt(msg: &[u8], key: &[u8], iv: Option<&[u8]>) -> CommonResult<Vec<u8>> {
    let iv = resolve_iv(iv)?;
    let mut buf = pkcs7_pad(msg, BLOCK_SIZE)?;
    cfb_dispatch(key, &iv, &mut buf, true)?;
    Ok(buf)
}

/// AES-CFB128 decrypt, then strip PKCS#7 padding.
///
/// # Errors
/// Fails on bad key or IV sizes or invalid padding.
pub fn aes_cfb_decrypt(crypt: &[u8], key: &[u8], iv: Option<&[u8]>) -> CommonResult<Vec<u8>> {
    let iv = resolve_iv(iv)?;
    let mut buf = crypt.to_vec();
    cfb_dispatch(key, &iv, &mut buf, false)?;
    pkcs7_unpad(&buf, BLOCK_SIZE)
}

fn gcm_seal<A>(key: &[u8], nonce: &[u8], plain: &[u8]) -> CommonResult<Vec<u8>>
where
    A: Aead + KeyInit,
{
    let cipher =
        A::new_from_slice(key).map_err(|e| CommonError::crypto("gcm_encrypt", e.to_string()))?;
    cipher
        .encrypt(GenericArray::from_slice(nonce), plain)
        .map_err(|e| CommonError::crypto("gcm_encrypt", e.to_string()))
}

fn gcm_open<A>(key: &[u8], nonce: &[u8], sealed: &[u8]) -> CommonResult<Vec<u8>>
where
    A: Aead + KeyInit,
{
    let cipher =
        A::new_from_slice(key).map_err(|e| CommonError::crypto("gcm_decrypt", e.to_string()))?;
    cipher
        .decrypt(GenericArray::from_slice(nonce), sealed)
        .map_err(|e| CommonError::crypto("gcm_decrypt", e.to_string()))
}

fn check_nonce(operation: &str, nonce: &[u8]) -> CommonResult<()> {
    if nonce.len() == GCM_NONCE_SIZE {
        Ok(())
    } else {
        Err(CommonError::crypto(
            operation,
            format!("nonce must be {GCM_NONCE_SIZE} bytes, got {}", nonce.len()),
        ))
    }
}

/// AES-GCM encrypt. Returns `nonce || ciphertext || tag`.
///
/// # Errors
/// Fails on bad key or nonce sizes.
pub fn aes_gcm_encrypt(msg: &[u8], key: &[u8], nonce: &[u8]) -> CommonResult<Vec<u8>> {
    check_nonce("gcm_encrypt", nonce)?;
    let plain = pkcs7_pad(msg, BLOCK_SIZE)?;
    let sealed = match key.len() {
        16 => gcm_seal::<Aes128Gcm>(key, nonce, &plain)?,
        24 => gcm_seal::<Aes192Gcm>(key, nonce, &plain)?,
        32 => gcm_seal::<Aes256Gcm>(key, nonce, &plain)?,
        n => return Err(invalid_key("gcm_encrypt", n)),
    };
    let mut out = Vec::with_capacity(GCM_NONCE_SIZE + sealed.len());
    out.extend_from_slice(nonce);
    out.extend_from_slice(&sealed);
    Ok(out)
}

/// AES-GCM decrypt output of [`aes_gcm_encrypt`].
///
/// The 12-byte prefix is skipped; `nonce` is the one used for sealing.
///
/// # Errors
/// Fails on bad sizes, a truncated payload, authentication failure or
/// invalid padding.
pub fn aes_gcm_decrypt(crypt: &[u8], key: &[u8], nonce: &[u8]) -> CommonResult<Vec<u8>> {
    check_nonce("gcm_decrypt", nonce)?;
    if crypt.len() < GCM_NONCE_SIZE + GCM_TAG_SIZE {
        return Err(CommonError::crypto("gcm_decrypt", "error crypt size"));
    }
    let sealed = &crypt[GCM_NONCE_SIZE..];
    let plain = match key.len() {
        16 => gcm_open::<Aes128Gcm>(key, nonce, sealed)?,
        24 => gcm_open::<Aes192Gcm>(key, nonce, sealed)?,
        32 => gcm_open::<Aes256Gcm>(key, nonce, sealed)?,
        n => return Err(invalid_key("gcm_decrypt", n)),
    };
    pkcs7_unpad(&plain, BLOCK_SIZE)
}
