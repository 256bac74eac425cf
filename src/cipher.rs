//! Passphrase-based AES-256 and DES encryption in the OpenSSL `enc` format
//!
//! Output is Base64 of `Salted__`, an 8-byte salt, then the CBC ciphertext
//! with PKCS#7 padding. Key and IV come from the passphrase and salt through
//! `EVP_BytesToKey` with MD5 and a single iteration, so text produced here
//! decrypts with `openssl enc -d -a -md md5` and vice versa.
//!
//! This key derivation is weak and exists for interoperability with tools
//! that speak the same format. DES is likewise only offered for reading and
//! writing legacy payloads.
//!
//! ```
//! use text_codec_kit::cipher::{decrypt_text, encrypt_text, CipherAlgorithm};
//!
//! let sealed = encrypt_text(CipherAlgorithm::Aes256, "Hello", "secret");
//! assert!(sealed.starts_with("U2FsdGVkX1"));
//! assert_eq!(decrypt_text(CipherAlgorithm::Aes256, &sealed, "secret").unwrap(), "Hello");
//! ```

use std::fmt;
use std::str::FromStr;

use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use md5::{Digest, Md5};
use rand::RngCore;
use rand::rngs::OsRng;

use crate::base64::{Base64Options, WhitespacePolicy, base64_decode_with, base64_encode};
use crate::error::CodecError;

const SALT_MAGIC: &[u8; 8] = b"Salted__";
pub const SALT_LEN: usize = 8;

/// Supported ciphers, both in CBC mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CipherAlgorithm {
    Aes256,
    Des,
}

impl CipherAlgorithm {
    pub const ALL: [CipherAlgorithm; 2] = [CipherAlgorithm::Aes256, CipherAlgorithm::Des];

    pub fn as_str(&self) -> &'static str {
        match self {
            CipherAlgorithm::Aes256 => "aes",
            CipherAlgorithm::Des => "des",
        }
    }

    fn key_len(&self) -> usize {
        match self {
            CipherAlgorithm::Aes256 => 32,
            CipherAlgorithm::Des => 8,
        }
    }

    fn iv_len(&self) -> usize {
        match self {
            CipherAlgorithm::Aes256 => 16,
            CipherAlgorithm::Des => 8,
        }
    }
}

impl fmt::Display for CipherAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CipherAlgorithm {
    type Err = CodecError;

    /// Accepts `aes`, `AES-256`, `des` and similar spellings
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "aes" | "aes256" => Ok(CipherAlgorithm::Aes256),
            "des" => Ok(CipherAlgorithm::Des),
            _ => Err(CodecError::InvalidInput(format!("unknown cipher '{}'", s))),
        }
    }
}

/// Encrypt `plaintext` under `passphrase` with a fresh random salt
pub fn encrypt_text(algorithm: CipherAlgorithm, plaintext: &str, passphrase: &str) -> String {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    encrypt_text_with_salt(algorithm, plaintext, passphrase, salt)
}

/// Encrypt with a caller-chosen salt; the same inputs give the same output
pub fn encrypt_text_with_salt(
    algorithm: CipherAlgorithm,
    plaintext: &str,
    passphrase: &str,
    salt: [u8; SALT_LEN],
) -> String {
    let (key, iv) = derive_key_iv(algorithm, passphrase.as_bytes(), &salt);
    let plaintext = plaintext.as_bytes();
    let ciphertext = match algorithm {
        CipherAlgorithm::Aes256 => {
            cbc::Encryptor::<aes::Aes256>::new(key.as_slice().into(), iv.as_slice().into())
                .encrypt_padded_vec_mut::<Pkcs7>(plaintext)
        }
        CipherAlgorithm::Des => {
            cbc::Encryptor::<des::Des>::new(key.as_slice().into(), iv.as_slice().into())
                .encrypt_padded_vec_mut::<Pkcs7>(plaintext)
        }
    };

    let mut sealed = Vec::with_capacity(SALT_MAGIC.len() + SALT_LEN + ciphertext.len());
    sealed.extend_from_slice(SALT_MAGIC);
    sealed.extend_from_slice(&salt);
    sealed.extend_from_slice(&ciphertext);
    base64_encode(&sealed)
}

/// Decrypt Base64 text produced by [`encrypt_text`] or `openssl enc -a -md md5`
///
/// ASCII whitespace in `ciphertext` is ignored, so line-wrapped output from
/// OpenSSL is accepted.
///
/// # Errors
///
/// - `CodecError::InvalidBase64` when the text is not Base64
/// - `CodecError::DecryptionFailed` when the `Salted__` header is missing, the
///   ciphertext is not a whole number of blocks, the padding is wrong (almost
///   always a wrong passphrase) or the plaintext is not UTF-8
pub fn decrypt_text(
    algorithm: CipherAlgorithm,
    ciphertext: &str,
    passphrase: &str,
) -> Result<String, CodecError> {
    let options = Base64Options {
        whitespace: WhitespacePolicy::Strip,
        ..Default::default()
    };
    let sealed = base64_decode_with(ciphertext, &options)?;

    let body = sealed
        .strip_prefix(SALT_MAGIC)
        .ok_or_else(|| CodecError::DecryptionFailed("missing Salted__ header".to_string()))?;
    if body.len() < SALT_LEN {
        return Err(CodecError::DecryptionFailed("truncated salt".to_string()));
    }
    let (salt, body) = body.split_at(SALT_LEN);

    let (key, iv) = derive_key_iv(algorithm, passphrase.as_bytes(), salt);
    let plaintext = match algorithm {
        CipherAlgorithm::Aes256 => {
            cbc::Decryptor::<aes::Aes256>::new(key.as_slice().into(), iv.as_slice().into())
                .decrypt_padded_vec_mut::<Pkcs7>(body)
        }
        CipherAlgorithm::Des => {
            cbc::Decryptor::<des::Des>::new(key.as_slice().into(), iv.as_slice().into())
                .decrypt_padded_vec_mut::<Pkcs7>(body)
        }
    }
    .map_err(|_| {
        tracing::debug!(cipher = %algorithm, len = body.len(), "padding check failed");
        CodecError::DecryptionFailed("bad padding or wrong passphrase".to_string())
    })?;

    String::from_utf8(plaintext)
        .map_err(|_| CodecError::DecryptionFailed("plaintext is not UTF-8".to_string()))
}

/// OpenSSL `EVP_BytesToKey` with MD5 and one iteration
///
/// `D_i = MD5(D_{i-1} || passphrase || salt)`, concatenated until key and IV
/// are filled.
fn derive_key_iv(algorithm: CipherAlgorithm, passphrase: &[u8], salt: &[u8]) -> (Vec<u8>, Vec<u8>) {
    let key_len = algorithm.key_len();
    let needed = key_len + algorithm.iv_len();

    let mut material = Vec::with_capacity(needed + 16);
    let mut block: Vec<u8> = Vec::new();
    while material.len() < needed {
        let mut hasher = Md5::new();
        hasher.update(&block);
        hasher.update(passphrase);
        hasher.update(salt);
        block = hasher.finalize().to_vec();
        material.extend_from_slice(&block);
    }

    let iv = material[key_len..needed].to_vec();
    material.truncate(key_len);
    (material, iv)
}
