//! Hybrid encryption: a fresh AES-256-GCM key per payload, wrapped with
//! the recipient's RSA public key.

use std::fs;
use std::path::Path;

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use rand::RngCore;
use rand::rngs::OsRng;
use rsa::pkcs8::DecodePublicKey;
use rsa::sha2::Sha256;
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};

use crate::error::{PackageError, Result};

/// Conventional file name of the recipient public key.
pub const PUBLIC_KEY_FILENAME: &str = "microdata_public_key.pem";

/// Width of the nonce prefix on sealed ciphertext.
const NONCE_LEN: usize = 12;

/// A sealed payload: nonce-prefixed AES-256-GCM ciphertext plus the
/// RSA-OAEP-wrapped symmetric key.
#[derive(Debug, Clone)]
pub struct SealedPayload {
    pub ciphertext: Vec<u8>,
    pub encrypted_key: Vec<u8>,
}

/// Loads the recipient key from `<key_dir>/microdata_public_key.pem`.
pub fn load_recipient_key(key_dir: &Path) -> Result<RsaPublicKey> {
    let path = key_dir.join(PUBLIC_KEY_FILENAME);
    let pem = fs::read_to_string(&path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            PackageError::MissingKey { path: path.clone() }
        } else {
            PackageError::ReadInput {
                path: path.clone(),
                source: e,
            }
        }
    })?;
    RsaPublicKey::from_public_key_pem(&pem).map_err(|e| PackageError::InvalidKey {
        path,
        reason: e.to_string(),
    })
}

/// Seals a payload under the recipient key.
///
/// A fresh 256-bit symmetric key is drawn per call; no key is reused
/// across payloads. Returns nonce-prefixed ciphertext plus the wrapped
/// key.
pub fn seal(recipient: &RsaPublicKey, plaintext: &[u8]) -> Result<SealedPayload> {
    let mut key = [0u8; 32];
    OsRng.fill_bytes(&mut key);
    let cipher =
        Aes256Gcm::new_from_slice(&key).map_err(|e| PackageError::Encrypt(e.to_string()))?;

    let mut nonce_bytes = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let body = cipher
        .encrypt(nonce, plaintext)
        .map_err(|e| PackageError::Encrypt(e.to_string()))?;

    let mut ciphertext = Vec::with_capacity(NONCE_LEN + body.len());
    ciphertext.extend_from_slice(&nonce_bytes);
    ciphertext.extend_from_slice(&body);

    let encrypted_key = recipient
        .encrypt(&mut OsRng, Oaep::new::<Sha256>(), &key)
        .map_err(PackageError::KeyWrap)?;

    Ok(SealedPayload {
        ciphertext,
        encrypted_key,
    })
}

/// Opens a sealed payload with the recipient's private key. Inverse of
/// [`seal`], used to prove round-trips.
pub fn open(recipient: &RsaPrivateKey, payload: &SealedPayload) -> Result<Vec<u8>> {
    let key = recipient
        .decrypt(Oaep::new::<Sha256>(), &payload.encrypted_key)
        .map_err(PackageError::KeyUnwrap)?;
    let cipher =
        Aes256Gcm::new_from_slice(&key).map_err(|e| PackageError::Decrypt(e.to_string()))?;

    if payload.ciphertext.len() < NONCE_LEN {
        return Err(PackageError::PayloadTooShort);
    }
    let (nonce_bytes, body) = payload.ciphertext.split_at(NONCE_LEN);
    let nonce = Nonce::from_slice(nonce_bytes);
    cipher
        .decrypt(nonce, body)
        .map_err(|e| PackageError::Decrypt(e.to_string()))
}
