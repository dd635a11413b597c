//! Obscures free-text values inside archives.
//!
//! Values are sealed with ChaCha20-Poly1305 under a key derived from the
//! configured secret and written as base64 of `nonce || ciphertext || tag`.
//! This keeps submission text unreadable at rest in a portable archive; it is
//! not an access-control mechanism.
//!
//! Historic archives used DES-CBC under a fixed shared key, with base64 output
//! made URL-safe by word substitutions and a `0secret0` suffix. Such values are
//! still decrypted on read but never produced.

use crate::config::LEGACY_SECRET_KEY;
use crate::error::{FormError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, KeyIvInit};
use log::warn;
use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, CHACHA20_POLY1305, NONCE_LEN};
use ring::digest::{digest, SHA256};
use ring::rand::{SecureRandom, SystemRandom};

const LEGACY_SUFFIX: &str = "0secret0";
const LEGACY_IV: [u8; 8] = [0x12, 0x34, 0x56, 0x78, 0x90, 0xAB, 0xCD, 0xEF];
const LEGACY_SUBSTITUTIONS: &[(&str, &str)] = &[
    ("0add0", "+"),
    ("0equals0", "="),
    ("0and0", "&"),
    ("0question0", "?"),
    ("0quote0", "'"),
    ("0slash0", "/"),
];

type LegacyDecryptor = cbc::Decryptor<des::Des>;

pub struct ArchiveCipher {
    key: LessSafeKey,
    rng: SystemRandom,
}

impl ArchiveCipher {
    pub fn new(secret: &str) -> Result<Self> {
        let hash = digest(&SHA256, secret.as_bytes());
        let unbound = UnboundKey::new(&CHACHA20_POLY1305, hash.as_ref())
            .map_err(|_| FormError::Cipher("invalid archive key".to_string()))?;
        Ok(Self {
            key: LessSafeKey::new(unbound),
            rng: SystemRandom::new(),
        })
    }

    /// Seals `plain`. The empty string stays empty.
    pub fn encrypt(&self, plain: &str) -> Result<String> {
        if plain.is_empty() {
            return Ok(String::new());
        }

        let mut nonce = [0u8; NONCE_LEN];
        self.rng
            .fill(&mut nonce)
            .map_err(|_| FormError::Cipher("no randomness available".to_string()))?;

        let mut in_out = plain.as_bytes().to_vec();
        self.key
            .seal_in_place_append_tag(
                Nonce::assume_unique_for_key(nonce),
                Aad::empty(),
                &mut in_out,
            )
            .map_err(|_| FormError::Cipher("sealing failed".to_string()))?;

        let mut sealed = nonce.to_vec();
        sealed.extend_from_slice(&in_out);
        Ok(STANDARD.encode(sealed))
    }

    /// Opens a value written by [`encrypt`](Self::encrypt) or by a historic
    /// archive. A value that opens under neither scheme is returned verbatim.
    pub fn decrypt(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }

        let opened = if text.ends_with(LEGACY_SUFFIX) {
            legacy_decrypt(text)
        } else {
            self.open(text)
        };

        opened.unwrap_or_else(|| {
            warn!("Archive value could not be decrypted, keeping it as is");
            text.to_string()
        })
    }

    fn open(&self, text: &str) -> Option<String> {
        let sealed = STANDARD.decode(text.trim()).ok()?;
        if sealed.len() < NONCE_LEN + CHACHA20_POLY1305.tag_len() {
            return None;
        }

        let (nonce, rest) = sealed.split_at(NONCE_LEN);
        let nonce = Nonce::try_assume_unique_for_key(nonce).ok()?;
        let mut in_out = rest.to_vec();
        let plain = self
            .key
            .open_in_place(nonce, Aad::empty(), &mut in_out)
            .ok()?;
        String::from_utf8(plain.to_vec()).ok()
    }
}

fn legacy_decrypt(text: &str) -> Option<String> {
    let mut encoded = text.trim_end_matches(LEGACY_SUFFIX).to_string();
    for (word, symbol) in LEGACY_SUBSTITUTIONS {
        encoded = encoded.replace(word, symbol);
    }

    let bytes = STANDARD.decode(encoded).ok()?;
    let key = LEGACY_SECRET_KEY.as_bytes().get(..8)?;
    let plain = LegacyDecryptor::new_from_slices(key, &LEGACY_IV)
        .ok()?
        .decrypt_padded_vec_mut::<Pkcs7>(&bytes)
        .ok()?;
    String::from_utf8(plain).ok()
}
