//! Envelope framing for the TripleSec wire format.
//!
//! Provides version-aware parsing of the ciphertext envelope and the
//! header-only [`check_prefix`] used to recover a salt without paying
//! for decryption.

pub(crate) mod v3;

pub use v3::HEADER_LEN;

use crate::crypto::SALT_LEN;
use crate::error::DecryptionError;

/// Magic bytes identifying a TripleSec envelope.
pub const MAGIC: [u8; MAGIC_LEN] = [0x1c, 0x94, 0xd7, 0xde];
/// The only supported envelope version.
pub const VERSION: u32 = 3;

pub(crate) const MAGIC_LEN: usize = 4;
pub(crate) const VER_LEN: usize = 4;

/// Header summary returned by [`check_prefix`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prefix {
    version: u32,
    salt: [u8; SALT_LEN],
    body_len: usize,
}

impl Prefix {
    /// Returns the envelope format version.
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Returns the salt the envelope's cipher was derived under.
    pub fn salt(&self) -> &[u8; SALT_LEN] {
        &self.salt
    }

    /// Returns the length of the encrypted body.
    pub fn body_len(&self) -> usize {
        self.body_len
    }
}

/// Parses an envelope's header without verifying its MACs.
///
/// Useful for recovering the salt of an existing envelope so that one
/// derived [`crate::Cipher`] can decrypt a whole batch.
///
/// # Errors
///
/// Returns [`DecryptionError::InvalidCiphertext`] if the input is
/// shorter than a header, does not start with the magic bytes, or
/// carries an unsupported version.
pub fn check_prefix(data: &[u8]) -> Result<Prefix, DecryptionError> {
    let (header, body) = parse(data)?;
    Ok(Prefix {
        version: VERSION,
        salt: header.salt,
        body_len: body.len(),
    })
}

/// Parses an envelope, dispatching on its version.
pub(crate) fn parse(data: &[u8]) -> Result<(v3::Header, &[u8]), DecryptionError> {
    match read_version(data)? {
        VERSION => v3::parse(data),
        _ => Err(DecryptionError::InvalidCiphertext),
    }
}

fn read_version(data: &[u8]) -> Result<u32, DecryptionError> {
    if data.len() < MAGIC_LEN + VER_LEN {
        return Err(DecryptionError::InvalidCiphertext);
    }
    if data[..MAGIC_LEN] != MAGIC {
        return Err(DecryptionError::InvalidCiphertext);
    }

    let mut version = [0u8; VER_LEN];
    version.copy_from_slice(&data[MAGIC_LEN..MAGIC_LEN + VER_LEN]);
    Ok(u32::from_be_bytes(version))
}
