//! TripleSec - triple-paranoid password-based authenticated encryption
//!
//! TripleSec v3 layers three independent stream ciphers (XSalsa20,
//! Twofish-256-CTR, AES-256-CTR) and two independent MACs
//! (HMAC-SHA-512, HMAC-SHA3-512) on top of a memory-hard scrypt key
//! derivation. A break of any single cipher or MAC leaves the envelope
//! intact.
//!
//! # Quick Start
//!
//! ```ignore
//! let envelope = triplesec::encrypt(b"my secret password", b"attack at dawn")?;
//! let plaintext = triplesec::decrypt(b"my secret password", &envelope)?;
//! assert_eq!(&plaintext[..], b"attack at dawn");
//! ```
//!
//! # Batch use
//!
//! Key derivation dominates the cost of a one-shot call. When several
//! messages share a password, derive a [`Cipher`] once and reuse it:
//!
//! ```ignore
//! use triplesec::{check_prefix, Cipher};
//!
//! let cipher = Cipher::new(b"my secret password")?;
//! let envelopes: Vec<_> = messages
//!     .iter()
//!     .map(|m| cipher.encrypt(m))
//!     .collect::<Result<_, _>>()?;
//!
//! // Later: recover the salt from any envelope and derive once to
//! // decrypt the whole batch.
//! let prefix = check_prefix(&envelopes[0])?;
//! let cipher = Cipher::with_salt(b"my secret password", prefix.salt())?;
//! ```

mod cipher;
mod crypto;
mod error;
mod format;
mod rng;

pub use crate::cipher::Cipher;
pub use crate::crypto::SALT_LEN;
pub use crate::error::{DecryptionError, EncryptionError, Error};
pub use crate::format::{check_prefix, Prefix, HEADER_LEN, MAGIC, VERSION};
pub use crate::rng::{RandomSource, SeededRandom, SystemRandom};

use zeroize::Zeroizing;

/// Encrypts one message under `password` with a freshly derived cipher.
///
/// Draws a random salt, runs the full key derivation, encrypts, and
/// discards the cipher. Sequences of messages sharing a password should
/// use [`Cipher`] directly to amortize the derivation.
///
/// # Errors
///
/// Returns [`EncryptionError::ZeroLengthPlaintext`] if `plaintext` is
/// empty (checked before the derivation cost is paid),
/// [`EncryptionError::InvalidPassword`] if `password` is empty, or
/// [`EncryptionError::RngFailure`] if the OS entropy pool is
/// unavailable.
pub fn encrypt(password: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, Error> {
    encrypt_with_rng(password, plaintext, &mut SystemRandom)
}

/// Encrypts one message, drawing the salt and all IVs from `rng`.
///
/// The generator is advanced by both draws; a deterministic `rng`
/// yields a deterministic envelope.
pub fn encrypt_with_rng<R: RandomSource>(
    password: &[u8],
    plaintext: &[u8],
    rng: &mut R,
) -> Result<Vec<u8>, Error> {
    if plaintext.is_empty() {
        return Err(EncryptionError::ZeroLengthPlaintext.into());
    }

    let cipher = Cipher::new_with_rng(password, rng)?;
    Ok(cipher.encrypt_with_rng(plaintext, rng)?)
}

/// Decrypts an envelope produced by [`encrypt`].
///
/// Recovers the salt from the envelope header, derives the cipher, and
/// verifies both MACs before returning the plaintext in a buffer that
/// wipes itself on drop.
///
/// # Errors
///
/// Surfaces [`DecryptionError`] values for framing, salt, and MAC
/// failures, and [`EncryptionError::InvalidPassword`] if `password` is
/// empty.
pub fn decrypt(password: &[u8], envelope: &[u8]) -> Result<Zeroizing<Vec<u8>>, Error> {
    let prefix = check_prefix(envelope)?;
    let cipher = Cipher::with_salt(password, prefix.salt())?;
    Ok(cipher.decrypt(envelope)?)
}
