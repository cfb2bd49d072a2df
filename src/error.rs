//! Error taxonomy for cipher construction, encryption, and decryption.

use thiserror::Error;

/// Failures raised while constructing a cipher or encrypting.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncryptionError {
    /// The plaintext was empty; an envelope always carries at least one body byte.
    #[error("plaintext must not be empty")]
    ZeroLengthPlaintext,

    /// The password was empty.
    #[error("password must not be empty")]
    InvalidPassword,

    /// A caller-supplied salt was not exactly 16 bytes.
    #[error("salt must be exactly 16 bytes")]
    InvalidSaltLength,

    /// The random source could not deliver the requested bytes.
    #[error("random source failure")]
    RngFailure,
}

/// Failures raised while decrypting an envelope.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecryptionError {
    /// The envelope is truncated, carries the wrong magic, or an unsupported version.
    #[error("invalid ciphertext: truncated, bad magic, or unsupported version")]
    InvalidCiphertext,

    /// The envelope's salt differs from the cipher's salt.
    ///
    /// Reported before any MAC work so that batch-API misuse is
    /// distinguished from forgery.
    #[error("envelope salt does not match the cipher's salt")]
    MisMatchedCipherSalt,

    /// One or both MAC tags failed verification: the envelope was forged
    /// or corrupted, or the password is wrong.
    #[error("MAC verification failed")]
    MacMismatch,
}

/// Either failure family, as surfaced by the one-shot operations.
///
/// [`crate::decrypt`] derives a cipher from the password before it can
/// verify anything, so it can fail on either side of the taxonomy.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Encryption(#[from] EncryptionError),

    #[error(transparent)]
    Decryption(#[from] DecryptionError),
}
