//! Cryptographic core: key derivation and the layered cipher cascade.

pub(crate) mod cascade;
pub(crate) mod kdf;

/// Length of the salt (16 bytes).
pub const SALT_LEN: usize = 16;
/// Length of each MAC tag (64 bytes for both HMAC-SHA-512 and HMAC-SHA3-512).
pub const MAC_LEN: usize = 64;
/// IV length for AES-256 in counter mode.
pub const AES_IV_LEN: usize = 16;
/// IV length for Twofish-256 in counter mode.
pub const TWOFISH_IV_LEN: usize = 16;
/// Nonce length for XSalsa20.
pub const SALSA_NONCE_LEN: usize = 24;
/// Combined length of the three per-message IVs.
pub const IV_BUNDLE_LEN: usize = AES_IV_LEN + TWOFISH_IV_LEN + SALSA_NONCE_LEN;

/// Length of each MAC key (48 bytes).
pub(crate) const MAC_KEY_LEN: usize = 48;
/// Length of each cipher key (32 bytes / 256 bits).
pub(crate) const CIPHER_KEY_LEN: usize = 32;
/// Scrypt output length: two MAC keys, three cipher keys, and a reserved tail.
pub(crate) const MEGA_KEY_LEN: usize = 264;
