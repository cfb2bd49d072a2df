//! Scrypt mega-key derivation and subkey partitioning.
//!
//! A password and a 16-byte salt are stretched into 264 bytes of key
//! material, split in fixed order into the five subkeys the cascade
//! consumes. The tail of the mega key is reserved by the v3 protocol
//! and discarded.

use scrypt::{Params, scrypt};
use zeroize::{Zeroize, Zeroizing};

use super::{CIPHER_KEY_LEN, MAC_KEY_LEN, MEGA_KEY_LEN, SALT_LEN};

// Fixed v3 work factor: N = 2^15, r = 8, p = 1.
const SCRYPT_LOG_N: u8 = 15;
const SCRYPT_R: u32 = 8;
const SCRYPT_P: u32 = 1;

/// The five subkeys derived for one (password, salt) pair.
///
/// All key material is wiped on drop.
pub(crate) struct Subkeys {
    /// Key for the HMAC-SHA-512 tag.
    pub hmac_sha512: [u8; MAC_KEY_LEN],
    /// Key for the HMAC-SHA3-512 tag.
    pub hmac_sha3: [u8; MAC_KEY_LEN],
    /// Key for the AES-256-CTR layer.
    pub aes: [u8; CIPHER_KEY_LEN],
    /// Key for the Twofish-256-CTR layer.
    pub twofish: [u8; CIPHER_KEY_LEN],
    /// Key for the XSalsa20 layer.
    pub xsalsa: [u8; CIPHER_KEY_LEN],
}

impl Drop for Subkeys {
    fn drop(&mut self) {
        self.hmac_sha512.zeroize();
        self.hmac_sha3.zeroize();
        self.aes.zeroize();
        self.twofish.zeroize();
        self.xsalsa.zeroize();
    }
}

/// Derives the subkeys for `password` under `salt`.
///
/// Runs the full scrypt work factor; callers amortize the cost by
/// holding on to the resulting cipher for batches of messages.
pub(crate) fn derive_subkeys(password: &[u8], salt: &[u8; SALT_LEN]) -> Subkeys {
    // `Params::new`'s `len` is only used by the crate's `PasswordHasher`
    // integration (capped to 10..=64) and is ignored by `scrypt()` itself,
    // which sizes its output from the `mega` buffer below.
    let params = Params::new(SCRYPT_LOG_N, SCRYPT_R, SCRYPT_P, Params::RECOMMENDED_LEN)
        .expect("fixed scrypt parameters are valid");

    let mut mega = Zeroizing::new([0u8; MEGA_KEY_LEN]);
    scrypt(password, salt, &params, &mut *mega)
        .expect("mega key length is within scrypt limits");

    partition(&mega)
}

/// Splits the mega key into subkeys, in the fixed v3 order.
fn partition(mega: &[u8; MEGA_KEY_LEN]) -> Subkeys {
    let mut keys = Subkeys {
        hmac_sha512: [0u8; MAC_KEY_LEN],
        hmac_sha3: [0u8; MAC_KEY_LEN],
        aes: [0u8; CIPHER_KEY_LEN],
        twofish: [0u8; CIPHER_KEY_LEN],
        xsalsa: [0u8; CIPHER_KEY_LEN],
    };

    let mut offset = 0;
    for segment in [
        &mut keys.hmac_sha512[..],
        &mut keys.hmac_sha3[..],
        &mut keys.aes[..],
        &mut keys.twofish[..],
        &mut keys.xsalsa[..],
    ] {
        segment.copy_from_slice(&mega[offset..offset + segment.len()]);
        offset += segment.len();
    }
    // The remaining 72 bytes are reserved and stay inside the wiped buffer.

    keys
}
