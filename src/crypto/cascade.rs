//! The three-layer stream cascade and the dual-MAC authentication.
//!
//! Encryption applies XSalsa20, then Twofish-256-CTR, then AES-256-CTR
//! in place; both MACs are computed afterwards over the canonical
//! authenticated prefix followed by the triply-encrypted body
//! (encrypt-then-MAC). Decryption verifies both tags in constant time
//! before any inverse cipher work.

use aes::Aes256;
use aes::cipher::{KeyIvInit, StreamCipher};
use ctr::Ctr128BE;
use hmac::{Hmac, Mac};
use salsa20::XSalsa20;
use sha2::Sha512;
use sha3::Sha3_512;
use subtle::ConstantTimeEq;
use twofish::Twofish;

use super::kdf::Subkeys;
use super::{AES_IV_LEN, MAC_LEN, SALSA_NONCE_LEN, TWOFISH_IV_LEN};
use crate::error::EncryptionError;
use crate::rng::RandomSource;

type Aes256Ctr = Ctr128BE<Aes256>;
type TwofishCtr = Ctr128BE<Twofish>;
type HmacSha512 = Hmac<Sha512>;
type HmacSha3_512 = Hmac<Sha3_512>;

/// The three per-message IVs. Fresh for every encryption.
pub(crate) struct IvBundle {
    pub aes: [u8; AES_IV_LEN],
    pub twofish: [u8; TWOFISH_IV_LEN],
    pub salsa: [u8; SALSA_NONCE_LEN],
}

impl IvBundle {
    /// Draws all three IVs from `rng` in one call.
    pub(crate) fn from_random<R: RandomSource>(rng: &mut R) -> Result<Self, EncryptionError> {
        let mut ivs = Self {
            aes: [0u8; AES_IV_LEN],
            twofish: [0u8; TWOFISH_IV_LEN],
            salsa: [0u8; SALSA_NONCE_LEN],
        };
        let mut draw = [0u8; super::IV_BUNDLE_LEN];
        rng.fill(&mut draw)?;

        let (aes, rest) = draw.split_at(AES_IV_LEN);
        let (twofish, salsa) = rest.split_at(TWOFISH_IV_LEN);
        ivs.aes.copy_from_slice(aes);
        ivs.twofish.copy_from_slice(twofish);
        ivs.salsa.copy_from_slice(salsa);
        Ok(ivs)
    }
}

/// Both authentication tags of an envelope.
pub(crate) struct MacPair {
    pub sha512: [u8; MAC_LEN],
    pub sha3: [u8; MAC_LEN],
}

/// Encrypts `buf` in place: XSalsa20, then Twofish-CTR, then AES-CTR.
pub(crate) fn apply_layers(keys: &Subkeys, ivs: &IvBundle, buf: &mut [u8]) {
    XSalsa20::new((&keys.xsalsa).into(), (&ivs.salsa).into()).apply_keystream(buf);
    TwofishCtr::new((&keys.twofish).into(), (&ivs.twofish).into()).apply_keystream(buf);
    Aes256Ctr::new((&keys.aes).into(), (&ivs.aes).into()).apply_keystream(buf);
}

/// Decrypts `buf` in place, inverting [`apply_layers`].
pub(crate) fn strip_layers(keys: &Subkeys, ivs: &IvBundle, buf: &mut [u8]) {
    Aes256Ctr::new((&keys.aes).into(), (&ivs.aes).into()).apply_keystream(buf);
    TwofishCtr::new((&keys.twofish).into(), (&ivs.twofish).into()).apply_keystream(buf);
    XSalsa20::new((&keys.xsalsa).into(), (&ivs.salsa).into()).apply_keystream(buf);
}

/// Computes both tags over `prefix || body`.
pub(crate) fn authenticate(keys: &Subkeys, prefix: &[u8], body: &[u8]) -> MacPair {
    let mut pair = MacPair {
        sha512: [0u8; MAC_LEN],
        sha3: [0u8; MAC_LEN],
    };

    let mut mac = HmacSha512::new_from_slice(&keys.hmac_sha512)
        .expect("HMAC accepts keys of any length");
    mac.update(prefix);
    mac.update(body);
    pair.sha512.copy_from_slice(&mac.finalize().into_bytes());

    let mut mac = HmacSha3_512::new_from_slice(&keys.hmac_sha3)
        .expect("HMAC accepts keys of any length");
    mac.update(prefix);
    mac.update(body);
    pair.sha3.copy_from_slice(&mac.finalize().into_bytes());

    pair
}

/// Recomputes both tags and compares them against `expected` in
/// constant time.
///
/// Both comparisons always run; neither short-circuits on the first
/// mismatching byte or on the first failing tag.
pub(crate) fn verify(keys: &Subkeys, prefix: &[u8], body: &[u8], expected: &MacPair) -> bool {
    let computed = authenticate(keys, prefix, body);
    let ok = computed.sha512[..].ct_eq(&expected.sha512[..])
        & computed.sha3[..].ct_eq(&expected.sha3[..]);
    ok.into()
}
