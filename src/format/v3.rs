//! V3 envelope layout.
//!
//! ```text
//! MAGIC (4) | VERSION (4) | SALT (16) | MAC1 (64) | MAC2 (64) |
//! IV_AES (16) | IV_TWOFISH (16) | IV_XSALSA (24) | BODY
//! ```
//!
//! All fields are big-endian. MAC1 is HMAC-SHA-512, MAC2 is
//! HMAC-SHA3-512; both cover the header minus the MACs themselves,
//! followed by the body.

use super::{MAGIC, MAGIC_LEN, VER_LEN, VERSION};
use crate::crypto::cascade::{IvBundle, MacPair};
use crate::crypto::{
    AES_IV_LEN, IV_BUNDLE_LEN, MAC_LEN, SALSA_NONCE_LEN, SALT_LEN, TWOFISH_IV_LEN,
};
use crate::error::DecryptionError;

/// Fixed per-envelope overhead: everything before the body.
pub const HEADER_LEN: usize =
    MAGIC_LEN + VER_LEN + SALT_LEN + 2 * MAC_LEN + IV_BUNDLE_LEN;

/// Length of the authenticated-data prefix: the header minus both MACs.
pub(crate) const AD_PREFIX_LEN: usize = MAGIC_LEN + VER_LEN + SALT_LEN + IV_BUNDLE_LEN;

/// All header fields of a parsed envelope.
pub(crate) struct Header {
    pub salt: [u8; SALT_LEN],
    pub macs: MacPair,
    pub ivs: IvBundle,
}

/// Parses a v3 envelope into its header and body.
///
/// The caller has already validated magic and version.
pub(crate) fn parse(data: &[u8]) -> Result<(Header, &[u8]), DecryptionError> {
    if data.len() < HEADER_LEN {
        return Err(DecryptionError::InvalidCiphertext);
    }

    let mut header = Header {
        salt: [0u8; SALT_LEN],
        macs: MacPair {
            sha512: [0u8; MAC_LEN],
            sha3: [0u8; MAC_LEN],
        },
        ivs: IvBundle {
            aes: [0u8; AES_IV_LEN],
            twofish: [0u8; TWOFISH_IV_LEN],
            salsa: [0u8; SALSA_NONCE_LEN],
        },
    };

    let mut offset = MAGIC_LEN + VER_LEN;
    for field in [
        &mut header.salt[..],
        &mut header.macs.sha512[..],
        &mut header.macs.sha3[..],
        &mut header.ivs.aes[..],
        &mut header.ivs.twofish[..],
        &mut header.ivs.salsa[..],
    ] {
        field.copy_from_slice(&data[offset..offset + field.len()]);
        offset += field.len();
    }

    Ok((header, &data[offset..]))
}

/// Serializes an envelope from its parts.
pub(crate) fn encode(
    salt: &[u8; SALT_LEN],
    macs: &MacPair,
    ivs: &IvBundle,
    body: &[u8],
) -> Vec<u8> {
    let mut buf = Vec::with_capacity(HEADER_LEN + body.len());

    buf.extend_from_slice(&MAGIC);
    buf.extend_from_slice(&VERSION.to_be_bytes());
    buf.extend_from_slice(salt);
    buf.extend_from_slice(&macs.sha512);
    buf.extend_from_slice(&macs.sha3);
    buf.extend_from_slice(&ivs.aes);
    buf.extend_from_slice(&ivs.twofish);
    buf.extend_from_slice(&ivs.salsa);
    buf.extend_from_slice(body);

    buf
}

/// Assembles the authenticated-data prefix that both MACs cover before
/// the body: magic, version, salt, and all three IVs.
///
/// Binding the salt and IVs under the MACs prevents splicing fields
/// between envelopes.
pub(crate) fn authenticated_prefix(
    salt: &[u8; SALT_LEN],
    ivs: &IvBundle,
) -> [u8; AD_PREFIX_LEN] {
    let mut prefix = [0u8; AD_PREFIX_LEN];

    let mut offset = 0;
    for field in [
        &MAGIC[..],
        &VERSION.to_be_bytes()[..],
        &salt[..],
        &ivs.aes[..],
        &ivs.twofish[..],
        &ivs.salsa[..],
    ] {
        prefix[offset..offset + field.len()].copy_from_slice(field);
        offset += field.len();
    }

    prefix
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_parts() -> ([u8; SALT_LEN], MacPair, IvBundle) {
        (
            [0xaa; SALT_LEN],
            MacPair {
                sha512: [0xb1; MAC_LEN],
                sha3: [0xb2; MAC_LEN],
            },
            IvBundle {
                aes: [0xc1; AES_IV_LEN],
                twofish: [0xc2; TWOFISH_IV_LEN],
                salsa: [0xc3; SALSA_NONCE_LEN],
            },
        )
    }

    #[test]
    fn header_is_208_bytes() {
        assert_eq!(HEADER_LEN, 208);
        assert_eq!(AD_PREFIX_LEN, 80);
    }

    #[test]
    fn envelope_round_trip() {
        let (salt, macs, ivs) = sample_parts();
        let bytes = encode(&salt, &macs, &ivs, b"ciphertext body");
        assert_eq!(bytes.len(), HEADER_LEN + 15);

        let (header, body) = parse(&bytes).unwrap();
        assert_eq!(header.salt, salt);
        assert_eq!(header.macs.sha512, macs.sha512);
        assert_eq!(header.macs.sha3, macs.sha3);
        assert_eq!(header.ivs.aes, ivs.aes);
        assert_eq!(header.ivs.twofish, ivs.twofish);
        assert_eq!(header.ivs.salsa, ivs.salsa);
        assert_eq!(body, b"ciphertext body");
    }

    #[test]
    fn field_offsets_match_the_layout() {
        let (salt, macs, ivs) = sample_parts();
        let bytes = encode(&salt, &macs, &ivs, &[0xdd]);

        assert_eq!(&bytes[..4], &[0x1c, 0x94, 0xd7, 0xde]);
        assert_eq!(&bytes[4..8], &[0x00, 0x00, 0x00, 0x03]);
        assert_eq!(&bytes[8..24], &[0xaa; 16]);
        assert_eq!(&bytes[24..88], &[0xb1; 64]);
        assert_eq!(&bytes[88..152], &[0xb2; 64]);
        assert_eq!(&bytes[152..168], &[0xc1; 16]);
        assert_eq!(&bytes[168..184], &[0xc2; 16]);
        assert_eq!(&bytes[184..208], &[0xc3; 24]);
        assert_eq!(&bytes[208..], &[0xdd]);
    }

    #[test]
    fn authenticated_prefix_excludes_the_macs() {
        let (salt, macs, ivs) = sample_parts();
        let bytes = encode(&salt, &macs, &ivs, &[]);
        let prefix = authenticated_prefix(&salt, &ivs);

        assert_eq!(&prefix[..24], &bytes[..24]);
        assert_eq!(&prefix[24..], &bytes[152..208]);
    }

    #[test]
    fn parse_rejects_truncated_header() {
        let (salt, macs, ivs) = sample_parts();
        let bytes = encode(&salt, &macs, &ivs, b"body");
        assert!(parse(&bytes[..HEADER_LEN - 1]).is_err());
    }
}
