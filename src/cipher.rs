//! A reusable cipher bound to one (password, salt) pair.

use zeroize::Zeroizing;

use crate::crypto::cascade::{self, IvBundle};
use crate::crypto::kdf::{self, Subkeys};
use crate::crypto::SALT_LEN;
use crate::error::{DecryptionError, EncryptionError};
use crate::format::{self, v3};
use crate::rng::{RandomSource, SystemRandom};

/// A cipher holding the subkeys derived for one (password, salt) pair.
///
/// Derivation runs the full scrypt work factor, so the point of a
/// `Cipher` is amortization: derive once, then encrypt or decrypt any
/// number of messages that share the pair. The value is immutable after
/// construction and all subkeys are zeroized on drop.
///
/// Encryption draws a fresh IV bundle per message, so one cipher may be
/// shared freely across readers.
///
/// # Example
///
/// ```ignore
/// use triplesec::Cipher;
///
/// let cipher = Cipher::new(b"my secret password")?;
/// let envelope = cipher.encrypt(b"message one")?;
/// let plaintext = cipher.decrypt(&envelope)?;
/// assert_eq!(&plaintext[..], b"message one");
/// ```
pub struct Cipher {
    salt: [u8; SALT_LEN],
    keys: Subkeys,
}

impl std::fmt::Debug for Cipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cipher").field("salt", &self.salt).finish_non_exhaustive()
    }
}

impl Cipher {
    /// Derives a cipher under a fresh random salt.
    ///
    /// # Errors
    ///
    /// Returns [`EncryptionError::InvalidPassword`] if the password is
    /// empty, or [`EncryptionError::RngFailure`] if the OS entropy pool
    /// is unavailable.
    pub fn new(password: &[u8]) -> Result<Self, EncryptionError> {
        Self::new_with_rng(password, &mut SystemRandom)
    }

    /// Derives a cipher under a fresh salt drawn from `rng`.
    pub fn new_with_rng<R: RandomSource>(
        password: &[u8],
        rng: &mut R,
    ) -> Result<Self, EncryptionError> {
        let mut salt = [0u8; SALT_LEN];
        rng.fill(&mut salt)?;
        Self::derive(password, salt)
    }

    /// Derives a cipher under a caller-supplied salt, as recovered from
    /// an existing envelope via [`crate::check_prefix`].
    ///
    /// # Errors
    ///
    /// Returns [`EncryptionError::InvalidPassword`] if the password is
    /// empty, or [`EncryptionError::InvalidSaltLength`] if `salt` is not
    /// exactly 16 bytes.
    pub fn with_salt(password: &[u8], salt: &[u8]) -> Result<Self, EncryptionError> {
        let salt: [u8; SALT_LEN] = salt
            .try_into()
            .map_err(|_| EncryptionError::InvalidSaltLength)?;
        Self::derive(password, salt)
    }

    fn derive(password: &[u8], salt: [u8; SALT_LEN]) -> Result<Self, EncryptionError> {
        if password.is_empty() {
            return Err(EncryptionError::InvalidPassword);
        }

        let keys = kdf::derive_subkeys(password, &salt);
        Ok(Self { salt, keys })
    }

    /// Returns the salt this cipher was derived under.
    pub fn salt(&self) -> &[u8; SALT_LEN] {
        &self.salt
    }

    /// Encrypts one message, drawing IVs from the OS.
    ///
    /// # Errors
    ///
    /// Returns [`EncryptionError::ZeroLengthPlaintext`] if `plaintext`
    /// is empty, or [`EncryptionError::RngFailure`] if the OS entropy
    /// pool is unavailable.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, EncryptionError> {
        self.encrypt_with_rng(plaintext, &mut SystemRandom)
    }

    /// Encrypts one message, drawing IVs from `rng`.
    ///
    /// Applies XSalsa20, Twofish-256-CTR, and AES-256-CTR in sequence,
    /// then authenticates the result with both MACs and frames the
    /// envelope.
    pub fn encrypt_with_rng<R: RandomSource>(
        &self,
        plaintext: &[u8],
        rng: &mut R,
    ) -> Result<Vec<u8>, EncryptionError> {
        if plaintext.is_empty() {
            return Err(EncryptionError::ZeroLengthPlaintext);
        }

        let ivs = IvBundle::from_random(rng)?;
        let mut body = plaintext.to_vec();
        cascade::apply_layers(&self.keys, &ivs, &mut body);

        let prefix = v3::authenticated_prefix(&self.salt, &ivs);
        let macs = cascade::authenticate(&self.keys, &prefix, &body);

        Ok(v3::encode(&self.salt, &macs, &ivs, &body))
    }

    /// Decrypts one envelope produced under this cipher's salt.
    ///
    /// Both MAC tags are recomputed and compared in constant time
    /// before any inverse cipher work; the plaintext is returned in a
    /// buffer that wipes itself on drop.
    ///
    /// # Errors
    ///
    /// - [`DecryptionError::InvalidCiphertext`] if the envelope does not
    ///   frame correctly.
    /// - [`DecryptionError::MisMatchedCipherSalt`] if the envelope was
    ///   produced under a different salt.
    /// - [`DecryptionError::MacMismatch`] if either tag fails to verify.
    pub fn decrypt(&self, envelope: &[u8]) -> Result<Zeroizing<Vec<u8>>, DecryptionError> {
        let (header, body) = format::parse(envelope)?;

        if header.salt != self.salt {
            return Err(DecryptionError::MisMatchedCipherSalt);
        }

        let prefix = v3::authenticated_prefix(&header.salt, &header.ivs);
        if !cascade::verify(&self.keys, &prefix, body, &header.macs) {
            return Err(DecryptionError::MacMismatch);
        }

        let mut plaintext = Zeroizing::new(body.to_vec());
        cascade::strip_layers(&self.keys, &header.ivs, &mut plaintext);
        Ok(plaintext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SeededRandom;

    #[test]
    fn empty_password_is_rejected() {
        assert_eq!(
            Cipher::new(b"").unwrap_err(),
            EncryptionError::InvalidPassword
        );
        assert_eq!(
            Cipher::with_salt(b"", &[0u8; SALT_LEN]).unwrap_err(),
            EncryptionError::InvalidPassword
        );
    }

    #[test]
    fn wrong_salt_length_is_rejected() {
        assert_eq!(
            Cipher::with_salt(b"pw", &[0u8; 15]).unwrap_err(),
            EncryptionError::InvalidSaltLength
        );
        assert_eq!(
            Cipher::with_salt(b"pw", &[0u8; 17]).unwrap_err(),
            EncryptionError::InvalidSaltLength
        );
    }

    #[test]
    fn encrypt_decrypt_round_trip() {
        let cipher = Cipher::with_salt(b"pw", &[9u8; SALT_LEN]).unwrap();

        let envelope = cipher.encrypt(b"secret data").unwrap();
        assert_eq!(envelope.len(), crate::format::HEADER_LEN + 11);

        let plaintext = cipher.decrypt(&envelope).unwrap();
        assert_eq!(&plaintext[..], b"secret data");
    }

    #[test]
    fn empty_plaintext_is_rejected_before_any_randomness() {
        let cipher = Cipher::with_salt(b"pw", &[9u8; SALT_LEN]).unwrap();
        let mut rng = SeededRandom::from_seed([0u8; 32]);

        assert_eq!(
            cipher.encrypt_with_rng(b"", &mut rng).unwrap_err(),
            EncryptionError::ZeroLengthPlaintext
        );

        // The generator was not advanced by the failed call.
        let mut untouched = SeededRandom::from_seed([0u8; 32]);
        let mut a = [0u8; 8];
        let mut b = [0u8; 8];
        rng.fill(&mut a).unwrap();
        untouched.fill(&mut b).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn mismatched_salt_is_reported_before_mac_checking() {
        let sender = Cipher::with_salt(b"pw", &[1u8; SALT_LEN]).unwrap();
        let receiver = Cipher::with_salt(b"pw", &[2u8; SALT_LEN]).unwrap();

        let envelope = sender.encrypt(b"message").unwrap();
        assert_eq!(
            receiver.decrypt(&envelope).err(),
            Some(DecryptionError::MisMatchedCipherSalt)
        );
    }

    #[test]
    fn seeded_rng_gives_identical_envelopes() {
        let cipher = Cipher::with_salt(b"pw", &[9u8; SALT_LEN]).unwrap();

        let mut rng = SeededRandom::from_seed([5u8; 32]);
        let a = cipher.encrypt_with_rng(b"message", &mut rng).unwrap();
        let mut rng = SeededRandom::from_seed([5u8; 32]);
        let b = cipher.encrypt_with_rng(b"message", &mut rng).unwrap();

        assert_eq!(a, b);
        assert_eq!(&cipher.decrypt(&a).unwrap()[..], b"message");
    }
}
