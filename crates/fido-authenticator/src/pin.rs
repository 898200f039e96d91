//! The PIN subsystem: ECDH key agreement, PIN encryption, and the PIN retry
//! state machine.
//!
//! Grounded directly on `DICEKey.py`'s `authenticatorGetClientPIN_*`
//! methods: `setPIN`/`changePIN`/`getPINToken` all run `_generate_shared_secret`
//! against the platform's supplied COSE key, verify a `pinUvAuthParam` HMAC,
//! and (for `changePIN`/`getPINToken`) decrement the retry counter *before*
//! checking whether the supplied PIN hash matches, restoring it to
//! [`MAX_PIN_RETRIES`] only on success.
use crate::error::Error;
use crate::storage::Storage;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use hmac::{Hmac, Mac};
use p256::ecdh::diffie_hellman;
use p256::{PublicKey, SecretKey};
use rand_core::{CryptoRng, RngCore};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// The retry counter an authenticator's PIN is reset to on every successful
/// `setPIN`/`changePIN`, mirroring `self._storage.set_pin_retries(8)`.
pub const MAX_PIN_RETRIES: u8 = 8;

/// The minimum accepted PIN length in bytes, mirroring
/// `if len(pin) < 4: raise ... PIN_POLICY_VIOLATION`.
pub const MIN_PIN_LENGTH: usize = 4;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;
type HmacSha256 = Hmac<Sha256>;

const ZERO_IV: [u8; 16] = [0u8; 16];

/// The authenticator's half of the PIN/UV auth protocol ECDH key agreement.
///
/// A fresh key pair is generated at authenticator start-up and on every
/// `Reset`, so a platform cannot correlate `pinUvAuthToken` sessions across
/// a reset (`spec.md` §3).
pub struct KeyAgreement {
    secret: SecretKey,
}

impl KeyAgreement {
    pub fn generate(rng: &mut (impl RngCore + CryptoRng)) -> Self {
        Self {
            secret: SecretKey::random(rng),
        }
    }

    pub fn public_key_cose(&self) -> cosey::PublicKey {
        let point = self.secret.public_key().to_encoded_point(false);
        let x: [u8; 32] = point.x().expect("uncompressed x").as_slice().try_into().unwrap();
        let y: [u8; 32] = point.y().expect("uncompressed y").as_slice().try_into().unwrap();
        cosey::PublicKey::P256Key(cosey::P256PublicKey { x, y })
    }

    /// Derives the shared secret with a platform-supplied COSE key: ECDH
    /// over P-256, then SHA-256 of the shared point's x-coordinate.
    pub fn shared_secret(&self, peer: &cosey::PublicKey) -> Result<[u8; 32], Error> {
        let cosey::PublicKey::P256Key(p256_key) = peer else {
            return Err(Error::InvalidParameter);
        };
        let encoded = p256::EncodedPoint::from_affine_coordinates(
            p256_key.x.as_slice().into(),
            p256_key.y.as_slice().into(),
            false,
        );
        let peer_public =
            PublicKey::from_sec1_bytes(encoded.as_bytes()).map_err(|_| Error::InvalidParameter)?;

        let shared = diffie_hellman(self.secret.to_nonzero_scalar(), peer_public.as_affine());
        let mut hasher = Sha256::new();
        hasher.update(shared.raw_secret_bytes());
        Ok(hasher.finalize().into())
    }
}

/// Encrypts `plaintext` with AES-256-CBC under `shared_secret`, using an
/// all-zero IV (PIN/UV auth protocol one, CTAP2 §6.5.6).
pub fn encrypt(shared_secret: &[u8; 32], plaintext: &[u8]) -> Result<Vec<u8>, Error> {
    if plaintext.len() % 16 != 0 {
        return Err(Error::InvalidParameter);
    }
    let mut buf = plaintext.to_vec();
    let encryptor = Aes256CbcEnc::new(shared_secret.into(), &ZERO_IV.into());
    let ciphertext = encryptor
        .encrypt_padded_mut::<aes::cipher::block_padding::NoPadding>(&mut buf, plaintext.len())
        .map_err(|_| Error::CryptoFailure)?;
    Ok(ciphertext.to_vec())
}

pub fn decrypt(shared_secret: &[u8; 32], ciphertext: &[u8]) -> Result<Vec<u8>, Error> {
    if ciphertext.len() % 16 != 0 {
        return Err(Error::InvalidParameter);
    }
    let mut buf = ciphertext.to_vec();
    let decryptor = Aes256CbcDec::new(shared_secret.into(), &ZERO_IV.into());
    let plaintext = decryptor
        .decrypt_padded_mut::<aes::cipher::block_padding::NoPadding>(&mut buf)
        .map_err(|_| Error::CryptoFailure)?;
    Ok(plaintext.to_vec())
}

/// Computes the truncated-to-16-bytes HMAC-SHA-256 used as `pinUvAuthParam`.
pub fn authenticate(key: &[u8], message: &[u8]) -> [u8; 16] {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(message);
    let full: [u8; 32] = mac.finalize().into_bytes().into();
    let mut truncated = [0u8; 16];
    truncated.copy_from_slice(&full[..16]);
    truncated
}

/// Verifies `expected` against the HMAC of `message` under `key`, in
/// constant time. A `pinUvAuthParam` shorter than 16 bytes is always
/// rejected outright rather than compared against a truncated prefix of the
/// computed MAC, which would let an empty or short param match trivially.
pub fn verify(key: &[u8], message: &[u8], expected: &[u8]) -> bool {
    if expected.len() != 16 {
        return false;
    }
    let computed = authenticate(key, message);
    computed.ct_eq(expected).into()
}

/// Hashes a newly chosen PIN the way it is stored: SHA-256, truncated to 16
/// bytes (`self._sha256(pin)[:16]`).
pub fn hash_pin(pin: &[u8]) -> [u8; 16] {
    let mut hasher = Sha256::new();
    hasher.update(pin);
    let full: [u8; 32] = hasher.finalize().into();
    let mut truncated = [0u8; 16];
    truncated.copy_from_slice(&full[..16]);
    truncated
}

/// Extracts the PIN's plaintext bytes from a decrypted, NUL-padded buffer.
pub fn extract_pin(decrypted: &[u8]) -> &[u8] {
    let end = decrypted.iter().position(|&b| b == 0).unwrap_or(decrypted.len());
    &decrypted[..end]
}

/// Sets the authenticator's PIN for the first time.
///
/// Fails with [`Error::OperationDenied`] if a PIN is already set — `setPIN`
/// is a one-shot operation; `changePIN` is used thereafter.
pub fn set_pin(
    storage: &mut dyn Storage,
    shared_secret: &[u8; 32],
    new_pin_encrypted: &[u8],
    pin_uv_auth_param: &[u8],
) -> Result<(), Error> {
    if storage.pin_hash()?.is_some() {
        return Err(Error::OperationDenied);
    }
    if !verify(shared_secret, new_pin_encrypted, pin_uv_auth_param) {
        return Err(Error::PinAuthInvalid);
    }
    let decrypted = decrypt(shared_secret, new_pin_encrypted)?;
    let pin = extract_pin(&decrypted);
    if pin.len() < MIN_PIN_LENGTH {
        return Err(Error::PinPolicyViolation);
    }
    storage.set_pin_hash(Some(hash_pin(pin)))?;
    Ok(())
}

/// Changes an already-set PIN, decrementing the retry counter before the
/// supplied PIN hash is even checked — the original's mitigation against a
/// platform probing `changePIN` as an oracle for `getPINToken`.
pub fn change_pin(
    storage: &mut dyn Storage,
    shared_secret: &[u8; 32],
    pin_hash_encrypted: &[u8],
    new_pin_encrypted: &[u8],
    pin_uv_auth_param: &[u8],
) -> Result<(), Error> {
    if storage.pin_hash()?.is_none() {
        return Err(Error::PinNotSet);
    }
    let mut auth_message = new_pin_encrypted.to_vec();
    auth_message.extend_from_slice(pin_hash_encrypted);
    if !verify(shared_secret, &auth_message, pin_uv_auth_param) {
        return Err(Error::PinAuthInvalid);
    }

    consume_retry(storage)?;

    let decrypted_pin_hash = decrypt(shared_secret, pin_hash_encrypted)?;
    let stored = storage.pin_hash()?.ok_or(Error::PinNotSet)?;
    if decrypted_pin_hash.get(..16) != Some(stored.as_slice()) {
        return Err(Error::PinInvalid);
    }

    let decrypted_pin = decrypt(shared_secret, new_pin_encrypted)?;
    let pin = extract_pin(&decrypted_pin);
    if pin.len() < MIN_PIN_LENGTH {
        return Err(Error::PinPolicyViolation);
    }
    storage.set_pin_hash(Some(hash_pin(pin)))?;
    storage.set_pin_retries(MAX_PIN_RETRIES)?;
    Ok(())
}

/// Verifies a PIN hash and returns whether it matched, applying the same
/// decrement-then-check retry bookkeeping as [`change_pin`].
pub fn verify_pin_hash(
    storage: &mut dyn Storage,
    shared_secret: &[u8; 32],
    pin_hash_encrypted: &[u8],
) -> Result<(), Error> {
    if storage.pin_hash()?.is_none() {
        return Err(Error::PinNotSet);
    }

    consume_retry(storage)?;

    let decrypted_pin_hash = decrypt(shared_secret, pin_hash_encrypted)?;
    let stored = storage.pin_hash()?.ok_or(Error::PinNotSet)?;
    if decrypted_pin_hash.get(..16) != Some(stored.as_slice()) {
        return Err(Error::PinInvalid);
    }

    storage.set_pin_retries(MAX_PIN_RETRIES)?;
    Ok(())
}

fn consume_retry(storage: &mut dyn Storage) -> Result<(), Error> {
    let retries = storage.pin_retries()?;
    if retries == 0 {
        return Err(Error::PinBlocked);
    }
    storage.set_pin_retries(retries - 1)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryStorage;
    use rand_chacha::rand_core::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn agreed_secrets() -> ([u8; 32], [u8; 32]) {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let authenticator = KeyAgreement::generate(&mut rng);
        let platform = KeyAgreement::generate(&mut rng);

        let auth_secret = authenticator
            .shared_secret(&platform.public_key_cose())
            .unwrap();
        let platform_secret = platform
            .shared_secret(&authenticator.public_key_cose())
            .unwrap();
        (auth_secret, platform_secret)
    }

    #[test]
    fn ecdh_key_agreement_is_symmetric() {
        let (a, b) = agreed_secrets();
        assert_eq!(a, b);
    }

    #[test]
    fn set_then_verify_pin_round_trips() {
        let (shared, _) = agreed_secrets();
        let mut storage = InMemoryStorage::new();

        let mut pin_padded = b"1234".to_vec();
        pin_padded.resize(64, 0);
        let encrypted = encrypt(&shared, &pin_padded).unwrap();
        let auth = authenticate(&shared, &encrypted);

        set_pin(&mut storage, &shared, &encrypted, &auth).unwrap();
        assert!(storage.pin_hash().unwrap().is_some());

        let pin_hash = hash_pin(b"1234");
        let mut hash_padded = pin_hash.to_vec();
        hash_padded.resize(16, 0);
        let hash_encrypted = encrypt(&shared, &hash_padded).unwrap();

        verify_pin_hash(&mut storage, &shared, &hash_encrypted).unwrap();
        assert_eq!(storage.pin_retries().unwrap(), MAX_PIN_RETRIES);
    }

    #[test]
    fn failed_pin_check_decrements_retries_before_failing() {
        let (shared, _) = agreed_secrets();
        let mut storage = InMemoryStorage::new();

        let mut pin_padded = b"1234".to_vec();
        pin_padded.resize(64, 0);
        let encrypted = encrypt(&shared, &pin_padded).unwrap();
        let auth = authenticate(&shared, &encrypted);
        set_pin(&mut storage, &shared, &encrypted, &auth).unwrap();

        let wrong_hash = hash_pin(b"9999");
        let mut hash_padded = wrong_hash.to_vec();
        hash_padded.resize(16, 0);
        let hash_encrypted = encrypt(&shared, &hash_padded).unwrap();

        let result = verify_pin_hash(&mut storage, &shared, &hash_encrypted);
        assert!(matches!(result, Err(Error::PinInvalid)));
        assert_eq!(storage.pin_retries().unwrap(), MAX_PIN_RETRIES - 1);
    }

    #[test]
    fn verify_rejects_empty_pin_uv_auth_param() {
        let (shared, _) = agreed_secrets();
        assert!(!verify(&shared, b"message", &[]));
    }

    #[test]
    fn short_pin_is_rejected() {
        let (shared, _) = agreed_secrets();
        let mut storage = InMemoryStorage::new();

        let mut pin_padded = b"12".to_vec();
        pin_padded.resize(64, 0);
        let encrypted = encrypt(&shared, &pin_padded).unwrap();
        let auth = authenticate(&shared, &encrypted);

        let result = set_pin(&mut storage, &shared, &encrypted, &auth);
        assert!(matches!(result, Err(Error::PinPolicyViolation)));
    }
}
