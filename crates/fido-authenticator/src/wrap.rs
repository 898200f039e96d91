//! Credential wrapping: the AEAD scheme behind non-resident (non-discoverable)
//! credentials.
//!
//! A non-resident credential's private key material never touches durable
//! storage; instead it is sealed into the `credentialId` the relying party
//! is handed back, and only unsealed again when that exact `credentialId` is
//! presented in a later `GetAssertion`. Grounded on the AES-256-GCM usage in
//! `other_examples/10c1b597_...nl-wallet...crypto.rs.rs`.
use crate::error::Error;
use aes_gcm::{
    aead::{Aead, KeyInit, Payload},
    Aes256Gcm, Nonce,
};
use rand_core::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

/// The symmetric key an authenticator uses to wrap and unwrap credentials.
///
/// Regenerated on [`crate::Authenticator::reset`], which is what makes
/// previously wrapped credentials cryptographically unusable afterwards —
/// see `SPEC_FULL.md` §9.
pub type WrappingKey = [u8; 32];

const NONCE_LEN: usize = 12;

/// The plaintext sealed inside a wrapped `credentialId`.
///
/// Self-describing per `spec.md` §4.B: algorithm, key material, and
/// signature counter are all here, alongside the user handle, so a wrapped
/// credential can still answer `authenticatorGetAssertion`'s user entity
/// without any local storage to fall back on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WrappedCredential {
    pub relying_party_id_hash: [u8; 32],
    pub algorithm: fido_common::CoseAlgorithmIdentifier,
    pub key_bytes: Vec<u8>,
    pub sign_count: u32,
    pub user_id: Vec<u8>,
}

/// Seals and opens [`WrappedCredential`]s under a [`WrappingKey`].
///
/// The relying party ID hash is bound in as AEAD associated data (rather
/// than being part of the encrypted payload only) so a `credentialId`
/// wrapped for one RP cannot be replayed, even ciphertext-for-ciphertext,
/// against a different RP's `GetAssertion` call.
pub struct Wrapper {
    cipher: Aes256Gcm,
}

impl Wrapper {
    pub fn new(key: &WrappingKey) -> Self {
        Self {
            cipher: Aes256Gcm::new(key.into()),
        }
    }

    pub fn wrap(
        &self,
        credential: &WrappedCredential,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Result<Vec<u8>, Error> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        rng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let plaintext =
            ciborium_payload(credential).map_err(|_| Error::CryptoFailure)?;

        let ciphertext = self
            .cipher
            .encrypt(
                nonce,
                Payload {
                    msg: &plaintext,
                    aad: &credential.relying_party_id_hash,
                },
            )
            .map_err(|_| Error::CryptoFailure)?;

        let mut id = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        id.extend_from_slice(&nonce_bytes);
        id.extend_from_slice(&ciphertext);
        Ok(id)
    }

    pub fn unwrap(
        &self,
        wrapped_id: &[u8],
        relying_party_id_hash: &[u8; 32],
    ) -> Result<WrappedCredential, Error> {
        if wrapped_id.len() < NONCE_LEN {
            return Err(Error::InvalidParameter);
        }
        let (nonce_bytes, ciphertext) = wrapped_id.split_at(NONCE_LEN);
        let nonce = Nonce::from_slice(nonce_bytes);

        let plaintext = self
            .cipher
            .decrypt(
                nonce,
                Payload {
                    msg: ciphertext,
                    aad: relying_party_id_hash,
                },
            )
            .map_err(|_| Error::CryptoFailure)?;

        let credential: WrappedCredential =
            ciborium::de::from_reader(plaintext.as_slice()).map_err(|_| Error::CryptoFailure)?;
        if &credential.relying_party_id_hash != relying_party_id_hash {
            return Err(Error::InvalidParameter);
        }
        Ok(credential)
    }
}

fn ciborium_payload(credential: &WrappedCredential) -> Result<Vec<u8>, ciborium::ser::Error<std::io::Error>> {
    let mut buf = Vec::new();
    ciborium::ser::into_writer(credential, &mut buf)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::rand_core::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn wrap_then_unwrap_round_trips() {
        let key: WrappingKey = [7u8; 32];
        let wrapper = Wrapper::new(&key);
        let mut rng = ChaCha20Rng::seed_from_u64(42);

        let credential = WrappedCredential {
            relying_party_id_hash: [1u8; 32],
            algorithm: fido_common::cose_algorithm::ES256,
            key_bytes: vec![9u8; 32],
            sign_count: 0,
            user_id: vec![4, 5, 6],
        };

        let id = wrapper.wrap(&credential, &mut rng).unwrap();
        let opened = wrapper
            .unwrap(&id, &credential.relying_party_id_hash)
            .unwrap();

        assert_eq!(opened.key_bytes, credential.key_bytes);
        assert_eq!(opened.sign_count, 0);
        assert_eq!(opened.user_id, credential.user_id);
    }

    #[test]
    fn unwrap_rejects_mismatched_relying_party() {
        let key: WrappingKey = [7u8; 32];
        let wrapper = Wrapper::new(&key);
        let mut rng = ChaCha20Rng::seed_from_u64(42);

        let credential = WrappedCredential {
            relying_party_id_hash: [1u8; 32],
            algorithm: fido_common::cose_algorithm::ES256,
            key_bytes: vec![9u8; 32],
            sign_count: 0,
            user_id: vec![4, 5, 6],
        };

        let id = wrapper.wrap(&credential, &mut rng).unwrap();
        let result = wrapper.unwrap(&id, &[2u8; 32]);
        assert!(result.is_err());
    }
}
