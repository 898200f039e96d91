//! Pluggable signature algorithm support.
//!
//! Grounded on `AuthenticatorCryptoProvider`/`CRYPTO_PROVIDERS` in the
//! original implementation: a `CryptoProvider` wraps key generation and
//! signing for one COSE algorithm, and a [`Registry`] looks providers up by
//! algorithm identifier, in the order the relying party listed them, so the
//! dispatcher can pick the most-preferred algorithm it actually supports.
use crate::error::Error;
use fido_common::CoseAlgorithmIdentifier;
use p256::ecdsa::{signature::Signer, Signature, SigningKey, VerifyingKey};
use rand_core::{CryptoRng, RngCore};

/// A generated key pair, opaque outside the [`CryptoProvider`] that produced
/// it except for its COSE-encodable public half.
pub trait KeyPair: Send + Sync {
    fn public_key_cose(&self) -> coset::CoseKey;
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, Error>;
    /// The private key, encoded so it can be wrapped by
    /// [`crate::wrap::Wrapper`] and later reconstituted via
    /// [`CryptoProvider::load_key_pair`].
    fn to_bytes(&self) -> Vec<u8>;
}

/// One supported COSE signature algorithm.
///
/// An authenticator ships one [`CryptoProvider`] per algorithm it supports;
/// `spec.md` treats "raw cryptographic primitive implementations" as a
/// pluggable interface, so only ES256 is wired up as a concrete provider
/// here (see [`Es256Provider`]) but new algorithms plug in the same way.
pub trait CryptoProvider: Send + Sync {
    fn algorithm(&self) -> CoseAlgorithmIdentifier;

    fn create_key_pair(&self, rng: &mut dyn RngCoreDyn) -> Result<Box<dyn KeyPair>, Error>;

    fn load_key_pair(&self, bytes: &[u8]) -> Result<Box<dyn KeyPair>, Error>;
}

/// Object-safe stand-in for `RngCore + CryptoRng`, so [`CryptoProvider`] can
/// remain object-safe while still requiring a cryptographically secure
/// source.
pub trait RngCoreDyn {
    fn fill(&mut self, dest: &mut [u8]);
}

impl<T: RngCore + CryptoRng> RngCoreDyn for T {
    fn fill(&mut self, dest: &mut [u8]) {
        self.fill_bytes(dest);
    }
}

/// Looks up a [`CryptoProvider`] by COSE algorithm identifier.
///
/// Mirrors `CRYPTO_PROVIDERS`, the original's global algorithm→provider map
/// populated via `add_provider`; this type makes that table an explicit,
/// per-authenticator value instead of process-global mutable state.
#[derive(Default)]
pub struct Registry {
    providers: Vec<Box<dyn CryptoProvider>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `provider`, overriding any earlier provider already
    /// registered for the same algorithm (`spec.md` §4.A: later appends with
    /// a duplicate `alg` overwrite rather than shadow).
    pub fn register(&mut self, provider: Box<dyn CryptoProvider>) -> &mut Self {
        let algorithm = provider.algorithm();
        self.providers.retain(|p| p.algorithm() != algorithm);
        self.providers.push(provider);
        self
    }

    pub fn get(&self, algorithm: CoseAlgorithmIdentifier) -> Option<&dyn CryptoProvider> {
        self.providers
            .iter()
            .find(|p| p.algorithm() == algorithm)
            .map(|p| p.as_ref())
    }

    /// Picks the first algorithm in `preference_order` this registry has a
    /// provider for, matching the original's first-match-in-request-order
    /// negotiation (see `SPEC_FULL.md`'s supplemented-features section).
    pub fn negotiate(
        &self,
        preference_order: impl IntoIterator<Item = CoseAlgorithmIdentifier>,
    ) -> Option<&dyn CryptoProvider> {
        preference_order
            .into_iter()
            .find_map(|alg| self.get(alg))
    }

    /// All algorithms this registry has a provider for, in registration
    /// order — reported verbatim in `authenticatorGetInfo`'s `algorithms`
    /// field.
    pub fn algorithms(&self) -> Vec<CoseAlgorithmIdentifier> {
        self.providers.iter().map(|p| p.algorithm()).collect()
    }
}

/// ES256 (ECDSA over P-256 with SHA-256), the one mandatory-to-implement
/// algorithm under CTAP2, backed by `p256`.
pub struct Es256Provider;

struct Es256KeyPair {
    signing_key: SigningKey,
}

impl KeyPair for Es256KeyPair {
    fn public_key_cose(&self) -> coset::CoseKey {
        let verifying_key: VerifyingKey = *self.signing_key.verifying_key();
        let point = verifying_key.to_encoded_point(false);
        let x = point.x().expect("uncompressed point has x").to_vec();
        let y = point.y().expect("uncompressed point has y").to_vec();

        coset::CoseKeyBuilder::new_ec2_pub_key(coset::iana::EllipticCurve::P_256, x, y)
            .algorithm(coset::iana::Algorithm::ES256)
            .build()
    }

    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, Error> {
        let signature: Signature = self.signing_key.sign(message);
        Ok(signature.to_der().as_bytes().to_vec())
    }

    fn to_bytes(&self) -> Vec<u8> {
        self.signing_key.to_bytes().to_vec()
    }
}

impl CryptoProvider for Es256Provider {
    fn algorithm(&self) -> CoseAlgorithmIdentifier {
        fido_common::cose_algorithm::ES256
    }

    fn create_key_pair(&self, rng: &mut dyn RngCoreDyn) -> Result<Box<dyn KeyPair>, Error> {
        let mut seed = [0u8; 32];
        rng.fill(&mut seed);
        let field_bytes = p256::FieldBytes::from(seed);
        let signing_key =
            SigningKey::from_bytes(&field_bytes).map_err(|_| Error::CryptoFailure)?;
        Ok(Box::new(Es256KeyPair { signing_key }))
    }

    fn load_key_pair(&self, bytes: &[u8]) -> Result<Box<dyn KeyPair>, Error> {
        let signing_key = SigningKey::from_slice(bytes).map_err(|_| Error::CryptoFailure)?;
        Ok(Box::new(Es256KeyPair { signing_key }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::rand_core::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn es256_round_trips_key_material() {
        let provider = Es256Provider;
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let key_pair = provider.create_key_pair(&mut rng).unwrap();
        let reloaded = provider.load_key_pair(&key_pair.to_bytes()).unwrap();

        let signature = reloaded.sign(b"hello").unwrap();
        assert!(!signature.is_empty());
    }

    #[test]
    fn registry_negotiates_first_supported_algorithm() {
        let mut registry = Registry::new();
        registry.register(Box::new(Es256Provider));

        let chosen = registry
            .negotiate([fido_common::cose_algorithm::RS256, fido_common::cose_algorithm::ES256])
            .unwrap();
        assert_eq!(chosen.algorithm(), fido_common::cose_algorithm::ES256);
    }
}
