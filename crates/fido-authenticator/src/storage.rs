//! Durable storage for resident (discoverable) credentials and PIN state.
//!
//! `spec.md` explicitly excludes the on-disk serialization format from this
//! crate's scope; [`Storage`] is the seam such a format would plug into.
//! [`InMemoryStorage`] is the one concrete implementation shipped here, for
//! testability.
use crate::credential::CredentialSource;
use crate::error::Error;
use std::collections::HashMap;

/// Persistent authenticator state: resident credentials, the PIN hash and
/// retry counter, and per-credential signature counters.
///
/// Counter updates are persisted before the incremented value is ever
/// returned to a caller (`spec.md` §5/§9) — this is the one deliberate
/// behavioral change from the original Python authenticator, which
/// incremented its in-memory counter and returned the new value before the
/// corresponding write had necessarily landed.
pub trait Storage: Send + Sync {
    fn get_credential(&self, id: &[u8; 16]) -> Result<Option<CredentialSource>, Error>;

    fn credentials_for_relying_party(
        &self,
        relying_party_id: &str,
    ) -> Result<Vec<CredentialSource>, Error>;

    /// Looks up the resident credential already stored for this
    /// `(relying_party_id, user_id)` pair, if any — used by
    /// `authenticatorMakeCredential` to replace rather than duplicate it
    /// (`spec.md` §4.D).
    fn find_resident_credential(
        &self,
        relying_party_id: &str,
        user_id: &[u8],
    ) -> Result<Option<CredentialSource>, Error>;

    fn put_credential(&mut self, credential: CredentialSource) -> Result<(), Error>;

    fn delete_credential(&mut self, id: &[u8; 16]) -> Result<(), Error>;

    /// Persists the new counter value, then returns it. Implementations
    /// must not return before the write durably lands.
    fn increment_and_get_counter(&mut self, id: &[u8; 16]) -> Result<u32, Error>;

    fn pin_hash(&self) -> Result<Option<[u8; 16]>, Error>;
    fn set_pin_hash(&mut self, hash: Option<[u8; 16]>) -> Result<(), Error>;

    fn pin_retries(&self) -> Result<u8, Error>;
    fn set_pin_retries(&mut self, retries: u8) -> Result<(), Error>;

    /// Drops every resident credential and resets PIN state, leaving the
    /// wrapping key untouched — that is regenerated separately by whoever
    /// owns the [`crate::wrap::Wrapper`] (see `Authenticator::reset`).
    fn wipe(&mut self) -> Result<(), Error>;
}

/// An in-memory [`Storage`], useful for tests and for embedders that
/// provide their own persistence out of process.
#[derive(Default)]
pub struct InMemoryStorage {
    credentials: HashMap<[u8; 16], CredentialSource>,
    pin_hash: Option<[u8; 16]>,
    pin_retries: u8,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self {
            credentials: HashMap::new(),
            pin_hash: None,
            pin_retries: crate::pin::MAX_PIN_RETRIES,
        }
    }
}

impl Storage for InMemoryStorage {
    fn get_credential(&self, id: &[u8; 16]) -> Result<Option<CredentialSource>, Error> {
        Ok(self.credentials.get(id).cloned())
    }

    fn credentials_for_relying_party(
        &self,
        relying_party_id: &str,
    ) -> Result<Vec<CredentialSource>, Error> {
        Ok(self
            .credentials
            .values()
            .filter(|c| c.relying_party_id == relying_party_id)
            .cloned()
            .collect())
    }

    fn find_resident_credential(
        &self,
        relying_party_id: &str,
        user_id: &[u8],
    ) -> Result<Option<CredentialSource>, Error> {
        Ok(self
            .credentials
            .values()
            .find(|c| c.relying_party_id == relying_party_id && c.user.id == user_id)
            .cloned())
    }

    fn put_credential(&mut self, credential: CredentialSource) -> Result<(), Error> {
        let crate::credential::CredentialId::Stored(id) = credential.id else {
            return Err(Error::InvalidParameter);
        };
        self.credentials.insert(id, credential);
        Ok(())
    }

    fn delete_credential(&mut self, id: &[u8; 16]) -> Result<(), Error> {
        self.credentials.remove(id);
        Ok(())
    }

    fn increment_and_get_counter(&mut self, id: &[u8; 16]) -> Result<u32, Error> {
        let credential = self
            .credentials
            .get_mut(id)
            .ok_or(Error::NoCredentials)?;
        credential.sign_count = credential.sign_count.wrapping_add(1);
        Ok(credential.sign_count)
    }

    fn pin_hash(&self) -> Result<Option<[u8; 16]>, Error> {
        Ok(self.pin_hash)
    }

    fn set_pin_hash(&mut self, hash: Option<[u8; 16]>) -> Result<(), Error> {
        self.pin_hash = hash;
        Ok(())
    }

    fn pin_retries(&self) -> Result<u8, Error> {
        Ok(self.pin_retries)
    }

    fn set_pin_retries(&mut self, retries: u8) -> Result<(), Error> {
        self.pin_retries = retries;
        Ok(())
    }

    fn wipe(&mut self) -> Result<(), Error> {
        self.credentials.clear();
        self.pin_hash = None;
        self.pin_retries = crate::pin::MAX_PIN_RETRIES;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::CredentialId;
    use fido_common::credential::public_key::UserEntity;

    fn sample_credential(id: [u8; 16]) -> CredentialSource {
        CredentialSource {
            id: CredentialId::Stored(id),
            relying_party_id: "example.com".to_owned(),
            user: UserEntity {
                id: vec![1, 2, 3],
                name: None,
                display_name: None,
            },
            algorithm: fido_common::cose_algorithm::ES256,
            key_bytes: vec![0u8; 32],
            sign_count: 0,
            discoverable: true,
        }
    }

    #[test]
    fn counter_persists_before_it_is_returned() {
        let mut storage = InMemoryStorage::new();
        let id = [1u8; 16];
        storage.put_credential(sample_credential(id)).unwrap();

        let first = storage.increment_and_get_counter(&id).unwrap();
        let persisted = storage.get_credential(&id).unwrap().unwrap().sign_count;
        assert_eq!(first, persisted);
        assert_eq!(first, 1);
    }

    #[test]
    fn find_resident_credential_matches_by_rp_and_user() {
        let mut storage = InMemoryStorage::new();
        storage.put_credential(sample_credential([1u8; 16])).unwrap();

        let found = storage
            .find_resident_credential("example.com", &[1, 2, 3])
            .unwrap();
        assert!(found.is_some());

        assert!(storage
            .find_resident_credential("other.example", &[1, 2, 3])
            .unwrap()
            .is_none());
        assert!(storage
            .find_resident_credential("example.com", &[9, 9, 9])
            .unwrap()
            .is_none());
    }

    #[test]
    fn wipe_clears_credentials_and_pin() {
        let mut storage = InMemoryStorage::new();
        storage.put_credential(sample_credential([2u8; 16])).unwrap();
        storage.set_pin_hash(Some([9u8; 16])).unwrap();

        storage.wipe().unwrap();

        assert!(storage.get_credential(&[2u8; 16]).unwrap().is_none());
        assert_eq!(storage.pin_hash().unwrap(), None);
        assert_eq!(storage.pin_retries().unwrap(), crate::pin::MAX_PIN_RETRIES);
    }
}
