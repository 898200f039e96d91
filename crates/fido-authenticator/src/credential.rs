//! The credential model: resident (discoverable) credentials kept in
//! [`crate::storage::Storage`] versus non-resident credentials whose key
//! material is sealed into the `credentialId` itself by
//! [`crate::wrap::Wrapper`].
use fido_common::{credential::public_key, CoseAlgorithmIdentifier};

/// Identifies a credential on the wire.
///
/// `spec.md` §9 discriminates the two kinds by wire length, mirroring the
/// original's `len(allow_cred.get_id()) > CTAPHIDConstants.CREDENTIAL_ID_SIZE`
/// check: a resident credential's ID is a fixed 16-byte handle into local
/// storage, while a wrapped credential's ID carries its own sealed key
/// material and so is longer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialId {
    /// A handle into [`crate::storage::Storage`]; the credential's private
    /// key lives on-device.
    Stored([u8; 16]),
    /// An AEAD-sealed [`crate::wrap::WrappedCredential`]; the private key
    /// only ever exists transiently, reconstructed by
    /// [`crate::wrap::Wrapper::unwrap`].
    Wrapped(Vec<u8>),
}

/// The fixed length of a [`CredentialId::Stored`] handle, in bytes.
pub const STORED_ID_SIZE: usize = 16;

impl CredentialId {
    /// Classifies a wire-format credential ID by length, per `spec.md` §9.
    pub fn from_wire_bytes(bytes: &[u8]) -> Self {
        if bytes.len() <= STORED_ID_SIZE {
            let mut id = [0u8; STORED_ID_SIZE];
            id[..bytes.len()].copy_from_slice(bytes);
            CredentialId::Stored(id)
        } else {
            CredentialId::Wrapped(bytes.to_vec())
        }
    }

    pub fn as_wire_bytes(&self) -> &[u8] {
        match self {
            CredentialId::Stored(id) => id.as_slice(),
            CredentialId::Wrapped(id) => id.as_slice(),
        }
    }

    pub fn descriptor(&self) -> public_key::Descriptor {
        public_key::Descriptor::new(self.as_wire_bytes().to_vec())
    }
}

/// A credential as held in memory once loaded, whether from
/// [`crate::storage::Storage`] or freshly unwrapped.
#[derive(Debug, Clone)]
pub struct CredentialSource {
    pub id: CredentialId,
    pub relying_party_id: String,
    pub user: public_key::UserEntity,
    pub algorithm: CoseAlgorithmIdentifier,
    pub key_bytes: Vec<u8>,
    pub sign_count: u32,
    /// Resident credentials are discoverable via `GetAssertion` without an
    /// `allowList`; wrapped credentials are not, since nothing short of the
    /// relying party handing back the `credentialId` can locate them.
    pub discoverable: bool,
}
