use crate::{credential::Transport, CoseAlgorithmIdentifier};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "serde")]
use serde_with::{serde_as, Bytes};

use super::Type;

/// A public key's COSE encoding, as embedded in attested credential data and
/// in `authenticatorClientPIN`'s key agreement responses.
///
/// `coset::CoseKey` is used directly rather than a bespoke type since it
/// already implements the CBOR encoding `spec.md` §3/§4.F requires.
pub type Cose = coset::CoseKey;

/// > This dictionary is used to supply additional Relying Party attributes
/// > when creating a new credential.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RelyingPartyEntity {
    /// > A unique identifier for the Relying Party entity.
    pub id: String,
    /// > A human-palatable name for the Relying Party.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub name: Option<String>,
}

/// > This dictionary is used to supply additional user account attributes
/// > when creating a new credential.
#[cfg_attr(feature = "serde", serde_as)]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UserEntity {
    /// > The user handle of the user account entity.
    #[cfg_attr(feature = "serde", serde_as(as = "Bytes"))]
    pub id: Vec<u8>,
    /// > A human-palatable identifier for a user account.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub name: Option<String>,
    /// > A human-palatable name for the user account, intended only for
    /// > display.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub display_name: Option<String>,
}

/// > This dictionary is used to supply additional parameters when creating a
/// > new credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Parameters {
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub type_: Type,
    pub alg: CoseAlgorithmIdentifier,
}

/// > This dictionary identifies a specific public key credential.
#[cfg_attr(feature = "serde", serde_as)]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Descriptor {
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub type_: Type,
    #[cfg_attr(feature = "serde", serde_as(as = "Bytes"))]
    pub id: Vec<u8>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub transports: Option<Vec<Transport>>,
}

impl Descriptor {
    pub fn new(id: Vec<u8>) -> Self {
        Self {
            type_: Type::PublicKey,
            id,
            transports: None,
        }
    }
}
