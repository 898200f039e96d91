pub mod enterprise;

use crate::credential::public_key;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "serde")]
use serde_with::{serde_as, Bytes};

/// > attested credential data is a variable-length byte array added to the
/// > authenticator data when generating an attestation object for a given
/// > credential.
///
/// Produced by `MakeCredential` only; absent from `GetAssertion`'s
/// authenticator data. `credential_public_key` is the credential's COSE
/// public key, as assembled by the attestation component (`spec.md` §4.F).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialData {
    /// > The AAGUID of the authenticator.
    pub aaguid: [u8; 16],
    pub credential_id: Vec<u8>,
    pub credential_public_key: public_key::Cose,
}

/// > Authenticators are not required to provide attestation in all
/// > attestation statement formats, and a single authenticator might
/// > provide attestation in more than one attestation statement format.
///
/// Only `"packed"` self-attestation (an attestation signed with the
/// credential's own private key rather than a batch attestation key) is
/// produced by this authenticator core — see `spec.md` §1 Non-goals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[non_exhaustive]
pub enum FormatIdentifier {
    #[cfg_attr(feature = "serde", serde(rename = "packed"))]
    Packed,
}

/// > An attestation statement is conveyed as an attestation object...
///
/// This crate only ever produces the `"packed"`/self-attestation form
/// described in `spec.md` §4.F: `alg` is the credential's own COSE
/// algorithm and `sig` is that credential's private key signing
/// `authData || clientDataHash`. There is no `x5c` field because no
/// certificate chain is produced.
#[cfg_attr(feature = "serde", serde_as)]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Statement {
    pub alg: crate::CoseAlgorithmIdentifier,
    #[cfg_attr(feature = "serde", serde_as(as = "Bytes"))]
    pub sig: Vec<u8>,
}
