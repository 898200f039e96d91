use fido_common::credential::public_key;

#[cfg(feature = "serde")]
use serde::Serialize;
#[cfg(feature = "serde")]
use serde_with::{serde_as, skip_serializing_none, Bytes};

/// > This method is used by a platform to fetch the next assertion from the
/// > result of a previous `authenticatorGetAssertion` call that returned a
/// > `numberOfCredentials` greater than one.
///
/// Takes no parameters; it operates on the authenticator's internal
/// candidate list left over from the preceding `GetAssertion` call (see
/// `spec.md` §4.G). Field numbers match `authenticatorGetAssertion`'s
/// response, minus `numberOfCredentials`.
#[cfg_attr(feature = "serde", serde_as)]
#[cfg_attr(feature = "serde", skip_serializing_none)]
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Response {
    #[cfg_attr(feature = "serde", serde(rename = 0x01))]
    pub credential: public_key::Descriptor,
    #[cfg_attr(feature = "serde", serde(rename = 0x02), serde_as(as = "Bytes"))]
    pub auth_data: Vec<u8>,
    #[cfg_attr(feature = "serde", serde(rename = 0x03), serde_as(as = "Bytes"))]
    pub signature: Vec<u8>,
    #[cfg_attr(feature = "serde", serde(rename = 0x04))]
    pub user: Option<public_key::UserEntity>,
    #[cfg_attr(feature = "serde", serde(rename = 0x06))]
    pub user_selected: Option<bool>,
    #[cfg_attr(
        feature = "serde",
        serde(rename = 0x07),
        serde_as(as = "Option<Bytes>")
    )]
    pub large_blob_key: Option<Vec<u8>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// No preceding `GetAssertion` call left a candidate list, or the list
    /// has already been exhausted.
    NotAllowed,
    UserActionTimeout,
}
