use crate::{
    authenticator::{client_pin::AuthProtocolVersion, Sha256Hash},
    extensions,
};
use fido_common::credential::public_key;
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "serde")]
use serde_with::{serde_as, skip_serializing_none, Bytes};

#[derive(Debug, Clone, Copy)]
pub enum Error {
    OperationDenied,
    PinNotSet,
    PinInvalid,
    InvalidParameter,
    MissingParameter,
    InvalidOption,
    UnsupportedOption,
    PinUvAuthTokenRequired,
    PinAuthInvalid,
    UserActionTimeout,
    PinBlocked,
    NoCredentials,
}

/// > The following option keys are defined for use in
/// > [`Request`]'s `options` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OptionKey {
    /// > user presence: Instructs the authenticator to require user consent
    /// > to complete the operation.
    #[cfg_attr(feature = "serde", serde(rename = "up"))]
    UserPresence,
    /// > user verification: If true, instructs the authenticator to require
    /// > a user-verifying gesture in order to complete the request.
    /// > Examples of such gestures are fingerprint scan or a PIN.
    #[cfg_attr(feature = "serde", serde(rename = "uv"))]
    UserVerification,
}

/// Request parameters for the `authenticatorGetAssertion` operation.
#[cfg_attr(feature = "serde", serde_as)]
#[cfg_attr(feature = "serde", skip_serializing_none)]
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct Request {
    /// > relying party identifier
    #[cfg_attr(feature = "serde", serde(rename = 0x01))]
    pub relying_party_id: String,
    /// > Hash of the serialized client data collected by the host.
    #[cfg_attr(feature = "serde", serde(rename = 0x02), serde_as(as = "Bytes"))]
    pub client_data_hash: Sha256Hash,
    /// > An array of [`public_key::Descriptor`] structures, each denoting a
    /// > credential, as specified in `WebAuthn`. A platform MUST NOT send
    /// > an empty `allowList`. If this parameter is present the
    /// > authenticator MUST only generate an assertion using one of the
    /// > denoted credentials.
    #[cfg_attr(feature = "serde", serde(rename = 0x03))]
    pub allow_list: Option<Vec<public_key::Descriptor>>,
    /// > Parameters to influence authenticator operation. These parameters
    /// > might be authenticator specific.
    #[cfg_attr(feature = "serde", serde(rename = 0x04))]
    pub extensions: Option<BTreeMap<extensions::Identifier, Vec<u8>>>,
    /// > Parameters to influence authenticator operation.
    #[cfg_attr(feature = "serde", serde(rename = 0x05))]
    pub options: Option<BTreeMap<OptionKey, bool>>,
    #[cfg_attr(
        feature = "serde",
        serde(rename = 0x06),
        serde_as(as = "Option<Bytes>")
    )]
    pub pin_uv_auth_param: Option<Vec<u8>>,
    /// > PIN/UV protocol version selected by platform.
    #[cfg_attr(feature = "serde", serde(rename = 0x07))]
    pub pin_uv_auth_protocol_version: Option<AuthProtocolVersion>,
}

/// Response structure for the `authenticatorGetAssertion` operation.
#[cfg_attr(feature = "serde", serde_as)]
#[cfg_attr(feature = "serde", skip_serializing_none)]
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Response {
    /// > PublicKeyCredentialDescriptor structure containing the credential
    /// > identifier whose private key was used to generate the assertion.
    #[cfg_attr(feature = "serde", serde(rename = 0x01))]
    pub credential: public_key::Descriptor,
    /// > The signed-over contextual bindings made by the authenticator, as
    /// > specified in [WebAuthn].
    #[cfg_attr(feature = "serde", serde(rename = 0x02), serde_as(as = "Bytes"))]
    pub auth_data: Vec<u8>,
    /// > The assertion signature produced by the authenticator, as
    /// > specified in [WebAuthn].
    #[cfg_attr(feature = "serde", serde(rename = 0x03), serde_as(as = "Bytes"))]
    pub signature: Vec<u8>,
    /// > [`public_key::UserEntity`] structure containing the user account
    /// > information
    #[cfg_attr(feature = "serde", serde(rename = 0x04))]
    pub user: Option<public_key::UserEntity>,
    /// > Total number of account credentials for the RP. Optional; defaults
    /// > to one. This member is required when more than one credential is
    /// > found for an RP, and the authenticator does not have a display or
    /// > the UV & UP flags are false.
    #[cfg_attr(feature = "serde", serde(rename = 0x05))]
    pub number_of_credentials: Option<usize>,
    /// > Indicates that a credential was selected by the user via
    /// > interaction directly with the authenticator, and thus the platform
    /// > does not need to confirm the credential.
    #[cfg_attr(feature = "serde", serde(rename = 0x06))]
    pub user_selected: Option<bool>,
    /// > The contents of the associated `largeBlobKey` if present for the
    /// > asserted credential, and if `largeBlobKey` was true in the
    /// > extensions input.
    #[cfg_attr(
        feature = "serde",
        serde(rename = 0x07),
        serde_as(as = "Option<Bytes>")
    )]
    pub large_blob_key: Option<Vec<u8>>,
}
