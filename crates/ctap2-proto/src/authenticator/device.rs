use crate::{authenticator::client_pin::auth_protocol, extensions};
use fido_common::credential::{public_key, Transport};
use flagset::{flags, FlagSet};
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "serde")]
use serde_with::{serde_as, skip_serializing_none, Bytes};

flags! {
    /// > Supported versions.
    ///
    /// > Supported authenticator version strings.
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub enum Version: u8 {
        #[cfg_attr(feature = "serde", serde(rename = "U2F_V2"))]
        U2fV2,
        #[cfg_attr(feature = "serde", serde(rename = "FIDO_2_0"))]
        Fido20,
        #[cfg_attr(feature = "serde", serde(rename = "FIDO_2_1_PRE"))]
        Fido21Pre,
        #[cfg_attr(feature = "serde", serde(rename = "FIDO_2_1"))]
        Fido21,
    }
}

/// > This member defines the options for this authenticator. The option
/// > keys are defined in the options table of `authenticatorGetInfo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OptionKey {
    /// > indicates that the device is attached to the client and therefore
    /// > can't be removed and used on another client.
    #[cfg_attr(feature = "serde", serde(rename = "plat"))]
    Platform,
    /// > indicates that the authenticator is capable of storing discoverable
    /// > credentials, and therefore can satisfy the `authenticatorGetAssertion`
    /// > request with the `allowList` parameter absent.
    #[cfg_attr(feature = "serde", serde(rename = "rk"))]
    Discoverable,
    /// > indicates that the authenticator is capable of verifying the user
    /// > within itself.
    #[cfg_attr(feature = "serde", serde(rename = "clientPin"))]
    ClientPin,
    /// > indicates that the authenticator is capable of testing user
    /// > presence.
    #[cfg_attr(feature = "serde", serde(rename = "up"))]
    UserPresence,
    /// > indicates that the authenticator supports the `authenticatorConfig`
    /// > command.
    #[cfg_attr(feature = "serde", serde(rename = "uv"))]
    UserVerification,
}

/// > This method is invoked by the host to request information about this
/// > authenticator's capabilities.
///
/// > <https://fidoalliance.org/specs/fido-v2.1-ps-20210615/fido-client-to-authenticator-protocol-v2.1-ps-errata-20220621.html#authenticatorGetInfo>
#[cfg_attr(feature = "serde", serde_as)]
#[cfg_attr(feature = "serde", skip_serializing_none)]
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Info {
    /// > List of supported versions.
    #[cfg_attr(feature = "serde", serde(rename = 0x01))]
    pub versions: FlagSet<Version>,
    /// > List of supported extensions.
    #[cfg_attr(feature = "serde", serde(rename = 0x02))]
    pub extensions: Option<Vec<extensions::Identifier>>,
    /// > The claimed AAGUID.
    #[cfg_attr(feature = "serde", serde(rename = 0x03), serde_as(as = "Bytes"))]
    pub aaguid: [u8; 16],
    /// > List of supported options.
    #[cfg_attr(feature = "serde", serde(rename = 0x04))]
    pub options: BTreeMap<OptionKey, bool>,
    /// > Maximum message size supported by the authenticator.
    #[cfg_attr(feature = "serde", serde(rename = 0x05))]
    pub max_msg_size: Option<usize>,
    /// > List of supported PIN/UV auth protocols in authenticator preferred
    /// > order, with the most preferred first.
    #[cfg_attr(feature = "serde", serde(rename = 0x06))]
    pub pin_uv_auth_protocols: Option<Vec<auth_protocol::Version>>,
    /// > Maximum number of credentials supported in `credentialID` list at a
    /// > time by the authenticator.
    #[cfg_attr(feature = "serde", serde(rename = 0x07))]
    pub max_credential_count_in_list: Option<usize>,
    /// > Maximum Credential ID Length supported by the authenticator.
    #[cfg_attr(feature = "serde", serde(rename = 0x08))]
    pub max_credential_id_length: Option<usize>,
    /// > List of the transports this authenticator supports.
    #[cfg_attr(feature = "serde", serde(rename = 0x09))]
    pub transports: Option<Vec<Transport>>,
    /// > List of supported algorithms for credential generation, in order of
    /// > preference.
    #[cfg_attr(feature = "serde", serde(rename = 0x0A))]
    pub algorithms: Option<Vec<public_key::Parameters>>,
}
