pub mod public_key;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// > This enumeration defines the valid credential types. It is an
/// > extension point; values can be added to it in the future, as
/// > more credential types are defined. The values of this
/// > enumeration are used for versioning the Authentication
/// > Assertion and attestation structures according to the type of
/// > the authenticator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[non_exhaustive]
pub enum Type {
    #[cfg_attr(feature = "serde", serde(rename = "public-key"))]
    PublicKey,
}

/// > Authenticators may implement various transports for communicating with
/// > clients. This enumeration defines hints as to how clients might
/// > communicate with a particular authenticator in order to obtain an
/// > assertion for a specific credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[non_exhaustive]
pub enum Transport {
    #[cfg_attr(feature = "serde", serde(rename = "usb"))]
    Usb,
    #[cfg_attr(feature = "serde", serde(rename = "nfc"))]
    Nfc,
    #[cfg_attr(feature = "serde", serde(rename = "ble"))]
    Ble,
    #[cfg_attr(feature = "serde", serde(rename = "internal"))]
    Internal,
}
