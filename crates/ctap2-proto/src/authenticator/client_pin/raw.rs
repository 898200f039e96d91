//! Flat wire representation of `authenticatorClientPIN` requests and
//! responses.
//!
//! CBOR has no native externally-tagged union support, but CTAP2 encodes
//! `authenticatorClientPIN`'s sub-commands as a single map whose `subCommand`
//! field (0x02) selects which of the other fields are meaningful. These
//! `Raw*` types model that map directly; [`Request`]/[`Response`] convert to
//! and from it so the rest of the crate only ever sees the sub-command as a
//! proper Rust enum.

use super::{Error, Permission, PinUvAuthParam, Request, Response};
use crate::authenticator::client_pin::auth_protocol;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, skip_serializing_none, Bytes};

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[derive(Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
enum SubCommand {
    GetPinRetries = 0x01,
    GetKeyAgreement = 0x02,
    SetPin = 0x03,
    ChangePin = 0x04,
    GetPinToken = 0x05,
    GetPinUvAuthTokenUsingUvWithPermissions = 0x06,
    GetUvRetries = 0x07,
    GetPinUvAuthTokenUsingPinWithPermissions = 0x09,
}

impl From<SubCommand> for u8 {
    fn from(value: SubCommand) -> Self {
        value as u8
    }
}

impl TryFrom<u8> for SubCommand {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x01 => Ok(Self::GetPinRetries),
            0x02 => Ok(Self::GetKeyAgreement),
            0x03 => Ok(Self::SetPin),
            0x04 => Ok(Self::ChangePin),
            0x05 => Ok(Self::GetPinToken),
            0x06 => Ok(Self::GetPinUvAuthTokenUsingUvWithPermissions),
            0x07 => Ok(Self::GetUvRetries),
            0x09 => Ok(Self::GetPinUvAuthTokenUsingPinWithPermissions),
            _ => Err(Error::InvalidParameter),
        }
    }
}

#[serde_as]
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(super) struct RawRequest {
    #[serde(rename = 0x01)]
    pin_uv_auth_protocol: Option<auth_protocol::Version>,
    #[serde(rename = 0x02)]
    sub_command: SubCommand,
    #[serde(rename = 0x03)]
    key_agreement: Option<cosey::PublicKey>,
    #[serde(rename = 0x04)]
    #[serde_as(as = "Option<Bytes>")]
    pin_uv_auth_param: Option<Vec<u8>>,
    #[serde(rename = 0x05)]
    #[serde_as(as = "Option<Bytes>")]
    new_pin_enc: Option<Vec<u8>>,
    #[serde(rename = 0x06)]
    #[serde_as(as = "Option<Bytes>")]
    pin_hash_enc: Option<Vec<u8>>,
    #[serde(rename = 0x09)]
    permissions: Option<u8>,
    #[serde(rename = 0x0A)]
    rp_id: Option<String>,
}

fn pin_uv_auth_param_array(bytes: Option<Vec<u8>>) -> Result<PinUvAuthParam, Error> {
    let bytes = bytes.ok_or(Error::MissingParameter)?;
    bytes.try_into().map_err(|_| Error::InvalidParameter)
}

fn fixed_array<const N: usize>(bytes: Option<Vec<u8>>) -> Result<[u8; N], Error> {
    let bytes = bytes.ok_or(Error::MissingParameter)?;
    bytes.try_into().map_err(|_| Error::InvalidParameter)
}

impl TryFrom<RawRequest> for Request {
    type Error = Error;

    fn try_from(raw: RawRequest) -> Result<Self, Self::Error> {
        let version = || raw.pin_uv_auth_protocol.ok_or(Error::MissingParameter);
        let key_agreement = || raw.key_agreement.clone().ok_or(Error::MissingParameter);
        let permissions = || Permission::bits_to_set(raw.permissions.unwrap_or_default());

        match raw.sub_command {
            SubCommand::GetPinRetries => Ok(Request::GetPinRetries),
            SubCommand::GetUvRetries => Ok(Request::GetUvRetries),
            SubCommand::GetKeyAgreement => Ok(Request::GetKeyAgreement { version: version()? }),
            SubCommand::SetPin => Ok(Request::SetPin {
                version: version()?,
                key_agreement: key_agreement()?,
                new_pin_encrypted: fixed_array(raw.new_pin_enc)?,
                pin_uv_auth_param: pin_uv_auth_param_array(raw.pin_uv_auth_param)?,
            }),
            SubCommand::ChangePin => Ok(Request::ChangePin {
                version: version()?,
                key_agreement: key_agreement()?,
                pin_hash_encrypted: fixed_array(raw.pin_hash_enc)?,
                new_pin_encrypted: fixed_array(raw.new_pin_enc)?,
                pin_uv_auth_param: pin_uv_auth_param_array(raw.pin_uv_auth_param)?,
            }),
            SubCommand::GetPinToken => Ok(Request::GetPinToken {
                version: version()?,
                key_agreement: key_agreement()?,
                pin_hash_encrypted: fixed_array(raw.pin_hash_enc)?,
            }),
            SubCommand::GetPinUvAuthTokenUsingUvWithPermissions => {
                Ok(Request::GetPinUvAuthTokenUsingUvWithPermissions {
                    version: version()?,
                    key_agreement: key_agreement()?,
                    permissions: permissions(),
                    relying_party_id: raw.rp_id,
                })
            }
            SubCommand::GetPinUvAuthTokenUsingPinWithPermissions => {
                Ok(Request::GetPinUvAuthTokenUsingPinWithPermissions {
                    version: version()?,
                    key_agreement: key_agreement()?,
                    pin_hash_encrypted: fixed_array(raw.pin_hash_enc)?,
                    permissions: permissions(),
                    relying_party_id: raw.rp_id,
                })
            }
        }
    }
}

impl From<Request> for RawRequest {
    fn from(request: Request) -> Self {
        let empty = RawRequest {
            pin_uv_auth_protocol: None,
            sub_command: SubCommand::GetPinRetries,
            key_agreement: None,
            pin_uv_auth_param: None,
            new_pin_enc: None,
            pin_hash_enc: None,
            permissions: None,
            rp_id: None,
        };
        match request {
            Request::GetPinRetries => RawRequest {
                sub_command: SubCommand::GetPinRetries,
                ..empty
            },
            Request::GetUvRetries => RawRequest {
                sub_command: SubCommand::GetUvRetries,
                ..empty
            },
            Request::GetKeyAgreement { version } => RawRequest {
                sub_command: SubCommand::GetKeyAgreement,
                pin_uv_auth_protocol: Some(version),
                ..empty
            },
            Request::SetPin {
                version,
                key_agreement,
                new_pin_encrypted,
                pin_uv_auth_param,
            } => RawRequest {
                sub_command: SubCommand::SetPin,
                pin_uv_auth_protocol: Some(version),
                key_agreement: Some(key_agreement),
                new_pin_enc: Some(new_pin_encrypted.to_vec()),
                pin_uv_auth_param: Some(pin_uv_auth_param.to_vec()),
                ..empty
            },
            Request::ChangePin {
                version,
                key_agreement,
                pin_hash_encrypted,
                new_pin_encrypted,
                pin_uv_auth_param,
            } => RawRequest {
                sub_command: SubCommand::ChangePin,
                pin_uv_auth_protocol: Some(version),
                key_agreement: Some(key_agreement),
                pin_hash_enc: Some(pin_hash_encrypted.to_vec()),
                new_pin_enc: Some(new_pin_encrypted.to_vec()),
                pin_uv_auth_param: Some(pin_uv_auth_param.to_vec()),
                ..empty
            },
            Request::GetPinToken {
                version,
                key_agreement,
                pin_hash_encrypted,
            } => RawRequest {
                sub_command: SubCommand::GetPinToken,
                pin_uv_auth_protocol: Some(version),
                key_agreement: Some(key_agreement),
                pin_hash_enc: Some(pin_hash_encrypted.to_vec()),
                ..empty
            },
            Request::GetPinUvAuthTokenUsingUvWithPermissions {
                version,
                key_agreement,
                permissions,
                relying_party_id,
            } => RawRequest {
                sub_command: SubCommand::GetPinUvAuthTokenUsingUvWithPermissions,
                pin_uv_auth_protocol: Some(version),
                key_agreement: Some(key_agreement),
                permissions: Some(Permission::set_to_bits(&permissions)),
                rp_id: relying_party_id,
                ..empty
            },
            Request::GetPinUvAuthTokenUsingPinWithPermissions {
                version,
                key_agreement,
                pin_hash_encrypted,
                permissions,
                relying_party_id,
            } => RawRequest {
                sub_command: SubCommand::GetPinUvAuthTokenUsingPinWithPermissions,
                pin_uv_auth_protocol: Some(version),
                key_agreement: Some(key_agreement),
                pin_hash_enc: Some(pin_hash_encrypted.to_vec()),
                permissions: Some(Permission::set_to_bits(&permissions)),
                rp_id: relying_party_id,
                ..empty
            },
        }
    }
}

#[serde_as]
#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct RawResponse {
    #[serde(rename = 0x01)]
    key_agreement: Option<cosey::PublicKey>,
    #[serde(rename = 0x02)]
    #[serde_as(as = "Option<Bytes>")]
    pin_uv_auth_token: Option<Vec<u8>>,
    #[serde(rename = 0x03)]
    pin_retries: Option<usize>,
    #[serde(rename = 0x04)]
    power_cycle_state: Option<usize>,
    #[serde(rename = 0x05)]
    uv_retries: Option<usize>,
}

impl TryFrom<RawResponse> for Response {
    type Error = Error;

    fn try_from(raw: RawResponse) -> Result<Self, Self::Error> {
        if let Some(key_agreement) = raw.key_agreement {
            return Ok(Response::GetKeyAgreement { key_agreement });
        }
        if let Some(bytes) = raw.pin_uv_auth_token {
            let token = super::PinUvAuthToken::try_from(bytes.as_slice())
                .map_err(|_| Error::InvalidParameter)?;
            return Ok(Response::GetPinToken {
                pin_uv_auth_token: token,
            });
        }
        if let Some(pin_retries) = raw.pin_retries {
            return Ok(Response::GetPinRetries {
                pin_retries,
                power_cycle_state: raw.power_cycle_state,
            });
        }
        if let Some(uv_retries) = raw.uv_retries {
            return Ok(Response::GetUvRetries {
                uv_retries: uv_retries
                    .try_into()
                    .map_err(|_| Error::InvalidParameter)?,
            });
        }
        Ok(Response::SetPin)
    }
}

impl From<Response> for RawResponse {
    fn from(response: Response) -> Self {
        match response {
            Response::GetPinRetries {
                pin_retries,
                power_cycle_state,
            } => RawResponse {
                pin_retries: Some(pin_retries),
                power_cycle_state,
                ..Default::default()
            },
            Response::GetKeyAgreement { key_agreement } => RawResponse {
                key_agreement: Some(key_agreement),
                ..Default::default()
            },
            Response::SetPin | Response::ChangePin => RawResponse::default(),
            Response::GetPinToken { pin_uv_auth_token }
            | Response::GetPinUvAuthTokenUsingUvWithPermissions { pin_uv_auth_token }
            | Response::GetPinUvAuthTokenUsingPinWithPermissions { pin_uv_auth_token } => {
                RawResponse {
                    pin_uv_auth_token: Some(pin_uv_auth_token.as_ref().to_vec()),
                    ..Default::default()
                }
            }
            Response::GetUvRetries { uv_retries } => RawResponse {
                uv_retries: Some(uv_retries.get()),
                ..Default::default()
            },
        }
    }
}
