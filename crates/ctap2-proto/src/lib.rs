pub mod prelude {
    pub use crate::{
        authenticator::{
            assertion::{get, get_next},
            client_pin,
            credential::make,
            device, reset,
        },
        Command, Ctap2Authenticator,
    };
    pub use fido_common::*;
}
use prelude::*;

pub mod authenticator;
pub mod extensions;

/// Defines the raw CTAP2 operations this authenticator core implements.
///
/// Command bytes outside this set (`authenticatorBioEnrollment`,
/// `authenticatorCredentialManagement`, `authenticatorSelection`,
/// `authenticatorConfig`, `authenticatorLargeBlobs`) are still recognized by
/// [`Command`] so a dispatcher can return a clean "unsupported" status
/// rather than fail to parse, but this core does not implement them — see
/// the Non-goals in `spec.md` §1.
pub trait Ctap2Authenticator {
    /// > This method is invoked by the host to request generation of a new
    /// > credential in the authenticator.
    fn make_credential(&mut self, request: make::Request) -> Result<make::Response, make::Error>;

    /// > This method is used by a host to request cryptographic proof of user
    /// > authentication as well as user consent to a given transaction, using a
    /// > previously generated credential that is bound to the authenticator and
    /// > relying party identifier.
    fn get_assertion(&mut self, request: get::Request) -> Result<get::Response, get::Error>;

    /// > If `authenticatorGetAssertion` returned a `numberOfCredentials`
    /// > greater than 1, this method is used by the platform to fetch the
    /// > remaining candidates, one at a time, by index.
    fn get_next_assertion(&mut self) -> Result<get_next::Response, get_next::Error>;

    /// > Using this method, platforms can request that the authenticator report
    /// > a list of its supported protocol versions and extensions, its AAGUID,
    /// > and other aspects of its overall capabilities. Platforms should use
    /// > this information to tailor their command parameters choices.
    fn get_info(&self) -> device::Info;

    /// > This command exists so that plaintext PINs are not sent to the
    /// > authenticator. Instead, a PIN/UV auth protocol (aka
    /// > `pinUvAuthProtocol`) ensures that PINs are encrypted when sent to an
    /// > authenticator and are exchanged for a `pinUvAuthToken` that serves to
    /// > authenticate subsequent commands.
    fn client_pin(
        &mut self,
        request: client_pin::Request,
    ) -> Result<client_pin::Response, client_pin::Error>;

    /// > This method is used by the client to reset an authenticator back to a
    /// > factory default state.
    fn reset(&mut self) -> Result<reset::Response, reset::Error>;
}

/// CTAP2 command codes: the first byte of the CBOR request payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Command {
    AuthenticatorMakeCredential = 0x01,
    AuthenticatorGetAssertion = 0x02,
    AuthenticatorGetInfo = 0x04,
    AuthenticatorClientPin = 0x06,
    AuthenticatorReset = 0x07,
    AuthenticatorGetNextAssertion = 0x08,
    AuthenticatorBioEnrollment = 0x09,
    AuthenticatorCredentialManagement = 0x0A,
    AuthenticatorSelection = 0x0B,
    AuthenticatorLargeBlobs = 0x0C,
    AuthenticatorConfig = 0x0D,
}

impl TryFrom<u8> for Command {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x01 => Ok(Command::AuthenticatorMakeCredential),
            0x02 => Ok(Command::AuthenticatorGetAssertion),
            0x04 => Ok(Command::AuthenticatorGetInfo),
            0x06 => Ok(Command::AuthenticatorClientPin),
            0x07 => Ok(Command::AuthenticatorReset),
            0x08 => Ok(Command::AuthenticatorGetNextAssertion),
            0x09 => Ok(Command::AuthenticatorBioEnrollment),
            0x0A => Ok(Command::AuthenticatorCredentialManagement),
            0x0B => Ok(Command::AuthenticatorSelection),
            0x0C => Ok(Command::AuthenticatorLargeBlobs),
            0x0D => Ok(Command::AuthenticatorConfig),
            other => Err(other),
        }
    }
}

impl Command {
    /// Whether this authenticator core actually implements the command, as
    /// opposed to merely recognizing its byte value.
    pub fn is_implemented(self) -> bool {
        matches!(
            self,
            Command::AuthenticatorMakeCredential
                | Command::AuthenticatorGetAssertion
                | Command::AuthenticatorGetInfo
                | Command::AuthenticatorClientPin
                | Command::AuthenticatorReset
                | Command::AuthenticatorGetNextAssertion
        )
    }
}
