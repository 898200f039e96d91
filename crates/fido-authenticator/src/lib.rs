//! A software FIDO2/CTAP2 authenticator core: credential generation,
//! assertion signing, the PIN subsystem, and non-resident credential
//! wrapping, built over the wire types in `ctap2-proto`.
//!
//! This crate does not speak any particular transport (USB HID, NFC, BLE);
//! an embedder owns framing and feeds parsed [`ctap2_proto`] requests to an
//! [`Authenticator`] via [`ctap2_proto::Ctap2Authenticator`].
pub mod attestation;
pub mod authenticator;
pub mod capabilities;
pub mod config;
pub mod credential;
pub mod crypto;
pub mod error;
pub mod pin;
pub mod storage;
pub mod wrap;

pub use authenticator::Authenticator;
pub use error::Error;
