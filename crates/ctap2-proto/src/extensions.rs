//! Extension identifiers used on the wire by `MakeCredential`/`GetAssertion`.
//!
//! This authenticator core does not interpret extension contents; see
//! [`fido_common::extension::Identifier`] for the underlying type.

pub use fido_common::extension::Identifier;
