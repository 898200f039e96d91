//! Authenticator-wide configuration: identity and capability knobs reported
//! via `authenticatorGetInfo`.
use typed_builder::TypedBuilder;

/// Static device configuration, separate from the mutable state in
/// [`crate::storage::Storage`].
///
/// Uses `typed-builder` the way `ctap2_proto::authenticator::credential::make::Request`
/// does, so constructing a [`crate::Authenticator`] reads like assembling a
/// CTAP2 request.
#[derive(Debug, Clone, TypedBuilder)]
pub struct DeviceConfig {
    /// The authenticator's claimed AAGUID, reported verbatim in `GetInfo`.
    pub aaguid: [u8; 16],
    /// Whether credentials are discoverable (resident) by default when a
    /// `MakeCredential` request omits the `rk` option — mirrors the
    /// original's `default_to_rk` device policy (see `SPEC_FULL.md`'s
    /// supplemented-features section).
    #[builder(default = false)]
    pub default_to_resident_key: bool,
    /// Upper bound on resident credentials this authenticator will store;
    /// exceeding it surfaces as `Error::KeyStoreFull`.
    #[builder(default = 64)]
    pub max_resident_credentials: usize,
}
