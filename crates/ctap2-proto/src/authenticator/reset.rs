/// > This method is used by the client to reset an authenticator back to a
/// > factory default state.
///
/// > Note: User authentication is required to avoid unwanted resets, e.g. by
/// > a transiently plugged in USB device. The specifics are left up to the
/// > authenticator implementation.
///
/// `spec.md` §4.G restricts this to resident credentials and PIN state —
/// wrapped non-resident credentials issued before the reset remain
/// cryptographically unusable once the wrapping key is regenerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Response;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The reset ceremony's user-presence window was not satisfied in time.
    UserActionTimeout,
    /// Resets are only permitted immediately after power-up in some
    /// deployments; this core does not enforce that window but keeps the
    /// variant so a caller-supplied policy layer can surface it.
    NotAllowed,
    OperationDenied,
}
