//! CTAP2 status codes.
//!
//! > <https://fidoalliance.org/specs/fido-v2.1-ps-20210615/fido-client-to-authenticator-protocol-v2.1-ps-errata-20220621.html#error-responses>

/// Errors an [`crate::Authenticator`] operation can fail with, mapped onto
/// CTAP2's single-byte status codes at the CBOR boundary.
///
/// This enum is the one error type the whole crate returns; the per-command
/// wire error enums in `ctap2-proto` (`make::Error`, `get::Error`, ...) are
/// narrower views a dispatcher maps this onto, grounded in how CTAP2 reuses
/// the same status codes across commands.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid CBOR command parameters")]
    InvalidCbor(#[from] ciborium::de::Error<std::io::Error>),
    #[error("a required parameter was missing")]
    MissingParameter,
    #[error("a parameter had an invalid value")]
    InvalidParameter,
    #[error("an unsupported algorithm was requested")]
    UnsupportedAlgorithm,
    #[error("an unsupported option was set")]
    UnsupportedOption,
    #[error("the requested credential is already present and excluded")]
    CredentialExcluded,
    #[error("no credential matched the request")]
    NoCredentials,
    #[error("credential storage is full")]
    KeyStoreFull,
    #[error("a PIN has not yet been set on this authenticator")]
    PinNotSet,
    #[error("the supplied PIN did not match")]
    PinInvalid,
    #[error("the PIN does not satisfy the authenticator's policy")]
    PinPolicyViolation,
    #[error("the PIN retry counter has reached zero; a full reset is required")]
    PinBlocked,
    #[error("the PIN has been temporarily blocked after consecutive failures")]
    PinAuthBlocked,
    #[error("pinUvAuthParam did not verify")]
    PinAuthInvalid,
    #[error("a pinUvAuthToken was required but not supplied")]
    PinUvAuthTokenRequired,
    #[error("the pinUvAuthToken does not grant the requested permission")]
    UnauthorizedPermission,
    #[error("user presence was not obtained in time")]
    UserActionTimeout,
    #[error("the operation was denied")]
    OperationDenied,
    #[error("the operation is not allowed in the authenticator's current state")]
    NotAllowed,
    #[error("the command byte is not recognized")]
    InvalidCommand,
    #[error("the command is recognized but not implemented by this authenticator core")]
    NotImplemented,
    #[error("internal storage error: {0}")]
    Storage(String),
    #[error("cryptographic operation failed")]
    CryptoFailure,
}

impl Error {
    /// The single-byte CTAP2 status code this error maps to.
    pub fn ctap_status(&self) -> u8 {
        match self {
            Error::InvalidCbor(_) => 0x12,       // CTAP2_ERR_INVALID_CBOR
            Error::MissingParameter => 0x14,     // CTAP2_ERR_MISSING_PARAMETER
            Error::InvalidParameter => 0x02,     // CTAP1_ERR_INVALID_PARAMETER
            Error::UnsupportedAlgorithm => 0x26, // CTAP2_ERR_UNSUPPORTED_ALGORITHM
            Error::UnsupportedOption => 0x2D,    // CTAP2_ERR_UNSUPPORTED_OPTION
            Error::CredentialExcluded => 0x19,   // CTAP2_ERR_CREDENTIAL_EXCLUDED
            Error::NoCredentials => 0x2E,        // CTAP2_ERR_NO_CREDENTIALS
            Error::KeyStoreFull => 0x18,         // CTAP2_ERR_KEY_STORE_FULL
            Error::PinNotSet => 0x36,            // CTAP2_ERR_PIN_NOT_SET
            Error::PinInvalid => 0x31,           // CTAP2_ERR_PIN_INVALID
            Error::PinPolicyViolation => 0x37,   // CTAP2_ERR_PIN_POLICY_VIOLATION
            Error::PinBlocked => 0x34,           // CTAP2_ERR_PIN_BLOCKED
            Error::PinAuthBlocked => 0x38,       // CTAP2_ERR_PIN_AUTH_BLOCKED
            Error::PinAuthInvalid => 0x33,       // CTAP2_ERR_PIN_AUTH_INVALID
            Error::PinUvAuthTokenRequired => 0x36,
            Error::UnauthorizedPermission => 0x2F, // CTAP2_ERR_UNAUTHORIZED_PERMISSION
            Error::UserActionTimeout => 0x2B,      // CTAP2_ERR_USER_ACTION_TIMEOUT
            Error::OperationDenied => 0x27,         // CTAP2_ERR_OPERATION_DENIED
            Error::NotAllowed => 0x30,              // CTAP2_ERR_NOT_ALLOWED
            Error::InvalidCommand => 0x01,          // CTAP1_ERR_INVALID_COMMAND
            Error::NotImplemented => 0x01,
            Error::Storage(_) => 0x7F,              // CTAP1_ERR_OTHER
            Error::CryptoFailure => 0x7F,
        }
    }
}
