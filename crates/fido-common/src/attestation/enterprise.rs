#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// > There are 2 separate kinds of enterprise attestation, which differ in
/// > how the authenticator makes the decision to provide enterprise
/// > attestation.
///
/// Not produced by this authenticator core (only self-attestation is
/// implemented, see `spec.md` §1 Non-goals), but the request-side type is
/// kept so `MakeCredential::Request` can round-trip a platform's request
/// and the dispatcher can reject it cleanly rather than fail to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(into = "u8", try_from = "u8"))]
pub enum Kind {
    Vendorfacilitated = 1,
    Platformmanaged = 2,
}

impl From<Kind> for u8 {
    fn from(value: Kind) -> Self {
        value as u8
    }
}

impl TryFrom<u8> for Kind {
    type Error = &'static str;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Kind::Vendorfacilitated),
            2 => Ok(Kind::Platformmanaged),
            _ => Err("invalid enterprise attestation kind"),
        }
    }
}
