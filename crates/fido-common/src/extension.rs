#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// > WebAuthn Relying Parties may use extensions to request additional
/// > processing by the client and/or authenticator.
///
/// This authenticator core does not implement any extension processing
/// (`spec.md` names extensions only as pass-through fields on
/// `MakeCredential`/`GetAssertion`); the identifier type exists so the
/// wire-level request/response shapes can be parsed and re-serialized
/// without data loss even though the dispatcher ignores their contents.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Identifier(pub String);

impl From<&str> for Identifier {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
