pub mod attestation;
pub mod credential;
pub mod extension;

/// COSE algorithm identifiers, as registered with IANA.
///
/// > <https://www.iana.org/assignments/cose/cose.xhtml#algorithms>
pub type CoseAlgorithmIdentifier = i32;

pub mod cose_algorithm {
    use super::CoseAlgorithmIdentifier;

    pub const ES256: CoseAlgorithmIdentifier = -7;
    pub const EDDSA: CoseAlgorithmIdentifier = -8;
    pub const RS256: CoseAlgorithmIdentifier = -257;
}
