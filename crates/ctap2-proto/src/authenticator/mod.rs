use fido_common::attestation;

#[cfg(feature = "serde")]
use serde::Serialize;

pub mod assertion;
pub mod client_pin;
pub mod credential;
pub mod device;
pub mod reset;

const FLAG_USER_PRESENT: u8 = 0x01;
const FLAG_USER_VERIFIED: u8 = 0x04;
const FLAG_ATTESTED_CREDENTIAL_DATA: u8 = 0x40;

/// SHA 256 hash values are 32 bytes long.
pub type Sha256Hash = [u8; 32];

/// > The authenticator data structure encodes contextual bindings made by the
/// > authenticator. These bindings are controlled by the authenticator itself,
/// > and derive their trust from the `WebAuthn` Relying Party's assessment of
/// > the security properties of the authenticator. In one extreme case, the
/// > authenticator may be embedded in the client, and its bindings may be no
/// > more trustworthy than the client data. At the other extreme, the
/// > authenticator may be a discrete entity with high-security hardware and
/// > software, connected to the client over a secure channel. In both cases,
/// > the Relying Party receives the authenticator data in the same format, and
/// > uses its knowledge of the authenticator to make trust decisions.
/// >
/// > The authenticator data has a compact but extensible encoding. This is
/// > desired since authenticators can be devices with limited capabilities and
/// > low power requirements, with much simpler software stacks than the client
/// > platform.
#[derive(Debug, Clone)]
pub struct Data {
    /// > SHA-256 hash of the RP ID the credential is scoped to.
    pub relying_party_id_hash: Sha256Hash,
    pub user_is_present: bool,
    pub user_is_verified: bool,
    pub signature_counter: u32,
    pub attested_credential_data: Option<attestation::CredentialData>,
    // Extension outputs are carried unparsed on the wire types that embed
    // this struct (see `credential::make::Response`); this core does not
    // interpret extensions.
}

/// Why [`Data::from_bytes`] rejected an `authData` buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// The buffer was shorter than its flags claim it should be.
    Truncated,
    /// The trailing `credentialPublicKey` was not valid COSE-encoded CBOR.
    InvalidCredentialPublicKey,
}

impl Data {
    /// Encodes to the binary `authData` layout WebAuthn defines:
    /// `rpIdHash(32) || flags(1) || signCount(4, big-endian) || [attestedCredentialData]`.
    ///
    /// `attestedCredentialData`, when present, is
    /// `aaguid(16) || credentialIdLength(2, big-endian) || credentialId || credentialPublicKey`,
    /// with the public key CBOR-encoded per its COSE_Key representation.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(37);
        out.extend_from_slice(&self.relying_party_id_hash);

        let mut flags = 0u8;
        if self.user_is_present {
            flags |= FLAG_USER_PRESENT;
        }
        if self.user_is_verified {
            flags |= FLAG_USER_VERIFIED;
        }
        if self.attested_credential_data.is_some() {
            flags |= FLAG_ATTESTED_CREDENTIAL_DATA;
        }
        out.push(flags);
        out.extend_from_slice(&self.signature_counter.to_be_bytes());

        if let Some(attested) = &self.attested_credential_data {
            out.extend_from_slice(&attested.aaguid);
            out.extend_from_slice(&(attested.credential_id.len() as u16).to_be_bytes());
            out.extend_from_slice(&attested.credential_id);
            ciborium::ser::into_writer(&attested.credential_public_key, &mut out)
                .expect("COSE key encodes to CBOR infallibly");
        }
        out
    }

    /// The inverse of [`Data::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ParseError> {
        if bytes.len() < 37 {
            return Err(ParseError::Truncated);
        }
        let mut relying_party_id_hash = [0u8; 32];
        relying_party_id_hash.copy_from_slice(&bytes[..32]);

        let flags = bytes[32];
        let user_is_present = flags & FLAG_USER_PRESENT != 0;
        let user_is_verified = flags & FLAG_USER_VERIFIED != 0;
        let has_attested_credential_data = flags & FLAG_ATTESTED_CREDENTIAL_DATA != 0;

        let mut signature_counter_bytes = [0u8; 4];
        signature_counter_bytes.copy_from_slice(&bytes[33..37]);
        let signature_counter = u32::from_be_bytes(signature_counter_bytes);

        let attested_credential_data = if has_attested_credential_data {
            let rest = &bytes[37..];
            if rest.len() < 18 {
                return Err(ParseError::Truncated);
            }
            let mut aaguid = [0u8; 16];
            aaguid.copy_from_slice(&rest[..16]);

            let credential_id_len = u16::from_be_bytes([rest[16], rest[17]]) as usize;
            let credential_id_end = 18 + credential_id_len;
            if rest.len() < credential_id_end {
                return Err(ParseError::Truncated);
            }
            let credential_id = rest[18..credential_id_end].to_vec();

            let credential_public_key = ciborium::de::from_reader(&rest[credential_id_end..])
                .map_err(|_| ParseError::InvalidCredentialPublicKey)?;

            Some(attestation::CredentialData {
                aaguid,
                credential_id,
                credential_public_key,
            })
        } else {
            None
        };

        Ok(Data {
            relying_party_id_hash,
            user_is_present,
            user_is_verified,
            signature_counter,
            attested_credential_data,
        })
    }
}

#[cfg(feature = "serde")]
impl Serialize for Data {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_bytes(&self.to_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_of_build_is_identity_without_attested_credential_data() {
        let data = Data {
            relying_party_id_hash: [3u8; 32],
            user_is_present: true,
            user_is_verified: false,
            signature_counter: 42,
            attested_credential_data: None,
        };

        let parsed = Data::from_bytes(&data.to_bytes()).unwrap();

        assert_eq!(parsed.relying_party_id_hash, data.relying_party_id_hash);
        assert_eq!(parsed.user_is_present, data.user_is_present);
        assert_eq!(parsed.user_is_verified, data.user_is_verified);
        assert_eq!(parsed.signature_counter, data.signature_counter);
        assert!(parsed.attested_credential_data.is_none());
    }

    #[test]
    fn parse_of_build_is_identity_with_attested_credential_data() {
        let credential_public_key = coset::CoseKeyBuilder::new_ec2_pub_key(
            coset::iana::EllipticCurve::P_256,
            vec![1u8; 32],
            vec![2u8; 32],
        )
        .build();

        let data = Data {
            relying_party_id_hash: [3u8; 32],
            user_is_present: true,
            user_is_verified: true,
            signature_counter: 7,
            attested_credential_data: Some(attestation::CredentialData {
                aaguid: [9u8; 16],
                credential_id: vec![5u8; 20],
                credential_public_key,
            }),
        };

        let parsed = Data::from_bytes(&data.to_bytes()).unwrap();

        let original_attested = data.attested_credential_data.as_ref().unwrap();
        let parsed_attested = parsed.attested_credential_data.as_ref().unwrap();
        assert_eq!(parsed_attested.aaguid, original_attested.aaguid);
        assert_eq!(parsed_attested.credential_id, original_attested.credential_id);
        assert_eq!(parsed.signature_counter, data.signature_counter);
    }

    #[test]
    fn from_bytes_rejects_truncated_buffer() {
        assert_eq!(Data::from_bytes(&[0u8; 10]).unwrap_err(), ParseError::Truncated);
    }
}