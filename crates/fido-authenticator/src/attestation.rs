//! Assembles the authenticator data structure and the packed
//! self-attestation statement returned from `MakeCredential`.
//!
//! `spec.md` §1 excludes external attestation certificate chains; the only
//! attestation statement format this crate ever produces is "packed" with
//! `x5c` absent, i.e. self-attestation signed by the credential's own
//! private key, as `fido_common::attestation::Statement` documents.
//!
//! The binary `authData` encoding itself lives on
//! [`ctap2_proto::authenticator::Data::to_bytes`], since that type owns the
//! wire format; this module only assembles the signature over it.
use fido_common::attestation::{FormatIdentifier, Statement};

/// Produces the packed self-attestation statement over
/// `authData || clientDataHash`, signed with the credential's own private
/// key (`spec.md` §4.F).
pub fn sign_self_attestation(
    key_pair: &dyn crate::crypto::KeyPair,
    algorithm: fido_common::CoseAlgorithmIdentifier,
    auth_data: &[u8],
    client_data_hash: &[u8; 32],
) -> Result<Statement, crate::error::Error> {
    let mut signed_over = Vec::with_capacity(auth_data.len() + 32);
    signed_over.extend_from_slice(auth_data);
    signed_over.extend_from_slice(client_data_hash);

    let sig = key_pair.sign(&signed_over)?;
    Ok(Statement { alg: algorithm, sig })
}

pub fn format_identifier() -> FormatIdentifier {
    FormatIdentifier::Packed
}

#[cfg(test)]
mod tests {
    use super::*;
    use ctap2_proto::authenticator::Data;
    use fido_common::attestation::CredentialData;

    const FLAG_USER_PRESENT: u8 = 0x01;
    const FLAG_USER_VERIFIED: u8 = 0x04;
    const FLAG_ATTESTED_CREDENTIAL_DATA: u8 = 0x40;

    #[test]
    fn encode_without_attested_credential_data_is_37_bytes() {
        let data = Data {
            relying_party_id_hash: [1u8; 32],
            user_is_present: true,
            user_is_verified: false,
            signature_counter: 5,
            attested_credential_data: None,
        };
        let encoded = data.to_bytes();
        assert_eq!(encoded.len(), 37);
        assert_eq!(encoded[32], FLAG_USER_PRESENT);
        assert_eq!(&encoded[33..37], &5u32.to_be_bytes());
    }

    #[test]
    fn encode_with_attested_credential_data_sets_flag() {
        let attested = CredentialData {
            aaguid: [2u8; 16],
            credential_id: vec![9u8; 16],
            credential_public_key: coset::CoseKeyBuilder::new_ec2_pub_key(
                coset::iana::EllipticCurve::P_256,
                vec![0u8; 32],
                vec![0u8; 32],
            )
            .build(),
        };
        let data = Data {
            relying_party_id_hash: [1u8; 32],
            user_is_present: true,
            user_is_verified: true,
            signature_counter: 0,
            attested_credential_data: Some(attested),
        };
        let encoded = data.to_bytes();
        assert_eq!(
            encoded[32],
            FLAG_USER_PRESENT | FLAG_USER_VERIFIED | FLAG_ATTESTED_CREDENTIAL_DATA
        );
        assert!(encoded.len() > 37);
    }
}
