//! The command dispatcher: implements [`ctap2_proto::Ctap2Authenticator`]
//! over the storage, crypto, wrapping and PIN subsystems in this crate.
//!
//! Grounded on `DICEKey.py`'s top-level `authenticatorMakeCredential`,
//! `authenticatorGetAssertion`, `authenticatorGetInfo`,
//! `authenticatorClientPIN` and `authenticatorReset` methods, which this
//! module's six operations mirror one-for-one.
use std::collections::{BTreeMap, BTreeSet};

use ctap2_proto::authenticator::{
    assertion::{get, get_next},
    client_pin::{self, Permission},
    credential::make,
    device, reset, Data, Sha256Hash,
};
use fido_common::credential::public_key;
use rand_core::{CryptoRng, RngCore};
use sha2::{Digest, Sha256};

use crate::capabilities::{KeepAlive, PresenceOutcome, UserPresence};
use crate::config::DeviceConfig;
use crate::credential::{CredentialId, CredentialSource};
use crate::crypto::Registry;
use crate::error::Error;
use crate::pin::KeyAgreement;
use crate::storage::Storage;
use crate::wrap::{WrappedCredential, Wrapper};

fn sha256(bytes: &[u8]) -> Sha256Hash {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hasher.finalize().into()
}

/// The `pinUvAuthToken` an authenticator hands back from a successful
/// `authenticatorClientPIN` get-token sub-command, and the permissions it
/// was scoped to at mint time.
struct PinToken {
    token: [u8; 32],
    permissions: BTreeSet<Permission>,
    relying_party_id: Option<String>,
}

/// A software FIDO2 authenticator core.
///
/// `S`/`U`/`K`/`R` are the storage backend, user-presence prompt,
/// transport keep-alive, and random source an embedder supplies; see
/// [`Storage`], [`UserPresence`], [`KeepAlive`].
pub struct Authenticator<S: Storage, U: UserPresence, K: KeepAlive, R: RngCore + CryptoRng> {
    storage: S,
    crypto: Registry,
    wrapper: Wrapper,
    wrapping_key: crate::wrap::WrappingKey,
    key_agreement: KeyAgreement,
    pin_token: Option<PinToken>,
    user_presence: U,
    keep_alive: K,
    rng: R,
    config: DeviceConfig,
    pending_assertions: Vec<CredentialSource>,
    pending_client_data_hash: Sha256Hash,
}

impl<S: Storage, U: UserPresence, K: KeepAlive, R: RngCore + CryptoRng> Authenticator<S, U, K, R> {
    pub fn new(
        storage: S,
        crypto: Registry,
        user_presence: U,
        keep_alive: K,
        mut rng: R,
        config: DeviceConfig,
    ) -> Self {
        let wrapping_key = random_wrapping_key(&mut rng);
        let key_agreement = KeyAgreement::generate(&mut rng);
        Self {
            storage,
            crypto,
            wrapper: Wrapper::new(&wrapping_key),
            wrapping_key,
            key_agreement,
            pin_token: None,
            user_presence,
            keep_alive,
            rng,
            config,
            pending_assertions: Vec::new(),
            pending_client_data_hash: [0u8; 32],
        }
    }

    fn require_presence(&self) -> Result<(), Error> {
        match self
            .user_presence
            .prompt(std::time::Duration::from_secs(30))
        {
            PresenceOutcome::Confirmed => Ok(()),
            PresenceOutcome::Denied => Err(Error::OperationDenied),
            PresenceOutcome::TimedOut => Err(Error::UserActionTimeout),
        }
    }

    /// Verifies `pinUvAuthParam` against the current `pinUvAuthToken`, and
    /// checks the token was minted with `permission` for `relying_party_id`.
    ///
    /// Returns whether user verification was actually performed, for the
    /// `uv` flag in the resulting `authData`. If no PIN is set yet, no
    /// verification is possible and the caller falls back to user presence
    /// alone — `spec.md`'s built-in-UV Non-goal means this authenticator
    /// never reports `uv` without a PIN behind it.
    fn verify_pin_uv_auth(
        &self,
        pin_uv_auth_param: Option<&[u8]>,
        client_data_hash: &Sha256Hash,
        permission: Permission,
        relying_party_id: &str,
    ) -> Result<bool, Error> {
        let pin_is_set = self.storage.pin_hash()?.is_some();
        let Some(param) = pin_uv_auth_param else {
            if pin_is_set {
                return Err(Error::PinUvAuthTokenRequired);
            }
            return Ok(false);
        };
        let token = self
            .pin_token
            .as_ref()
            .ok_or(Error::PinUvAuthTokenRequired)?;
        if !crate::pin::verify(&token.token, client_data_hash, param) {
            return Err(Error::PinAuthInvalid);
        }
        if !token.permissions.contains(&permission) {
            return Err(Error::UnauthorizedPermission);
        }
        if let Some(bound) = &token.relying_party_id {
            if bound != relying_party_id {
                return Err(Error::UnauthorizedPermission);
            }
        }
        Ok(true)
    }

    fn resolve_candidate(&self, bytes: &[u8], relying_party_id: &str) -> Option<CredentialSource> {
        match CredentialId::from_wire_bytes(bytes) {
            CredentialId::Stored(id) => self
                .storage
                .get_credential(&id)
                .ok()
                .flatten()
                .filter(|c| c.relying_party_id == relying_party_id),
            CredentialId::Wrapped(wrapped_id) => {
                let relying_party_id_hash = sha256(relying_party_id.as_bytes());
                let wrapped = self
                    .wrapper
                    .unwrap(&wrapped_id, &relying_party_id_hash)
                    .ok()?;
                Some(credential_source_from_wrapped(
                    wrapped,
                    wrapped_id,
                    relying_party_id.to_owned(),
                ))
            }
        }
    }
}

fn random_wrapping_key(rng: &mut (impl RngCore + CryptoRng)) -> crate::wrap::WrappingKey {
    let mut key = [0u8; 32];
    rng.fill_bytes(&mut key);
    key
}

fn credential_source_from_wrapped(
    wrapped: WrappedCredential,
    wire_id: Vec<u8>,
    relying_party_id: String,
) -> CredentialSource {
    CredentialSource {
        id: CredentialId::Wrapped(wire_id),
        relying_party_id,
        user: public_key::UserEntity {
            id: wrapped.user_id,
            name: None,
            display_name: None,
        },
        algorithm: wrapped.algorithm,
        key_bytes: wrapped.key_bytes,
        sign_count: wrapped.sign_count,
        discoverable: false,
    }
}

impl<S: Storage, U: UserPresence, K: KeepAlive, R: RngCore + CryptoRng> ctap2_proto::Ctap2Authenticator
    for Authenticator<S, U, K, R>
{
    fn make_credential(&mut self, request: make::Request) -> Result<make::Response, make::Error> {
        self.make_credential_inner(request).map_err(Into::into)
    }

    fn get_assertion(&mut self, request: get::Request) -> Result<get::Response, get::Error> {
        self.get_assertion_inner(request).map_err(Into::into)
    }

    fn get_next_assertion(&mut self) -> Result<get_next::Response, get_next::Error> {
        self.get_next_assertion_inner().map_err(Into::into)
    }

    fn get_info(&self) -> device::Info {
        self.get_info_inner()
    }

    fn client_pin(
        &mut self,
        request: client_pin::Request,
    ) -> Result<client_pin::Response, client_pin::Error> {
        self.client_pin_inner(request).map_err(Into::into)
    }

    fn reset(&mut self) -> Result<reset::Response, reset::Error> {
        self.reset_inner().map_err(Into::into)
    }
}

impl<S: Storage, U: UserPresence, K: KeepAlive, R: RngCore + CryptoRng> Authenticator<S, U, K, R> {
    fn make_credential_inner(&mut self, request: make::Request) -> Result<make::Response, Error> {
        // An intervening MakeCredential invalidates any GetAssertion candidate
        // list left over from a prior call, per CTAP2's GetNextAssertion state
        // machine.
        self.pending_assertions.clear();

        let algorithm = request
            .public_key_credential_params
            .iter()
            .map(|p| p.alg)
            .find(|alg| self.crypto.get(*alg).is_some())
            .ok_or(Error::UnsupportedAlgorithm)?;

        let relying_party_id_hash = sha256(request.relying_party.id.as_bytes());

        if let Some(exclude_list) = &request.exclude_list {
            let excluded = exclude_list
                .iter()
                .any(|d| self.resolve_candidate(&d.id, &request.relying_party.id).is_some());
            if excluded {
                self.require_presence()?;
                return Err(Error::CredentialExcluded);
            }
        }

        let user_verified = self.verify_pin_uv_auth(
            request.pin_uv_auth_param.as_deref(),
            &request.client_data_hash,
            Permission::MakeCredential,
            &request.relying_party.id,
        )?;
        self.require_presence()?;

        let discoverable = request
            .options
            .as_ref()
            .and_then(|o| o.get(&make::OptionKey::Discoverable).copied())
            .unwrap_or(self.config.default_to_resident_key);

        let provider = self.crypto.get(algorithm).ok_or(Error::UnsupportedAlgorithm)?;
        let key_pair = provider.create_key_pair(&mut self.rng)?;
        let public_key_cose = key_pair.public_key_cose();
        let key_bytes = key_pair.to_bytes();

        let id = if discoverable {
            // `spec.md` §4.D: adding a resident credential replaces any
            // existing one for the same (rpId, userId) tuple rather than
            // creating a duplicate, matching WebAuthn's overwrite rule for
            // discoverable credentials.
            let existing = self.storage.find_resident_credential(
                &request.relying_party.id,
                &request.user.id,
            )?;
            let id = match existing {
                Some(existing) => existing.id,
                None => {
                    let count = self
                        .storage
                        .credentials_for_relying_party(&request.relying_party.id)?
                        .len();
                    if count >= self.config.max_resident_credentials {
                        return Err(Error::KeyStoreFull);
                    }
                    let mut raw = [0u8; 16];
                    self.rng.fill_bytes(&mut raw);
                    CredentialId::Stored(raw)
                }
            };
            self.storage.put_credential(CredentialSource {
                id: id.clone(),
                relying_party_id: request.relying_party.id.clone(),
                user: request.user.clone(),
                algorithm,
                key_bytes: key_bytes.clone(),
                sign_count: 0,
                discoverable: true,
            })?;
            id
        } else {
            let wrapped = WrappedCredential {
                relying_party_id_hash,
                algorithm,
                key_bytes: key_bytes.clone(),
                sign_count: 0,
                user_id: request.user.id.clone(),
            };
            let wire_id = self.wrapper.wrap(&wrapped, &mut self.rng)?;
            CredentialId::Wrapped(wire_id)
        };

        let attested_credential_data = fido_common::attestation::CredentialData {
            aaguid: self.config.aaguid,
            credential_id: id.as_wire_bytes().to_vec(),
            credential_public_key: public_key_cose,
        };

        let authenticator_data = Data {
            relying_party_id_hash,
            user_is_present: true,
            user_is_verified: user_verified,
            signature_counter: 0,
            attested_credential_data: Some(attested_credential_data),
        };
        let auth_data_bytes = authenticator_data.to_bytes();

        let attestation_statement = crate::attestation::sign_self_attestation(
            key_pair.as_ref(),
            algorithm,
            &auth_data_bytes,
            &request.client_data_hash,
        )?;

        Ok(make::Response {
            format: crate::attestation::format_identifier(),
            authenticator_data,
            attestation_statement: Some(attestation_statement),
            enterprise_attestation: None,
            large_blob_key: None,
            unsigned_extension_outputs: None,
        })
    }

    fn get_assertion_inner(&mut self, request: get::Request) -> Result<get::Response, Error> {
        let mut candidates: Vec<CredentialSource> = match &request.allow_list {
            Some(list) => list
                .iter()
                .filter_map(|d| self.resolve_candidate(&d.id, &request.relying_party_id))
                .collect(),
            None => self
                .storage
                .credentials_for_relying_party(&request.relying_party_id)?,
        };
        if candidates.is_empty() {
            return Err(Error::NoCredentials);
        }

        let user_verified = self.verify_pin_uv_auth(
            request.pin_uv_auth_param.as_deref(),
            &request.client_data_hash,
            Permission::GetAssertion,
            &request.relying_party_id,
        )?;
        self.require_presence()?;

        let selected = candidates.remove(0);
        let number_of_credentials = candidates.len() + 1;
        self.pending_assertions = candidates;
        self.pending_client_data_hash = request.client_data_hash;

        self.build_assertion_response(
            selected,
            &request.relying_party_id,
            &request.client_data_hash,
            true,
            user_verified,
            if number_of_credentials > 1 {
                Some(number_of_credentials)
            } else {
                None
            },
        )
    }

    fn get_next_assertion_inner(&mut self) -> Result<get_next::Response, Error> {
        if self.pending_assertions.is_empty() {
            return Err(Error::NotAllowed);
        }
        let selected = self.pending_assertions.remove(0);
        let relying_party_id = selected.relying_party_id.clone();
        let client_data_hash = self.pending_client_data_hash;
        let response = self.build_assertion_response(
            selected,
            &relying_party_id,
            &client_data_hash,
            true,
            false,
            None,
        )?;
        Ok(get_next::Response {
            credential: response.credential,
            auth_data: response.auth_data,
            signature: response.signature,
            user: response.user,
            user_selected: Some(false),
            large_blob_key: response.large_blob_key,
        })
    }

    fn build_assertion_response(
        &mut self,
        mut credential: CredentialSource,
        relying_party_id: &str,
        client_data_hash: &Sha256Hash,
        user_is_present: bool,
        user_is_verified: bool,
        number_of_credentials: Option<usize>,
    ) -> Result<get::Response, Error> {
        let relying_party_id_hash = sha256(relying_party_id.as_bytes());

        let signature_counter = match &credential.id {
            CredentialId::Stored(id) => self.storage.increment_and_get_counter(id)?,
            CredentialId::Wrapped(_) => {
                credential.sign_count = credential.sign_count.wrapping_add(1);
                credential.sign_count
            }
        };

        let authenticator_data = Data {
            relying_party_id_hash,
            user_is_present,
            user_is_verified,
            signature_counter,
            attested_credential_data: None,
        };
        let auth_data_bytes = authenticator_data.to_bytes();

        let mut signed_over = Vec::with_capacity(auth_data_bytes.len() + 32);
        signed_over.extend_from_slice(&auth_data_bytes);
        signed_over.extend_from_slice(client_data_hash);

        let provider = self
            .crypto
            .get(credential.algorithm)
            .ok_or(Error::UnsupportedAlgorithm)?;
        let key_pair = provider.load_key_pair(&credential.key_bytes)?;
        let signature = key_pair.sign(&signed_over)?;

        // The user entity is reported unconditionally, not only for
        // discoverable credentials: a wrapped credential's user handle lives
        // in the wrapped blob precisely so it can still answer this (see
        // `WrappedCredential::user_id`), matching the original's
        // unconditional `response[4] = credential_source.get_user_handle()`.
        let user = Some(credential.user.clone());

        Ok(get::Response {
            credential: credential.id.descriptor(),
            auth_data: auth_data_bytes,
            signature,
            user,
            number_of_credentials,
            user_selected: None,
            large_blob_key: None,
        })
    }

    fn get_info_inner(&self) -> device::Info {
        use flagset::FlagSet;

        let mut options = BTreeMap::new();
        options.insert(device::OptionKey::Platform, false);
        options.insert(device::OptionKey::Discoverable, true);
        options.insert(
            device::OptionKey::ClientPin,
            self.storage.pin_hash().unwrap_or(None).is_some(),
        );
        options.insert(device::OptionKey::UserPresence, true);
        options.insert(
            device::OptionKey::UserVerification,
            self.storage.pin_hash().unwrap_or(None).is_some(),
        );

        let versions: FlagSet<device::Version> = device::Version::Fido20 | device::Version::Fido21;

        let algorithms = self
            .crypto
            .algorithms()
            .into_iter()
            .map(|alg| public_key::Parameters {
                type_: fido_common::credential::Type::PublicKey,
                alg,
            })
            .collect();

        device::Info {
            versions,
            extensions: None,
            aaguid: self.config.aaguid,
            options,
            max_msg_size: None,
            pin_uv_auth_protocols: Some(vec![client_pin::AuthProtocolVersion::One]),
            max_credential_count_in_list: None,
            max_credential_id_length: None,
            transports: None,
            algorithms: Some(algorithms),
        }
    }

    fn client_pin_inner(
        &mut self,
        request: client_pin::Request,
    ) -> Result<client_pin::Response, Error> {
        use client_pin::{Request, Response};

        // Any authenticatorClientPIN sub-command invalidates a pending
        // GetAssertion candidate list, same as MakeCredential.
        self.pending_assertions.clear();

        match request {
            Request::GetPinRetries => Ok(Response::GetPinRetries {
                pin_retries: self.storage.pin_retries()? as usize,
                power_cycle_state: None,
            }),
            Request::GetKeyAgreement { version } => {
                require_protocol_one(version)?;
                Ok(Response::GetKeyAgreement {
                    key_agreement: self.key_agreement.public_key_cose(),
                })
            }
            Request::SetPin {
                version,
                key_agreement,
                new_pin_encrypted,
                pin_uv_auth_param,
            } => {
                require_protocol_one(version)?;
                let shared_secret = self.key_agreement.shared_secret(&key_agreement)?;
                crate::pin::set_pin(
                    &mut self.storage,
                    &shared_secret,
                    &new_pin_encrypted,
                    &pin_uv_auth_param,
                )?;
                Ok(Response::SetPin)
            }
            Request::ChangePin {
                version,
                key_agreement,
                pin_hash_encrypted,
                new_pin_encrypted,
                pin_uv_auth_param,
            } => {
                require_protocol_one(version)?;
                let shared_secret = self.key_agreement.shared_secret(&key_agreement)?;
                crate::pin::change_pin(
                    &mut self.storage,
                    &shared_secret,
                    &pin_hash_encrypted,
                    &new_pin_encrypted,
                    &pin_uv_auth_param,
                )?;
                self.pin_token = None;
                Ok(Response::ChangePin)
            }
            Request::GetPinToken {
                version,
                key_agreement,
                pin_hash_encrypted,
            } => {
                require_protocol_one(version)?;
                let shared_secret = self.key_agreement.shared_secret(&key_agreement)?;
                crate::pin::verify_pin_hash(&mut self.storage, &shared_secret, &pin_hash_encrypted)?;
                let token = self.mint_pin_token(all_permissions(), None);
                let encrypted = crate::pin::encrypt(&shared_secret, &token)?;
                Ok(Response::GetPinToken {
                    pin_uv_auth_token: fixed_long(&encrypted)?,
                })
            }
            Request::GetPinUvAuthTokenUsingUvWithPermissions { .. } => {
                // No built-in user-verification sensor; `spec.md` names
                // biometric UV a Non-goal.
                Err(Error::OperationDenied)
            }
            Request::GetUvRetries => Err(Error::OperationDenied),
            Request::GetPinUvAuthTokenUsingPinWithPermissions {
                version,
                key_agreement,
                pin_hash_encrypted,
                permissions,
                relying_party_id,
            } => {
                require_protocol_one(version)?;
                let shared_secret = self.key_agreement.shared_secret(&key_agreement)?;
                crate::pin::verify_pin_hash(&mut self.storage, &shared_secret, &pin_hash_encrypted)?;
                let token = self.mint_pin_token(permissions, relying_party_id);
                let encrypted = crate::pin::encrypt(&shared_secret, &token)?;
                Ok(Response::GetPinUvAuthTokenUsingPinWithPermissions {
                    pin_uv_auth_token: fixed_long(&encrypted)?,
                })
            }
        }
    }

    fn mint_pin_token(
        &mut self,
        permissions: BTreeSet<Permission>,
        relying_party_id: Option<String>,
    ) -> [u8; 32] {
        let mut token = [0u8; 32];
        self.rng.fill_bytes(&mut token);
        self.pin_token = Some(PinToken {
            token,
            permissions,
            relying_party_id,
        });
        token
    }

    fn reset_inner(&mut self) -> Result<reset::Response, Error> {
        self.require_presence()?;
        self.storage.wipe()?;
        self.wrapping_key = random_wrapping_key(&mut self.rng);
        self.wrapper = Wrapper::new(&self.wrapping_key);
        self.key_agreement = KeyAgreement::generate(&mut self.rng);
        self.pin_token = None;
        self.pending_assertions.clear();
        self.keep_alive.ping();
        Ok(reset::Response)
    }
}

/// The permission set granted to a legacy (CTAP2.0 `getPinToken`)
/// `pinUvAuthToken`, which carries no explicit permissions on the wire.
/// Scoped to the two operations this core actually implements rather than
/// every `Permission` variant, since the unimplemented commands
/// (`credentialManagement`, `bioEnrollment`, ...) have no dispatcher to
/// honor them anyway.
fn all_permissions() -> BTreeSet<Permission> {
    BTreeSet::from([Permission::MakeCredential, Permission::GetAssertion])
}

impl<S: Storage, U: UserPresence, K: KeepAlive, R: RngCore + CryptoRng> Authenticator<S, U, K, R> {
    /// Top-level CBOR dispatch: `command_byte` is the first byte of a CTAP2
    /// request, `payload` the remaining CBOR-encoded parameters (if any).
    /// Returns a status byte followed by the CBOR-encoded response, exactly
    /// as framed over USB HID/NFC/BLE (`spec.md` §6) — this core does not
    /// implement any particular transport framing itself.
    pub fn handle(&mut self, command_byte: u8, payload: &[u8]) -> Vec<u8> {
        match ctap2_proto::Command::try_from(command_byte) {
            Err(_) => encode_err(Error::InvalidCommand.ctap_status()),
            Ok(command) if !command.is_implemented() => {
                encode_err(Error::NotImplemented.ctap_status())
            }
            Ok(command) => {
                self.keep_alive.ping();
                self.dispatch(command, payload)
            }
        }
    }

    fn dispatch(&mut self, command: ctap2_proto::Command, payload: &[u8]) -> Vec<u8> {
        use ctap2_proto::Command;

        let result: Result<Vec<u8>, Error> = match command {
            Command::AuthenticatorMakeCredential => decode(payload)
                .and_then(|req| self.make_credential_inner(req))
                .map(|resp| encode_ok(&resp)),
            Command::AuthenticatorGetAssertion => decode(payload)
                .and_then(|req| self.get_assertion_inner(req))
                .map(|resp| encode_ok(&resp)),
            Command::AuthenticatorGetNextAssertion => {
                self.get_next_assertion_inner().map(|resp| encode_ok(&resp))
            }
            Command::AuthenticatorGetInfo => Ok(encode_ok(&self.get_info_inner())),
            Command::AuthenticatorClientPin => decode(payload)
                .and_then(|req| self.client_pin_inner(req))
                .map(|resp| encode_ok(&resp)),
            Command::AuthenticatorReset => self.reset_inner().map(|_| vec![0x00]),
            _ => unreachable!("handle() already filtered commands is_implemented() rejects"),
        };
        result.unwrap_or_else(|err| encode_err(err.ctap_status()))
    }
}

fn encode_ok(value: &impl serde::Serialize) -> Vec<u8> {
    let mut out = vec![0x00];
    ciborium::ser::into_writer(value, &mut out).expect("response encodes to CBOR infallibly");
    out
}

fn encode_err(status: u8) -> Vec<u8> {
    vec![status]
}

fn decode<T: serde::de::DeserializeOwned>(payload: &[u8]) -> Result<T, Error> {
    ciborium::de::from_reader(payload).map_err(Error::InvalidCbor)
}

/// This core only implements PIN/UV auth protocol one (`pin.rs`'s zero-IV
/// AES-256-CBC with the shared secret used directly as the HMAC key), per
/// `spec.md` §6's `pinUvAuthProtocols ([1])`.
fn require_protocol_one(version: client_pin::AuthProtocolVersion) -> Result<(), Error> {
    match version {
        client_pin::AuthProtocolVersion::One => Ok(()),
        client_pin::AuthProtocolVersion::Two => Err(Error::InvalidParameter),
    }
}

fn fixed_long(bytes: &[u8]) -> Result<client_pin::PinUvAuthToken, Error> {
    client_pin::PinUvAuthToken::try_from(bytes).map_err(|_| Error::CryptoFailure)
}

impl From<Error> for make::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::MissingParameter => make::Error::MissingParameter,
            Error::InvalidParameter => make::Error::InvalidParameter,
            Error::UnsupportedAlgorithm => make::Error::UnsupportedAlgorithm,
            Error::UnsupportedOption => make::Error::UnsupportedOption,
            Error::CredentialExcluded => make::Error::CredentialExcluded,
            Error::KeyStoreFull => make::Error::KeyStoreFull,
            Error::PinNotSet => make::Error::PinNotSet,
            Error::PinInvalid => make::Error::PinInvalid,
            Error::PinBlocked | Error::PinAuthBlocked => make::Error::PinBlocked,
            Error::PinAuthInvalid => make::Error::PinAuthInvalid,
            Error::PinUvAuthTokenRequired => make::Error::PinUvAuthTokenRequired,
            Error::UserActionTimeout => make::Error::UserActionTimeout,
            _ => make::Error::OperationDenied,
        }
    }
}

impl From<Error> for get::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::MissingParameter => get::Error::MissingParameter,
            Error::InvalidParameter => get::Error::InvalidParameter,
            Error::UnsupportedOption => get::Error::UnsupportedOption,
            Error::NoCredentials => get::Error::NoCredentials,
            Error::PinNotSet => get::Error::PinNotSet,
            Error::PinInvalid => get::Error::PinInvalid,
            Error::PinBlocked | Error::PinAuthBlocked => get::Error::PinBlocked,
            Error::PinAuthInvalid => get::Error::PinAuthInvalid,
            Error::PinUvAuthTokenRequired => get::Error::PinUvAuthTokenRequired,
            Error::UserActionTimeout => get::Error::UserActionTimeout,
            _ => get::Error::OperationDenied,
        }
    }
}

impl From<Error> for get_next::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::UserActionTimeout => get_next::Error::UserActionTimeout,
            Error::NotAllowed => get_next::Error::NotAllowed,
            _ => get_next::Error::NotAllowed,
        }
    }
}

impl From<Error> for client_pin::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::MissingParameter => client_pin::Error::MissingParameter,
            Error::InvalidParameter => client_pin::Error::InvalidParameter,
            Error::PinAuthInvalid => client_pin::Error::PinAuthInvalid,
            Error::PinPolicyViolation => client_pin::Error::PinPolicyViolation,
            Error::PinBlocked => client_pin::Error::PinBlocked,
            Error::PinAuthBlocked => client_pin::Error::PinAuthBlocked,
            Error::PinInvalid => client_pin::Error::PinInvalid,
            Error::OperationDenied => client_pin::Error::OperationDenied,
            Error::NotAllowed => client_pin::Error::NotAllowed,
            Error::UnauthorizedPermission => client_pin::Error::UnauthorizedPermission,
            Error::UserActionTimeout => client_pin::Error::UserActionTimeout,
            _ => client_pin::Error::OperationDenied,
        }
    }
}

impl From<Error> for reset::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::UserActionTimeout => reset::Error::UserActionTimeout,
            Error::OperationDenied => reset::Error::OperationDenied,
            _ => reset::Error::NotAllowed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::{AlwaysPresent, NoopKeepAlive};
    use crate::storage::InMemoryStorage;
    use fido_common::credential;
    use rand_chacha::rand_core::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn fresh_authenticator(
    ) -> Authenticator<InMemoryStorage, AlwaysPresent, NoopKeepAlive, ChaCha20Rng> {
        let mut crypto = Registry::new();
        crypto.register(Box::new(crate::crypto::Es256Provider));
        Authenticator::new(
            InMemoryStorage::new(),
            crypto,
            AlwaysPresent,
            NoopKeepAlive,
            ChaCha20Rng::seed_from_u64(1),
            DeviceConfig::builder()
                .aaguid([0u8; 16])
                .default_to_resident_key(true)
                .build(),
        )
    }

    fn make_credential_request(user_id: Vec<u8>) -> make::Request {
        make::Request::builder()
            .client_data_hash([1u8; 32])
            .relying_party(public_key::RelyingPartyEntity {
                id: "example.com".to_owned(),
                name: None,
            })
            .user(public_key::UserEntity {
                id: user_id,
                name: None,
                display_name: None,
            })
            .public_key_credential_params(vec![public_key::Parameters {
                type_: credential::Type::PublicKey,
                alg: fido_common::cose_algorithm::ES256,
            }])
            .build()
    }

    fn get_assertion_request() -> get::Request {
        get::Request {
            relying_party_id: "example.com".to_owned(),
            client_data_hash: [2u8; 32],
            allow_list: None,
            extensions: None,
            options: None,
            pin_uv_auth_param: None,
            pin_uv_auth_protocol_version: None,
        }
    }

    #[test]
    fn make_credential_invalidates_pending_assertions() {
        let mut authenticator = fresh_authenticator();
        authenticator
            .make_credential_inner(make_credential_request(vec![1]))
            .unwrap();
        authenticator
            .make_credential_inner(make_credential_request(vec![2]))
            .unwrap();

        authenticator.get_assertion_inner(get_assertion_request()).unwrap();
        assert!(!authenticator.pending_assertions.is_empty());

        authenticator
            .make_credential_inner(make_credential_request(vec![3]))
            .unwrap();
        assert!(authenticator.pending_assertions.is_empty());

        let result = authenticator.get_next_assertion_inner();
        assert!(matches!(result, Err(Error::NotAllowed)));
    }

    #[test]
    fn client_pin_invalidates_pending_assertions() {
        let mut authenticator = fresh_authenticator();
        authenticator
            .make_credential_inner(make_credential_request(vec![1]))
            .unwrap();
        authenticator
            .make_credential_inner(make_credential_request(vec![2]))
            .unwrap();

        authenticator.get_assertion_inner(get_assertion_request()).unwrap();
        assert!(!authenticator.pending_assertions.is_empty());

        authenticator
            .client_pin_inner(client_pin::Request::GetPinRetries)
            .unwrap();
        assert!(authenticator.pending_assertions.is_empty());
    }
}
