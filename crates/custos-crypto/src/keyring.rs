use std::collections::HashMap;
use std::sync::RwLock;

use custos_types::PrincipalId;

use crate::signer::{Signature, SigningKey, VerifyingKey};

/// Key custody boundary.
///
/// Signing happens inside the keyring; the raw private key never crosses
/// this interface. The ledger hands over a payload and a principal and gets
/// back a signature, or the principal's public key for verification.
pub trait Keyring: Send + Sync {
    /// Sign a canonical payload on behalf of a principal.
    fn sign(&self, principal: &PrincipalId, payload: &[u8]) -> Result<Signature, KeyringError>;

    /// The principal's public verifying key.
    fn verifying_key(&self, principal: &PrincipalId) -> Result<VerifyingKey, KeyringError>;
}

/// Errors from keyring operations.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum KeyringError {
    #[error("no key material enrolled for principal {0}")]
    UnknownPrincipal(PrincipalId),

    #[error("keyring lock poisoned")]
    LockPoisoned,
}

/// In-memory keyring for tests, demos, and embedding.
///
/// Each principal receives exactly one key pair at enrollment.
#[derive(Default)]
pub struct InMemoryKeyring {
    keys: RwLock<HashMap<PrincipalId, SigningKey>>,
}

impl InMemoryKeyring {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate and store a key pair for a principal, returning the public
    /// half. Re-enrolling replaces the pair.
    pub fn enroll(&self, principal: PrincipalId) -> Result<VerifyingKey, KeyringError> {
        let key = SigningKey::generate();
        let public = key.verifying_key();
        let mut keys = self.keys.write().map_err(|_| KeyringError::LockPoisoned)?;
        keys.insert(principal, key);
        Ok(public)
    }

    /// Store an externally generated key pair (deterministic tests).
    pub fn enroll_with_key(
        &self,
        principal: PrincipalId,
        key: SigningKey,
    ) -> Result<VerifyingKey, KeyringError> {
        let public = key.verifying_key();
        let mut keys = self.keys.write().map_err(|_| KeyringError::LockPoisoned)?;
        keys.insert(principal, key);
        Ok(public)
    }
}

impl Keyring for InMemoryKeyring {
    fn sign(&self, principal: &PrincipalId, payload: &[u8]) -> Result<Signature, KeyringError> {
        let keys = self.keys.read().map_err(|_| KeyringError::LockPoisoned)?;
        let key = keys
            .get(principal)
            .ok_or(KeyringError::UnknownPrincipal(*principal))?;
        Ok(key.sign(payload))
    }

    fn verifying_key(&self, principal: &PrincipalId) -> Result<VerifyingKey, KeyringError> {
        let keys = self.keys.read().map_err(|_| KeyringError::LockPoisoned)?;
        let key = keys
            .get(principal)
            .ok_or(KeyringError::UnknownPrincipal(*principal))?;
        Ok(key.verifying_key())
    }
}
