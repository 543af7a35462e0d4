//! Access gates for protected surfaces (the vault).
//!
//! # Responsibility
//! - Decide whether a presented credential unlocks a protected surface.
//! - Keep the credential mechanism swappable behind [`AccessGate`].
//!
//! # Invariants
//! - Secret comparison runs in time independent of where inputs differ.
//! - A missing secret configuration never grants access.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Request header carrying the vault credential.
pub const VAULT_PASSWORD_HEADER: &str = "x-vault-password";

/// Access check failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessError {
    MissingCredential,
    InvalidCredential,
    /// No credential can pass this gate.
    Disabled,
}

impl Display for AccessError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingCredential => write!(f, "credential missing"),
            Self::InvalidCredential => write!(f, "credential rejected"),
            Self::Disabled => write!(f, "access disabled: no secret configured"),
        }
    }
}

impl Error for AccessError {}

/// Authorization contract for protected routes.
pub trait AccessGate: Send + Sync {
    /// Checks the presented credential, if any.
    fn check(&self, credential: Option<&str>) -> Result<(), AccessError>;

    /// Stable label used in logs.
    fn name(&self) -> &'static str;
}

/// Gate comparing against one shared secret.
#[derive(Clone)]
pub struct SharedSecretGate {
    secret: String,
}

impl SharedSecretGate {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }
}

impl std::fmt::Debug for SharedSecretGate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedSecretGate")
            .field("secret", &"<redacted>")
            .finish()
    }
}

impl AccessGate for SharedSecretGate {
    fn check(&self, credential: Option<&str>) -> Result<(), AccessError> {
        let credential = credential.ok_or(AccessError::MissingCredential)?;
        if constant_time_eq(credential.as_bytes(), self.secret.as_bytes()) {
            Ok(())
        } else {
            Err(AccessError::InvalidCredential)
        }
    }

    fn name(&self) -> &'static str {
        "shared_secret"
    }
}

/// Gate that rejects everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct DenyAllGate;

impl AccessGate for DenyAllGate {
    fn check(&self, _credential: Option<&str>) -> Result<(), AccessError> {
        Err(AccessError::Disabled)
    }

    fn name(&self) -> &'static str {
        "deny_all"
    }
}

/// Builds the vault gate from optional configuration.
///
/// A blank secret counts as unset.
pub fn gate_from_secret(secret: Option<&str>) -> Box<dyn AccessGate> {
    match secret.map(str::trim).filter(|value| !value.is_empty()) {
        Some(secret) => Box::new(SharedSecretGate::new(secret)),
        None => Box::new(DenyAllGate),
    }
}

fn constant_time_eq(left: &[u8], right: &[u8]) -> bool {
    let mut diff = left.len() ^ right.len();
    for index in 0..left.len().max(right.len()) {
        let a = left.get(index).copied().unwrap_or(0);
        let b = right.get(index).copied().unwrap_or(0);
        diff |= usize::from(a ^ b);
    }
    diff == 0
}
