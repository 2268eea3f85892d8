use serde::{Deserialize, Serialize};

use crate::shared::{DomainError, Identity};

/// Wallet session context.
///
/// Passed explicitly to the services that need the authenticated identity;
/// nothing reads it from global state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "identity", rename_all = "snake_case")]
pub enum WalletSession {
    #[default]
    Disconnected,
    /// Sign-in requested, waiting for the wallet to answer
    Pending,
    Connected(Identity),
}

impl WalletSession {
    /// Session already active at start-up
    pub fn connected(identity: Identity) -> Result<Self, DomainError> {
        let mut session = Self::default();
        session.restore(identity)?;
        Ok(session)
    }

    pub fn begin_sign_in(&mut self) -> Result<(), DomainError> {
        match self {
            WalletSession::Disconnected => {
                *self = WalletSession::Pending;
                Ok(())
            }
            other => Err(DomainError::InvalidTransition(format!(
                "cannot begin sign-in while {}",
                other.state_name()
            ))),
        }
    }

    pub fn complete_sign_in(&mut self, identity: Identity) -> Result<(), DomainError> {
        Self::validate_identity(&identity)?;
        match self {
            WalletSession::Pending => {
                *self = WalletSession::Connected(identity);
                Ok(())
            }
            other => Err(DomainError::InvalidTransition(format!(
                "cannot complete sign-in while {}",
                other.state_name()
            ))),
        }
    }

    /// Adopt a session the wallet already holds
    pub fn restore(&mut self, identity: Identity) -> Result<(), DomainError> {
        Self::validate_identity(&identity)?;
        match self {
            WalletSession::Disconnected => {
                *self = WalletSession::Connected(identity);
                Ok(())
            }
            other => Err(DomainError::InvalidTransition(format!(
                "cannot restore a session while {}",
                other.state_name()
            ))),
        }
    }

    /// Always allowed; tears down whatever state the session is in
    pub fn sign_out(&mut self) {
        *self = WalletSession::Disconnected;
    }

    pub fn current_actor(&self) -> Option<&Identity> {
        match self {
            WalletSession::Connected(identity) => Some(identity),
            _ => None,
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, WalletSession::Connected(_))
    }

    pub fn state_name(&self) -> &'static str {
        match self {
            WalletSession::Disconnected => "disconnected",
            WalletSession::Pending => "pending",
            WalletSession::Connected(_) => "connected",
        }
    }

    fn validate_identity(identity: &Identity) -> Result<(), DomainError> {
        if identity.is_empty() {
            return Err(DomainError::Validation(
                "Session identity cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}
