use serde::{Deserialize, Serialize};

use crate::shared::{DomainError, Identity, TxId};

/// Contract call the user can sign from the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxAction {
    CheckIn,
    MintStoryPart,
}

impl TxAction {
    pub fn label(&self) -> &'static str {
        match self {
            TxAction::CheckIn => "Daily Check-In",
            TxAction::MintStoryPart => "Mint Story Part",
        }
    }
}

/// What the dashboard is currently doing.
///
/// Every phase past `Connecting` carries the connected actor, so a pending
/// transaction without a connected wallet cannot be expressed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum DashboardPhase {
    #[default]
    Idle,
    Connecting,
    LoadingData {
        actor: Identity,
    },
    Ready {
        actor: Identity,
        last_tx: Option<TxId>,
    },
    TxPending {
        actor: Identity,
        action: TxAction,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardEvent {
    BeginConnect,
    Connected(Identity),
    ConnectFailed,
    /// Wallet already held a session when the dashboard started
    SessionRestored(Identity),
    DataLoaded,
    LoadFailed,
    Refresh,
    SubmitTx(TxAction),
    TxSubmitted(TxId),
    TxCancelled,
    TxFailed,
    Disconnect,
}

impl DashboardPhase {
    /// Apply one event through the transition table
    pub fn apply(&self, event: DashboardEvent) -> Result<DashboardPhase, DomainError> {
        use DashboardEvent as E;
        use DashboardPhase as P;

        let next = match (self, event) {
            (_, E::Disconnect) => P::Idle,

            (P::Idle, E::BeginConnect) => P::Connecting,
            (P::Idle, E::SessionRestored(actor)) => P::LoadingData { actor },

            (P::Connecting, E::Connected(actor)) => P::LoadingData { actor },
            (P::Connecting, E::ConnectFailed) => P::Idle,

            (P::LoadingData { actor }, E::DataLoaded | E::LoadFailed) => P::Ready {
                actor: actor.clone(),
                last_tx: None,
            },

            (P::Ready { actor, .. }, E::Refresh) => P::LoadingData {
                actor: actor.clone(),
            },
            (P::Ready { actor, .. }, E::SubmitTx(action)) => P::TxPending {
                actor: actor.clone(),
                action,
            },

            (P::TxPending { actor, .. }, E::TxSubmitted(tx_id)) => P::Ready {
                actor: actor.clone(),
                last_tx: Some(tx_id),
            },
            (P::TxPending { actor, .. }, E::TxCancelled | E::TxFailed) => P::Ready {
                actor: actor.clone(),
                last_tx: None,
            },

            (phase, event) => {
                return Err(DomainError::InvalidTransition(format!(
                    "{:?} is not allowed while {}",
                    event,
                    phase.name()
                )))
            }
        };

        Ok(next)
    }

    pub fn actor(&self) -> Option<&Identity> {
        match self {
            DashboardPhase::LoadingData { actor }
            | DashboardPhase::Ready { actor, .. }
            | DashboardPhase::TxPending { actor, .. } => Some(actor),
            DashboardPhase::Idle | DashboardPhase::Connecting => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, DashboardPhase::LoadingData { .. })
    }

    /// Check-in and mint buttons are disabled while a transaction is pending
    pub fn can_submit(&self) -> bool {
        matches!(self, DashboardPhase::Ready { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            DashboardPhase::Idle => "idle",
            DashboardPhase::Connecting => "connecting",
            DashboardPhase::LoadingData { .. } => "loading_data",
            DashboardPhase::Ready { .. } => "ready",
            DashboardPhase::TxPending { .. } => "tx_pending",
        }
    }
}
