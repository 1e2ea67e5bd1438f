//! Session controller.
//!
//! Owns the wallet connection lifecycle and keeps local session state
//! consistent with the wallet's real-world state, which can change outside
//! this process (the user switches account or chain in the wallet UI).
//! Every attempt or teardown bumps the epoch counter; async flows capture
//! the epoch when they start and discard their result if it has advanced
//! by the time they resolve.

use std::sync::Arc;

use tracing::{info, warn};

use crate::consts;
use crate::contract::{ContractConnector, VotingContract};
use crate::error::AppError;
use crate::gateway::{Address, ChainId, WalletEvent, WalletGateway};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub account: Address,
    pub chain_id: ChainId,
    /// Generation this session belongs to. Results computed under an older
    /// epoch must not be applied.
    pub epoch: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionPhase {
    Disconnected,
    Connecting,
    Connected(Session),
    Failed { message: String, retryable: bool },
}

/// Outcome of an out-of-band wallet notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionUpdate {
    Unchanged,
    /// Wallet revoked all accounts; session torn down.
    Disconnected,
    /// Account or chain changed; the session was rebuilt from scratch.
    Reconnected(Session),
    /// The rebuild after an external change failed.
    Failed,
}

pub struct SessionController<G, C> {
    gateway: G,
    connector: C,
    phase: SessionPhase,
    contract: Option<Arc<dyn VotingContract>>,
    epoch: u64,
}

impl<G: WalletGateway, C: ContractConnector> SessionController<G, C> {
    pub fn new(gateway: G, connector: C) -> Self {
        Self {
            gateway,
            connector,
            phase: SessionPhase::Disconnected,
            contract: None,
            epoch: 0,
        }
    }

    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn session(&self) -> Option<&Session> {
        match &self.phase {
            SessionPhase::Connected(session) => Some(session),
            _ => None,
        }
    }

    /// Current contract binding. Present only while connected.
    pub fn contract(&self) -> Option<Arc<dyn VotingContract>> {
        self.contract.clone()
    }

    /// Silent startup probe: connect without a user gesture if the wallet
    /// already authorized an account, otherwise stay disconnected.
    pub async fn bootstrap(&mut self) -> Result<Option<Session>, AppError> {
        let accounts = self
            .gateway
            .accounts()
            .await
            .map_err(AppError::from_gateway)?;
        if accounts.is_empty() {
            info!("no pre-authorized account; waiting for user gesture");
            return Ok(None);
        }
        info!("pre-authorized account found, restoring session");
        self.connect().await.map(Some)
    }

    /// Request account access and establish the contract binding on the
    /// verified target network.
    pub async fn connect(&mut self) -> Result<Session, AppError> {
        self.epoch += 1;
        self.contract = None;
        self.phase = SessionPhase::Connecting;

        match self.try_connect().await {
            Ok(session) => {
                info!(account = %session.account.short(), chain = %session.chain_id, "wallet connected");
                self.phase = SessionPhase::Connected(session.clone());
                Ok(session)
            }
            Err(err) => {
                warn!(error = %err, "connection attempt failed");
                self.contract = None;
                self.phase = SessionPhase::Failed {
                    message: err.to_string(),
                    retryable: err.is_retryable(),
                };
                Err(err)
            }
        }
    }

    async fn try_connect(&mut self) -> Result<Session, AppError> {
        let accounts = self
            .gateway
            .request_accounts()
            .await
            .map_err(AppError::from_gateway)?;
        let account = accounts.into_iter().next().ok_or(AppError::NoAccounts)?;

        self.ensure_target_network().await?;

        // Binding is created only after the chain is verified.
        let contract = self.connector.bind(&account, consts::TARGET_CHAIN_ID);
        self.contract = Some(contract);

        Ok(Session {
            account,
            chain_id: consts::TARGET_CHAIN_ID,
            epoch: self.epoch,
        })
    }

    /// Verify the wallet is on the target chain, switching if necessary.
    /// A switch refused because the chain is unknown to the wallet falls
    /// back to registering the network and switching again.
    async fn ensure_target_network(&self) -> Result<(), AppError> {
        let expected = consts::TARGET_CHAIN_ID;
        let actual = self
            .gateway
            .chain_id()
            .await
            .map_err(AppError::from_gateway)?;
        if actual == expected {
            return Ok(());
        }

        info!(%actual, %expected, "wallet on wrong chain, requesting switch");
        match self.gateway.switch_network(expected).await {
            Ok(()) => {}
            Err(err) if err.is_unrecognized_chain() => {
                info!("target chain unknown to wallet, registering it");
                self.gateway
                    .add_network(&consts::TARGET_NETWORK)
                    .await
                    .map_err(|_| AppError::UnrecognizedNetwork)?;
                self.gateway
                    .switch_network(expected)
                    .await
                    .map_err(|e| AppError::SwitchFailed(e.message))?;
            }
            Err(err) if err.is_user_rejected() => return Err(AppError::UserRejected),
            Err(err) => return Err(AppError::SwitchFailed(err.message)),
        }

        // The switch request succeeded; confirm the wallet actually moved.
        let now = self
            .gateway
            .chain_id()
            .await
            .map_err(AppError::from_gateway)?;
        if now != expected {
            return Err(AppError::NetworkMismatch {
                expected,
                actual: now,
            });
        }
        Ok(())
    }

    /// React to an out-of-band wallet notification. Account and chain
    /// changes invalidate every contract binding, so the simplest correct
    /// policy is a full teardown and reconnect.
    pub async fn handle_event(&mut self, event: WalletEvent) -> SessionUpdate {
        match event {
            WalletEvent::AccountsChanged(accounts) => match accounts.into_iter().next() {
                None => {
                    if matches!(self.phase, SessionPhase::Disconnected) {
                        return SessionUpdate::Unchanged;
                    }
                    info!("wallet revoked all accounts, tearing down session");
                    self.teardown();
                    SessionUpdate::Disconnected
                }
                Some(primary) => match &self.phase {
                    SessionPhase::Connected(session) if session.account == primary => {
                        SessionUpdate::Unchanged
                    }
                    SessionPhase::Disconnected => SessionUpdate::Unchanged,
                    _ => {
                        info!(account = %primary.short(), "active account changed, restarting session");
                        self.restart().await
                    }
                },
            },
            WalletEvent::ChainChanged(chain) => {
                if matches!(self.phase, SessionPhase::Disconnected) {
                    return SessionUpdate::Unchanged;
                }
                info!(%chain, "wallet chain changed, restarting session");
                self.restart().await
            }
        }
    }

    async fn restart(&mut self) -> SessionUpdate {
        self.teardown();
        match self.connect().await {
            Ok(session) => SessionUpdate::Reconnected(session),
            Err(_) => SessionUpdate::Failed,
        }
    }

    fn teardown(&mut self) {
        self.contract = None;
        self.phase = SessionPhase::Disconnected;
        self.epoch += 1;
    }
}
