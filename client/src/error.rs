use thiserror::Error;

use crate::gateway::{ChainId, RpcError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("no wallet extension detected; install a wallet to use this application")]
    ProviderAbsent,

    #[error("the wallet returned no accounts")]
    NoAccounts,

    #[error("request rejected in the wallet")]
    UserRejected,

    #[error("wallet stayed on chain {actual}, expected chain {expected}")]
    NetworkMismatch { expected: ChainId, actual: ChainId },

    #[error("the target network is not registered with the wallet")]
    UnrecognizedNetwork,

    #[error("failed to switch network: {0}")]
    SwitchFailed(String),

    #[error("failed to load voting data: {0}")]
    ContractRead(String),

    #[error("vote transaction failed: {0}")]
    ContractWrite(String),

    #[error("this account has already voted")]
    AlreadyVoted,

    #[error("wallet error: {0}")]
    Gateway(RpcError),
}

impl AppError {
    /// Failures from wallet prompts: a dismissed prompt is recoverable and
    /// gets its own variant, everything else surfaces raw.
    pub fn from_gateway(err: RpcError) -> Self {
        if err.is_user_rejected() {
            AppError::UserRejected
        } else {
            AppError::Gateway(err)
        }
    }

    pub fn read(err: RpcError) -> Self {
        AppError::ContractRead(err.message)
    }

    /// Map a vote submission failure to the most specific variant the error
    /// content allows: rejected signing, the contract's double-vote revert,
    /// or the raw message.
    pub fn from_vote_failure(err: RpcError) -> Self {
        if err.is_user_rejected() {
            AppError::UserRejected
        } else if err.message.to_lowercase().contains("already voted") {
            AppError::AlreadyVoted
        } else {
            AppError::ContractWrite(err.message)
        }
    }

    /// A failure the user can retry from the error panel. Only a missing
    /// provider is terminal: there is nothing to retry against.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, AppError::ProviderAbsent)
    }
}
