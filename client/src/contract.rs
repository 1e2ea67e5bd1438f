//! Contract Proxy seam.
//!
//! Typed call surface over the voting contract's public interface. The
//! contract itself enforces vote validity and the double-vote guard; this
//! side only reads state and submits the one write call.

use std::sync::Arc;

use async_trait::async_trait;

use crate::gateway::{Address, ChainId, RpcError};

/// Outcome of an on-chain confirmed transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub tx_hash: String,
    pub block_number: u64,
}

/// A submitted but not-yet-confirmed vote transaction.
#[async_trait]
pub trait TransactionHandle: Send {
    fn tx_hash(&self) -> &str;

    /// Suspend until the transaction is included in a block.
    async fn confirmed(self: Box<Self>) -> Result<Receipt, RpcError>;
}

#[async_trait]
pub trait VotingContract: Send + Sync {
    async fn has_voted(&self, account: &Address) -> Result<bool, RpcError>;

    async fn candidates_count(&self) -> Result<u32, RpcError>;

    /// Name and vote count for a 1-based candidate id.
    async fn candidate(&self, id: u32) -> Result<(String, u64), RpcError>;

    async fn vote(&self, candidate_id: u32) -> Result<Box<dyn TransactionHandle>, RpcError>;
}

/// Builds the contract binding for a verified session. Only the session
/// controller calls this; loader and vote flow borrow the resulting binding
/// and never replace it.
pub trait ContractConnector: Send + Sync {
    fn bind(&self, account: &Address, chain: ChainId) -> Arc<dyn VotingContract>;
}
