//! Wallet Gateway seam.
//!
//! The browser-injected wallet provider is a black box: it owns the keys,
//! the account list, and the active chain. This module models the slice of
//! its surface the client actually calls, plus the out-of-band events it
//! pushes while any of our own flows are suspended.

use std::fmt;

use async_trait::async_trait;
use serde::{Serialize, Serializer};

/// EIP-1193: the user dismissed a wallet prompt.
pub const CODE_USER_REJECTED: i64 = 4001;
/// EIP-3326: the wallet does not know the requested chain.
pub const CODE_UNRECOGNIZED_CHAIN: i64 = 4902;

/// A wallet account address in `0x…` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address(String);

impl Address {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Truncated display form: first 6 and last 4 characters. Values too
    /// short to truncate, or with multi-byte characters straddling the cut
    /// points, are returned whole.
    pub fn short(&self) -> String {
        let len = self.0.len();
        if len <= 10 || !self.0.is_char_boundary(6) || !self.0.is_char_boundary(len - 4) {
            return self.0.clone();
        }
        format!("{}...{}", &self.0[..6], &self.0[len - 4..])
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// EIP-155 chain identifier. Serializes to the hex form wallet RPC expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainId(pub u64);

impl ChainId {
    pub fn as_hex(&self) -> String {
        format!("{:#x}", self.0)
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for ChainId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_hex())
    }
}

/// Error from the wallet provider or the RPC channel behind it. Carries the
/// provider's numeric code when one was reported, so callers can tell a
/// dismissed prompt apart from a real failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcError {
    pub code: Option<i64>,
    pub message: String,
}

impl RpcError {
    pub fn new(code: Option<i64>, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn user_rejected() -> Self {
        Self::new(Some(CODE_USER_REJECTED), "user rejected the request")
    }

    pub fn unrecognized_chain() -> Self {
        Self::new(Some(CODE_UNRECOGNIZED_CHAIN), "unrecognized chain id")
    }

    pub fn is_user_rejected(&self) -> bool {
        self.code == Some(CODE_USER_REJECTED)
    }

    pub fn is_unrecognized_chain(&self) -> bool {
        self.code == Some(CODE_UNRECOGNIZED_CHAIN)
    }
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "{} (code {})", self.message, code),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for RpcError {}

/// Network registration payload for the wallet's add-network call
/// (EIP-3085 shape).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkDescriptor {
    pub chain_id: ChainId,
    pub chain_name: String,
    pub rpc_urls: Vec<String>,
    pub native_currency: NativeCurrency,
    pub block_explorer_urls: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Notifications the wallet pushes at any time, including while a connect,
/// load, or vote flow is suspended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletEvent {
    AccountsChanged(Vec<Address>),
    ChainChanged(ChainId),
}

#[async_trait]
pub trait WalletGateway: Send + Sync {
    /// Prompt the user for account access.
    async fn request_accounts(&self) -> Result<Vec<Address>, RpcError>;

    /// Silent check of already-authorized accounts. Never prompts.
    async fn accounts(&self) -> Result<Vec<Address>, RpcError>;

    async fn chain_id(&self) -> Result<ChainId, RpcError>;

    /// Ask the wallet to switch its active chain. Fails with
    /// [`CODE_UNRECOGNIZED_CHAIN`] when the chain is not registered.
    async fn switch_network(&self, chain: ChainId) -> Result<(), RpcError>;

    /// Register a network with the wallet so a follow-up switch can succeed.
    async fn add_network(&self, descriptor: &NetworkDescriptor) -> Result<(), RpcError>;
}
