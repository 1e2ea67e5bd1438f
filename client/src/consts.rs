use std::time::Duration;

use once_cell::sync::Lazy;

use crate::gateway::{ChainId, NativeCurrency, NetworkDescriptor};

/// Address of the deployed voting contract on the target network.
pub const CONTRACT_ADDRESS: &str = "0x5B6d1c1bbDE708f693107DEAc408F9820d7Ae5d0";

/// The single required network. Connecting on any other chain triggers the
/// switch (and, if needed, add-network) flow.
pub const TARGET_CHAIN_ID: ChainId = ChainId(11155111);

pub static TARGET_NETWORK: Lazy<NetworkDescriptor> = Lazy::new(|| NetworkDescriptor {
    chain_id: TARGET_CHAIN_ID,
    chain_name: "Sepolia Test Network".to_string(),
    rpc_urls: vec!["https://sepolia.infura.io/v3/".to_string()],
    native_currency: NativeCurrency {
        name: "SepoliaETH".to_string(),
        symbol: "ETH".to_string(),
        decimals: 18,
    },
    block_explorer_urls: vec!["https://sepolia.etherscan.io".to_string()],
});

/// Fixed fill palette for candidate cards and chart bars, cycled by
/// candidate position.
pub const CANDIDATE_COLORS: [&str; 4] = [
    "rgba(102, 126, 234, 0.8)",
    "rgba(245, 87, 108, 0.8)",
    "rgba(79, 172, 254, 0.8)",
    "rgba(67, 233, 123, 0.8)",
];

/// How long a transient toast stays visible.
pub const TOAST_DISMISS: Duration = Duration::from_secs(3);
