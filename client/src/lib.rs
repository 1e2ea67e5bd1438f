//! Client for an on-chain voting contract.
//!
//! Connect a wallet, view candidates and their vote counts, cast a single
//! vote, and watch results refresh. All durable state and business rules
//! live in the external contract; this crate is the session controller,
//! the data loader, and a pure view projection over them. The wallet
//! provider and the contract are reached through the [`gateway`] and
//! [`contract`] trait seams.

pub mod app;
pub mod consts;
pub mod contract;
pub mod error;
pub mod gateway;
pub mod loader;
pub mod session;
pub mod view;
pub mod vote;

pub use app::App;
pub use contract::{ContractConnector, Receipt, TransactionHandle, VotingContract};
pub use error::AppError;
pub use gateway::{Address, ChainId, NetworkDescriptor, RpcError, WalletEvent, WalletGateway};
pub use loader::{Candidate, VotingViewModel};
pub use session::{Session, SessionController, SessionPhase, SessionUpdate};
pub use view::{Notification, UiFrame};
