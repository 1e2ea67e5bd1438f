//! Shared test doubles: a scriptable wallet and an in-memory voting
//! contract. All doubles append to one ordered call log so tests can
//! assert cross-component ordering (e.g. network switch before binding).

#![allow(dead_code)]

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;

use voting_client::consts::TARGET_CHAIN_ID;
use voting_client::{
    Address, App, ChainId, ContractConnector, NetworkDescriptor, Receipt, RpcError,
    TransactionHandle, VotingContract, WalletGateway,
};

pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("info")
            .with_test_writer()
            .try_init();
    });
}

pub fn addr(raw: &str) -> Address {
    Address::new(raw)
}

pub const ALICE: &str = "0xA11ce00000000000000000000000000000000001";
pub const BOB: &str = "0xB0b0000000000000000000000000000000000002";

#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn count_prefix(&self, prefix: &str) -> usize {
        self.0
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.starts_with(prefix))
            .count()
    }

    pub fn position(&self, prefix: &str) -> Option<usize> {
        self.0
            .lock()
            .unwrap()
            .iter()
            .position(|e| e.starts_with(prefix))
    }

    pub fn clear(&self) {
        self.0.lock().unwrap().clear();
    }
}

/// Scriptable wallet provider double.
#[derive(Clone)]
pub struct MockWallet {
    accounts: Arc<Mutex<Vec<Address>>>,
    preauthorized: Arc<AtomicBool>,
    request_error: Arc<Mutex<Option<RpcError>>>,
    chain: Arc<Mutex<ChainId>>,
    switch_script: Arc<Mutex<VecDeque<Result<(), RpcError>>>>,
    /// When false, a successful switch request leaves the chain unchanged.
    switch_applies: Arc<AtomicBool>,
    add_error: Arc<Mutex<Option<RpcError>>>,
    pub log: CallLog,
}

impl MockWallet {
    pub fn new(log: CallLog) -> Self {
        Self {
            accounts: Arc::new(Mutex::new(vec![addr(ALICE)])),
            preauthorized: Arc::new(AtomicBool::new(false)),
            request_error: Arc::new(Mutex::new(None)),
            chain: Arc::new(Mutex::new(TARGET_CHAIN_ID)),
            switch_script: Arc::new(Mutex::new(VecDeque::new())),
            switch_applies: Arc::new(AtomicBool::new(true)),
            add_error: Arc::new(Mutex::new(None)),
            log,
        }
    }

    pub fn set_accounts(&self, accounts: Vec<Address>) {
        *self.accounts.lock().unwrap() = accounts;
    }

    pub fn preauthorize(&self) {
        self.preauthorized.store(true, Ordering::SeqCst);
    }

    pub fn set_request_error(&self, err: RpcError) {
        *self.request_error.lock().unwrap() = Some(err);
    }

    pub fn set_chain(&self, chain: ChainId) {
        *self.chain.lock().unwrap() = chain;
    }

    pub fn push_switch_result(&self, result: Result<(), RpcError>) {
        self.switch_script.lock().unwrap().push_back(result);
    }

    pub fn set_switch_applies(&self, applies: bool) {
        self.switch_applies.store(applies, Ordering::SeqCst);
    }

    pub fn set_add_error(&self, err: RpcError) {
        *self.add_error.lock().unwrap() = Some(err);
    }
}

#[async_trait]
impl WalletGateway for MockWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>, RpcError> {
        self.log.push("request_accounts");
        if let Some(err) = self.request_error.lock().unwrap().clone() {
            return Err(err);
        }
        self.preauthorized.store(true, Ordering::SeqCst);
        Ok(self.accounts.lock().unwrap().clone())
    }

    async fn accounts(&self) -> Result<Vec<Address>, RpcError> {
        self.log.push("accounts");
        if self.preauthorized.load(Ordering::SeqCst) {
            Ok(self.accounts.lock().unwrap().clone())
        } else {
            Ok(Vec::new())
        }
    }

    async fn chain_id(&self) -> Result<ChainId, RpcError> {
        self.log.push("chain_id");
        Ok(*self.chain.lock().unwrap())
    }

    async fn switch_network(&self, chain: ChainId) -> Result<(), RpcError> {
        self.log.push(format!("switch_network:{}", chain.as_hex()));
        let scripted = self.switch_script.lock().unwrap().pop_front();
        match scripted.unwrap_or(Ok(())) {
            Ok(()) => {
                if self.switch_applies.load(Ordering::SeqCst) {
                    *self.chain.lock().unwrap() = chain;
                }
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    async fn add_network(&self, descriptor: &NetworkDescriptor) -> Result<(), RpcError> {
        self.log
            .push(format!("add_network:{}", descriptor.chain_id.as_hex()));
        match self.add_error.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// In-memory voting contract shared by all bindings the connector hands
/// out, so votes survive a session restart like on-chain state would.
#[derive(Clone)]
pub struct FakeVoting {
    voted: Arc<Mutex<HashSet<String>>>,
    candidates: Arc<Mutex<Vec<(String, u64)>>>,
    fail_method: Arc<Mutex<Option<(String, RpcError)>>>,
    vote_error: Arc<Mutex<Option<RpcError>>>,
    confirm_error: Arc<Mutex<Option<RpcError>>>,
    pub log: CallLog,
}

impl FakeVoting {
    pub fn new(candidates: &[(&str, u64)], log: CallLog) -> Self {
        Self {
            voted: Arc::new(Mutex::new(HashSet::new())),
            candidates: Arc::new(Mutex::new(
                candidates
                    .iter()
                    .map(|(name, votes)| (name.to_string(), *votes))
                    .collect(),
            )),
            fail_method: Arc::new(Mutex::new(None)),
            vote_error: Arc::new(Mutex::new(None)),
            confirm_error: Arc::new(Mutex::new(None)),
            log,
        }
    }

    pub fn mark_voted(&self, account: &Address) {
        self.voted.lock().unwrap().insert(account.as_str().to_string());
    }

    /// Make every call to `method` fail with `err`.
    pub fn fail_method(&self, method: &str, err: RpcError) {
        *self.fail_method.lock().unwrap() = Some((method.to_string(), err));
    }

    pub fn clear_failures(&self) {
        *self.fail_method.lock().unwrap() = None;
    }

    pub fn set_vote_error(&self, err: RpcError) {
        *self.vote_error.lock().unwrap() = Some(err);
    }

    pub fn set_confirm_error(&self, err: RpcError) {
        *self.confirm_error.lock().unwrap() = Some(err);
    }

    pub fn vote_count(&self, id: u32) -> u64 {
        self.candidates.lock().unwrap()[id as usize - 1].1
    }

    fn maybe_fail(&self, method: &str) -> Result<(), RpcError> {
        if let Some((failing, err)) = self.fail_method.lock().unwrap().clone() {
            if failing == method {
                return Err(err);
            }
        }
        Ok(())
    }
}

pub struct FakeConnector {
    pub voting: FakeVoting,
    pub log: CallLog,
}

impl ContractConnector for FakeConnector {
    fn bind(&self, account: &Address, chain: ChainId) -> Arc<dyn VotingContract> {
        self.log.push(format!("bind:{}:{}", account, chain));
        Arc::new(BoundVoting {
            state: self.voting.clone(),
            signer: account.clone(),
        })
    }
}

struct BoundVoting {
    state: FakeVoting,
    signer: Address,
}

#[async_trait]
impl VotingContract for BoundVoting {
    async fn has_voted(&self, account: &Address) -> Result<bool, RpcError> {
        self.state.log.push("has_voted");
        self.state.maybe_fail("has_voted")?;
        Ok(self
            .state
            .voted
            .lock()
            .unwrap()
            .contains(account.as_str()))
    }

    async fn candidates_count(&self) -> Result<u32, RpcError> {
        self.state.log.push("candidates_count");
        self.state.maybe_fail("candidates_count")?;
        Ok(self.state.candidates.lock().unwrap().len() as u32)
    }

    async fn candidate(&self, id: u32) -> Result<(String, u64), RpcError> {
        self.state.log.push(format!("candidate:{id}"));
        self.state.maybe_fail("candidate")?;
        self.state
            .candidates
            .lock()
            .unwrap()
            .get(id as usize - 1)
            .cloned()
            .ok_or_else(|| RpcError::new(None, format!("no candidate {id}")))
    }

    async fn vote(&self, candidate_id: u32) -> Result<Box<dyn TransactionHandle>, RpcError> {
        self.state.log.push(format!("vote:{candidate_id}"));
        if let Some(err) = self.state.vote_error.lock().unwrap().clone() {
            return Err(err);
        }
        Ok(Box::new(FakeHandle {
            state: self.state.clone(),
            signer: self.signer.clone(),
            candidate_id,
            tx_hash: format!("0xtx{candidate_id:064}"),
        }))
    }
}

struct FakeHandle {
    state: FakeVoting,
    signer: Address,
    candidate_id: u32,
    tx_hash: String,
}

#[async_trait]
impl TransactionHandle for FakeHandle {
    fn tx_hash(&self) -> &str {
        &self.tx_hash
    }

    async fn confirmed(self: Box<Self>) -> Result<Receipt, RpcError> {
        if let Some(err) = self.state.confirm_error.lock().unwrap().clone() {
            return Err(err);
        }
        self.state
            .voted
            .lock()
            .unwrap()
            .insert(self.signer.as_str().to_string());
        self.state.candidates.lock().unwrap()[self.candidate_id as usize - 1].1 += 1;
        Ok(Receipt {
            tx_hash: self.tx_hash,
            block_number: 1,
        })
    }
}

/// Wallet + contract wired to one call log, ready to build an [`App`].
pub struct Fixture {
    pub wallet: MockWallet,
    pub voting: FakeVoting,
    pub log: CallLog,
}

impl Fixture {
    pub fn new(candidates: &[(&str, u64)]) -> Self {
        init_tracing();
        let log = CallLog::default();
        Self {
            wallet: MockWallet::new(log.clone()),
            voting: FakeVoting::new(candidates, log.clone()),
            log,
        }
    }

    pub fn connector(&self) -> FakeConnector {
        FakeConnector {
            voting: self.voting.clone(),
            log: self.log.clone(),
        }
    }

    pub fn app(&self) -> App<MockWallet, FakeConnector> {
        App::new(Some(self.wallet.clone()), self.connector())
    }
}

pub fn toast_texts(toasts: &[voting_client::Notification]) -> Vec<String> {
    toasts.iter().map(|t| t.text.clone()).collect()
}
