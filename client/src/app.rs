//! Event-driven application shell.
//!
//! Owns the session controller, the currently rendered view model, and the
//! toast queue, and converts every failure into user-facing frame state.
//! Async results are applied only if the session epoch they captured is
//! still current; anything else is discarded so a stale response cannot
//! overwrite newer state.

use std::sync::Arc;

use tracing::warn;

use crate::contract::{ContractConnector, Receipt, VotingContract};
use crate::error::AppError;
use crate::gateway::{Address, WalletEvent, WalletGateway};
use crate::loader::{self, VotingViewModel};
use crate::session::{SessionController, SessionPhase, SessionUpdate};
use crate::view::{self, Body, ErrorPanel, Notification, UiFrame};
use crate::vote::{self, VoteNotifier};

/// Collects vote progress toasts so they can be queued after the flow
/// resolves.
#[derive(Default)]
struct ToastSink(Vec<Notification>);

impl VoteNotifier for ToastSink {
    fn submitting(&mut self) {
        self.0.push(Notification::info("Submitting your vote..."));
    }

    fn submitted(&mut self, _tx_hash: &str) {
        self.0.push(Notification::info(
            "Transaction submitted. Waiting for confirmation...",
        ));
    }

    fn confirmed(&mut self, _receipt: &Receipt) {
        self.0
            .push(Notification::success("Vote recorded successfully!"));
    }
}

/// A load that has been issued but whose result is not yet applied. Owns
/// everything it needs, so wallet events can be handled while it is
/// outstanding.
pub struct PendingLoad {
    contract: Arc<dyn VotingContract>,
    account: Address,
    epoch: u64,
}

impl PendingLoad {
    pub async fn run(&self) -> Result<VotingViewModel, AppError> {
        loader::load(self.contract.as_ref(), &self.account).await
    }
}

/// A vote submission that has been issued but whose outcome is not yet
/// applied.
pub struct PendingVote {
    contract: Arc<dyn VotingContract>,
    candidate_id: u32,
    epoch: u64,
}

impl PendingVote {
    pub async fn run(&self) -> VoteOutcome {
        let mut sink = ToastSink::default();
        let result = vote::submit(self.contract.as_ref(), self.candidate_id, &mut sink).await;
        VoteOutcome {
            result,
            toasts: sink.0,
        }
    }
}

/// Result of a vote submission plus the progress toasts it produced.
pub struct VoteOutcome {
    result: Result<Receipt, AppError>,
    toasts: Vec<Notification>,
}

pub struct App<G, C> {
    /// Absent when no wallet extension was detected at startup.
    controller: Option<SessionController<G, C>>,
    model: Option<VotingViewModel>,
    load_error: Option<ErrorPanel>,
    toasts: Vec<Notification>,
    load_in_flight: bool,
    vote_in_flight: bool,
}

impl<G: WalletGateway, C: ContractConnector> App<G, C> {
    pub fn new(gateway: Option<G>, connector: C) -> Self {
        let controller = gateway.map(|g| SessionController::new(g, connector));
        if controller.is_none() {
            warn!("no wallet provider detected");
        }
        Self {
            controller,
            model: None,
            load_error: None,
            toasts: Vec::new(),
            load_in_flight: false,
            vote_in_flight: false,
        }
    }

    /// Page-load entry point: restore a pre-authorized session silently,
    /// or wait for a user gesture.
    pub async fn start(&mut self) {
        let Some(controller) = self.controller.as_mut() else {
            return;
        };
        match controller.bootstrap().await {
            Ok(Some(_)) => {
                self.toasts
                    .push(Notification::success("Wallet connected successfully!"));
                self.refresh().await;
            }
            Ok(None) => {}
            Err(err) => {
                // connect() failures already moved the phase to Failed; a
                // failure of the silent probe itself only gets a toast.
                if !matches!(self.phase(), SessionPhase::Failed { .. }) {
                    self.toasts.push(Notification::error(err.to_string()));
                }
            }
        }
    }

    pub async fn connect_clicked(&mut self) {
        self.model = None;
        self.load_error = None;
        let Some(controller) = self.controller.as_mut() else {
            return;
        };
        match controller.connect().await {
            Ok(_) => {
                self.toasts
                    .push(Notification::success("Wallet connected successfully!"));
                self.refresh().await;
            }
            Err(AppError::UserRejected) => {
                self.toasts.push(Notification::info(
                    "Connection rejected. Please approve the connection request.",
                ));
            }
            Err(_) => {
                // Raw message is already on the Failed phase and renders as
                // the error panel.
            }
        }
    }

    /// Issue a load for the active session. Loads are serialized: returns
    /// `None` while one is outstanding or without a session. The result
    /// goes back through [`App::apply_load`].
    pub fn begin_load(&mut self) -> Option<PendingLoad> {
        if self.load_in_flight {
            return None;
        }
        let (contract, account, epoch) = self.binding()?;
        self.load_in_flight = true;
        Some(PendingLoad {
            contract,
            account,
            epoch,
        })
    }

    /// Apply a finished load. A result whose captured epoch is no longer
    /// current is discarded so a stale response cannot overwrite newer
    /// state.
    pub fn apply_load(&mut self, pending: PendingLoad, result: Result<VotingViewModel, AppError>) {
        self.load_in_flight = false;
        if self.current_epoch() != Some(pending.epoch) {
            warn!("discarding load result from a stale session");
            return;
        }
        match result {
            Ok(vm) => {
                self.model = Some(vm);
                self.load_error = None;
            }
            Err(err) => {
                // All-or-nothing: no partial UI behind the error panel.
                self.model = None;
                self.load_error = Some(ErrorPanel {
                    message: err.to_string(),
                    retryable: true,
                });
            }
        }
    }

    /// Re-run the loader for the active session in one step.
    pub async fn refresh(&mut self) {
        let Some(pending) = self.begin_load() else {
            return;
        };
        let result = pending.run().await;
        self.apply_load(pending, result);
    }

    /// Issue a vote submission. Returns `None` while one is outstanding,
    /// when the candidate is unknown, or once the account has voted. The
    /// outcome goes back through [`App::apply_vote`].
    pub fn begin_vote(&mut self, candidate_id: u32) -> Option<PendingVote> {
        if self.vote_in_flight {
            return None;
        }
        // Optimistic local gate; the contract enforces the real guard.
        let votable = self.model.as_ref().is_some_and(|vm| {
            !vm.has_voted && vm.candidates.iter().any(|c| c.id == candidate_id)
        });
        if !votable {
            return None;
        }
        let (contract, _account, epoch) = self.binding()?;
        self.vote_in_flight = true;
        Some(PendingVote {
            contract,
            candidate_id,
            epoch,
        })
    }

    /// Apply a finished vote submission. Progress toasts are always shown;
    /// the result itself is discarded if the captured epoch is stale, so a
    /// confirmation racing a session change cannot trigger a reload for
    /// the wrong account.
    pub async fn apply_vote(&mut self, pending: PendingVote, outcome: VoteOutcome) {
        self.vote_in_flight = false;
        self.toasts.extend(outcome.toasts);
        if self.current_epoch() != Some(pending.epoch) {
            warn!("discarding vote result from a stale session");
            return;
        }
        match outcome.result {
            Ok(_) => self.refresh().await,
            Err(AppError::UserRejected) => {
                self.toasts
                    .push(Notification::info("Transaction rejected by user"));
            }
            Err(AppError::AlreadyVoted) => {
                self.toasts
                    .push(Notification::error("You have already voted!"));
            }
            Err(AppError::ContractWrite(message)) => {
                self.toasts
                    .push(Notification::error(format!("Voting failed: {message}")));
            }
            Err(err) => {
                self.toasts
                    .push(Notification::error(format!("Voting failed: {err}")));
            }
        }
    }

    pub async fn vote_clicked(&mut self, candidate_id: u32) {
        let Some(pending) = self.begin_vote(candidate_id) else {
            return;
        };
        let outcome = pending.run().await;
        self.apply_vote(pending, outcome).await;
    }

    /// Out-of-band wallet notification, possibly racing an in-flight flow.
    pub async fn wallet_event(&mut self, event: WalletEvent) {
        let Some(controller) = self.controller.as_mut() else {
            return;
        };
        match controller.handle_event(event).await {
            SessionUpdate::Unchanged => {}
            SessionUpdate::Disconnected => {
                self.model = None;
                self.load_error = None;
                self.toasts.push(Notification::info("Wallet disconnected"));
            }
            SessionUpdate::Reconnected(_) => {
                self.model = None;
                self.load_error = None;
                self.toasts
                    .push(Notification::success("Wallet connected successfully!"));
                self.refresh().await;
            }
            SessionUpdate::Failed => {
                self.model = None;
                self.load_error = None;
            }
        }
    }

    /// Retry affordance of the error panel.
    pub async fn retry_clicked(&mut self) {
        if self.load_error.is_some() {
            self.load_error = None;
            self.refresh().await;
        } else {
            self.connect_clicked().await;
        }
    }

    /// Project the current state to a frame. Pure given the app state.
    pub fn frame(&self) -> UiFrame {
        let phase = self.phase();
        let mut frame = view::render(&phase, self.model.as_ref(), self.vote_in_flight);
        if let Some(panel) = &self.load_error {
            frame.body = Body::Error(panel.clone());
        }
        frame
    }

    pub fn phase(&self) -> SessionPhase {
        match &self.controller {
            Some(controller) => controller.phase().clone(),
            None => SessionPhase::Failed {
                message: AppError::ProviderAbsent.to_string(),
                retryable: false,
            },
        }
    }

    pub fn view_model(&self) -> Option<&VotingViewModel> {
        self.model.as_ref()
    }

    pub fn drain_toasts(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.toasts)
    }

    fn binding(&self) -> Option<(Arc<dyn VotingContract>, Address, u64)> {
        let controller = self.controller.as_ref()?;
        let session = controller.session()?;
        let contract = controller.contract()?;
        Some((contract, session.account.clone(), controller.epoch()))
    }

    fn current_epoch(&self) -> Option<u64> {
        self.controller.as_ref().map(|c| c.epoch())
    }
}
