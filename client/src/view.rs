//! Pure view projection.
//!
//! `render` maps session phase and view model to a [`UiFrame`] with no
//! hidden state: the same inputs always produce the same frame, so the
//! whole surface is testable without a live UI.

use std::time::Duration;

use serde::Serialize;

use crate::consts::{CANDIDATE_COLORS, TOAST_DISMISS};
use crate::loader::VotingViewModel;
use crate::session::SessionPhase;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Success,
    Error,
}

/// Transient, auto-dismissing toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub text: String,
    pub kind: NotificationKind,
    pub dismiss_after: Duration,
}

impl Notification {
    pub fn info(text: impl Into<String>) -> Self {
        Self::with_kind(text, NotificationKind::Info)
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::with_kind(text, NotificationKind::Success)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::with_kind(text, NotificationKind::Error)
    }

    fn with_kind(text: impl Into<String>, kind: NotificationKind) -> Self {
        Self {
            text: text.into(),
            kind,
            dismiss_after: TOAST_DISMISS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletPanel {
    /// No session: show the connect affordance.
    ConnectButton,
    Connected {
        address_short: String,
        voting_status: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CandidateCard {
    pub id: u32,
    pub name: String,
    /// Uppercase first letter for the avatar.
    pub initial: char,
    pub accent: String,
    pub vote_count: u64,
    pub vote_enabled: bool,
    pub button_label: &'static str,
}

/// Bar-chart input handed to the chart widget. Serializable so the widget
/// can consume it as JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub labels: Vec<String>,
    pub values: Vec<u64>,
    pub fill_colors: Vec<String>,
    pub border_colors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderStat {
    pub name: String,
    pub votes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsPanel {
    pub total_votes: u64,
    pub candidate_count: usize,
    pub leader: Option<LeaderStat>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultsView {
    pub cards: Vec<CandidateCard>,
    pub chart: ChartSpec,
    pub stats: StatsPanel,
}

/// Blocking error surface. Retryable errors carry a retry affordance; a
/// missing wallet provider does not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorPanel {
    pub message: String,
    pub retryable: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Idle,
    Loading,
    Error(ErrorPanel),
    Results(ResultsView),
}

#[derive(Debug, Clone, PartialEq)]
pub struct UiFrame {
    pub wallet: WalletPanel,
    pub body: Body,
}

pub fn render(
    phase: &SessionPhase,
    model: Option<&VotingViewModel>,
    vote_in_flight: bool,
) -> UiFrame {
    match phase {
        SessionPhase::Disconnected => UiFrame {
            wallet: WalletPanel::ConnectButton,
            body: Body::Idle,
        },
        SessionPhase::Connecting => UiFrame {
            wallet: WalletPanel::ConnectButton,
            body: Body::Loading,
        },
        SessionPhase::Failed { message, retryable } => UiFrame {
            wallet: WalletPanel::ConnectButton,
            body: Body::Error(ErrorPanel {
                message: message.clone(),
                retryable: *retryable,
            }),
        },
        SessionPhase::Connected(session) => {
            let voting_status = match model {
                Some(vm) if vm.has_voted => "You have voted".to_string(),
                Some(_) => "Not voted yet".to_string(),
                None => "Loading...".to_string(),
            };
            let wallet = WalletPanel::Connected {
                address_short: session.account.short(),
                voting_status,
            };
            let body = match model {
                Some(vm) => Body::Results(results_view(vm, vote_in_flight)),
                None => Body::Loading,
            };
            UiFrame { wallet, body }
        }
    }
}

fn results_view(vm: &VotingViewModel, vote_in_flight: bool) -> ResultsView {
    let vote_enabled = !vm.has_voted && !vote_in_flight;
    let cards = vm
        .candidates
        .iter()
        .enumerate()
        .map(|(idx, c)| CandidateCard {
            id: c.id,
            name: c.name.clone(),
            initial: c
                .name
                .chars()
                .next()
                .and_then(|ch| ch.to_uppercase().next())
                .unwrap_or('?'),
            accent: palette(idx).to_string(),
            vote_count: c.vote_count,
            vote_enabled,
            button_label: if vm.has_voted { "Voted" } else { "Vote Now" },
        })
        .collect();

    let fill_colors: Vec<String> = vm
        .candidates
        .iter()
        .enumerate()
        .map(|(idx, _)| palette(idx).to_string())
        .collect();
    let border_colors = fill_colors
        .iter()
        .map(|c| c.replace("0.8", "1"))
        .collect();
    let chart = ChartSpec {
        labels: vm.candidates.iter().map(|c| c.name.clone()).collect(),
        values: vm.candidates.iter().map(|c| c.vote_count).collect(),
        fill_colors,
        border_colors,
    };

    let stats = StatsPanel {
        total_votes: vm.total_votes,
        candidate_count: vm.candidates.len(),
        leader: vm.leader.as_ref().map(|l| LeaderStat {
            name: leader_display_name(&l.name),
            votes: l.vote_count,
        }),
    };

    ResultsView {
        cards,
        chart,
        stats,
    }
}

fn palette(index: usize) -> &'static str {
    CANDIDATE_COLORS[index % CANDIDATE_COLORS.len()]
}

/// Stat card shows only the part of the name before the first dot.
fn leader_display_name(name: &str) -> String {
    name.split('.').next().unwrap_or(name).to_string()
}
