//! Voting data loader: produces a consistent view model for the active
//! session, all-or-nothing.

use tracing::debug;

use crate::contract::VotingContract;
use crate::error::AppError;
use crate::gateway::Address;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// 1-based, contiguous up to the contract's reported count.
    pub id: u32,
    pub name: String,
    pub vote_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VotingViewModel {
    /// Ascending id order.
    pub candidates: Vec<Candidate>,
    pub has_voted: bool,
    pub total_votes: u64,
    /// Candidate with the maximum vote count; lowest id wins ties.
    pub leader: Option<Candidate>,
}

impl VotingViewModel {
    pub fn assemble(candidates: Vec<Candidate>, has_voted: bool) -> Self {
        let total_votes = candidates.iter().map(|c| c.vote_count).sum();
        let leader = candidates
            .iter()
            .fold(None::<&Candidate>, |best, c| match best {
                Some(b) if c.vote_count > b.vote_count => Some(c),
                Some(b) => Some(b),
                None => Some(c),
            })
            .cloned();
        Self {
            candidates,
            has_voted,
            total_votes,
            leader,
        }
    }
}

/// Fetch vote status and the full candidate list for `account`. Any read
/// failure aborts the whole load; a partial view model is never returned.
pub async fn load(
    contract: &dyn VotingContract,
    account: &Address,
) -> Result<VotingViewModel, AppError> {
    let has_voted = contract.has_voted(account).await.map_err(AppError::read)?;
    let count = contract.candidates_count().await.map_err(AppError::read)?;
    debug!(%account, count, has_voted, "loading candidates");

    let mut candidates = Vec::with_capacity(count as usize);
    for id in 1..=count {
        let (name, vote_count) = contract.candidate(id).await.map_err(AppError::read)?;
        candidates.push(Candidate {
            id,
            name,
            vote_count,
        });
    }

    Ok(VotingViewModel::assemble(candidates, has_voted))
}
