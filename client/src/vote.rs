//! Vote submission: one transaction per user click, with the state
//! progression surfaced through a notifier.

use tracing::{info, warn};

use crate::contract::{Receipt, VotingContract};
use crate::error::AppError;

/// Receives progress callbacks while a vote transaction moves from
/// submission to confirmation. The caller decides how to surface them.
pub trait VoteNotifier {
    fn submitting(&mut self);
    fn submitted(&mut self, tx_hash: &str);
    fn confirmed(&mut self, receipt: &Receipt);
}

/// Submit a vote for `candidate_id` and await on-chain confirmation.
///
/// The double-vote guard lives in the contract; callers only gate the UI
/// optimistically. No retry on failure: the user must re-initiate.
pub async fn submit<N: VoteNotifier>(
    contract: &dyn VotingContract,
    candidate_id: u32,
    notifier: &mut N,
) -> Result<Receipt, AppError> {
    notifier.submitting();
    let handle = contract
        .vote(candidate_id)
        .await
        .map_err(AppError::from_vote_failure)?;

    let tx_hash = handle.tx_hash().to_string();
    info!(candidate_id, %tx_hash, "vote transaction submitted");
    notifier.submitted(&tx_hash);

    let receipt = handle.confirmed().await.map_err(|err| {
        warn!(%tx_hash, error = %err, "vote transaction failed");
        AppError::from_vote_failure(err)
    })?;

    info!(%tx_hash, block = receipt.block_number, "vote confirmed");
    notifier.confirmed(&receipt);
    Ok(receipt)
}
