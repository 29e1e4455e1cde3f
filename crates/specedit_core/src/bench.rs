//! In-process replay harness for exercising an [`Aligner`] against a
//! recorded generation trace without a live engine.
//!
//! Grounded in the same shape as a timing-based regression test: feed a
//! known draft and a known sequence of generated tokens through
//! `next_chunk` one token at a time and report what happened, so a change
//! to the re-anchor algorithm can be checked for both correctness and cost
//! before it ever reaches a real decoding loop.

use std::time::Duration;

use crate::aligner::{AlignOutcome, Aligner};
use crate::token::Token;

/// Summary of a single replay run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayReport {
    /// Number of generated tokens fed through the aligner.
    pub steps: usize,
    /// Number of steps where a proposal was returned.
    pub chunks_proposed: usize,
    /// Total tokens proposed across all steps (tokens still have to be
    /// verified by the engine; this is an upper bound on savings, not a
    /// guarantee).
    pub tokens_proposed: usize,
    /// Number of steps where no proposal was possible.
    pub no_proposal_steps: usize,
    pub wall_time: Duration,
}

/// Replays `generated`, one token at a time, against `aligner`, requesting
/// `chunk_size` tokens per step.
///
/// This is wall-clock instrumentation over real work, not a timing
/// assertion — callers decide what to do with `ReplayReport::wall_time`
/// (log it, compare it against a budget, discard it).
pub fn replay(aligner: &mut Aligner, generated: &[Token], chunk_size: usize) -> ReplayReport {
    let start = std::time::Instant::now();
    let mut chunks_proposed = 0;
    let mut tokens_proposed = 0;
    let mut no_proposal_steps = 0;

    for end in 1..=generated.len() {
        match aligner.next_chunk(&generated[..end], chunk_size) {
            AlignOutcome::Chunk(chunk) => {
                chunks_proposed += 1;
                tokens_proposed += chunk.len();
            }
            AlignOutcome::NoProposal => no_proposal_steps += 1,
            AlignOutcome::Exhausted => break,
        }
    }

    ReplayReport {
        steps: generated.len(),
        chunks_proposed,
        tokens_proposed,
        no_proposal_steps,
        wall_time: start.elapsed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replay_reports_proposals_for_a_matching_trace() {
        let draft: Vec<Token> = (0..20).collect();
        let mut a = Aligner::new(draft.clone(), 256);
        let report = replay(&mut a, &draft, 4);
        assert!(report.chunks_proposed > 0);
        assert!(report.tokens_proposed > 0);
    }

    #[test]
    fn replay_counts_no_proposal_steps_for_an_unrelated_trace() {
        let draft: Vec<Token> = vec![1, 2, 3];
        let generated: Vec<Token> = vec![90, 91, 92, 93];
        let mut a = Aligner::new(draft, 256);
        let report = replay(&mut a, &generated, 2);
        assert_eq!(report.no_proposal_steps, generated.len());
        assert_eq!(report.chunks_proposed, 0);
    }
}
