use std::collections::HashMap;

use crate::token::Token;

/// Upper bound on how many candidate anchor positions a single re-anchor
/// search will extend before settling for the best one found so far. Keeps
/// the hot path bounded even against a pathological draft made of one
/// repeated token.
const MAX_CANDIDATES: usize = 128;

/// Hard upper bound on the number of tokens a single `next_chunk` call may
/// return, regardless of the caller-requested chunk size.
pub const MAX_SPEC_LEN: usize = 128;

/// Chunk size used when a caller has no stronger preference of its own.
pub const DEFAULT_SPEC_LEN: usize = 80;

/// Coarse lifecycle of a single draft's alignment against the tokens the
/// engine has actually generated.
///
/// `Diverged` names a real point in the lifecycle — the instant a mismatch
/// is detected at the cursor — but it is never the value observed between
/// calls: `next_chunk` always resolves a divergence (successful re-anchor or
/// not) back to `Streaming` or `Exhausted` before returning, matching the
/// round-trip law that an aligner is never left parked mid-divergence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignerState {
    Fresh,
    Streaming,
    Diverged,
    Exhausted,
}

/// Outcome of one `next_chunk` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlignOutcome {
    /// A run of draft tokens starting at the new cursor.
    Chunk(Vec<Token>),
    /// No proposal this step: either the generated suffix is empty (with an
    /// empty draft) or no re-anchor point could be found.
    NoProposal,
    /// The draft has been fully consumed; nothing left to propose.
    Exhausted,
}

struct Anchor {
    start: usize,
    len: usize,
}

/// Streaming token-diff aligner over a single bound draft.
///
/// Holds a unigram index over the draft (built once, at construction) so
/// that re-anchoring after a divergence costs time bounded by the look-back
/// window, not by the draft's length: `next_chunk`'s amortized cost is
/// sublinear in `len(draft)` for long drafts.
pub struct Aligner {
    draft: Vec<Token>,
    /// draft position -> sorted ascending list of positions sharing that token.
    index: HashMap<Token, Vec<u32>>,
    cursor: usize,
    state: AlignerState,
    lookback_window: usize,
}

impl Aligner {
    pub fn new(draft: Vec<Token>, lookback_window: usize) -> Self {
        let mut index: HashMap<Token, Vec<u32>> = HashMap::with_capacity(draft.len());
        for (pos, &tok) in draft.iter().enumerate() {
            index.entry(tok).or_default().push(pos as u32);
        }
        let state = if draft.is_empty() {
            AlignerState::Exhausted
        } else {
            AlignerState::Fresh
        };
        Self {
            draft,
            index,
            cursor: 0,
            state,
            lookback_window: lookback_window.max(1),
        }
    }

    pub fn state(&self) -> AlignerState {
        self.state
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn draft(&self) -> &[Token] {
        &self.draft
    }

    /// Advances the aligner by one step and returns the next chunk of draft
    /// tokens the engine should verify, if any.
    ///
    /// `generated_suffix` is every token the engine has generated so far for
    /// this request (not just the tokens new since the last call). `k` is
    /// the caller's requested chunk size; the aligner never returns more
    /// than `min(k, len(draft) - cursor)` tokens.
    pub fn next_chunk(&mut self, generated_suffix: &[Token], k: usize) -> AlignOutcome {
        let k = k.min(MAX_SPEC_LEN);
        if generated_suffix.is_empty() {
            if self.draft.is_empty() {
                self.state = AlignerState::Exhausted;
                return AlignOutcome::Exhausted;
            }
            // Only the very first call gets to (re)anchor at the head of the
            // draft; an empty suffix on a later call carries no information
            // and must not rewind a cursor that has already advanced.
            if self.state == AlignerState::Fresh {
                return self.chunk_from_cursor(k);
            }
            if self.cursor >= self.draft.len() {
                self.state = AlignerState::Exhausted;
                return AlignOutcome::Exhausted;
            }
            return self.chunk_from_cursor(k);
        }

        if self.cursor >= self.draft.len() {
            self.state = AlignerState::Exhausted;
            return AlignOutcome::Exhausted;
        }

        let tail_start = generated_suffix.len().saturating_sub(self.lookback_window);
        let tail = &generated_suffix[tail_start..];

        match self.find_best_anchor(tail) {
            Some(anchor) => {
                if anchor.start != self.cursor {
                    tracing::debug!(
                        from_cursor = self.cursor,
                        reanchored_at = anchor.start,
                        match_len = anchor.len,
                        "re-anchored after divergence"
                    );
                }
                self.cursor = anchor.start + anchor.len;
                if self.cursor >= self.draft.len() {
                    self.state = AlignerState::Exhausted;
                    AlignOutcome::Exhausted
                } else {
                    self.state = AlignerState::Streaming;
                    self.chunk_from_cursor(k)
                }
            }
            None => {
                tracing::debug!(
                    cursor = self.cursor,
                    "no re-anchor point found, holding cursor"
                );
                self.state = AlignerState::Streaming;
                AlignOutcome::NoProposal
            }
        }
    }

    fn chunk_from_cursor(&self, k: usize) -> AlignOutcome {
        let end = (self.cursor + k).min(self.draft.len());
        AlignOutcome::Chunk(self.draft[self.cursor..end].to_vec())
    }

    /// Finds the longest suffix of `tail` that occurs as a contiguous
    /// substring of `draft[cursor..]`, preferring the smallest matching
    /// start position on ties.
    fn find_best_anchor(&self, tail: &[Token]) -> Option<Anchor> {
        let anchor_token = *tail.last()?;
        let positions = self.index.get(&anchor_token)?;

        let lower = positions.partition_point(|&p| (p as usize) < self.cursor);
        let candidates = &positions[lower..];

        let mut best: Option<Anchor> = None;
        for &end in candidates.iter().take(MAX_CANDIDATES) {
            let end = end as usize;
            let len = self.extend_backward(end, tail);
            let start = end + 1 - len;
            if start < self.cursor {
                continue;
            }
            let better = match &best {
                None => true,
                Some(b) => len > b.len || (len == b.len && start < b.start),
            };
            if better {
                best = Some(Anchor { start, len });
            }
        }
        best
    }

    /// Extends a match ending at draft position `end` backward through
    /// `tail`, stopping at the tail's start or the aligner's cursor.
    fn extend_backward(&self, end: usize, tail: &[Token]) -> usize {
        let mut len = 1;
        while len < tail.len() && end >= len && end - len >= self.cursor {
            let draft_pos = end - len;
            let tail_pos = tail.len() - 1 - len;
            if self.draft[draft_pos] != tail[tail_pos] {
                break;
            }
            len += 1;
        }
        len
    }
}
