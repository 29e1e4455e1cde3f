//! Token and draft value types.
//!
//! The core never inspects token text — it only ever compares token ids for
//! equality — so `Token` is a thin alias over an unsigned integer wide
//! enough for any realistic vocabulary.

/// An opaque, non-negative token identifier.
pub type Token = u32;

/// An ordered, finite sequence of tokens. Immutable once bound to a request.
pub type Draft = Vec<Token>;

/// Practical cap on a single draft's length, kept so registry memory stays
/// predictable (see the crate's concurrency & resource model docs).
pub const MAX_DRAFT_LEN: usize = 16_384;
