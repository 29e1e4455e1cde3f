//! Streaming token-diff engine and draft registry for speculative-edit
//! decoding.
//!
//! This crate holds the parts of the speculative-edit system that have no
//! opinion about how they're wired into an inference engine: the
//! [`Aligner`] that turns "here is what the model generated so far" into
//! "here is the next run of draft tokens worth proposing", and the
//! [`RequestRegistry`] that owns one aligner per in-flight request.
//!
//! Wiring this into a decoding loop — the `Speculator` capability interface,
//! feature gates, and the patch/install surface — lives one layer up, in
//! `specedit_engine`.

pub mod aligner;
pub mod bench;
pub mod config;
pub mod error;
pub mod registry;
pub mod token;

pub use aligner::{AlignOutcome, Aligner, AlignerState, DEFAULT_SPEC_LEN, MAX_SPEC_LEN};
pub use config::SpecEditConfig;
pub use error::SpecEditError;
pub use registry::{RequestMetadata, RequestRegistry};
pub use token::{Draft, MAX_DRAFT_LEN, Token};
