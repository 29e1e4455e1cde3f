//! Decoding-loop wiring for the speculative-edit token-diff core.
//!
//! `specedit_core` knows how to align a draft against what's actually been
//! generated; this crate is the seam where that gets plugged into an
//! inference engine: the [`Speculator`] capability interface a decoding loop
//! calls through, the process-wide feature gates, and the one-shot
//! [`EnginePatchSurface::install`] entry point.

pub mod logging;
pub mod patch;
pub mod speculator;

pub use patch::{EngineContext, EnginePatchSurface, FeatureGates};
pub use speculator::{NoopSpeculator, Speculator};

pub use specedit_core::{
    AlignOutcome, Aligner, AlignerState, Draft, RequestMetadata, RequestRegistry, SpecEditConfig,
    SpecEditError, Token,
};
