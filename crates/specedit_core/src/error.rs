use thiserror::Error;

/// Error taxonomy for the speculative-edit core.
///
/// Variants split along the same line the proposer boundary cares about:
/// everything except [`SpecEditError::InstallConflict`] is non-fatal and is
/// swallowed (logged, then treated as "fall through to the original
/// speculator") by callers sitting at the decoding-loop boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SpecEditError {
    #[error("no request bound for id `{0}`")]
    UnknownRequest(String),

    #[error("draft for request `{0}` is empty")]
    EmptyDraft(String),

    #[error("draft for request `{0}` has already been fully consumed")]
    DraftExhausted(String),

    #[error("could not align generated suffix against draft for request `{0}`")]
    AlignmentFailure(String),

    #[error("registry is at capacity ({capacity}); evicted oldest entry `{evicted}`")]
    RegistryOverflow { capacity: usize, evicted: String },

    #[error("engine patch already installed (version `{0}`)")]
    InstallConflict(String),
}

impl SpecEditError {
    /// Whether this error should be swallowed at the proposer boundary and
    /// treated as "no speculative proposal this step" rather than propagated.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, SpecEditError::InstallConflict(_))
    }
}
