use specedit_core::Token;

/// Capability interface an engine-side speculator implements.
///
/// This replaces the original implementation's monkey-patching of the
/// engine's n-gram speculator class: instead of swapping out methods on a
/// live object, callers hold a `dyn Speculator` and the engine patch
/// surface decides, per call, whether to route to the speculative-edit
/// proposer or straight through to whatever was installed before it.
pub trait Speculator: Send + Sync {
    /// Proposes a run of tokens for `request_id` given everything generated
    /// so far. Returns an empty vector if nothing is proposed this step.
    fn propose(&self, request_id: &str, generated_suffix: &[Token]) -> Vec<Token>;

    /// Called once a proposal from [`Speculator::propose`] has been
    /// partially or fully admitted by the engine's verifier.
    fn on_admit(&self, _request_id: &str, _admitted: usize) {}

    /// Called when a request finishes, so implementations holding per-request
    /// state can release it.
    fn on_finish(&self, _request_id: &str) {}
}

/// A speculator that never proposes anything. Used as the default
/// delegate when no original engine speculator is supplied, and in tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSpeculator;

impl Speculator for NoopSpeculator {
    fn propose(&self, _request_id: &str, _generated_suffix: &[Token]) -> Vec<Token> {
        Vec::new()
    }
}
