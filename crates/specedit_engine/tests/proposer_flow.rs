use std::sync::Arc;

use specedit_engine::{EnginePatchSurface, SpecEditConfig, Speculator, Token};

struct StubNgram;

impl Speculator for StubNgram {
    fn propose(&self, _request_id: &str, _generated_suffix: &[Token]) -> Vec<Token> {
        vec![999]
    }
}

#[test]
fn end_to_end_bind_propose_admit_finish() {
    let ctx = EnginePatchSurface::install(Arc::new(StubNgram), "v1", &SpecEditConfig::default())
        .expect("first install in this process should succeed");

    ctx.registry().bind("req-1", vec![10, 11, 12, 13, 14, 15]);

    // Spec-edit path wins while enabled and bound.
    let proposal = ctx.propose("req-1", &[]);
    assert_eq!(proposal, vec![10, 11, 12, 13, 14, 15]);
    ctx.on_admit("req-1", proposal.len());

    // Disabling spec-edit falls through to the wrapped speculator.
    ctx.gates().disable_spec_edit();
    assert_eq!(ctx.propose("req-1", &[]), vec![999]);

    // Disabling both yields no proposal at all.
    ctx.gates().disable_ngram_spec();
    assert!(ctx.propose("req-1", &[]).is_empty());

    ctx.on_finish("req-1");
    assert_eq!(ctx.registry().len(), 0);
}
