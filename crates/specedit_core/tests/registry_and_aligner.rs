use specedit_core::{AlignOutcome, RequestRegistry, SpecEditConfig};

#[test]
fn a_bound_request_streams_through_to_exhaustion() {
    let reg = RequestRegistry::new();
    let draft: Vec<u32> = (0..12).collect();
    reg.bind("req-1", draft.clone());

    let mut generated = Vec::new();
    let mut served = Vec::new();
    for tok in &draft {
        generated.push(*tok);
        match reg.with_aligner("req-1", |a| a.next_chunk(&generated, 4)) {
            Some(AlignOutcome::Chunk(chunk)) => served.extend(chunk),
            Some(AlignOutcome::Exhausted) => break,
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
    assert!(!served.is_empty());
    reg.forget("req-1");
    assert!(
        reg.with_aligner("req-1", |a| a.next_chunk(&[], 1))
            .is_none()
    );
}

#[test]
fn capacity_is_enforced_across_many_concurrent_requests() {
    let config = SpecEditConfig::default().with_registry_capacity(4);
    let reg = RequestRegistry::with_config(&config);
    for i in 0..10 {
        reg.bind(format!("req-{i}"), vec![i as u32, i as u32 + 1]);
    }
    assert_eq!(reg.len(), 4);
    for i in 0..6 {
        assert!(
            reg.with_aligner(&format!("req-{i}"), |a| a.next_chunk(&[], 1))
                .is_none(),
            "request {i} should have been evicted"
        );
    }
    for i in 6..10 {
        assert!(
            reg.with_aligner(&format!("req-{i}"), |a| a.next_chunk(&[], 1))
                .is_some()
        );
    }
}
