use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use once_cell::sync::OnceCell;
use specedit_core::{RequestRegistry, SpecEditConfig, SpecEditError, Token};

use crate::speculator::Speculator;

/// Process-wide toggles controlling which speculator path is active.
///
/// Mirrors the original implementation's `Features` flags, but as plain
/// atomics rather than a global mutable dataclass instance: any thread can
/// flip a gate, and every read is wait-free.
pub struct FeatureGates {
    spec_edit_enabled: AtomicBool,
    ngram_enabled: AtomicBool,
}

impl FeatureGates {
    fn new() -> Self {
        Self {
            spec_edit_enabled: AtomicBool::new(true),
            ngram_enabled: AtomicBool::new(true),
        }
    }

    pub fn enable_spec_edit(&self) {
        self.spec_edit_enabled.store(true, Ordering::Relaxed);
    }

    pub fn disable_spec_edit(&self) {
        self.spec_edit_enabled.store(false, Ordering::Relaxed);
    }

    pub fn is_spec_edit_enabled(&self) -> bool {
        self.spec_edit_enabled.load(Ordering::Relaxed)
    }

    pub fn enable_ngram_spec(&self) {
        self.ngram_enabled.store(true, Ordering::Relaxed);
    }

    pub fn disable_ngram_spec(&self) {
        self.ngram_enabled.store(false, Ordering::Relaxed);
    }

    pub fn is_ngram_spec_enabled(&self) -> bool {
        self.ngram_enabled.load(Ordering::Relaxed)
    }
}

/// Guards against installing the patch surface twice in the same process.
static INSTALLED: OnceCell<()> = OnceCell::new();

/// Bundles everything the patched decoding loop needs: the request
/// registry, the feature gates, and the speculator being replaced.
///
/// This is the single owned context the original implementation's global
/// mutable instances are folded into — one struct, constructed once at
/// [`EnginePatchSurface::install`] time and handed to callers, instead of
/// module-level state reached through monkey-patched attributes.
pub struct EngineContext {
    registry: Arc<RequestRegistry>,
    gates: FeatureGates,
    original: Arc<dyn Speculator>,
    default_spec_len: AtomicUsize,
    max_spec_len: AtomicUsize,
}

impl EngineContext {
    pub fn registry(&self) -> &RequestRegistry {
        &self.registry
    }

    pub fn gates(&self) -> &FeatureGates {
        &self.gates
    }

    pub fn max_spec_len(&self) -> usize {
        self.max_spec_len.load(Ordering::Relaxed)
    }

    /// Raises the engine's maximum speculative chunk length, e.g. to move
    /// past the original rejection sampler's conservative default.
    pub fn raise_spec_length_limit(&self, new_limit: usize) {
        self.max_spec_len.fetch_max(new_limit, Ordering::Relaxed);
    }
}

impl Speculator for EngineContext {
    fn propose(&self, request_id: &str, generated_suffix: &[Token]) -> Vec<Token> {
        // spec-edit enabled takes the request regardless of the ngram gate:
        // an empty proposal here means "no speculation this step", not
        // "fall back to the original speculator".
        if self.gates.is_spec_edit_enabled() {
            let k = self
                .default_spec_len
                .load(Ordering::Relaxed)
                .min(self.max_spec_len());
            let proposal = self.registry.with_aligner(request_id, |aligner| {
                aligner.next_chunk(generated_suffix, k)
            });
            return match proposal {
                Some(specedit_core::AlignOutcome::Chunk(tokens)) => tokens,
                _ => Vec::new(),
            };
        }

        if self.gates.is_ngram_spec_enabled() {
            tracing::debug!(
                request_id,
                "spec-edit disabled, delegating to original speculator"
            );
            return self.original.propose(request_id, generated_suffix);
        }

        tracing::debug!(request_id, "both speculators disabled, no proposal");
        Vec::new()
    }

    fn on_admit(&self, request_id: &str, admitted: usize) {
        self.original.on_admit(request_id, admitted);
    }

    fn on_finish(&self, request_id: &str) {
        self.registry.forget(request_id);
        self.original.on_finish(request_id);
    }
}

/// The one-shot entry point an embedding process calls to wire the
/// speculative-edit proposer into its decoding loop.
pub struct EnginePatchSurface;

impl EnginePatchSurface {
    /// Installs the patch surface for the given engine version, returning an
    /// [`EngineContext`] that implements [`Speculator`] by delegating to
    /// `original` whenever spec-edit is disabled or yields no proposal.
    ///
    /// Returns [`SpecEditError::InstallConflict`] if called more than once
    /// in the same process — this is the one error variant that is never
    /// swallowed, since a second install means the caller's wiring is wrong.
    pub fn install(
        original: Arc<dyn Speculator>,
        engine_version: &str,
        config: &SpecEditConfig,
    ) -> Result<EngineContext, SpecEditError> {
        INSTALLED
            .set(())
            .map_err(|_| SpecEditError::InstallConflict(engine_version.to_string()))?;

        tracing::info!(engine_version, "installing speculative-edit patch surface");

        let registry = Arc::new(RequestRegistry::with_config(config));
        let gates = FeatureGates::new();
        if !config.patch_on_import {
            gates.disable_spec_edit();
        }

        Ok(EngineContext {
            registry,
            gates,
            original,
            default_spec_len: AtomicUsize::new(config.default_spec_len),
            max_spec_len: AtomicUsize::new(config.max_spec_len),
        })
    }
}
