/// In-memory configuration for the speculative-edit core.
///
/// Deliberately has no file, environment, or network I/O of its own — the
/// embedding process is expected to build one of these from whatever
/// configuration layer it already has (flags, a config service, etc.) and
/// hand it to [`crate::registry::RequestRegistry::with_config`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecEditConfig {
    /// Maximum number of concurrently bound requests before FIFO eviction
    /// kicks in.
    pub registry_capacity: usize,
    /// Hard ceiling on how many tokens a single proposal step may return,
    /// regardless of the caller-requested chunk size.
    pub max_spec_len: usize,
    /// Chunk size used when a caller doesn't specify one explicitly.
    pub default_spec_len: usize,
    /// How many trailing generated tokens the aligner considers when
    /// re-anchoring after a divergence.
    pub lookback_window: usize,
    /// Whether installing the engine patch surface should also register the
    /// n-gram speculator it replaces as an active capability (see
    /// `EnginePatchSurface::install`).
    pub patch_on_import: bool,
}

impl Default for SpecEditConfig {
    fn default() -> Self {
        Self {
            registry_capacity: 1024,
            max_spec_len: 128,
            default_spec_len: 80,
            lookback_window: 256,
            patch_on_import: true,
        }
    }
}

impl SpecEditConfig {
    pub fn with_registry_capacity(mut self, capacity: usize) -> Self {
        self.registry_capacity = capacity;
        self
    }

    pub fn with_max_spec_len(mut self, max_spec_len: usize) -> Self {
        self.max_spec_len = max_spec_len;
        self
    }

    pub fn with_lookback_window(mut self, lookback_window: usize) -> Self {
        self.lookback_window = lookback_window;
        self
    }
}
