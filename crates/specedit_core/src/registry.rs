use std::collections::{HashMap, VecDeque};

use parking_lot::Mutex;

use crate::aligner::Aligner;
use crate::config::SpecEditConfig;
use crate::error::SpecEditError;
use crate::token::Token;

/// Inert, log-only context carried alongside a bound request. None of these
/// fields influence alignment or proposal behavior; they exist so the
/// embedding process can attribute registry activity (metrics, traces) back
/// to a zone or model without the core needing to know what either means.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestMetadata {
    pub zone: Option<String>,
    pub model: Option<String>,
}

struct Entry {
    aligner: Aligner,
    metadata: RequestMetadata,
}

struct Inner {
    entries: HashMap<String, Entry>,
    /// Bind order, oldest first, used for FIFO eviction once `capacity` is
    /// reached. Rebinding an existing id moves it to the back.
    order: VecDeque<String>,
}

/// Bounded-capacity, thread-safe registry mapping request ids to their
/// bound draft and aligner state.
///
/// Exclusion is a single `parking_lot::Mutex` guarding the whole table —
/// callers reach the aligner only through [`RequestRegistry::with_aligner`],
/// which holds the lock for the duration of the closure and never lets an
/// aligner reference escape past the current step.
pub struct RequestRegistry {
    inner: Mutex<Inner>,
    capacity: usize,
    lookback_window: usize,
}

impl RequestRegistry {
    pub fn new() -> Self {
        Self::with_config(&SpecEditConfig::default())
    }

    pub fn with_config(config: &SpecEditConfig) -> Self {
        Self {
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                order: VecDeque::new(),
            }),
            capacity: config.registry_capacity.max(1),
            lookback_window: config.lookback_window,
        }
    }

    /// Binds `draft` to `request_id`, replacing any existing binding for
    /// that id. Evicts the oldest entry first if the registry is at
    /// capacity.
    pub fn bind(&self, request_id: impl Into<String>, draft: Vec<Token>) {
        self.bind_with_metadata(request_id, draft, RequestMetadata::default())
    }

    pub fn bind_with_metadata(
        &self,
        request_id: impl Into<String>,
        draft: Vec<Token>,
        metadata: RequestMetadata,
    ) {
        let request_id = request_id.into();
        if draft.is_empty() {
            tracing::debug!(
                error = %SpecEditError::EmptyDraft(request_id.clone()),
                "refusing to bind an empty draft"
            );
            return;
        }

        let aligner = Aligner::new(draft, self.lookback_window);
        let mut inner = self.inner.lock();

        if let Some(existing) = inner.entries.get(&request_id) {
            if existing.aligner.draft() != aligner.draft() {
                tracing::warn!(
                    request_id = %request_id,
                    "rebinding request with a different draft, discarding prior alignment"
                );
            }
            inner.order.retain(|id| id != &request_id);
        } else if inner.entries.len() >= self.capacity
            && let Some(evicted) = inner.order.pop_front()
        {
            inner.entries.remove(&evicted);
            tracing::warn!(
                error = %SpecEditError::RegistryOverflow {
                    capacity: self.capacity,
                    evicted: evicted.clone(),
                },
                "registry at capacity, evicting oldest entry"
            );
        }

        tracing::debug!(request_id = %request_id, "bound request");
        inner.order.push_back(request_id.clone());
        inner
            .entries
            .insert(request_id, Entry { aligner, metadata });
    }

    /// Runs `f` with exclusive access to the aligner bound to `request_id`.
    /// Returns `None` if no request is bound under that id.
    pub fn with_aligner<R>(
        &self,
        request_id: &str,
        f: impl FnOnce(&mut Aligner) -> R,
    ) -> Option<R> {
        let mut inner = self.inner.lock();
        inner.entries.get_mut(request_id).map(|e| f(&mut e.aligner))
    }

    pub fn metadata(&self, request_id: &str) -> Option<RequestMetadata> {
        self.inner
            .lock()
            .entries
            .get(request_id)
            .map(|e| e.metadata.clone())
    }

    /// Removes a request's binding, freeing its aligner and index.
    pub fn forget(&self, request_id: &str) {
        let mut inner = self.inner.lock();
        if inner.entries.remove(request_id).is_some() {
            inner.order.retain(|id| id != request_id);
            tracing::debug!(request_id = %request_id, "forgot request");
        } else {
            tracing::debug!(
                error = %SpecEditError::UnknownRequest(request_id.to_string()),
                "forget called for unbound request"
            );
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for RequestRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aligner::AlignOutcome;

    #[test]
    fn bind_and_lookup_round_trip() {
        let reg = RequestRegistry::new();
        reg.bind("r1", vec![1, 2, 3]);
        let out = reg.with_aligner("r1", |a| a.next_chunk(&[], 2));
        assert_eq!(out, Some(AlignOutcome::Chunk(vec![1, 2])));
    }

    #[test]
    fn binding_an_empty_draft_creates_no_entry() {
        let reg = RequestRegistry::new();
        reg.bind("r1", vec![]);
        assert_eq!(reg.len(), 0);
        assert!(reg.with_aligner("r1", |a| a.next_chunk(&[], 1)).is_none());
    }

    #[test]
    fn lookup_of_unknown_id_is_none() {
        let reg = RequestRegistry::new();
        assert!(
            reg.with_aligner("ghost", |a| a.next_chunk(&[], 1))
                .is_none()
        );
    }

    #[test]
    fn forget_removes_binding() {
        let reg = RequestRegistry::new();
        reg.bind("r1", vec![1, 2, 3]);
        reg.forget("r1");
        assert!(reg.with_aligner("r1", |a| a.next_chunk(&[], 1)).is_none());
        assert_eq!(reg.len(), 0);
    }

    #[test]
    fn forget_is_idempotent() {
        let reg = RequestRegistry::new();
        reg.bind("r1", vec![1, 2, 3]);
        reg.forget("r1");
        reg.forget("r1");
        assert_eq!(reg.len(), 0);
        reg.forget("never-bound");
    }

    #[test]
    fn rebind_replaces_draft_without_growing() {
        let reg = RequestRegistry::new();
        reg.bind("r1", vec![1, 2, 3]);
        reg.bind("r1", vec![9, 9]);
        assert_eq!(reg.len(), 1);
        let out = reg.with_aligner("r1", |a| a.next_chunk(&[], 5));
        assert_eq!(out, Some(AlignOutcome::Chunk(vec![9, 9])));
    }

    #[test]
    fn rebind_with_the_same_draft_resets_the_cursor() {
        let reg = RequestRegistry::new();
        reg.bind("r1", vec![1, 2, 3]);
        reg.with_aligner("r1", |a| a.next_chunk(&[], 1));
        reg.bind("r1", vec![1, 2, 3]);
        assert_eq!(reg.len(), 1);
        let out = reg.with_aligner("r1", |a| a.next_chunk(&[], 3));
        assert_eq!(out, Some(AlignOutcome::Chunk(vec![1, 2, 3])));
    }

    #[test]
    fn capacity_evicts_oldest_first() {
        let config = SpecEditConfig::default().with_registry_capacity(2);
        let reg = RequestRegistry::with_config(&config);
        reg.bind("r1", vec![1]);
        reg.bind("r2", vec![2]);
        reg.bind("r3", vec![3]);
        assert_eq!(reg.len(), 2);
        assert!(reg.with_aligner("r1", |a| a.next_chunk(&[], 1)).is_none());
        assert!(reg.with_aligner("r2", |a| a.next_chunk(&[], 1)).is_some());
        assert!(reg.with_aligner("r3", |a| a.next_chunk(&[], 1)).is_some());
    }

    #[test]
    fn rebind_moves_entry_to_back_of_eviction_order() {
        let config = SpecEditConfig::default().with_registry_capacity(2);
        let reg = RequestRegistry::with_config(&config);
        reg.bind("r1", vec![1]);
        reg.bind("r2", vec![2]);
        reg.bind("r1", vec![1, 1]);
        reg.bind("r3", vec![3]);
        assert!(reg.with_aligner("r2", |a| a.next_chunk(&[], 1)).is_none());
        assert!(reg.with_aligner("r1", |a| a.next_chunk(&[], 1)).is_some());
    }

    #[test]
    fn metadata_is_stored_and_inert() {
        let reg = RequestRegistry::new();
        reg.bind_with_metadata(
            "r1",
            vec![1, 2],
            RequestMetadata {
                zone: Some("us-east".into()),
                model: Some("big".into()),
            },
        );
        let meta = reg.metadata("r1").unwrap();
        assert_eq!(meta.zone.as_deref(), Some("us-east"));
        assert_eq!(meta.model.as_deref(), Some("big"));
    }
}
