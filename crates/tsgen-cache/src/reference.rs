use std::sync::Arc;

use tsgen_compile::ComponentMetadata;
use tsgen_compile::ReferenceId;
use tsgen_source::FxDashMap;

/// Entry ceiling before the whole map is cleared. A sizeable compilation
/// carries around ~300 references, so leave a little headroom beyond that.
const CLEAR_THRESHOLD: usize = 400;

/// Process-wide cache of component metadata discovered per referenced
/// library, keyed by the library's content-derived identity.
///
/// Eviction is clear-on-overflow rather than per-entry LRU: the common case
/// is a small number of distinct large compilations sharing the process,
/// where most references are identical across invocations, so a full clear
/// is rare and cheap relative to recomputation.
#[derive(Debug, Default)]
pub struct ReferenceMetadataCache {
    entries: FxDashMap<ReferenceId, Arc<[ComponentMetadata]>>,
}

impl ReferenceMetadataCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, id: &ReferenceId) -> Option<Arc<[ComponentMetadata]>> {
        self.entries.get(id).map(|entry| Arc::clone(&entry))
    }

    pub fn insert(&self, id: ReferenceId, components: Arc<[ComponentMetadata]>) {
        if self.entries.len() > CLEAR_THRESHOLD {
            tracing::debug!(
                entries = self.entries.len(),
                "reference metadata cache over ceiling, clearing"
            );
            self.entries.clear();
        }
        self.entries.insert(id, components);
    }

    /// Look up an identity, extracting and caching on a miss.
    pub fn get_or_insert_with(
        &self,
        id: ReferenceId,
        extract: impl FnOnce() -> Vec<ComponentMetadata>,
    ) -> Arc<[ComponentMetadata]> {
        if let Some(hit) = self.get(&id) {
            tracing::debug!(?id, "reference metadata cache hit");
            return hit;
        }
        let fresh: Arc<[ComponentMetadata]> = extract().into();
        self.insert(id, Arc::clone(&fresh));
        fresh
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u32) -> ReferenceId {
        ReferenceId::from_content(&n.to_le_bytes())
    }

    fn components(name: &str) -> Arc<[ComponentMetadata]> {
        Arc::from([ComponentMetadata::new(name, "Lib")])
    }

    #[test]
    fn hit_returns_the_cached_list_without_extraction() {
        let cache = ReferenceMetadataCache::new();
        cache.insert(id(1), components("Bar"));

        let mut extracted = false;
        let list = cache.get_or_insert_with(id(1), || {
            extracted = true;
            Vec::new()
        });
        assert!(!extracted);
        assert_eq!(list[0].name(), "Bar");
    }

    #[test]
    fn miss_extracts_and_caches() {
        let cache = ReferenceMetadataCache::new();
        let list = cache.get_or_insert_with(id(2), || vec![ComponentMetadata::new("Baz", "Lib")]);
        assert_eq!(list.len(), 1);
        assert!(cache.get(&id(2)).is_some());
    }

    #[test]
    fn crossing_the_ceiling_clears_before_inserting() {
        let cache = ReferenceMetadataCache::new();
        for n in 0..=400 {
            cache.insert(id(n), components("C"));
        }
        assert_eq!(cache.len(), 401);

        cache.insert(id(401), components("New"));
        assert_eq!(cache.len(), 1);
        assert!(cache.get(&id(0)).is_none());
        assert!(cache.get(&id(401)).is_some());
    }

    #[test]
    fn empty_metadata_lists_are_cached_too() {
        let cache = ReferenceMetadataCache::new();
        let list = cache.get_or_insert_with(id(7), Vec::new);
        assert!(list.is_empty());

        let mut extracted = false;
        cache.get_or_insert_with(id(7), || {
            extracted = true;
            Vec::new()
        });
        assert!(!extracted);
    }
}
