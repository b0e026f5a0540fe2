use tsgen_source::FxDashMap;
use tsgen_source::SourceText;

/// Deduplicates repeatedly-identical generated text across invocations.
///
/// Keyed by hint name, 1:1 with stable input files, so unbounded growth is
/// accepted. This layer never changes generated content — it only decides
/// which backing instance of equivalent content the host sees, letting the
/// host's downstream incremental logic observe "no change" by instance
/// identity.
#[derive(Debug, Default)]
pub struct OutputCache {
    entries: FxDashMap<String, SourceText>,
}

impl OutputCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a freshly generated text against the last emitted one.
    ///
    /// Returns the cached instance when checksums match; otherwise stores
    /// and returns the candidate, replacing any prior entry.
    pub fn resolve(&self, hint: &str, candidate: SourceText) -> SourceText {
        if let Some(cached) = self.entries.get(hint) {
            if cached.checksum() == candidate.checksum() {
                tracing::debug!(hint, "generated text unchanged, reusing cached instance");
                return cached.clone();
            }
        }
        self.entries.insert(hint.to_owned(), candidate.clone());
        candidate
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

    #[test]
    fn identical_text_returns_the_stored_instance() {
        let cache = OutputCache::new();
        let first = cache.resolve("Views_Home_Index.cshtml", SourceText::new("generated"));
        let second = cache.resolve("Views_Home_Index.cshtml", SourceText::new("generated"));
        assert!(first.ptr_eq(&second));
    }

    #[test]
    fn changed_text_replaces_the_entry() {
        let cache = OutputCache::new();
        let first = cache.resolve("hint", SourceText::new("v1"));
        let second = cache.resolve("hint", SourceText::new("v2"));
        assert!(!first.ptr_eq(&second));
        assert_eq!(second.as_str(), "v2");

        // The replacement is now the cached instance.
        let third = cache.resolve("hint", SourceText::new("v2"));
        assert!(second.ptr_eq(&third));
    }

    #[test]
    fn entries_are_independent_per_hint() {
        let cache = OutputCache::new();
        let a = cache.resolve("a", SourceText::new("same"));
        let b = cache.resolve("b", SourceText::new("same"));
        assert!(!a.ptr_eq(&b));
        assert_eq!(cache.len(), 2);
    }
}
