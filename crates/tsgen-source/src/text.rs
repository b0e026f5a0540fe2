use std::fmt;
use std::sync::Arc;

use sha2::Digest;
use sha2::Sha256;

/// SHA-256 content checksum of one generated source text.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Checksum([u8; 32]);

impl Checksum {
    #[must_use]
    pub fn of(text: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(text.as_bytes());
        Self(hasher.finalize().into())
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Checksum(")?;
        for byte in &self.0[..4] {
            write!(f, "{byte:02x}")?;
        }
        write!(f, "..)")
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

#[derive(Debug, PartialEq, Eq)]
struct SourceTextInner {
    text: String,
    checksum: Checksum,
}

/// Generated host-language source accompanied by its content checksum.
///
/// `Arc`-backed: cloning shares the same backing instance, which is what the
/// output checksum cache hands back on a checksum match so the host's
/// incremental layer can observe "no change" by instance identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceText(Arc<SourceTextInner>);

impl SourceText {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let checksum = Checksum::of(&text);
        Self(Arc::new(SourceTextInner { text, checksum }))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0.text
    }

    #[must_use]
    pub fn checksum(&self) -> Checksum {
        self.0.checksum
    }

    /// Whether two handles share the same backing instance.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Display for SourceText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checksum_is_stable_for_equal_text() {
        assert_eq!(Checksum::of("fn main() {}"), Checksum::of("fn main() {}"));
    }

    #[test]
    fn checksum_differs_for_different_text() {
        assert_ne!(Checksum::of("a"), Checksum::of("b"));
    }

    #[test]
    fn clone_shares_the_backing_instance() {
        let text = SourceText::new("generated");
        let clone = text.clone();
        assert!(text.ptr_eq(&clone));
    }

    #[test]
    fn equal_text_from_separate_allocations_is_value_equal_only() {
        let a = SourceText::new("generated");
        let b = SourceText::new("generated");
        assert_eq!(a, b);
        assert!(!a.ptr_eq(&b));
        assert_eq!(a.checksum(), b.checksum());
    }
}
