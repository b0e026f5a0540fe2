use std::fmt;

use sha2::Digest;
use sha2::Sha256;
use tsgen_conf::LanguageVersion;
use tsgen_source::SourceText;

use crate::metadata::ComponentMetadata;

/// Opaque, content-derived identity of one referenced library.
///
/// The host guarantees that two invocations observing byte-identical library
/// content present the same identity. That contract is load-bearing: it is
/// the key of the reference metadata cache.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReferenceId([u8; 32]);

impl ReferenceId {
    #[must_use]
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Derive an identity from library content. Hosts that track content
    /// hashes already can use [`ReferenceId::from_bytes`] instead.
    #[must_use]
    pub fn from_content(content: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(content);
        Self(hasher.finalize().into())
    }
}

impl fmt::Debug for ReferenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ReferenceId(")?;
        for byte in &self.0[..6] {
            write!(f, "{byte:02x}")?;
        }
        write!(f, "..)")
    }
}

/// One library referenced by the host compilation.
///
/// `identity` is `None` for references the host cannot stably identify
/// (dynamically synthesized assemblies, for instance); metadata for those is
/// recomputed on every invocation.
#[derive(Debug, Clone)]
pub struct Reference {
    display: String,
    identity: Option<ReferenceId>,
}

impl Reference {
    #[must_use]
    pub fn new(display: impl Into<String>, identity: Option<ReferenceId>) -> Self {
        Self {
            display: display.into(),
            identity,
        }
    }

    #[must_use]
    pub fn display(&self) -> &str {
        &self.display
    }

    #[must_use]
    pub fn identity(&self) -> Option<&ReferenceId> {
        self.identity.as_ref()
    }
}

/// One declaration-only syntax unit produced by the discovery pass, parsed
/// under the host's exact language-version settings.
#[derive(Debug, Clone)]
pub struct SyntaxUnit {
    hint: String,
    text: SourceText,
    language_version: LanguageVersion,
}

impl SyntaxUnit {
    #[must_use]
    pub fn new(hint: impl Into<String>, text: SourceText, language_version: LanguageVersion) -> Self {
        Self {
            hint: hint.into(),
            text,
            language_version,
        }
    }

    #[must_use]
    pub fn hint(&self) -> &str {
        &self.hint
    }

    #[must_use]
    pub fn text(&self) -> &SourceText {
        &self.text
    }

    #[must_use]
    pub fn language_version(&self) -> LanguageVersion {
        self.language_version
    }
}

/// The host's current compilation as the generator sees it.
///
/// Implemented by the host; the generator treats it as read-only. `extend`
/// is a pure function — the receiver must remain unmodified, and the derived
/// view exists only for metadata extraction.
pub trait Compilation: Send + Sync {
    /// Name of the assembly being compiled.
    fn assembly_name(&self) -> &str;

    /// Referenced libraries, in the host's reference order.
    fn references(&self) -> &[Reference];

    /// Whether the host permits concurrent builds. A host that has opted out
    /// must not observe concurrent diagnostic reporting.
    fn concurrent_build_enabled(&self) -> bool;

    /// Extend this compilation with declaration-only syntax units, yielding
    /// a derived view for component discovery.
    fn extend(&self, units: Vec<SyntaxUnit>) -> Box<dyn DerivedCompilation + '_>;

    /// Run component-metadata extraction against one reference's exposed
    /// assembly or module symbol. A reference yielding no metadata is valid
    /// and common.
    fn extract_reference_components(&self, reference: &Reference) -> Vec<ComponentMetadata>;
}

/// A compilation extended with the discovery pass's declaration code.
/// Discarded as soon as extraction has run.
pub trait DerivedCompilation {
    /// Extract metadata declared by the current project's own templates.
    fn extract_own_components(&self) -> Vec<ComponentMetadata>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_a_pure_function_of_content() {
        let a = ReferenceId::from_content(b"library bytes");
        let b = ReferenceId::from_content(b"library bytes");
        let c = ReferenceId::from_content(b"other bytes");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
