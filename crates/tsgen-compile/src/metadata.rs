use serde::Deserialize;
use serde::Serialize;

/// One bindable attribute of a discoverable component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundAttribute {
    pub name: String,
    pub type_name: String,
}

/// Descriptor of one discoverable component, template-defined or
/// library-defined.
///
/// Immutable once produced by the discovery pass; the final generation pass
/// only ever reads these.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComponentMetadata {
    name: String,
    assembly_name: String,
    attributes: Vec<BoundAttribute>,
    case_sensitive: bool,
}

impl ComponentMetadata {
    #[must_use]
    pub fn new(name: impl Into<String>, assembly_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            assembly_name: assembly_name.into(),
            attributes: Vec::new(),
            case_sensitive: true,
        }
    }

    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        self.attributes.push(BoundAttribute {
            name: name.into(),
            type_name: type_name.into(),
        });
        self
    }

    #[must_use]
    pub fn case_insensitive(mut self) -> Self {
        self.case_sensitive = false;
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn assembly_name(&self) -> &str {
        &self.assembly_name
    }

    #[must_use]
    pub fn attributes(&self) -> &[BoundAttribute] {
        &self.attributes
    }

    #[must_use]
    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Identity used when de-duplicating the merged metadata list.
    #[must_use]
    pub fn dedup_key(&self) -> (&str, &str) {
        (&self.assembly_name, &self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedup_key_spans_assembly_and_name() {
        let a = ComponentMetadata::new("Card", "Lib.A");
        let b = ComponentMetadata::new("Card", "Lib.B");
        assert_ne!(a.dedup_key(), b.dedup_key());

        let a2 = ComponentMetadata::new("Card", "Lib.A").with_attribute("Title", "string");
        // Attributes don't participate in identity.
        assert_eq!(a.dedup_key(), a2.dedup_key());
    }
}
