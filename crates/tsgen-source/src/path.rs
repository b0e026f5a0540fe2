use camino::Utf8Path;
use camino::Utf8PathBuf;
use serde::Deserialize;
use serde::Serialize;

/// Which generation pipeline a template file is routed through.
///
/// `View` templates are the legacy page kind: they are generated without
/// component metadata and never feed the discovery pass. `Component`
/// templates participate in metadata discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TemplateKind {
    View,
    Component,
}

/// One input template file, identified by its normalized path.
///
/// Immutable once collected; owned by the orchestrator for the duration of a
/// single invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateFile {
    path: Utf8PathBuf,
    generated_output_path: Option<Utf8PathBuf>,
}

impl TemplateFile {
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            path: path.into(),
            generated_output_path: None,
        }
    }

    /// Attach an output-path override used for hint derivation.
    ///
    /// Only honored for view templates; component hints always come from the
    /// normalized path.
    #[must_use]
    pub fn with_generated_output_path(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.generated_output_path = Some(path.into());
        self
    }

    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    #[must_use]
    pub fn generated_output_path(&self) -> Option<&Utf8Path> {
        self.generated_output_path.as_deref()
    }

    /// The hint name this file's output is registered under.
    #[must_use]
    pub fn hint_name(&self, kind: TemplateKind) -> String {
        let path = match kind {
            TemplateKind::View => self.generated_output_path().unwrap_or(self.path()),
            TemplateKind::Component => self.path(),
        };
        hint_name_from_path(path)
    }
}

/// Derive the stable hint name for a template path.
///
/// Replaces every `:`, `\` and `/` with `_`; all other characters pass
/// through unchanged. Hint names are part of the host's incremental-identity
/// contract for generated files, so the mapping must stay bit-exact.
#[must_use]
pub fn hint_name_from_path(path: &Utf8Path) -> String {
    path.as_str()
        .chars()
        .map(|c| match c {
            ':' | '\\' | '/' => '_',
            other => other,
        })
        .collect()
}
