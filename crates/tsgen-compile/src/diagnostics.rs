use camino::Utf8PathBuf;
use serde::Serialize;
use tsgen_source::SourceText;

/// Stable diagnostic codes owned by the generator itself.
///
/// Template-compiler diagnostics arrive with their own codes and pass
/// through untouched.
pub mod codes {
    /// No usable invocation context could be derived from host input.
    pub const INVALID_CONTEXT: &str = "G100";
    /// A reference lacks a stable identity and is recomputed every pass.
    pub const UNSTABLE_REFERENCE_IDENTITY: &str = "G101";
    /// Two input files normalize to the same hint name.
    pub const HINT_NAME_COLLISION: &str = "G102";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// Source location a diagnostic is attached to.
///
/// Whole-batch issues carry no location at all (`Diagnostic::location` is
/// `None`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub path: Utf8PathBuf,
    pub offset: u32,
    pub length: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: String,
    pub message: String,
    pub location: Option<Location>,
}

impl Diagnostic {
    #[must_use]
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code: code.into(),
            message: message.into(),
            location: None,
        }
    }

    #[must_use]
    pub fn warning(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code: code.into(),
            message: message.into(),
            location: None,
        }
    }

    #[must_use]
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }
}

/// Host channel for diagnostics. Reporting order is unspecified; every
/// diagnostic is uniquely tied to its location.
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, diagnostic: Diagnostic);
}

/// Host channel for generated sources. Outputs arrive in stable input order
/// per batch, keyed by hint name.
pub trait OutputSink: Send + Sync {
    fn add_source(&self, hint: &str, text: SourceText);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_set_severity_and_leave_location_empty() {
        let d = Diagnostic::error(codes::INVALID_CONTEXT, "no context");
        assert_eq!(d.severity, Severity::Error);
        assert_eq!(d.code, "G100");
        assert!(d.location.is_none());

        let w = Diagnostic::warning(codes::UNSTABLE_REFERENCE_IDENTITY, "recomputing");
        assert_eq!(w.severity, Severity::Warning);
    }

    #[test]
    fn with_location_attaches() {
        let d = Diagnostic::error("T100", "bad tag").with_location(Location {
            path: Utf8PathBuf::from("Views/Home/Index.cshtml"),
            offset: 12,
            length: 4,
        });
        assert_eq!(d.location.unwrap().offset, 12);
    }
}
