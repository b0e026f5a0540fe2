//! The boundary between the generator and its host.
//!
//! The generator never talks to a real compiler or template front end
//! directly. Everything it needs from the outside world crosses one of the
//! seams defined here:
//!
//! - [`TemplateCompiler`] — the opaque "compile template → document" call.
//! - [`Compilation`] / [`DerivedCompilation`] — the host compilation, its
//!   references, and metadata extraction against them.
//! - [`DiagnosticSink`] / [`OutputSink`] — the host's reporting channels.
//! - [`CancelToken`] — the host's invalidation signal.
//!
//! The engine pipeline ([`EngineBuilder`]) lives here too: it assembles a
//! [`GenerationEngine`] from an ordered list of named configuration stages,
//! so the discovery and final engines differ only in the stages applied.

mod cancel;
mod compilation;
mod diagnostics;
mod engine;
mod metadata;

pub use cancel::CancelToken;
pub use compilation::Compilation;
pub use compilation::DerivedCompilation;
pub use compilation::Reference;
pub use compilation::ReferenceId;
pub use compilation::SyntaxUnit;
pub use diagnostics::codes;
pub use diagnostics::Diagnostic;
pub use diagnostics::DiagnosticSink;
pub use diagnostics::Location;
pub use diagnostics::OutputSink;
pub use diagnostics::Severity;
pub use engine::CodeDocument;
pub use engine::CodeGenOptions;
pub use engine::EngineBuilder;
pub use engine::EngineConfig;
pub use engine::GenerationEngine;
pub use engine::TemplateCompiler;
pub use metadata::BoundAttribute;
pub use metadata::ComponentMetadata;
