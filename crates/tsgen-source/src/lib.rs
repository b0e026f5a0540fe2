//! Input identity and generated-text primitives for the template source
//! generator.
//!
//! Everything downstream keys off two identities defined here: the normalized
//! template path (and the hint name derived from it) and the content checksum
//! carried by [`SourceText`].

mod collections;
mod path;
mod text;

pub use collections::FxDashMap;
pub use path::hint_name_from_path;
pub use path::TemplateFile;
pub use path::TemplateKind;
pub use text::Checksum;
pub use text::SourceText;
