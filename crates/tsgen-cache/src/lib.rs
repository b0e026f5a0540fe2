//! Process-lifetime caches shared across generator invocations.
//!
//! Both caches are explicitly constructed objects passed into every
//! invocation by shared ownership — there is no ambient global state. They
//! are safe for concurrent mutation from invocations running on different
//! threads; everything else in a pass is invocation-local.

mod output;
mod reference;

pub use output::OutputCache;
pub use reference::ReferenceMetadataCache;
