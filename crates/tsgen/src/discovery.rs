//! The metadata discovery engine.
//!
//! First phase of the two-phase pipeline: run the cheaper declaration-only
//! generation over every component template, merge the results into a
//! derived view of the host compilation, and extract component metadata from
//! the derived assembly plus every referenced library.

use rayon::prelude::*;
use rustc_hash::FxHashSet;
use tsgen_cache::ReferenceMetadataCache;
use tsgen_compile::codes;
use tsgen_compile::CancelToken;
use tsgen_compile::Compilation;
use tsgen_compile::ComponentMetadata;
use tsgen_compile::Diagnostic;
use tsgen_compile::DiagnosticSink;
use tsgen_compile::GenerationEngine;
use tsgen_compile::SyntaxUnit;
use tsgen_source::SourceText;
use tsgen_source::TemplateFile;
use tsgen_source::TemplateKind;

use crate::GenerateError;

/// Runs the discovery pass for one invocation.
pub(crate) struct MetadataDiscovery<'a> {
    /// Declaration-only configured engine (primary method body and checksum
    /// suppressed).
    engine: GenerationEngine,
    compilation: &'a dyn Compilation,
    cache: &'a ReferenceMetadataCache,
    diagnostics: &'a dyn DiagnosticSink,
    cancel: &'a CancelToken,
}

impl<'a> MetadataDiscovery<'a> {
    pub(crate) fn new(
        engine: GenerationEngine,
        compilation: &'a dyn Compilation,
        cache: &'a ReferenceMetadataCache,
        diagnostics: &'a dyn DiagnosticSink,
        cancel: &'a CancelToken,
    ) -> Self {
        Self {
            engine,
            compilation,
            cache,
            diagnostics,
            cancel,
        }
    }

    /// Produce the complete, de-duplicated component metadata list visible
    /// to this compilation: templates first, then references in host order.
    pub(crate) fn discover(
        &self,
        pool: &rayon::ThreadPool,
        component_files: &[TemplateFile],
    ) -> Result<Vec<ComponentMetadata>, GenerateError> {
        let units = self.declaration_pass(pool, component_files)?;

        // The derived view exists only for extraction; the host compilation
        // itself stays untouched.
        let derived = self.compilation.extend(units);
        let mut components = derived.extract_own_components();
        tracing::debug!(
            count = components.len(),
            "extracted component metadata from project templates"
        );

        for reference in self.compilation.references() {
            if self.cancel.is_cancelled() {
                return Err(GenerateError::Cancelled);
            }
            components.extend(self.reference_components(reference).iter().cloned());
        }

        Ok(dedup_in_order(components))
    }

    /// Steps 1–2: declaration-only generation over every component template,
    /// each file's syntax unit landing in its index slot regardless of
    /// completion order.
    fn declaration_pass(
        &self,
        pool: &rayon::ThreadPool,
        component_files: &[TemplateFile],
    ) -> Result<Vec<SyntaxUnit>, GenerateError> {
        if component_files.is_empty() {
            return Ok(Vec::new());
        }

        let language_version = self.engine.config().language_version;
        let mut slots: Vec<Option<SyntaxUnit>> = Vec::new();
        slots.resize_with(component_files.len(), || None);

        pool.install(|| {
            slots
                .par_iter_mut()
                .zip(component_files.par_iter())
                .try_for_each(|(slot, file)| {
                    if self.cancel.is_cancelled() {
                        return Err(GenerateError::Cancelled);
                    }
                    // Diagnostics surface in the final pass; the discovery
                    // pass only wants the declarations.
                    let document = self.engine.process(file, TemplateKind::Component);
                    *slot = Some(SyntaxUnit::new(
                        file.hint_name(TemplateKind::Component),
                        SourceText::new(document.generated_code),
                        language_version,
                    ));
                    Ok(())
                })
        })?;

        Ok(slots
            .into_iter()
            .map(|slot| slot.expect("completed declaration pass leaves no empty slot"))
            .collect())
    }

    /// Step 5 for a single reference: cached lookup when it has a stable
    /// identity, unconditional recomputation plus one diagnostic when not.
    fn reference_components(
        &self,
        reference: &tsgen_compile::Reference,
    ) -> std::sync::Arc<[ComponentMetadata]> {
        match reference.identity() {
            Some(id) => self.cache.get_or_insert_with(*id, || {
                self.compilation.extract_reference_components(reference)
            }),
            None => {
                tracing::warn!(
                    reference = reference.display(),
                    "reference has no stable identity, recomputing metadata"
                );
                self.diagnostics.report(Diagnostic::warning(
                    codes::UNSTABLE_REFERENCE_IDENTITY,
                    format!(
                        "Component metadata for reference '{}' cannot be cached and will be \
                         recomputed on every invocation",
                        reference.display()
                    ),
                ));
                self.compilation.extract_reference_components(reference).into()
            }
        }
    }
}

/// De-duplicate while preserving first-seen order.
fn dedup_in_order(components: Vec<ComponentMetadata>) -> Vec<ComponentMetadata> {
    let mut seen: FxHashSet<(String, String)> = FxHashSet::default();
    components
        .into_iter()
        .filter(|component| {
            let (assembly, name) = component.dedup_key();
            seen.insert((assembly.to_owned(), name.to_owned()))
        })
        .collect()
}
