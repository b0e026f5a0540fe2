//! The generation orchestrator: the entry point invoked once per host
//! compilation pass.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tsgen_cache::OutputCache;
use tsgen_cache::ReferenceMetadataCache;
use tsgen_compile::codes;
use tsgen_compile::CancelToken;
use tsgen_compile::Compilation;
use tsgen_compile::Diagnostic;
use tsgen_compile::DiagnosticSink;
use tsgen_compile::EngineBuilder;
use tsgen_compile::OutputSink;
use tsgen_compile::TemplateCompiler;
use tsgen_conf::Settings;
use tsgen_source::SourceText;
use tsgen_source::TemplateFile;
use tsgen_source::TemplateKind;

use crate::debugger;
use crate::discovery::MetadataDiscovery;
use crate::executor;
use crate::executor::GeneratedOutput;

/// Fixed assembly-level marker identifying the generator's runtime
/// integration point, emitted once per non-empty view batch.
const UNIFIED_ASSEMBLY_MARKER: &str = "[assembly: global::TemplateHosting.ApplicationParts.ProvideUnifiedAssemblyFactory(\"TemplateHosting.ApplicationParts.UnifiedAssemblyFactory, TemplateHosting\")]\n";

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// The host canceled the invocation; no output was produced.
    #[error("generation aborted")]
    Cancelled,
    #[error("failed to build generation worker pool")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

/// Everything one invocation needs from the host.
pub struct GenerationRequest<'a> {
    pub settings: Settings,
    /// Page/view templates, in host order.
    pub view_files: Vec<TemplateFile>,
    /// Component templates, in host order.
    pub component_files: Vec<TemplateFile>,
    pub compiler: Arc<dyn TemplateCompiler>,
    pub compilation: &'a dyn Compilation,
    pub diagnostics: &'a dyn DiagnosticSink,
    pub outputs: &'a dyn OutputSink,
    pub cancel: CancelToken,
}

/// The generator. Created once at process start and shared across every
/// invocation; owns the two process-lifetime caches by shared ownership so
/// their concurrency discipline is an explicit contract rather than ambient
/// global state.
#[derive(Debug, Default)]
pub struct Generator {
    reference_cache: Arc<ReferenceMetadataCache>,
    output_cache: Arc<OutputCache>,
}

impl Generator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn reference_cache(&self) -> &Arc<ReferenceMetadataCache> {
        &self.reference_cache
    }

    #[must_use]
    pub fn output_cache(&self) -> &Arc<OutputCache> {
        &self.output_cache
    }

    /// Run one generation pass.
    ///
    /// Pass-fatal conditions (unusable configuration, hint-name collisions)
    /// report a diagnostic at no location and return `Ok` with no outputs,
    /// matching how the host expects a generator to fail. Cancellation
    /// surfaces as [`GenerateError::Cancelled`] and forwards nothing.
    pub fn run(&self, request: &GenerationRequest<'_>) -> Result<(), GenerateError> {
        if request.settings.root_namespace.is_empty() {
            request.diagnostics.report(Diagnostic::error(
                codes::INVALID_CONTEXT,
                "No usable invocation context: root namespace is empty",
            ));
            return Ok(());
        }

        if request.settings.wait_for_debugger {
            debugger::wait_for_attach();
        }

        if request.view_files.is_empty() && request.component_files.is_empty() {
            return Ok(());
        }

        if report_hint_collisions(request) {
            return Ok(());
        }

        let pool = executor::build_worker_pool(
            request.settings.max_parallelism,
            request.compilation.concurrent_build_enabled(),
        )?;

        tracing::debug!(
            views = request.view_files.len(),
            components = request.component_files.len(),
            "starting generation pass"
        );

        let components = self.discover_components(request, &pool)?;

        let final_engine = EngineBuilder::new(Arc::clone(&request.compiler))
            .root_namespace(request.settings.root_namespace.clone())
            .code_gen_options({
                let suppress = request.settings.suppress_checksum_attributes;
                move |options| options.suppress_metadata_checksum_attributes = suppress
            })
            .components(components.into())
            .language_version(request.settings.language_version)
            .build();

        let component_outputs = executor::generate_batch(
            &pool,
            &final_engine,
            &request.component_files,
            TemplateKind::Component,
            request.diagnostics,
            &request.cancel,
            &self.output_cache,
        )?;

        let mut view_outputs = Vec::new();
        if !request.view_files.is_empty() {
            let marker_hint = format!(
                "{}.UnifiedAssembly.Info",
                request.compilation.assembly_name()
            );
            let marker = self
                .output_cache
                .resolve(&marker_hint, SourceText::new(UNIFIED_ASSEMBLY_MARKER));
            view_outputs.push(GeneratedOutput {
                hint: marker_hint,
                text: marker,
            });

            view_outputs.extend(executor::generate_batch(
                &pool,
                &final_engine,
                &request.view_files,
                TemplateKind::View,
                request.diagnostics,
                &request.cancel,
                &self.output_cache,
            )?);
        }

        // Forward only once the whole pass has succeeded, so a cancellation
        // mid-flight never leaks a partial batch to the host.
        for output in component_outputs.iter().chain(view_outputs.iter()) {
            request.outputs.add_source(&output.hint, output.text.clone());
        }

        tracing::debug!(
            outputs = component_outputs.len() + view_outputs.len(),
            "generation pass complete"
        );
        Ok(())
    }

    fn discover_components(
        &self,
        request: &GenerationRequest<'_>,
        pool: &rayon::ThreadPool,
    ) -> Result<Vec<tsgen_compile::ComponentMetadata>, GenerateError> {
        let discovery_engine = EngineBuilder::new(Arc::clone(&request.compiler))
            .root_namespace(request.settings.root_namespace.clone())
            .code_gen_options(|options| {
                options.suppress_primary_method_body = true;
                options.suppress_checksum = true;
            })
            .language_version(request.settings.language_version)
            .build();

        MetadataDiscovery::new(
            discovery_engine,
            request.compilation,
            &self.reference_cache,
            request.diagnostics,
            &request.cancel,
        )
        .discover(pool, &request.component_files)
    }
}

/// Detect input files whose hint names collide and fail the pass fast.
/// Hint names double as the host's incremental identity for generated
/// files, so silently overwriting would corrupt that contract.
fn report_hint_collisions(request: &GenerationRequest<'_>) -> bool {
    let mut by_hint: FxHashMap<String, &TemplateFile> = FxHashMap::default();
    let mut collided = false;

    let all_files = request
        .view_files
        .iter()
        .map(|file| (file, TemplateKind::View))
        .chain(
            request
                .component_files
                .iter()
                .map(|file| (file, TemplateKind::Component)),
        );

    for (file, kind) in all_files {
        let hint = file.hint_name(kind);
        if let Some(existing) = by_hint.get(hint.as_str()) {
            collided = true;
            request.diagnostics.report(Diagnostic::error(
                codes::HINT_NAME_COLLISION,
                format!(
                    "Template files '{}' and '{}' both produce hint name '{hint}'",
                    existing.path(),
                    file.path()
                ),
            ));
        } else {
            by_hint.insert(hint, file);
        }
    }

    collided
}
