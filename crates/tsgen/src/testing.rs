//! Fake host collaborators for exercising the pipeline without a real
//! compiler or template front end.
//!
//! The fake compiler is deterministic: its output is a pure function of the
//! file, the routing kind, and the engine configuration, which is exactly
//! the property the pipeline's own guarantees are tested against.

use std::collections::HashMap;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Mutex;
use std::time::Duration;

use camino::Utf8PathBuf;
use tsgen_compile::CodeDocument;
use tsgen_compile::Compilation;
use tsgen_compile::ComponentMetadata;
use tsgen_compile::DerivedCompilation;
use tsgen_compile::Diagnostic;
use tsgen_compile::DiagnosticSink;
use tsgen_compile::EngineConfig;
use tsgen_compile::OutputSink;
use tsgen_compile::Reference;
use tsgen_compile::SyntaxUnit;
use tsgen_compile::TemplateCompiler;
use tsgen_source::SourceText;
use tsgen_source::TemplateFile;
use tsgen_source::TemplateKind;

/// Marker line the fake declaration pass emits for each template; the fake
/// derived compilation extracts component names by scanning for it.
const DECLARE_PREFIX: &str = "// declare ";

type DelayFn = Box<dyn Fn(&TemplateFile) -> Duration + Send + Sync>;

/// Deterministic stand-in for the template front end.
#[derive(Default)]
pub struct FakeCompiler {
    delay: Option<DelayFn>,
    diagnostics: HashMap<Utf8PathBuf, Vec<Diagnostic>>,
}

impl FakeCompiler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep for a per-file duration before producing output, to skew
    /// completion order in ordering tests.
    #[must_use]
    pub fn with_delay(mut self, delay: impl Fn(&TemplateFile) -> Duration + Send + Sync + 'static) -> Self {
        self.delay = Some(Box::new(delay));
        self
    }

    /// Attach diagnostics to every compilation of the given path.
    #[must_use]
    pub fn with_diagnostic(mut self, path: impl Into<Utf8PathBuf>, diagnostic: Diagnostic) -> Self {
        self.diagnostics.entry(path.into()).or_default().push(diagnostic);
        self
    }
}

impl TemplateCompiler for FakeCompiler {
    fn compile(
        &self,
        file: &TemplateFile,
        kind: TemplateKind,
        config: &EngineConfig,
    ) -> CodeDocument {
        if let Some(delay) = &self.delay {
            std::thread::sleep(delay(file));
        }

        let stem = file.path().file_stem().unwrap_or("Template");
        let generated_code = if config.code_gen.suppress_primary_method_body {
            format!(
                "// <declaration-only>\n{DECLARE_PREFIX}{stem}\nnamespace {} {{ }}\n",
                config.root_namespace
            )
        } else {
            let components: Vec<&str> = config
                .components
                .iter()
                .map(ComponentMetadata::name)
                .collect();
            let checksum_line = if config.code_gen.suppress_metadata_checksum_attributes {
                String::new()
            } else {
                format!("#pragma checksum \"{}\"\n", file.path())
            };
            format!(
                "// <auto-generated/>\n{checksum_line}namespace {}\n{{\n    // {} ({kind:?}, {})\n    // components: [{}]\n    public static class {stem}_generated {{ }}\n}}\n",
                config.root_namespace,
                file.path(),
                config.language_version,
                components.join(", "),
            )
        };

        let diagnostics = self
            .diagnostics
            .get(file.path())
            .cloned()
            .unwrap_or_default();

        CodeDocument {
            generated_code,
            diagnostics,
        }
    }
}

/// Fake host compilation: a fixed assembly name, a fixed reference list, and
/// per-reference component metadata, with an extraction-call counter.
pub struct FakeCompilation {
    assembly_name: String,
    references: Vec<Reference>,
    components_by_reference: HashMap<String, Vec<ComponentMetadata>>,
    extraction_calls: AtomicUsize,
    concurrent_build: bool,
}

impl FakeCompilation {
    #[must_use]
    pub fn new(assembly_name: impl Into<String>) -> Self {
        Self {
            assembly_name: assembly_name.into(),
            references: Vec::new(),
            components_by_reference: HashMap::new(),
            extraction_calls: AtomicUsize::new(0),
            concurrent_build: true,
        }
    }

    #[must_use]
    pub fn with_reference(mut self, reference: Reference, components: Vec<ComponentMetadata>) -> Self {
        self.components_by_reference
            .insert(reference.display().to_owned(), components);
        self.references.push(reference);
        self
    }

    /// Simulate a host that has opted out of concurrent builds.
    #[must_use]
    pub fn serial_build(mut self) -> Self {
        self.concurrent_build = false;
        self
    }

    /// How many times reference extraction has run against this compilation.
    #[must_use]
    pub fn extraction_calls(&self) -> usize {
        self.extraction_calls.load(Ordering::SeqCst)
    }
}

impl Compilation for FakeCompilation {
    fn assembly_name(&self) -> &str {
        &self.assembly_name
    }

    fn references(&self) -> &[Reference] {
        &self.references
    }

    fn concurrent_build_enabled(&self) -> bool {
        self.concurrent_build
    }

    fn extend(&self, units: Vec<SyntaxUnit>) -> Box<dyn DerivedCompilation + '_> {
        Box::new(FakeDerivedCompilation {
            assembly_name: self.assembly_name.clone(),
            units,
        })
    }

    fn extract_reference_components(&self, reference: &Reference) -> Vec<ComponentMetadata> {
        self.extraction_calls.fetch_add(1, Ordering::SeqCst);
        self.components_by_reference
            .get(reference.display())
            .cloned()
            .unwrap_or_default()
    }
}

struct FakeDerivedCompilation {
    assembly_name: String,
    units: Vec<SyntaxUnit>,
}

impl DerivedCompilation for FakeDerivedCompilation {
    fn extract_own_components(&self) -> Vec<ComponentMetadata> {
        self.units
            .iter()
            .flat_map(|unit| {
                unit.text()
                    .as_str()
                    .lines()
                    .filter_map(|line| line.strip_prefix(DECLARE_PREFIX))
                    .map(|name| ComponentMetadata::new(name, self.assembly_name.as_str()))
                    .collect::<Vec<_>>()
            })
            .collect()
    }
}

/// Diagnostic sink that records everything reported.
#[derive(Default)]
pub struct CollectingSink {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl CollectingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.lock().expect("sink poisoned").clone()
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&self, diagnostic: Diagnostic) {
        self.diagnostics.lock().expect("sink poisoned").push(diagnostic);
    }
}

/// Output sink that records every (hint, text) pair in arrival order.
#[derive(Default)]
pub struct CollectingOutputs {
    outputs: Mutex<Vec<(String, SourceText)>>,
}

impl CollectingOutputs {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn outputs(&self) -> Vec<(String, SourceText)> {
        self.outputs.lock().expect("sink poisoned").clone()
    }
}

impl OutputSink for CollectingOutputs {
    fn add_source(&self, hint: &str, text: SourceText) {
        self.outputs
            .lock()
            .expect("sink poisoned")
            .push((hint.to_owned(), text));
    }
}

/// Diagnostic sink that drops everything.
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn report(&self, _diagnostic: Diagnostic) {}
}
