use std::sync::Arc;

use tsgen_conf::LanguageVersion;
use tsgen_source::TemplateFile;
use tsgen_source::TemplateKind;

use crate::diagnostics::Diagnostic;
use crate::metadata::ComponentMetadata;

/// Code-generation toggles threaded through to the template compiler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CodeGenOptions {
    /// Discovery pass: skip the primary emitted method body.
    pub suppress_primary_method_body: bool,
    /// Discovery pass: skip checksum metadata entirely.
    pub suppress_checksum: bool,
    /// Final pass: omit source-checksum attributes from emitted metadata.
    pub suppress_metadata_checksum_attributes: bool,
}

/// Result of compiling one template file.
#[derive(Debug, Clone)]
pub struct CodeDocument {
    pub generated_code: String,
    pub diagnostics: Vec<Diagnostic>,
}

/// Fully resolved engine configuration.
///
/// Built by [`EngineBuilder`] from an ordered stage list and immutable from
/// then on. `components` is the static metadata provider: empty for the
/// discovery engine, the full discovered list for the final engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub root_namespace: String,
    pub language_version: LanguageVersion,
    pub code_gen: CodeGenOptions,
    pub components: Arc<[ComponentMetadata]>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            root_namespace: String::new(),
            language_version: LanguageVersion::LATEST,
            code_gen: CodeGenOptions::default(),
            components: Arc::from([]),
        }
    }
}

/// The opaque template front end: compile one template file into a
/// host-language document under a fixed engine configuration.
pub trait TemplateCompiler: Send + Sync {
    fn compile(&self, file: &TemplateFile, kind: TemplateKind, config: &EngineConfig)
        -> CodeDocument;
}

/// A template compiler bound to one resolved configuration.
pub struct GenerationEngine {
    compiler: Arc<dyn TemplateCompiler>,
    config: EngineConfig,
}

impl GenerationEngine {
    #[must_use]
    pub fn process(&self, file: &TemplateFile, kind: TemplateKind) -> CodeDocument {
        self.compiler.compile(file, kind, &self.config)
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

type Stage = Box<dyn FnOnce(&mut EngineConfig)>;

/// Assembles a [`GenerationEngine`] from an ordered list of named
/// configuration stages.
///
/// Stages are applied strictly in insertion order; there is no runtime
/// feature discovery. The named helpers cover the stages every engine needs,
/// `stage` admits host-specific ones.
pub struct EngineBuilder {
    compiler: Arc<dyn TemplateCompiler>,
    stages: Vec<(&'static str, Stage)>,
}

impl EngineBuilder {
    #[must_use]
    pub fn new(compiler: Arc<dyn TemplateCompiler>) -> Self {
        Self {
            compiler,
            stages: Vec::new(),
        }
    }

    #[must_use]
    pub fn stage(
        mut self,
        name: &'static str,
        apply: impl FnOnce(&mut EngineConfig) + 'static,
    ) -> Self {
        self.stages.push((name, Box::new(apply)));
        self
    }

    #[must_use]
    pub fn root_namespace(self, namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        self.stage("root-namespace", move |config| {
            config.root_namespace = namespace;
        })
    }

    #[must_use]
    pub fn language_version(self, version: LanguageVersion) -> Self {
        self.stage("language-version", move |config| {
            config.language_version = version;
        })
    }

    #[must_use]
    pub fn code_gen_options(self, apply: impl FnOnce(&mut CodeGenOptions) + 'static) -> Self {
        self.stage("code-gen-options", move |config| {
            apply(&mut config.code_gen);
        })
    }

    /// Bake discovered metadata in as a fixed, read-only provider.
    #[must_use]
    pub fn components(self, components: Arc<[ComponentMetadata]>) -> Self {
        self.stage("component-provider", move |config| {
            config.components = components;
        })
    }

    #[must_use]
    pub fn build(self) -> GenerationEngine {
        let mut config = EngineConfig::default();
        for (name, apply) in self.stages {
            tracing::debug!(stage = name, "applying engine stage");
            apply(&mut config);
        }
        GenerationEngine {
            compiler: self.compiler,
            config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullCompiler;

    impl TemplateCompiler for NullCompiler {
        fn compile(
            &self,
            _file: &TemplateFile,
            _kind: TemplateKind,
            _config: &EngineConfig,
        ) -> CodeDocument {
            CodeDocument {
                generated_code: String::new(),
                diagnostics: Vec::new(),
            }
        }
    }

    #[test]
    fn stages_apply_in_insertion_order() {
        let engine = EngineBuilder::new(Arc::new(NullCompiler))
            .root_namespace("First")
            .root_namespace("Second")
            .build();
        assert_eq!(engine.config().root_namespace, "Second");
    }

    #[test]
    fn named_stages_cover_the_standard_pipeline() {
        let components: Arc<[ComponentMetadata]> =
            Arc::from([ComponentMetadata::new("Card", "App")]);
        let engine = EngineBuilder::new(Arc::new(NullCompiler))
            .root_namespace("Contoso.Web")
            .code_gen_options(|options| {
                options.suppress_primary_method_body = true;
                options.suppress_checksum = true;
            })
            .components(components)
            .language_version(LanguageVersion::new(11, 0))
            .build();

        let config = engine.config();
        assert_eq!(config.root_namespace, "Contoso.Web");
        assert!(config.code_gen.suppress_primary_method_body);
        assert!(config.code_gen.suppress_checksum);
        assert_eq!(config.components.len(), 1);
        assert_eq!(config.language_version, LanguageVersion::new(11, 0));
    }
}
