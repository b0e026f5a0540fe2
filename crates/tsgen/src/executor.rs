//! The parallel generation executor.
//!
//! Processes an ordered batch of template files with a bounded worker pool.
//! The output buffer is allocated at full size up front and each worker
//! writes only its own index, so completion order never influences emission
//! order and the buffer itself needs no synchronization.

use rayon::prelude::*;
use tsgen_cache::OutputCache;
use tsgen_compile::CancelToken;
use tsgen_compile::DiagnosticSink;
use tsgen_compile::GenerationEngine;
use tsgen_source::SourceText;
use tsgen_source::TemplateFile;
use tsgen_source::TemplateKind;

use crate::GenerateError;

/// One generated output, in input order.
#[derive(Debug, Clone)]
pub struct GeneratedOutput {
    pub hint: String,
    pub text: SourceText,
}

/// Build the worker pool for one invocation.
///
/// The pool is fully serial whenever a debugger is attached or the host has
/// disabled concurrent builds; otherwise it uses the configured degree of
/// parallelism (or rayon's default when unconfigured).
pub(crate) fn build_worker_pool(
    max_parallelism: Option<usize>,
    concurrent_build_enabled: bool,
) -> Result<rayon::ThreadPool, GenerateError> {
    let num_threads = if crate::debugger::is_attached() || !concurrent_build_enabled {
        1
    } else {
        max_parallelism.unwrap_or(0)
    };
    tracing::debug!(num_threads, "building generation worker pool");
    Ok(rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build()?)
}

/// Run one generation batch: compile every file, forward its diagnostics,
/// and return the outputs in strict input order after routing each through
/// the output checksum cache.
///
/// Diagnostics are non-fatal to the batch; a malformed template never blocks
/// its siblings. Cancellation aborts the batch with no partial result.
pub(crate) fn generate_batch(
    pool: &rayon::ThreadPool,
    engine: &GenerationEngine,
    files: &[TemplateFile],
    kind: TemplateKind,
    diagnostics: &dyn DiagnosticSink,
    cancel: &CancelToken,
    output_cache: &OutputCache,
) -> Result<Vec<GeneratedOutput>, GenerateError> {
    if files.is_empty() {
        return Ok(Vec::new());
    }

    let mut slots: Vec<Option<GeneratedOutput>> = Vec::new();
    slots.resize_with(files.len(), || None);

    pool.install(|| {
        slots
            .par_iter_mut()
            .zip(files.par_iter())
            .try_for_each(|(slot, file)| {
                if cancel.is_cancelled() {
                    return Err(GenerateError::Cancelled);
                }

                let document = engine.process(file, kind);
                for diagnostic in document.diagnostics {
                    diagnostics.report(diagnostic);
                }

                *slot = Some(GeneratedOutput {
                    hint: file.hint_name(kind),
                    text: SourceText::new(document.generated_code),
                });
                Ok(())
            })
    })?;

    let mut outputs = Vec::with_capacity(files.len());
    for slot in slots {
        let generated = slot.expect("completed batch leaves no empty slot");
        let text = output_cache.resolve(&generated.hint, generated.text);
        outputs.push(GeneratedOutput {
            hint: generated.hint,
            text,
        });
    }
    Ok(outputs)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::testing::FakeCompiler;
    use crate::testing::NullSink;
    use tsgen_compile::EngineBuilder;

    fn files(n: usize) -> Vec<TemplateFile> {
        (0..n)
            .map(|i| TemplateFile::new(format!("views/file{i}.tmpl")))
            .collect()
    }

    fn engine(compiler: FakeCompiler) -> GenerationEngine {
        EngineBuilder::new(Arc::new(compiler))
            .root_namespace("App")
            .build()
    }

    #[test]
    fn empty_batch_short_circuits() {
        let pool = build_worker_pool(Some(4), true).unwrap();
        let outputs = generate_batch(
            &pool,
            &engine(FakeCompiler::new()),
            &[],
            TemplateKind::View,
            &NullSink,
            &CancelToken::new(),
            &OutputCache::new(),
        )
        .unwrap();
        assert!(outputs.is_empty());
    }

    #[test]
    fn outputs_follow_input_order_despite_skewed_completion() {
        // Later indices finish first; emission order must not care.
        let compiler = FakeCompiler::new().with_delay(|file| {
            let index: u64 = file
                .path()
                .file_stem()
                .and_then(|stem| stem.strip_prefix("file"))
                .and_then(|digits| digits.parse().ok())
                .unwrap_or(0);
            Duration::from_millis((16 - index) * 3)
        });

        let pool = build_worker_pool(Some(8), true).unwrap();
        let files = files(16);
        let outputs = generate_batch(
            &pool,
            &engine(compiler),
            &files,
            TemplateKind::View,
            &NullSink,
            &CancelToken::new(),
            &OutputCache::new(),
        )
        .unwrap();

        let hints: Vec<&str> = outputs.iter().map(|o| o.hint.as_str()).collect();
        let expected: Vec<String> = files
            .iter()
            .map(|f| f.hint_name(TemplateKind::View))
            .collect();
        assert_eq!(hints, expected);
    }

    #[test]
    fn cancelled_batch_yields_no_outputs() {
        let cancel = CancelToken::new();
        cancel.cancel();

        let pool = build_worker_pool(Some(4), true).unwrap();
        let result = generate_batch(
            &pool,
            &engine(FakeCompiler::new()),
            &files(4),
            TemplateKind::View,
            &NullSink,
            &cancel,
            &OutputCache::new(),
        );
        assert!(matches!(result, Err(GenerateError::Cancelled)));
    }
}
