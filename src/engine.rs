//! The control-surface facing entry points.
//!
//! An [`Engine`] is fixed at construction: the source list, the output
//! folder and the backend never change afterwards. Callers hand it a
//! [`ParameterSet`] snapshot per call, which is the only thing that varies
//! between runs.
//!
//! ```text
//! Engine::run_batch(params)      → clear output → build chain → dispatch → BatchReport
//! Engine::render_preview(params) → build full chain → first source → Option<image>
//! ```
//!
//! Because `ParameterSet` is `Copy`, a batch run and the preview that
//! follows it read the same snapshot when the caller passes the same value
//! to both.

use crate::imaging::{ImageBackend, ParameterSet, RustBackend};
use crate::pipeline::{BuildMode, build_chain};
use crate::preview::{self, PreviewError};
use crate::process::{self, BatchReport, ProcessEvent};
use image::DynamicImage;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread::JoinHandle;

pub struct Engine<B = RustBackend> {
    backend: Arc<B>,
    sources: Arc<Vec<PathBuf>>,
    output_dir: PathBuf,
}

// Manual impl: cloning shares the backend, so `B: Clone` is not required.
impl<B> Clone for Engine<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            sources: Arc::clone(&self.sources),
            output_dir: self.output_dir.clone(),
        }
    }
}

impl Engine<RustBackend> {
    /// Engine using the production backend with default JPEG quality.
    pub fn new(sources: Vec<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self::with_backend(RustBackend::new(), sources, output_dir)
    }
}

impl<B: ImageBackend> Engine<B> {
    pub fn with_backend(backend: B, sources: Vec<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            backend: Arc::new(backend),
            sources: Arc::new(sources),
            output_dir: output_dir.into(),
        }
    }

    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Clear the output folder, then process every source with `params`.
    ///
    /// Blocks until the last job has finished.
    pub fn run_batch(&self, params: ParameterSet) -> BatchReport {
        self.run_batch_with_events(params, None)
    }

    /// [`run_batch`](Self::run_batch) with progress events sent to `events`.
    pub fn run_batch_with_events(
        &self,
        params: ParameterSet,
        events: Option<Sender<ProcessEvent>>,
    ) -> BatchReport {
        let clear = process::clear_output_folder(&self.output_dir);
        if let Some(tx) = &events {
            let _ = tx.send(ProcessEvent::OutputCleared {
                removed: clear.removed,
                failed: clear.errors.len(),
            });
        }

        let chain = build_chain(&params, BuildMode::Batch);
        let mut report = process::run_batch(
            self.backend.as_ref(),
            &self.sources,
            &self.output_dir,
            &chain,
            events,
        );
        report.clear = clear;
        report
    }

    /// Render the full-chain preview of the first source.
    pub fn render_preview(
        &self,
        params: ParameterSet,
    ) -> Result<Option<DynamicImage>, PreviewError> {
        preview::render_preview(self.backend.as_ref(), &self.sources, &params)
    }
}

impl<B: ImageBackend + Send + 'static> Engine<B> {
    /// Run a batch on a background thread.
    ///
    /// Returns immediately; poll `events` or join the handle for the report.
    pub fn spawn_batch(
        &self,
        params: ParameterSet,
        events: Option<Sender<ProcessEvent>>,
    ) -> JoinHandle<BatchReport> {
        let engine = self.clone();
        std::thread::spawn(move || engine.run_batch_with_events(params, events))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::Transform;
    use crate::imaging::backend::tests::MockBackend;
    use crate::test_helpers::{create_test_jpeg, list_files};
    use std::fs;
    use tempfile::TempDir;

    fn mock_engine(tmp: &TempDir, names: &[&str]) -> Engine<MockBackend> {
        let sources = names.iter().map(|n| tmp.path().join("in").join(n)).collect();
        Engine::with_backend(MockBackend::new(), sources, tmp.path().join("out"))
    }

    #[test]
    fn identity_preview_applies_five_and_batch_applies_none() {
        let tmp = TempDir::new().unwrap();
        let engine = mock_engine(&tmp, &["a.jpg", "b.jpg"]);

        let report = engine.run_batch(ParameterSet::IDENTITY);
        assert_eq!(report.succeeded(), 2);
        assert!(engine.backend().applied().is_empty());

        let preview = engine.render_preview(ParameterSet::IDENTITY).unwrap();
        assert!(preview.is_some());
        assert_eq!(engine.backend().applied().len(), 5);
    }

    #[test]
    fn batch_and_preview_share_one_snapshot() {
        let tmp = TempDir::new().unwrap();
        let engine = mock_engine(&tmp, &["a.jpg"]);
        let params = ParameterSet {
            tone: 0.4,
            blur: 1.0,
            ..ParameterSet::default()
        };

        engine.run_batch(params);
        let batch_steps = engine.backend().applied();
        engine.render_preview(params).unwrap();
        let preview_steps = engine.backend().applied()[batch_steps.len()..].to_vec();

        assert_eq!(
            batch_steps,
            vec![
                Transform::ToneMap { intensity: 0.4 },
                Transform::Blur { radius: 1.0 }
            ]
        );
        // Preview carries the same non-identity values plus identity steps
        for step in &batch_steps {
            assert!(preview_steps.contains(step));
        }
        assert_eq!(preview_steps.len(), 5);
    }

    #[test]
    fn run_batch_clears_stale_output_first() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("out");
        fs::create_dir_all(&out).unwrap();
        fs::write(out.join("stale.jpg"), "old").unwrap();

        let engine = mock_engine(&tmp, &["a.jpg"]);
        let report = engine.run_batch(ParameterSet::IDENTITY);

        assert_eq!(report.clear.removed, 1);
        // The mock encoder writes nothing, so the folder ends up empty
        assert!(list_files(&out).is_empty());
    }

    #[test]
    fn empty_engine_runs_and_previews_nothing() {
        let tmp = TempDir::new().unwrap();
        let engine = mock_engine(&tmp, &[]);

        assert!(engine.run_batch(ParameterSet::IDENTITY).jobs.is_empty());
        assert!(engine.render_preview(ParameterSet::IDENTITY).unwrap().is_none());
        assert!(tmp.path().join("out").is_dir());
    }

    #[test]
    fn events_start_with_output_cleared() {
        let tmp = TempDir::new().unwrap();
        let engine = mock_engine(&tmp, &["a.jpg"]);
        let (tx, rx) = std::sync::mpsc::channel();

        engine.run_batch_with_events(ParameterSet::IDENTITY, Some(tx));

        let events: Vec<ProcessEvent> = rx.iter().collect();
        assert_eq!(
            events.first(),
            Some(&ProcessEvent::OutputCleared {
                removed: 0,
                failed: 0
            })
        );
        assert!(matches!(
            events.last(),
            Some(ProcessEvent::BatchFinished { succeeded: 1, failed: 0 })
        ));
    }

    #[test]
    fn spawn_batch_returns_report_on_join() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("in");
        fs::create_dir_all(&input).unwrap();
        create_test_jpeg(&input.join("a.jpg"), 40, 20);
        create_test_jpeg(&input.join("b.jpg"), 20, 40);

        let engine = Engine::new(
            vec![input.join("a.jpg"), input.join("b.jpg")],
            tmp.path().join("out"),
        );
        let (tx, rx) = std::sync::mpsc::channel();
        let handle = engine.spawn_batch(
            ParameterSet {
                resize: 50,
                ..ParameterSet::default()
            },
            Some(tx),
        );

        let finished = rx
            .iter()
            .any(|e| matches!(e, ProcessEvent::BatchFinished { .. }));
        assert!(finished);

        let report = handle.join().unwrap();
        assert_eq!(report.succeeded(), 2);
        assert_eq!(list_files(engine.output_dir()), vec!["a.jpg", "b.jpg"]);
    }
}
