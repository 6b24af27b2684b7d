//! Batch execution: clear the output folder, then run one job per image.
//!
//! A **job** decodes one source image, folds the [`FilterChain`] over it and
//! encodes the result to `<output>/<source file name>`. A **batch** runs one
//! job per source path against one shared chain.
//!
//! ## Failure isolation
//!
//! Every job catches its own failure (decode, transform or encode) and
//! records it in its [`JobResult`]. Nothing propagates to sibling jobs or
//! aborts the batch, and nothing is retried. The batch always completes and
//! reports every job.
//!
//! ## Parallel Processing
//!
//! Jobs run in parallel on the [rayon](https://docs.rs/rayon) pool. The
//! dispatcher returns only after the last job has settled; results come
//! back in input order, while progress events arrive in completion order.
//! The chain is the only value shared across jobs and is never mutated.
//!
//! ## Output Folder Ownership
//!
//! [`clear_output_folder`] deletes every regular file directly inside the
//! output folder before a run. Callers must not run two batches against the
//! same output folder at once; nothing here prevents it.

use crate::imaging::{BackendError, ImageBackend};
use crate::pipeline::{FilterChain, StepError};
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum JobError {
    #[error("source has no file name: {}", .0.display())]
    NoFileName(PathBuf),
    #[error("decode failed: {0}")]
    Decode(#[source] BackendError),
    #[error("transform failed: {0}")]
    Transform(#[from] StepError),
    #[error("encode failed: {0}")]
    Encode(#[source] BackendError),
}

/// A regular file in the output folder that could not be deleted.
#[derive(Error, Debug)]
#[error("failed to clear {}: {source}", .path.display())]
pub struct ClearError {
    pub path: PathBuf,
    pub source: std::io::Error,
}

/// Outcome of one job.
#[derive(Debug)]
pub struct JobResult {
    pub source: PathBuf,
    /// Output path on success.
    pub outcome: Result<PathBuf, JobError>,
}

impl JobResult {
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn output(&self) -> Option<&Path> {
        self.outcome.as_ref().ok().map(PathBuf::as_path)
    }

    pub fn error(&self) -> Option<&JobError> {
        self.outcome.as_ref().err()
    }
}

/// What [`clear_output_folder`] did.
#[derive(Debug, Default)]
pub struct ClearSummary {
    pub removed: usize,
    pub errors: Vec<ClearError>,
}

/// Every job of one batch, in input order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub jobs: Vec<JobResult>,
    pub clear: ClearSummary,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.jobs.iter().filter(|j| j.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.jobs.len() - self.succeeded()
    }

    /// Flat, serializable view of the jobs for JSON reports.
    pub fn entries(&self) -> Vec<ReportEntry> {
        self.jobs
            .iter()
            .map(|job| ReportEntry {
                source: job.source.to_string_lossy().into_owned(),
                output: job.output().map(|p| p.to_string_lossy().into_owned()),
                error: job.error().map(ToString::to_string),
            })
            .collect()
    }
}

/// One line of a JSON batch report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportEntry {
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Progress events emitted while a batch runs.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessEvent {
    OutputCleared {
        removed: usize,
        failed: usize,
    },
    BatchStarted {
        image_count: usize,
        steps: Vec<String>,
    },
    ImageProcessed {
        /// 1-based position in the input list.
        index: usize,
        source_path: String,
        output_path: String,
    },
    ImageFailed {
        index: usize,
        source_path: String,
        error: String,
    },
    BatchFinished {
        succeeded: usize,
        failed: usize,
    },
}

/// Delete every regular file directly inside `dir`.
///
/// Subdirectories are left alone. A missing folder is created. Individual
/// failures are logged and collected; clearing carries on with the rest.
pub fn clear_output_folder(dir: &Path) -> ClearSummary {
    let mut summary = ClearSummary::default();

    if let Err(source) = std::fs::create_dir_all(dir) {
        tracing::warn!("cannot create output folder {}: {}", dir.display(), source);
        summary.errors.push(ClearError {
            path: dir.to_path_buf(),
            source,
        });
        return summary;
    }

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(source) => {
            tracing::warn!("cannot list output folder {}: {}", dir.display(), source);
            summary.errors.push(ClearError {
                path: dir.to_path_buf(),
                source,
            });
            return summary;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        match std::fs::remove_file(&path) {
            Ok(()) => summary.removed += 1,
            Err(source) => {
                tracing::warn!("failed to clear {}: {}", path.display(), source);
                summary.errors.push(ClearError { path, source });
            }
        }
    }

    tracing::debug!(
        "cleared {} file(s) from {}",
        summary.removed,
        dir.display()
    );
    summary
}

/// Run one job: decode `source`, apply `chain`, write to `output_dir`.
///
/// Never panics on bad input and never returns early with an error: every
/// failure ends up in the returned [`JobResult`].
pub fn run_job(
    backend: &impl ImageBackend,
    source: &Path,
    output_dir: &Path,
    chain: &FilterChain,
) -> JobResult {
    let outcome = execute_job(backend, source, output_dir, chain);
    match &outcome {
        Ok(output) => tracing::debug!("saved {}", output.display()),
        Err(e) => tracing::warn!("error processing {}: {}", source.display(), e),
    }
    JobResult {
        source: source.to_path_buf(),
        outcome,
    }
}

fn execute_job(
    backend: &impl ImageBackend,
    source: &Path,
    output_dir: &Path,
    chain: &FilterChain,
) -> Result<PathBuf, JobError> {
    let file_name = source
        .file_name()
        .ok_or_else(|| JobError::NoFileName(source.to_path_buf()))?;
    let output = output_dir.join(file_name);

    let image = backend.decode(source).map_err(JobError::Decode)?;
    let image = chain.apply(backend, image)?;
    backend.encode(&image, &output).map_err(JobError::Encode)?;
    Ok(output)
}

/// Run one job per source concurrently and wait for all of them.
///
/// The output folder is not cleared here; see [`clear_output_folder`].
pub fn run_batch(
    backend: &impl ImageBackend,
    sources: &[PathBuf],
    output_dir: &Path,
    chain: &FilterChain,
    progress: Option<Sender<ProcessEvent>>,
) -> BatchReport {
    tracing::info!(
        "processing {} image(s) with {} transform(s)",
        sources.len(),
        chain.len()
    );
    if let Some(tx) = &progress {
        let _ = tx.send(ProcessEvent::BatchStarted {
            image_count: sources.len(),
            steps: chain.steps().iter().map(ToString::to_string).collect(),
        });
    }

    let jobs: Vec<JobResult> = sources
        .par_iter()
        .enumerate()
        .map(|(i, source)| {
            let result = run_job(backend, source, output_dir, chain);
            if let Some(tx) = &progress {
                let _ = tx.send(job_event(i + 1, &result));
            }
            result
        })
        .collect();

    let report = BatchReport {
        jobs,
        clear: ClearSummary::default(),
    };
    tracing::info!(
        "batch complete: {} saved, {} failed",
        report.succeeded(),
        report.failed()
    );
    if let Some(tx) = &progress {
        let _ = tx.send(ProcessEvent::BatchFinished {
            succeeded: report.succeeded(),
            failed: report.failed(),
        });
    }
    report
}

fn job_event(index: usize, result: &JobResult) -> ProcessEvent {
    let source_path = result.source.to_string_lossy().into_owned();
    match &result.outcome {
        Ok(output) => ProcessEvent::ImageProcessed {
            index,
            source_path,
            output_path: output.to_string_lossy().into_owned(),
        },
        Err(e) => ProcessEvent::ImageFailed {
            index,
            source_path,
            error: e.to_string(),
        },
    }
}
