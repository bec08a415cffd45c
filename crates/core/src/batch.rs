//! Batch assembly of independent documents in parallel.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use rayon::prelude::*;

use crate::assemble::{Assembly, assemble_with_options};
use crate::error::StepcastError;
use crate::options::AssembleOptions;

/// Input for batch processing - represents a single document to assemble.
#[derive(Debug, Clone)]
pub struct BatchInput {
    /// Document identifier (typically the file path).
    pub id: String,
    /// Markdown source content.
    pub source: String,
}

impl BatchInput {
    /// Create a batch input.
    pub fn new(id: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
        }
    }
}

/// Result for a single document in a batch.
#[derive(Debug)]
pub struct BatchResult {
    /// Document identifier matching the input.
    pub id: String,
    /// Assembled script or the fatal error.
    pub outcome: Result<Assembly, StepcastError>,
}

/// Statistics for batch processing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchStats {
    /// Total number of documents submitted.
    pub total: usize,
    /// Number of documents assembled successfully.
    pub succeeded: usize,
    /// Number of documents that failed.
    pub failed: usize,
    /// Total processing time in milliseconds.
    pub processing_time_ms: f64,
}

/// Options for batch processing.
#[derive(Debug, Clone, Copy)]
pub struct BatchOptions {
    /// Maximum number of threads to use. Defaults to rayon's global pool.
    pub max_threads: Option<usize>,
    /// Whether to continue processing after an error. Defaults to true.
    pub continue_on_error: bool,
    /// Assembly options shared by every document.
    pub assemble: AssembleOptions,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            max_threads: None,
            continue_on_error: true,
            assemble: AssembleOptions::default(),
        }
    }
}

/// Results in input order plus statistics.
#[derive(Debug)]
pub struct BatchReport {
    /// Individual results for each processed document.
    pub results: Vec<BatchResult>,
    /// Processing statistics.
    pub stats: BatchStats,
}

/// Assemble many documents concurrently.
///
/// With `continue_on_error` unset, documents are processed in order and the
/// batch stops after the first failure; later inputs get no result.
pub fn assemble_batch(inputs: Vec<BatchInput>, options: &BatchOptions) -> BatchReport {
    let start = Instant::now();

    let pool = options.max_threads.and_then(|threads| {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|err| log::warn!("falling back to the global rayon pool: {err}"))
            .ok()
    });

    let total = inputs.len();
    let succeeded = AtomicUsize::new(0);
    let failed = AtomicUsize::new(0);

    let process_input = |input: BatchInput| -> BatchResult {
        let outcome = assemble_with_options(&input.source, &options.assemble);
        match &outcome {
            Ok(_) => succeeded.fetch_add(1, Ordering::Relaxed),
            Err(err) => {
                log::debug!("{}: {}", input.id, err);
                failed.fetch_add(1, Ordering::Relaxed)
            }
        };
        BatchResult {
            id: input.id,
            outcome,
        }
    };

    let results: Vec<BatchResult> = if options.continue_on_error {
        match &pool {
            Some(pool) => pool.install(|| inputs.into_par_iter().map(process_input).collect()),
            None => inputs.into_par_iter().map(process_input).collect(),
        }
    } else {
        let mut results = Vec::with_capacity(inputs.len());
        for input in inputs {
            let result = process_input(input);
            let stop = result.outcome.is_err();
            results.push(result);
            if stop {
                break;
            }
        }
        results
    };

    BatchReport {
        results,
        stats: BatchStats {
            total,
            succeeded: succeeded.load(Ordering::Relaxed),
            failed: failed.load(Ordering::Relaxed),
            processing_time_ms: start.elapsed().as_secs_f64() * 1000.0,
        },
    }
}
