use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::decode::RawDocument;
use crate::error::DocumentError;
use crate::parser::{self, lexicon::Lexicon};
use crate::record::OutputRecord;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

const PROGRESS_EVERY: usize = 20;

pub struct BatchReport {
    pub total: usize,
    pub written: Vec<PathBuf>,
    pub failures: Vec<(String, String)>,
}

impl BatchReport {
    pub fn print(&self) {
        println!(
            "Wrote {} records ({} failed) from {} files.",
            self.written.len(),
            self.failures.len(),
            self.total
        );
        for (file, reason) in &self.failures {
            println!("  error: {} - {}", file, reason);
        }
    }
}

fn is_markup(path: &Path) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .is_some_and(|e| e == "html" || e == "htm")
}

/// `*.html` / `*.htm` directly inside `dir`, sorted.
pub fn discover(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("Failed to list {}", dir.display()))? {
        let path = entry?.path();
        if path.is_file() && is_markup(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Start every run from an empty output directory.
pub fn reset_output_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        std::fs::remove_dir_all(dir).with_context(|| format!("Failed to clear {}", dir.display()))?;
    }
    std::fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    Ok(())
}

pub fn process_path(path: &Path, lexicon: &Lexicon) -> Result<OutputRecord, DocumentError> {
    let raw = RawDocument::read(path)?;
    parser::process_document(&raw, lexicon)
}

pub fn write_record(record: &OutputRecord, output_dir: &Path) -> Result<PathBuf, DocumentError> {
    let json = record.to_json().map_err(|source| DocumentError::Serialize {
        file: record.source_file.clone(),
        source,
    })?;
    let path = output_dir.join(record.filename());
    std::fs::write(&path, json).map_err(|source| DocumentError::Write {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

#[cfg(feature = "rayon")]
fn process_chunk(chunk: &[PathBuf], lexicon: &Lexicon) -> Vec<Result<OutputRecord, DocumentError>> {
    chunk.par_iter().map(|p| process_path(p, lexicon)).collect()
}

#[cfg(not(feature = "rayon"))]
fn process_chunk(chunk: &[PathBuf], lexicon: &Lexicon) -> Vec<Result<OutputRecord, DocumentError>> {
    chunk.iter().map(|p| process_path(p, lexicon)).collect()
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Process `files` and write one JSON record each into `output_dir`.
/// A failing document is logged and recorded; the batch carries on.
pub fn run(files: &[PathBuf], output_dir: &Path, lexicon: &Lexicon, chunk_size: usize) -> BatchReport {
    let total = files.len();
    let pb = ProgressBar::new(total as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")
    {
        pb.set_style(style.progress_chars("#>-"));
    }

    let mut report = BatchReport {
        total,
        written: Vec::new(),
        failures: Vec::new(),
    };
    let mut seen_names = HashSet::new();
    let mut done = 0usize;

    for chunk in files.chunks(chunk_size.max(1)) {
        let results = process_chunk(chunk, lexicon);

        for (path, result) in chunk.iter().zip(results) {
            let outcome = result.and_then(|record| {
                let name = record.filename();
                let fresh = seen_names.insert(name.clone());
                if !fresh {
                    warn!("{} overwrites an earlier record named {}", record.source_file, name);
                }
                write_record(&record, output_dir).map(|path| (path, fresh))
            });
            match outcome {
                // An overwrite replaces a file already counted.
                Ok((written, true)) => report.written.push(written),
                Ok((_, false)) => {}
                Err(e) => {
                    let name = display_name(path);
                    warn!("Skipping {}: {}", name, e);
                    report.failures.push((name, e.to_string()));
                }
            }

            done += 1;
            pb.inc(1);
            if done % PROGRESS_EVERY == 0 {
                pb.println(format!("progress: {}/{}", done, total));
            }
        }
    }

    pb.finish_and_clear();
    info!(
        "Processed {} files: {} written, {} failed",
        total,
        report.written.len(),
        report.failures.len()
    );
    report
}
