use std::fs;
use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::conversions::types::BatchResult;
use crate::logger::LogHandle;

/// Regular files directly inside `dir` accepted by `accept`, sorted by file
/// name.
pub fn enumerate_candidates<F>(dir: &Path, accept: F) -> Result<Vec<PathBuf>>
where
    F: Fn(&Path) -> bool,
{
    if !dir.is_dir() {
        return Err(ConversionError::DirectoryNotFound(dir.to_path_buf()));
    }

    let mut candidates = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && accept(&path) {
            candidates.push(path);
        }
    }
    candidates.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(candidates)
}

/// Case-insensitive match of the extension of `path` against `extensions`.
pub fn has_extension<S: AsRef<str>>(path: &Path, extensions: &[S]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| extensions.iter().any(|candidate| candidate.as_ref().eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

/// Drives a conversion closure over a candidate list, one file at a time.
#[derive(Debug, Clone)]
pub struct BatchRunner {
    stop_on_first_error: bool,
    log: LogHandle,
}

impl BatchRunner {
    pub fn new(stop_on_first_error: bool) -> Self {
        Self {
            stop_on_first_error,
            log: LogHandle::new("batch_runner"),
        }
    }

    /// Aborts with the first error, leaving later files untouched.
    pub fn fail_fast() -> Self {
        Self::new(true)
    }

    /// Records failures and keeps going.
    pub fn continue_on_error() -> Self {
        Self::new(false)
    }

    pub fn with_log(mut self, log: LogHandle) -> Self {
        self.log = log;
        self
    }

    pub fn stop_on_first_error(&self) -> bool {
        self.stop_on_first_error
    }

    pub fn run<F>(&self, candidates: &[PathBuf], mut convert: F) -> Result<BatchResult>
    where
        F: FnMut(&Path) -> Result<PathBuf>,
    {
        let _guard = self.log.enter();
        let mut result = BatchResult::new(candidates.len());

        if candidates.is_empty() {
            info!("No candidate files found");
            return Ok(result);
        }
        info!("Found {} files to process", candidates.len());

        for (index, path) in candidates.iter().enumerate() {
            let _span =
                tracing::info_span!("convert_file", index, input = %path.display()).entered();
            match convert(path) {
                Ok(output) => {
                    info!(output = %output.display(), "Processed {}", path.display());
                    result.record_success(output);
                }
                Err(e) if self.stop_on_first_error => {
                    error!("Error processing {}: {}", path.display(), e);
                    return Err(e);
                }
                Err(e) => {
                    warn!("Error processing {}: {}", path.display(), e);
                    result.record_failure(path, &e);
                }
            }
        }

        info!(
            converted = result.converted,
            failed = result.failed,
            total = result.total_found,
            "Batch complete"
        );
        Ok(result)
    }
}
