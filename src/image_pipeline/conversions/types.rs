use std::path::{Path, PathBuf};

use crate::image_pipeline::common::error::ConversionError;
use crate::image_pipeline::encode::OutputFormat;

/// Extensions treated as raw sensor files by default.
pub const DEFAULT_RAW_EXTENSIONS: &[&str] = &["dng"];

/// Subdirectory of the input directory that square batches write to.
pub const DEFAULT_SQUARE_OUTPUT_DIR: &str = "square_outputs";

/// Outcome of a batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchResult {
    /// Candidate files found in the input directory
    pub total_found: usize,
    pub converted: usize,
    pub failed: usize,
    /// Final output paths, in candidate order
    pub outputs: Vec<PathBuf>,
    /// Files that failed, in candidate order (continue-on-error runs only)
    pub failures: Vec<BatchFailure>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFailure {
    pub path: PathBuf,
    pub reason: String,
}

impl BatchResult {
    pub fn new(total_found: usize) -> Self {
        Self { total_found, ..Self::default() }
    }

    pub(crate) fn record_success(&mut self, output: PathBuf) {
        self.converted += 1;
        self.outputs.push(output);
    }

    pub(crate) fn record_failure(&mut self, path: &Path, error: &ConversionError) {
        self.failed += 1;
        self.failures.push(BatchFailure {
            path: path.to_path_buf(),
            reason: error.to_string(),
        });
    }

    /// True when candidates were found but nothing converted.
    pub fn all_failed(&self) -> bool {
        self.total_found > 0 && self.converted == 0
    }
}

/// Naming and format options for batch runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOptions {
    /// Lowercase extensions (without the dot) of raw candidates
    pub raw_extensions: Vec<String>,
    pub output_format: OutputFormat,
    /// Appended to the stem of the developed, not yet squared, output
    pub intermediate_suffix: String,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            raw_extensions: DEFAULT_RAW_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
            output_format: OutputFormat::Png,
            intermediate_suffix: "_raw".to_string(),
        }
    }
}

impl BatchOptions {
    pub fn builder() -> BatchOptionsBuilder {
        BatchOptionsBuilder::default()
    }
}

/// Builder for BatchOptions
#[derive(Default)]
pub struct BatchOptionsBuilder {
    raw_extensions: Option<Vec<String>>,
    output_format: Option<OutputFormat>,
    intermediate_suffix: Option<String>,
}

impl BatchOptionsBuilder {
    pub fn raw_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.raw_extensions = Some(
            extensions
                .into_iter()
                .map(|ext| ext.as_ref().trim_start_matches('.').to_ascii_lowercase())
                .collect(),
        );
        self
    }

    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = Some(format);
        self
    }

    pub fn intermediate_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.intermediate_suffix = Some(suffix.into());
        self
    }

    pub fn build(self) -> BatchOptions {
        let default = BatchOptions::default();
        BatchOptions {
            raw_extensions: self.raw_extensions.unwrap_or(default.raw_extensions),
            output_format: self.output_format.unwrap_or(default.output_format),
            intermediate_suffix: self.intermediate_suffix.unwrap_or(default.intermediate_suffix),
        }
    }
}
