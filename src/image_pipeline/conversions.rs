//! Pipeline conversions module
//!
//! This module contains the orchestration logic that walks a directory and
//! runs the decode, square and encode steps for every candidate file.

mod batch;
mod runner;
mod single;
pub mod types;

#[cfg(test)]
mod tests;

pub use batch::BatchConverter;
pub use runner::{BatchRunner, enumerate_candidates, has_extension};
pub use single::square_file;
pub use types::{
    BatchFailure, BatchOptions, BatchOptionsBuilder, BatchResult, DEFAULT_RAW_EXTENSIONS,
    DEFAULT_SQUARE_OUTPUT_DIR,
};
