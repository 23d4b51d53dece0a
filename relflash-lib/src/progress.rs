//! Flash progress reporting.
//!
//! The engine calls back with `(file_index, written, total)` per chunk.
//! The callback is observability only; it carries no control semantics
//! and must not block.

pub trait ProgressCallback {
    fn progress(&mut self, file_index: usize, written: u64, total: u64);
}

/// Progress callback that produces no output.
#[derive(Debug, Default)]
pub struct NoOpProgress;

impl ProgressCallback for NoOpProgress {
    fn progress(&mut self, _file_index: usize, _written: u64, _total: u64) {}
}
