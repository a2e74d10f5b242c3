//! Batch processing of recorded speech: discovery, normalization,
//! enhancement, batched recognition with speaker turns, and summarization.

pub mod audio;
pub mod pipeline;
pub mod scan;
pub mod shared;
pub mod summary;
