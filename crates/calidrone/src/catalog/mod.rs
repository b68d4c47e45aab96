//! In-memory catalogs of saved paths and recordings.
//!
//! Both catalogs keep insertion order and reject duplicate ids. Neither
//! persists anything on its own.

mod paths;
mod recordings;

pub use paths::PathCatalog;
pub use recordings::{format_duration, format_file_size, RecordingCatalog, RecordingStats};
