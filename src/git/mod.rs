pub mod repo;

pub use repo::{DirectoryLog, GitRepo};

use crate::model::RepoMetadata;
use chrono::NaiveDate;

/// Boundary contract the aggregation core depends on: commit dates scoped to
/// a directory's files, plus repository-level metadata for the output name.
pub trait CommitHistory {
    /// Calendar dates of commits touching files at or under `rel_dir`.
    /// An empty slice is valid data, not an error.
    fn dates_for(&self, rel_dir: &str) -> &[NaiveDate];

    /// The most recent commit year seen anywhere in the repository, if any.
    fn latest_year(&self) -> Option<i32>;

    fn metadata(&self) -> RepoMetadata;
}
