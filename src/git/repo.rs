use crate::error::{ProjmapError, Result};
use crate::git::CommitHistory;
use crate::model::RepoMetadata;
use crate::util::ancestor_dirs;
use chrono::{DateTime, Datelike, NaiveDate};
use gix::object::tree::diff::ChangeDetached;
use gix::{discover, ObjectId, Repository};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};

pub struct GitRepo {
    repo: Repository,
    path: PathBuf,
}

impl GitRepo {
    /// Open a repository at `path`, or current dir if `None`
    pub fn open<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let repo_path = path
            .map(|p| p.as_ref().to_path_buf())
            .unwrap_or(std::env::current_dir()?);

        let repo = discover(&repo_path)?;
        let path = repo.workdir().unwrap_or_else(|| repo.path()).to_path_buf();

        Ok(Self { repo, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current branch and short commit id for the output file name. Failures
    /// degrade to `unknown` segments with a warning instead of aborting the
    /// run.
    pub fn metadata(&self) -> RepoMetadata {
        match self.try_metadata() {
            Ok(meta) => meta,
            Err(e) => {
                tracing::warn!(
                    "git metadata query failed at '{}': {e}",
                    self.path.display()
                );
                RepoMetadata {
                    branch: Some("unknown".to_string()),
                    short_id: "unknown".to_string(),
                }
            }
        }
    }

    fn try_metadata(&self) -> Result<RepoMetadata> {
        let mut head = self.repo.head()?;
        let branch = head
            .referent_name()
            .map(|name| name.shorten().to_string());
        let commit = head.peel_to_commit_in_place()?;
        let full_id = commit.id.to_string();
        let short_id = full_id[..full_id.len().min(6)].to_string();
        Ok(RepoMetadata { branch, short_id })
    }

    /// Walk history from HEAD once and index commit dates by every directory
    /// whose files the commit touched. Merge commits are skipped, matching
    /// the history simplification `git log -- <dir>` applies.
    pub fn collect_directory_log(&self) -> Result<DirectoryLog> {
        let metadata = self.metadata();

        let mut head = match self.repo.head() {
            Ok(head) => head,
            Err(e) => {
                tracing::warn!("no usable HEAD at '{}': {e}", self.path.display());
                return Ok(DirectoryLog::empty(metadata));
            }
        };
        let head_commit = match head.peel_to_commit_in_place() {
            Ok(commit) => commit,
            Err(e) => {
                // Freshly initialized repository without commits.
                tracing::warn!("HEAD has no commit at '{}': {e}", self.path.display());
                return Ok(DirectoryLog::empty(metadata));
            }
        };

        let mut by_dir: HashMap<String, Vec<NaiveDate>> = HashMap::new();
        let mut latest: Option<NaiveDate> = None;
        let mut seen: HashSet<ObjectId> = HashSet::new();
        let mut stack: VecDeque<ObjectId> = VecDeque::from([head_commit.id]);

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message("Indexing commit history...");

        while let Some(commit_id) = stack.pop_back() {
            if !seen.insert(commit_id) {
                continue;
            }

            let commit = self.repo.find_commit(commit_id)?;
            let secs = commit.time()?.seconds;
            let date = DateTime::from_timestamp(secs, 0)
                .ok_or_else(|| {
                    ProjmapError::InvalidDate(format!("Invalid timestamp: {secs}"))
                })?
                .date_naive();

            let parents: Vec<ObjectId> =
                commit.parent_ids().map(|id| id.into()).collect();

            if parents.len() > 1 {
                for pid in parents {
                    stack.push_back(pid);
                }
                pb.inc(1);
                continue;
            }

            latest = Some(latest.map_or(date, |d| d.max(date)));

            let touched = self.changed_paths(commit_id, parents.first().copied())?;
            let mut dirs: HashSet<String> = HashSet::new();
            for file_path in &touched {
                for dir in ancestor_dirs(file_path) {
                    dirs.insert(dir);
                }
            }
            for dir in dirs {
                by_dir.entry(dir).or_default().push(date);
            }

            for pid in parents {
                stack.push_back(pid);
            }

            pb.inc(1);
        }

        pb.finish_with_message("Commit history indexed");

        // Newest-first per directory, so the index is deterministic no
        // matter which traversal order produced it.
        for dates in by_dir.values_mut() {
            dates.sort_unstable_by(|a, b| b.cmp(a));
        }

        Ok(DirectoryLog {
            by_dir,
            latest,
            metadata,
        })
    }

    fn changed_paths(
        &self,
        commit_id: ObjectId,
        parent_id: Option<ObjectId>,
    ) -> Result<Vec<String>> {
        let commit_tree = self.repo.find_commit(commit_id)?.tree()?;
        let parent_tree = match parent_id {
            Some(pid) => Some(self.repo.find_commit(pid)?.tree()?),
            None => None,
        };

        let changes: Vec<ChangeDetached> = self.repo.diff_tree_to_tree(
            parent_tree.as_ref(),
            Some(&commit_tree),
            None,
        )?;

        let mut paths = Vec::new();
        for change in changes {
            match change {
                ChangeDetached::Addition { location, .. }
                | ChangeDetached::Deletion { location, .. }
                | ChangeDetached::Modification { location, .. } => {
                    paths.push(location.to_string());
                }
                ChangeDetached::Rewrite {
                    source_location,
                    location,
                    ..
                } => {
                    paths.push(source_location.to_string());
                    paths.push(location.to_string());
                }
            }
        }
        Ok(paths)
    }
}

/// Per-directory commit-date index for one repository state.
pub struct DirectoryLog {
    by_dir: HashMap<String, Vec<NaiveDate>>,
    latest: Option<NaiveDate>,
    metadata: RepoMetadata,
}

impl DirectoryLog {
    fn empty(metadata: RepoMetadata) -> Self {
        Self {
            by_dir: HashMap::new(),
            latest: None,
            metadata,
        }
    }

    #[cfg(test)]
    pub fn from_entries(
        entries: Vec<(String, Vec<NaiveDate>)>,
        metadata: RepoMetadata,
    ) -> Self {
        let latest = entries
            .iter()
            .flat_map(|(_, dates)| dates.iter().copied())
            .max();
        Self {
            by_dir: entries.into_iter().collect(),
            latest,
            metadata,
        }
    }
}

impl CommitHistory for DirectoryLog {
    fn dates_for(&self, rel_dir: &str) -> &[NaiveDate] {
        self.by_dir.get(rel_dir).map(Vec::as_slice).unwrap_or(&[])
    }

    fn latest_year(&self) -> Option<i32> {
        self.latest.map(|d| d.year())
    }

    fn metadata(&self) -> RepoMetadata {
        self.metadata.clone()
    }
}
