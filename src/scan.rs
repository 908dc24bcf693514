use crate::error::{ProjmapError, Result};
use crate::matcher::match_types;
use crate::model::{ProjectDirectory, ProjectType};
use crate::util::normalize_rel;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::Path;
use walkdir::WalkDir;

/// User-supplied exclusion rules. Each pattern is tried both as a glob over
/// the normalized relative path and as a literal path prefix, so `tests/*`
/// and bare `tests` both exclude `tests/Foo`.
pub struct IgnoreMatcher {
    globs: GlobSet,
    prefixes: Vec<String>,
}

impl IgnoreMatcher {
    pub fn new(patterns: &[String]) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            builder.add(Glob::new(pattern)?);
        }
        Ok(Self {
            globs: builder.build()?,
            prefixes: patterns.to_vec(),
        })
    }

    pub fn is_ignored(&self, rel_path: &str) -> bool {
        if self.globs.is_match(rel_path) {
            return true;
        }
        self.prefixes.iter().any(|p| {
            rel_path == p || rel_path.starts_with(&format!("{p}/"))
        })
    }
}

/// Walk the tree under `root`, pruning `.git` and ignored directories before
/// their descendants are visited, and classify each remaining directory.
/// When `selected` is a strict subset of the recognized types, only the
/// intersection is recorded and directories outside it are dropped.
///
/// The returned list is sorted by relative path.
pub fn scan_projects(
    root: &Path,
    ignore: &IgnoreMatcher,
    selected: &[ProjectType],
) -> Result<Vec<ProjectDirectory>> {
    validate_root(root)?;

    let mut projects = Vec::new();
    let walker = WalkDir::new(root).into_iter().filter_entry(|entry| {
        if !entry.file_type().is_dir() {
            return true;
        }
        if entry.file_name() == ".git" {
            return false;
        }
        let rel = normalize_rel(entry.path(), root);
        rel == "." || !ignore.is_ignored(&rel)
    });

    for entry in walker {
        let entry = entry.map_err(|e| {
            ProjmapError::ExternalTool {
                path: root.display().to_string(),
                message: format!("directory walk failed: {e}"),
            }
        })?;
        if !entry.file_type().is_dir() {
            continue;
        }

        let names = list_file_names(entry.path())?;
        let matched = match_types(&names);
        if matched.is_empty() {
            continue;
        }

        let types: Vec<ProjectType> = matched
            .into_iter()
            .filter(|t| selected.contains(t))
            .collect();
        if types.is_empty() {
            continue;
        }

        projects.push(ProjectDirectory {
            rel_path: normalize_rel(entry.path(), root),
            types,
        });
    }

    projects.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));
    Ok(projects)
}

fn validate_root(root: &Path) -> Result<()> {
    if !root.is_dir() {
        return Err(ProjmapError::Config(format!(
            "root directory '{}' does not exist",
            root.display()
        )));
    }
    if !root.join(".git").exists() {
        return Err(ProjmapError::Config(format!(
            "root directory '{}' does not contain a .git directory",
            root.display()
        )));
    }
    Ok(())
}

fn list_file_names(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
    }
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    fn touch(dir: &Path, rel: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    fn no_ignores() -> IgnoreMatcher {
        IgnoreMatcher::new(&[]).unwrap()
    }

    #[test]
    fn glob_and_prefix_patterns_both_exclude() {
        let m = IgnoreMatcher::new(&["tests/*".to_string()]).unwrap();
        assert!(m.is_ignored("tests/Foo"));
        assert!(!m.is_ignored("src/Foo"));

        let m = IgnoreMatcher::new(&["tests".to_string()]).unwrap();
        assert!(m.is_ignored("tests"));
        assert!(m.is_ignored("tests/Foo"));
        assert!(!m.is_ignored("tests2/Foo"));
    }

    #[test]
    fn missing_git_dir_is_a_config_error() {
        let dir = tempdir().unwrap();
        let err = scan_projects(dir.path(), &no_ignores(), &ProjectType::ALL)
            .unwrap_err();
        assert!(matches!(err, ProjmapError::Config(_)));
    }

    #[test]
    fn finds_project_directories_sorted() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();
        touch(dir.path(), "b/app.csproj");
        touch(dir.path(), "a/lib.vcxproj");
        touch(dir.path(), "docs/readme.md");

        let found = scan_projects(dir.path(), &no_ignores(), &ProjectType::ALL)
            .unwrap();
        let paths: Vec<&str> =
            found.iter().map(|p| p.rel_path.as_str()).collect();
        assert_eq!(paths, vec!["a", "b"]);
        assert_eq!(found[0].types, vec![ProjectType::Vcxproj]);
    }

    #[test]
    fn root_itself_can_be_a_project_directory() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();
        touch(dir.path(), "everything.sln");

        let found = scan_projects(dir.path(), &no_ignores(), &ProjectType::ALL)
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].rel_path, ".");
    }

    #[test]
    fn ignored_directories_are_pruned_with_descendants() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();
        touch(dir.path(), "src/app.csproj");
        touch(dir.path(), "vendor/dep/dep.csproj");

        let ignore = IgnoreMatcher::new(&["vendor".to_string()]).unwrap();
        let found =
            scan_projects(dir.path(), &ignore, &ProjectType::ALL).unwrap();
        let paths: Vec<&str> =
            found.iter().map(|p| p.rel_path.as_str()).collect();
        assert_eq!(paths, vec!["src"]);
    }

    #[test]
    fn type_filter_keeps_only_the_intersection() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();
        touch(dir.path(), "mixed/app.csproj");
        touch(dir.path(), "mixed/app.vcxproj");
        touch(dir.path(), "native/core.vcxproj");

        let found = scan_projects(
            dir.path(),
            &no_ignores(),
            &[ProjectType::Csproj],
        )
        .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].rel_path, "mixed");
        assert_eq!(found[0].types, vec![ProjectType::Csproj]);
    }
}
