use std::path::Path;

/// Render a path relative to the repository root in posix form; the root
/// itself becomes `.`.
pub fn normalize_rel(path: &Path, root: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    let parts: Vec<&str> = rel
        .components()
        .filter_map(|c| c.as_os_str().to_str())
        .collect();
    if parts.is_empty() {
        ".".to_string()
    } else {
        parts.join("/")
    }
}

/// Every directory a file path contributes history to: its parent chain up
/// to and including the root (`.`). `a/b/c.txt` yields `a/b`, `a`, `.`.
pub fn ancestor_dirs(file_path: &str) -> Vec<String> {
    let mut dirs = Vec::new();
    if let Some((parent, _)) = file_path.rsplit_once('/') {
        let mut acc = String::new();
        for part in parent.split('/') {
            if !acc.is_empty() {
                acc.push('/');
            }
            acc.push_str(part);
            dirs.push(acc.clone());
        }
        dirs.reverse();
    }
    dirs.push(".".to_string());
    dirs
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    #[test]
    fn normalize_rel_root_is_dot() {
        let root = PathBuf::from("/repo");
        assert_eq!(normalize_rel(&root, &root), ".");
    }

    #[test]
    fn normalize_rel_joins_with_forward_slash() {
        let root = PathBuf::from("/repo");
        let nested = root.join("src").join("Core");
        assert_eq!(normalize_rel(&nested, &root), "src/Core");
    }

    #[test]
    fn ancestor_dirs_cover_parent_chain() {
        assert_eq!(ancestor_dirs("a/b/c.txt"), vec!["a/b", "a", "."]);
        assert_eq!(ancestor_dirs("top.sln"), vec!["."]);
    }
}
