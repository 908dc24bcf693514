use std::fmt;

/// Recognized project-file kinds, in canonical order. The declaration order
/// is the order types are rendered in the ProjectType column and in file-name
/// suffixes, so `Ord` must follow it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProjectType {
    Bproj,
    Csproj,
    Vcproj,
    Vcxproj,
    Xproj,
    Sln,
}

impl ProjectType {
    pub const ALL: [ProjectType; 6] = [
        ProjectType::Bproj,
        ProjectType::Csproj,
        ProjectType::Vcproj,
        ProjectType::Vcxproj,
        ProjectType::Xproj,
        ProjectType::Sln,
    ];

    /// File extension with the leading dot, e.g. `.csproj`.
    pub fn ext(self) -> &'static str {
        match self {
            ProjectType::Bproj => ".bproj",
            ProjectType::Csproj => ".csproj",
            ProjectType::Vcproj => ".vcproj",
            ProjectType::Vcxproj => ".vcxproj",
            ProjectType::Xproj => ".xproj",
            ProjectType::Sln => ".sln",
        }
    }

    /// Extension without the leading dot, used for file-name suffixes.
    pub fn token(self) -> &'static str {
        &self.ext()[1..]
    }

    /// Parse a user-supplied type; a missing leading dot and any casing are
    /// accepted (`csproj`, `.CSPROJ`).
    pub fn parse(input: &str) -> Option<ProjectType> {
        let lower = input.trim().to_lowercase();
        let dotted = if lower.starts_with('.') {
            lower
        } else {
            format!(".{lower}")
        };
        ProjectType::ALL.iter().copied().find(|t| t.ext() == dotted)
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.ext())
    }
}

/// A directory containing at least one recognized project file.
///
/// `rel_path` is posix-style relative to the repository root, with `.`
/// standing for the root itself. `types` is non-empty and in canonical order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDirectory {
    pub rel_path: String,
    pub types: Vec<ProjectType>,
}

impl ProjectDirectory {
    /// The ProjectType column value, e.g. `.csproj, .sln`.
    pub fn type_label(&self) -> String {
        self.types
            .iter()
            .map(|t| t.ext())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// The N most recent calendar years given individual report columns.
#[derive(Debug, Clone, Copy)]
pub struct YearWindow {
    pub current_year: i32,
    pub len: usize,
}

impl YearWindow {
    pub fn new(current_year: i32, len: usize) -> Self {
        debug_assert!(len >= 1);
        Self { current_year, len }
    }

    /// Window years, most recent first.
    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        (0..self.len as i32).map(move |i| self.current_year - i)
    }
}

/// Number of rolling cumulative columns (Acc_1..Acc_5).
pub const ACC_COLUMNS: usize = 5;

/// Aggregated commit counts for one directory.
///
/// `year_counts` is aligned with `YearWindow::years()` (most recent first).
/// `acc[k-1]` sums the `k` most recent window years; with a window shorter
/// than `k` years it sums what exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryStats {
    pub total: u64,
    pub year_counts: Vec<u64>,
    pub acc: [u64; ACC_COLUMNS],
}

#[derive(Debug, Clone)]
pub struct ReportRow {
    pub dir: ProjectDirectory,
    pub stats: DirectoryStats,
}

/// The assembled report: year header labels (most recent first) plus one row
/// per project directory, sorted by relative path.
#[derive(Debug, Clone)]
pub struct ReportTable {
    pub years: Vec<i32>,
    pub rows: Vec<ReportRow>,
}

impl ReportTable {
    pub fn column_count(&self) -> usize {
        3 + self.years.len() + ACC_COLUMNS
    }
}

/// Repository-level metadata used for the output file name.
#[derive(Debug, Clone)]
pub struct RepoMetadata {
    /// `None` when HEAD is detached.
    pub branch: Option<String>,
    /// First six hex characters of the HEAD commit id.
    pub short_id: String,
}
