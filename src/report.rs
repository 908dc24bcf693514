use crate::model::{
    ProjectType, RepoMetadata, ReportRow, ReportTable, YearWindow, ACC_COLUMNS,
};

/// Collect per-directory rows into the final table, sorted by relative path.
pub fn assemble(mut rows: Vec<ReportRow>, window: &YearWindow) -> ReportTable {
    rows.sort_by(|a, b| a.dir.rel_path.cmp(&b.dir.rel_path));
    ReportTable {
        years: window.years().collect(),
        rows,
    }
}

/// Header row: fixed leading columns, one column per window year (most
/// recent first), then the rolling accumulators.
pub fn headers(table: &ReportTable) -> Vec<String> {
    let mut headers = vec![
        "Directory".to_string(),
        "ProjectType".to_string(),
        "Total".to_string(),
    ];
    headers.extend(table.years.iter().map(|y| y.to_string()));
    headers.extend((1..=ACC_COLUMNS).map(|k| format!("Acc_{k}")));
    headers
}

/// Output file name: `<repo>_<branch>_<sha6>[_<type>...].csv`. The type
/// suffix appears only when the filter excludes at least one recognized
/// type; selected types are listed in canonical order without their dot.
pub fn output_file_name(
    repo_name: &str,
    metadata: &RepoMetadata,
    selected: &[ProjectType],
) -> String {
    let repo = sanitize_segment(repo_name);
    let branch = sanitize_segment(
        metadata.branch.as_deref().unwrap_or("detached"),
    );
    let mut name = format!("{repo}_{branch}_{}", metadata.short_id);
    if selected.len() < ProjectType::ALL.len() {
        for ty in ProjectType::ALL {
            if selected.contains(&ty) {
                name.push('_');
                name.push_str(ty.token());
            }
        }
    }
    name.push_str(".csv");
    name
}

/// File-name segments allow only `[A-Za-z0-9._-]`; everything else, path
/// separators and spaces included, becomes `-`.
fn sanitize_segment(segment: &str) -> String {
    let safe: String = segment
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '-'
            }
        })
        .collect();
    if safe.is_empty() {
        "unknown".to_string()
    } else {
        safe
    }
}
