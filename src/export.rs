use crate::error::{ProjmapError, Result};
use crate::model::ReportTable;
use crate::report::headers;
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};

/// Serialize the table and place it at `output_dir/file_name`. The file is
/// staged next to its destination and renamed into place, so a partial
/// report is never left behind. If placing the file fails, one retry with a
/// `_YYYYMMDD_HHMMSS` suffix before the extension is attempted; a second
/// failure is fatal.
///
/// Returns the path actually written.
pub fn write_report(
    table: &ReportTable,
    output_dir: &Path,
    file_name: &str,
) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)?;
    let content = render_csv(table);

    let target = output_dir.join(file_name);
    match place(&content, &target) {
        Ok(()) => Ok(target),
        Err(first) => {
            let fallback = output_dir.join(timestamped_name(file_name));
            tracing::warn!(
                "could not write '{}' ({first}); retrying as '{}'",
                target.display(),
                fallback.display()
            );
            place(&content, &fallback)?;
            Ok(fallback)
        }
    }
}

fn place(content: &str, target: &Path) -> std::io::Result<()> {
    let tmp = target.with_extension("csv.tmp");
    fs::write(&tmp, content)?;
    if let Err(e) = fs::rename(&tmp, target) {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }
    Ok(())
}

fn timestamped_name(file_name: &str) -> String {
    let stamp = Local::now().format("%Y%m%d_%H%M%S");
    match file_name.rsplit_once('.') {
        Some((stem, ext)) => format!("{stem}_{stamp}.{ext}"),
        None => format!("{file_name}_{stamp}"),
    }
}

fn render_csv(table: &ReportTable) -> String {
    let mut out = String::new();
    push_record(&mut out, headers(table).iter().map(String::as_str));
    for row in &table.rows {
        let mut fields = vec![row.dir.rel_path.clone(), row.dir.type_label()];
        fields.push(row.stats.total.to_string());
        fields.extend(row.stats.year_counts.iter().map(u64::to_string));
        fields.extend(row.stats.acc.iter().map(u64::to_string));
        push_record(&mut out, fields.iter().map(String::as_str));
    }
    out
}

fn push_record<'a>(out: &mut String, fields: impl Iterator<Item = &'a str>) {
    let mut first = true;
    for field in fields {
        if !first {
            out.push(',');
        }
        first = false;
        push_field(out, field);
    }
    out.push_str("\r\n");
}

// RFC 4180: quote fields containing the delimiter, quotes, or line breaks;
// double embedded quotes.
fn push_field(out: &mut String, field: &str) {
    if field.contains([',', '"', '\n', '\r']) {
        out.push('"');
        for c in field.chars() {
            if c == '"' {
                out.push('"');
            }
            out.push(c);
        }
        out.push('"');
    } else {
        out.push_str(field);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::model::{
        DirectoryStats, ProjectDirectory, ProjectType, ReportRow, YearWindow,
    };
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn sample_table() -> ReportTable {
        let window = YearWindow::new(2023, 3);
        let dates: Vec<NaiveDate> = [2023, 2023, 2022, 2021]
            .iter()
            .map(|&y| NaiveDate::from_ymd_opt(y, 3, 1).unwrap())
            .collect();
        let stats: DirectoryStats = aggregate(&dates, &window);
        ReportTable {
            years: window.years().collect(),
            rows: vec![ReportRow {
                dir: ProjectDirectory {
                    rel_path: "src/App".to_string(),
                    types: vec![ProjectType::Csproj, ProjectType::Sln],
                },
                stats,
            }],
        }
    }

    #[test]
    fn renders_header_and_quoted_type_list() {
        let csv = render_csv(&sample_table());
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Directory,ProjectType,Total,2023,2022,2021,Acc_1,Acc_2,Acc_3,Acc_4,Acc_5"
        );
        // The type list contains a comma and must be quoted.
        assert_eq!(
            lines.next().unwrap(),
            "src/App,\".csproj, .sln\",4,2,1,1,2,3,4,4,4"
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn rendering_is_deterministic() {
        let table = sample_table();
        assert_eq!(render_csv(&table), render_csv(&table));
    }

    #[test]
    fn writes_to_the_requested_path() {
        let dir = tempdir().unwrap();
        let path =
            write_report(&sample_table(), dir.path(), "out.csv").unwrap();
        assert_eq!(path, dir.path().join("out.csv"));
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("Directory,ProjectType,Total"));
    }

    #[test]
    fn blocked_destination_falls_back_to_timestamped_name() {
        let dir = tempdir().unwrap();
        // A directory squatting on the target path makes the rename fail.
        std::fs::create_dir(dir.path().join("out.csv")).unwrap();

        let path =
            write_report(&sample_table(), dir.path(), "out.csv").unwrap();
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("out_"));
        assert!(name.ends_with(".csv"));
        assert!(path.is_file());
    }

    #[test]
    fn timestamp_suffix_lands_before_the_extension() {
        let name = timestamped_name("repo_main_abc123.csv");
        assert!(name.starts_with("repo_main_abc123_"));
        assert!(name.ends_with(".csv"));
        assert_eq!(name.len(), "repo_main_abc123.csv".len() + 16);
    }
}
