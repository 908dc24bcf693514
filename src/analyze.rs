use crate::aggregate::aggregate;
use crate::export::write_report;
use crate::git::{CommitHistory, GitRepo};
use crate::model::{ProjectDirectory, ProjectType, ReportRow, ReportTable, YearWindow};
use crate::report::{assemble, output_file_name};
use crate::scan::{scan_projects, IgnoreMatcher};
use anyhow::Context;
use chrono::{Datelike, Local};
use console::style;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Run one full analysis: scan, index history, aggregate, write the report.
pub fn exec(
    root: &Path,
    years: usize,
    output_dir: &Path,
    ignore_patterns: &[String],
    selected: &[ProjectType],
) -> anyhow::Result<()> {
    let started = Instant::now();

    info!("starting analysis");
    info!("    root: {}", root.display());
    info!("    time range: past [{years}] years");
    info!(
        "    project types: {}",
        selected
            .iter()
            .map(|t| t.ext())
            .collect::<Vec<_>>()
            .join(", ")
    );
    info!(
        "    ignore patterns: {}",
        if ignore_patterns.is_empty() {
            "(none)".to_string()
        } else {
            ignore_patterns.join(", ")
        }
    );

    let ignore = IgnoreMatcher::new(ignore_patterns)
        .context("Failed to compile ignore patterns")?;
    let projects = scan_projects(root, &ignore, selected)
        .context("Failed to scan for project directories")?;
    info!("found {} project directories", projects.len());

    if projects.is_empty() {
        println!(
            "No project directories ({}) found. Exiting...",
            ProjectType::ALL.map(|t| t.ext()).join("/")
        );
        return Ok(());
    }

    let repo = GitRepo::open(Some(root)).context("Failed to open git repository")?;
    let log = repo
        .collect_directory_log()
        .context("Failed to index commit history")?;

    // One window for the whole run: anchored to the wall clock, but pushed
    // forward if the repository somehow holds commits from the future.
    let current_year = Local::now()
        .year()
        .max(log.latest_year().unwrap_or(i32::MIN));
    let window = YearWindow::new(current_year, years);

    let table = build_table(&projects, &log, &window);

    let repo_name = repo_display_name(root);
    let file_name = output_file_name(&repo_name, &log.metadata(), selected);
    let path = write_report(&table, output_dir, &file_name)
        .context("Failed to write the report")?;

    println!("CSV created: '{}'", style(path.display()).green());
    println!("    rows: {}", table.rows.len());
    println!("    columns: {}", table.column_count());
    info!("done in {:.2}s", started.elapsed().as_secs_f64());
    Ok(())
}

/// Aggregate every project directory against the shared window and collect
/// the sorted table.
fn build_table(
    projects: &[ProjectDirectory],
    history: &impl CommitHistory,
    window: &YearWindow,
) -> ReportTable {
    let total = projects.len();
    let mut rows = Vec::with_capacity(total);
    for (idx, dir) in projects.iter().enumerate() {
        info!("[{}/{}] analyzing: {}", idx + 1, total, dir.rel_path);
        let dates = history.dates_for(&dir.rel_path);
        let stats = aggregate(dates, window);
        debug!(
            "    -> commits(all-time): {}; in-range: {}",
            stats.total,
            stats.year_counts.iter().sum::<u64>()
        );
        rows.push(ReportRow {
            dir: dir.clone(),
            stats,
        });
    }
    assemble(rows, window)
}

fn repo_display_name(root: &Path) -> String {
    root.canonicalize()
        .ok()
        .as_deref()
        .and_then(Path::file_name)
        .and_then(|n| n.to_str())
        .unwrap_or("repo")
        .to_string()
}
