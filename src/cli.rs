use crate::model::ProjectType;
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "projmap")]
#[command(about = "Per-directory commit activity statistics for .NET-style project trees")]
#[command(version)]
pub struct Cli {
    #[arg(
        default_value = ".",
        help = "Root directory of the codebase (must contain .git)"
    )]
    pub root_directory: PathBuf,

    #[arg(
        short = 'y',
        long,
        default_value_t = 10,
        value_parser = clap::value_parser!(u32).range(1..),
        help = "Number of years to analyze"
    )]
    pub years: u32,

    #[arg(
        short = 'o',
        long,
        default_value = ".",
        help = "Directory to write the CSV file (created if absent)"
    )]
    pub output_dir: PathBuf,

    #[arg(
        short = 'i',
        long = "ignore",
        help = "Relative path patterns to ignore (glob or prefix); repeatable or comma-separated"
    )]
    pub ignore: Vec<String>,

    #[arg(
        long = "project-type",
        help = "Project types to include (.bproj, .csproj, .vcproj, .vcxproj, .xproj, .sln); repeatable or comma-separated"
    )]
    pub project_type: Vec<String>,

    #[arg(
        long,
        conflicts_with = "verbose",
        help = "Suppress informational logs; only warnings and results"
    )]
    pub quiet: bool,

    #[arg(long, help = "Enable verbose logs")]
    pub verbose: bool,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn execute(self) -> Result<()> {
        let level = if self.quiet {
            "warn"
        } else if self.verbose {
            "debug"
        } else {
            "info"
        };
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
        fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .without_time()
            .compact()
            .init();

        let ignore_patterns = flatten_patterns(&self.ignore);
        let selected = select_project_types(&self.project_type)?;

        crate::analyze::exec(
            &self.root_directory,
            self.years as usize,
            &self.output_dir,
            &ignore_patterns,
            &selected,
        )
    }
}

/// Merge repeatable and comma-separated values into one trimmed list,
/// de-duplicated preserving first-seen order.
pub fn flatten_patterns(values: &[String]) -> Vec<String> {
    let mut merged = Vec::new();
    for value in values {
        for part in value.split(',') {
            let part = part.trim();
            if !part.is_empty() && !merged.iter().any(|p| p == part) {
                merged.push(part.to_string());
            }
        }
    }
    merged
}

/// Resolve the requested project types; no request means all recognized
/// types. Unknown values are a configuration error naming the allowed set.
pub fn select_project_types(values: &[String]) -> Result<Vec<ProjectType>> {
    let raw = flatten_patterns(values);
    if raw.is_empty() {
        return Ok(ProjectType::ALL.to_vec());
    }

    let mut selected = Vec::new();
    for value in &raw {
        match ProjectType::parse(value) {
            Some(ty) => {
                if !selected.contains(&ty) {
                    selected.push(ty);
                }
            }
            None => {
                let allowed: Vec<&str> =
                    ProjectType::ALL.iter().map(|t| t.ext()).collect();
                anyhow::bail!(
                    "invalid --project-type value '{value}'; allowed: {}",
                    allowed.join(", ")
                );
            }
        }
    }
    selected.sort();
    Ok(selected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn patterns_are_flattened_and_deduplicated() {
        let values = vec![
            "src/Legacy, tests/*".to_string(),
            "tests/*".to_string(),
            " vendor ".to_string(),
        ];
        assert_eq!(
            flatten_patterns(&values),
            vec!["src/Legacy", "tests/*", "vendor"]
        );
    }

    #[test]
    fn empty_selection_means_all_types() {
        assert_eq!(
            select_project_types(&[]).unwrap(),
            ProjectType::ALL.to_vec()
        );
    }

    #[test]
    fn types_accept_missing_dot_and_any_case() {
        let values = vec!["csproj,.SLN".to_string()];
        assert_eq!(
            select_project_types(&values).unwrap(),
            vec![ProjectType::Csproj, ProjectType::Sln]
        );
    }

    #[test]
    fn unknown_type_is_rejected() {
        let values = vec![".fsproj".to_string()];
        assert!(select_project_types(&values).is_err());
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
