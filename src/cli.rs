/// CLI argument parsing and command handling.
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::session::format_duration;
use crate::store::{self, LoadOutcome};
use crate::types::{LogEntry, Shift, TimeFormat};

#[derive(Parser)]
#[command(
    name = "timestudy",
    version,
    about = "Timestudy - A terminal-based cyclic work measurement tool"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Project to record, skips the project prompt
    #[arg(short = 'p', long = "project", global = true)]
    pub project: Option<String>,

    /// Shift number (1-3), skips the shift prompt
    #[arg(short = 's', long = "shift", value_parser = clap::value_parser!(u8).range(1..=3))]
    pub shift: Option<u8>,

    /// Directory holding the CSV logs
    #[arg(short = 'd', long = "data-dir", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Path to the config file
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub fn shift(&self) -> Option<Shift> {
        self.shift.and_then(Shift::from_number)
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List projects that already have a log in the data directory
    Projects,
    /// Print per-element statistics for a log file
    Summary {
        /// Log file, defaults to the single-file log of --project
        file: Option<PathBuf>,
    },
}

/// Execute a CLI command.
pub fn run(
    command: Command,
    project: Option<&str>,
    config: &Config,
    data_dir: &Path,
) -> Result<()> {
    match command {
        Command::Projects => handle_projects(data_dir),
        Command::Summary { file } => {
            let path = match (file, project) {
                (Some(file), _) => file,
                (None, Some(project)) => data_dir.join(store::log_file_name(
                    project,
                    config.save_mode,
                    chrono::Local::now().date_naive(),
                )),
                (None, None) => bail!("pass a log file or --project"),
            };
            handle_summary(&path, config.time_format)
        }
    }
}

fn handle_projects(data_dir: &Path) -> Result<()> {
    let projects = store::list_projects(data_dir)?;
    if projects.is_empty() {
        println!("No projects found in {}", data_dir.display());
        return Ok(());
    }
    for project in projects {
        println!("{project}");
    }
    Ok(())
}

fn handle_summary(path: &Path, format: TimeFormat) -> Result<()> {
    let entries = match store::read_log(path) {
        LoadOutcome::Loaded(entries) => entries,
        LoadOutcome::Missing => bail!("log file {} not found", path.display()),
        LoadOutcome::Malformed(reason) => bail!("could not read {}: {reason}", path.display()),
    };
    if entries.is_empty() {
        println!("{} has no entries.", path.display());
        return Ok(());
    }

    println!(
        "{:<24} {:>5} {:>14} {:>14}",
        "Element", "Count", "Total", "Mean"
    );
    let mut grand_total = Duration::ZERO;
    for summary in summarize(&entries) {
        grand_total += summary.total;
        println!(
            "{:<24} {:>5} {:>14} {:>14}",
            summary.element,
            summary.count,
            format_duration(summary.total, format),
            format_duration(summary.mean(), format),
        );
    }
    println!(
        "{:<24} {:>5} {:>14}",
        "All",
        entries.len(),
        format_duration(grand_total, format)
    );
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
struct ElementSummary {
    element: String,
    count: u32,
    total: Duration,
}

impl ElementSummary {
    fn mean(&self) -> Duration {
        self.total / self.count.max(1)
    }
}

/// Groups entries by element, in order of first appearance.
fn summarize(entries: &[LogEntry]) -> Vec<ElementSummary> {
    let mut summaries: Vec<ElementSummary> = Vec::new();
    for entry in entries {
        let duration = Duration::from_millis(entry.duration_millis());
        match summaries.iter_mut().find(|s| s.element == entry.element) {
            Some(summary) => {
                summary.count += 1;
                summary.total += duration;
            }
            None => summaries.push(ElementSummary {
                element: entry.element.clone(),
                count: 1,
                total: duration,
            }),
        }
    }
    summaries
}
