/// Log file naming, project discovery and CSV persistence.
mod csv_log;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::NaiveDate;

use crate::types::SaveMode;

pub use csv_log::{LoadOutcome, read_log, write_log};

const SINGLE_FILE_SUFFIX: &str = "_log";

/// Lowercases and replaces spaces with underscores.
pub fn normalize_project_name(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

/// Derives the log file name for a project under the given save mode.
pub fn log_file_name(project: &str, save_mode: SaveMode, date: NaiveDate) -> String {
    let project = normalize_project_name(project);
    match save_mode {
        SaveMode::SingleFile => format!("{project}{SINGLE_FILE_SUFFIX}.csv"),
        SaveMode::PerDay => format!("{project}_{}.csv", date.format("%Y-%m-%d")),
    }
}

/// Lists the projects that already have a log file in `dir`, sorted and
/// de-duplicated across save modes. A missing directory yields nothing.
pub fn list_projects(dir: &Path) -> Result<Vec<String>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut projects = BTreeSet::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("csv") {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        if let Some(project) = project_from_stem(stem) {
            projects.insert(project.to_string());
        }
    }
    Ok(projects.into_iter().collect())
}

fn project_from_stem(stem: &str) -> Option<&str> {
    if let Some(project) = stem.strip_suffix(SINGLE_FILE_SUFFIX) {
        return (!project.is_empty()).then_some(project);
    }
    // <project>_YYYY-MM-DD
    let split = stem.len().checked_sub(11)?;
    let (project, date) = stem.split_at_checked(split)?;
    let date = date.strip_prefix('_')?;
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    (!project.is_empty()).then_some(project)
}

/// Returns the default data directory inside the user's local data dir.
/// Falls back to the working directory when no data dir is found.
pub fn default_data_dir() -> PathBuf {
    match dirs::data_local_dir() {
        Some(data_dir) => data_dir.join("timestudy"),
        None => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
    }

    #[test]
    fn file_name_per_save_mode() {
        assert_eq!(
            log_file_name("Assembly Line", SaveMode::SingleFile, date()),
            "assembly_line_log.csv"
        );
        assert_eq!(
            log_file_name("Assembly Line", SaveMode::PerDay, date()),
            "assembly_line_2024-03-09.csv"
        );
    }

    #[test]
    fn file_name_is_stable_for_equivalent_names() {
        assert_eq!(
            log_file_name("assembly line", SaveMode::SingleFile, date()),
            log_file_name("Assembly Line", SaveMode::SingleFile, date())
        );
    }

    #[test]
    fn projects_are_discovered_from_both_modes() {
        let dir = tempfile::tempdir().unwrap();
        for name in [
            "assembly_log.csv",
            "assembly_2024-03-09.csv",
            "packing_2024-03-10.csv",
            "_log.csv",
            "notes.txt",
            "random.csv",
            "weird_2024-13-40.csv",
        ] {
            std::fs::write(dir.path().join(name), "").unwrap();
        }
        assert_eq!(
            list_projects(dir.path()).unwrap(),
            vec!["assembly".to_string(), "packing".to_string()]
        );
    }

    #[test]
    fn missing_data_dir_lists_nothing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(list_projects(&dir.path().join("absent")).unwrap().is_empty());
    }
}
