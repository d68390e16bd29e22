use std::io::ErrorKind;
use std::path::Path;

use anyhow::Result;

use crate::types::LogEntry;

pub const COLUMNS: [&str; 5] = [
    "Project",
    "Shift",
    "Element",
    "Duration (s)",
    "Formatted Time",
];

/// Longest single interval accepted on reload. Anything above is treated as corrupt.
const MAX_DURATION_SECS: f64 = 365.0 * 24.0 * 3600.0;

/// What came back from reading a log file.
#[derive(Debug, PartialEq)]
pub enum LoadOutcome {
    Loaded(Vec<LogEntry>),
    /// No file yet. Start with an empty log.
    Missing,
    /// The file exists but could not be parsed.
    Malformed(String),
}

/// Writes the whole log, header first, replacing any previous file.
pub fn write_log(path: &Path, entries: &[LogEntry]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    wtr.write_record(COLUMNS)?;
    for entry in entries {
        wtr.serialize(entry)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn read_log(path: &Path) -> LoadOutcome {
    let mut rdr = match csv::Reader::from_path(path) {
        Ok(rdr) => rdr,
        Err(err) => {
            if let csv::ErrorKind::Io(io) = err.kind() {
                if io.kind() == ErrorKind::NotFound {
                    return LoadOutcome::Missing;
                }
            }
            return LoadOutcome::Malformed(err.to_string());
        }
    };

    match rdr.headers() {
        Ok(headers) if headers.iter().eq(COLUMNS) => {}
        Ok(headers) if headers.is_empty() => return LoadOutcome::Loaded(Vec::new()),
        Ok(headers) => {
            return LoadOutcome::Malformed(format!(
                "unexpected columns: {}",
                headers.iter().collect::<Vec<_>>().join(", ")
            ));
        }
        Err(err) => return LoadOutcome::Malformed(err.to_string()),
    }

    let mut entries = Vec::new();
    for row in rdr.deserialize::<LogEntry>() {
        match row {
            Ok(entry) if (0.0..=MAX_DURATION_SECS).contains(&entry.duration_secs) => {
                entries.push(entry)
            }
            Ok(entry) => {
                return LoadOutcome::Malformed(format!(
                    "invalid duration {} for '{}'",
                    entry.duration_secs, entry.element
                ));
            }
            Err(err) => return LoadOutcome::Malformed(err.to_string()),
        }
    }
    LoadOutcome::Loaded(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Shift;

    fn entry(element: &str, secs: f64, formatted: &str) -> LogEntry {
        LogEntry {
            project: "Assembly Line".into(),
            shift: Shift::Shift2,
            element: element.into(),
            duration_secs: secs,
            formatted: formatted.into(),
        }
    }

    #[test]
    fn export_then_reload_reproduces_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("assembly_line_log.csv");
        let rows = vec![
            entry("Pick", 12.5, "00:12.500"),
            entry("Place, left", 7.5, "00:07.500"),
            entry("Pick", 0.001, "00:00.001"),
        ];
        write_log(&path, &rows).unwrap();
        assert_eq!(read_log(&path), LoadOutcome::Loaded(rows));
    }

    #[test]
    fn header_uses_the_exact_column_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_log(&path, &[entry("Pick", 1.0, "00:01.000")]).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        let mut lines = raw.lines();
        assert_eq!(
            lines.next(),
            Some("Project,Shift,Element,Duration (s),Formatted Time")
        );
        assert_eq!(lines.next(), Some("Assembly Line,Shift 2,Pick,1.0,00:01.000"));
    }

    #[test]
    fn empty_log_writes_only_the_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("empty.csv");
        write_log(&path, &[]).unwrap();
        assert_eq!(read_log(&path), LoadOutcome::Loaded(Vec::new()));
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(read_log(&dir.path().join("nope.csv")), LoadOutcome::Missing);
    }

    #[test]
    fn wrong_columns_are_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(&path, "a,b\n1,2\n").unwrap();
        assert!(matches!(read_log(&path), LoadOutcome::Malformed(_)));
    }

    #[test]
    fn bad_rows_are_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(
            &path,
            "Project,Shift,Element,Duration (s),Formatted Time\nA,Shift 9,Pick,1.0,00:01.000\n",
        )
        .unwrap();
        assert!(matches!(read_log(&path), LoadOutcome::Malformed(_)));

        std::fs::write(
            &path,
            "Project,Shift,Element,Duration (s),Formatted Time\nA,Shift 1,Pick,soon,00:01.000\n",
        )
        .unwrap();
        assert!(matches!(read_log(&path), LoadOutcome::Malformed(_)));
    }

    #[test]
    fn out_of_range_durations_are_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        for duration in ["inf", "1e30", "NaN", "-1.0"] {
            std::fs::write(
                &path,
                format!(
                    "Project,Shift,Element,Duration (s),Formatted Time\n\
                     A,Shift 1,Pick,1.0,00:01.000\n\
                     A,Shift 1,Pick,{duration},00:01.000\n"
                ),
            )
            .unwrap();
            assert!(
                matches!(read_log(&path), LoadOutcome::Malformed(_)),
                "{duration} should be rejected"
            );
        }
    }
}
