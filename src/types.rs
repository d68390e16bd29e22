use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Work period attached to every log entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Shift {
    Shift1,
    Shift2,
    Shift3,
}

impl Shift {
    pub const ALL: [Shift; 3] = [Shift::Shift1, Shift::Shift2, Shift::Shift3];

    pub fn label(self) -> &'static str {
        match self {
            Shift::Shift1 => "Shift 1",
            Shift::Shift2 => "Shift 2",
            Shift::Shift3 => "Shift 3",
        }
    }

    /// Maps a 1-based shift number (as typed on the keyboard or CLI) to a shift.
    pub fn from_number(number: u8) -> Option<Shift> {
        match number {
            1 => Some(Shift::Shift1),
            2 => Some(Shift::Shift2),
            3 => Some(Shift::Shift3),
            _ => None,
        }
    }
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Shift {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Shift::ALL
            .into_iter()
            .find(|shift| shift.label() == s.trim())
            .ok_or_else(|| format!("unknown shift '{s}'"))
    }
}

impl Serialize for Shift {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Shift {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Display mode for durations. Never affects stored data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeFormat {
    #[default]
    MinutesSeconds,
    HoursMinutesSeconds,
}

impl TimeFormat {
    pub fn toggle(self) -> Self {
        match self {
            TimeFormat::MinutesSeconds => TimeFormat::HoursMinutesSeconds,
            TimeFormat::HoursMinutesSeconds => TimeFormat::MinutesSeconds,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeFormat::MinutesSeconds => "MM:SS",
            TimeFormat::HoursMinutesSeconds => "HH:MM:SS",
        }
    }
}

/// Persistence policy. Only changes the derived log file name.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveMode {
    #[default]
    SingleFile,
    PerDay,
}

impl SaveMode {
    pub fn toggle(self) -> Self {
        match self {
            SaveMode::SingleFile => SaveMode::PerDay,
            SaveMode::PerDay => SaveMode::SingleFile,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SaveMode::SingleFile => "single file",
            SaveMode::PerDay => "one file per day",
        }
    }
}

/// Display color assigned to an element. Purely visual, never an identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// A single finalized observation. Field names map onto the exported CSV columns.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    #[serde(rename = "Project")]
    pub project: String,
    #[serde(rename = "Shift")]
    pub shift: Shift,
    #[serde(rename = "Element")]
    pub element: String,
    #[serde(rename = "Duration (s)")]
    pub duration_secs: f64,
    #[serde(rename = "Formatted Time")]
    pub formatted: String,
}

impl LogEntry {
    /// Whole milliseconds of this entry, used to keep totals exact.
    pub fn duration_millis(&self) -> u64 {
        (self.duration_secs.max(0.0) * 1000.0).round() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_parses_its_own_label() {
        for shift in Shift::ALL {
            assert_eq!(shift.label().parse::<Shift>(), Ok(shift));
        }
        assert!("Shift 4".parse::<Shift>().is_err());
        assert!("".parse::<Shift>().is_err());
    }

    #[test]
    fn shift_from_number() {
        assert_eq!(Shift::from_number(2), Some(Shift::Shift2));
        assert_eq!(Shift::from_number(0), None);
        assert_eq!(Shift::from_number(4), None);
    }

    #[test]
    fn settings_toggle_back_and_forth() {
        assert_eq!(
            TimeFormat::MinutesSeconds.toggle(),
            TimeFormat::HoursMinutesSeconds
        );
        assert_eq!(TimeFormat::MinutesSeconds.toggle().toggle(), TimeFormat::MinutesSeconds);
        assert_eq!(SaveMode::SingleFile.toggle(), SaveMode::PerDay);
        assert_eq!(SaveMode::PerDay.toggle(), SaveMode::SingleFile);
    }

    #[test]
    fn rgb_displays_as_hex() {
        let color = Rgb { r: 255, g: 8, b: 0 };
        assert_eq!(color.to_string(), "#ff0800");
    }

    #[test]
    fn duration_millis_rounds() {
        let entry = LogEntry {
            project: "Assembly".into(),
            shift: Shift::Shift2,
            element: "Pick".into(),
            duration_secs: 12.5,
            formatted: "00:12.500".into(),
        };
        assert_eq!(entry.duration_millis(), 12_500);
    }
}
