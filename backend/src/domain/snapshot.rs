//! Snapshot naming: entity families, file series and timestamps.
//!
//! A snapshot file is named `{stem}-{timestamp}.json` and lives in its
//! family's directory. Timestamps are fixed-width ISO-8601 UTC with second
//! precision, so ascending lexicographic order of names within one series is
//! also chronological order.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, SubsecRound, Utc};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";
const EXTENSION: &str = ".json";

/// The three entity families captured in snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnapshotFamily {
    /// User accounts.
    Users,
    /// Per-user bars; depend on users.
    Bars,
    /// Cocktails with their ingredients.
    Cocktails,
}

impl SnapshotFamily {
    /// Families in foreign-key dependency order: parents before children.
    pub const RESTORE_ORDER: [Self; 3] = [Self::Users, Self::Bars, Self::Cocktails];

    /// Directory holding this family's snapshots, relative to the root.
    pub const fn directory(self) -> &'static str {
        match self {
            Self::Users => "Users",
            Self::Bars => "Bars",
            Self::Cocktails => "Cocktails",
        }
    }

    /// Lowercase family name, used as the stem of state snapshots.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Bars => "bars",
            Self::Cocktails => "cocktails",
        }
    }
}

impl fmt::Display for SnapshotFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named series of snapshot files within one family directory.
///
/// Each family has a state series written at shutdown (`users-…`,
/// `bars-…`, `cocktails-…`). The cocktail family additionally has the
/// export series (`cocktails-json-…`) written by the manual snapshot command
/// and read by the cocktails-only bootstrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SnapshotSeries {
    family: SnapshotFamily,
    stem: &'static str,
}

impl SnapshotSeries {
    /// Manual cocktail export series.
    pub const COCKTAIL_EXPORT: Self = Self {
        family: SnapshotFamily::Cocktails,
        stem: "cocktails-json",
    };

    /// The state series for `family`.
    pub const fn state(family: SnapshotFamily) -> Self {
        Self {
            family,
            stem: family.as_str(),
        }
    }

    /// Family whose directory holds the series.
    pub const fn family(self) -> SnapshotFamily {
        self.family
    }

    /// File name prefix shared by every file in the series.
    pub const fn stem(self) -> &'static str {
        self.stem
    }

    /// File name for a snapshot taken at `timestamp`.
    ///
    /// # Examples
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use cocktails::domain::{SnapshotFamily, SnapshotSeries, SnapshotTimestamp};
    ///
    /// let at = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
    /// let series = SnapshotSeries::state(SnapshotFamily::Cocktails);
    /// assert_eq!(
    ///     series.file_name(SnapshotTimestamp::new(at)),
    ///     "cocktails-2024-06-01T00:00:00Z.json"
    /// );
    /// ```
    pub fn file_name(self, timestamp: SnapshotTimestamp) -> String {
        format!("{}-{timestamp}{EXTENSION}", self.stem)
    }

    /// Parse the timestamp out of a file name belonging to this series.
    ///
    /// Returns `None` for names from other series, including the export
    /// series sharing the `cocktails` prefix.
    pub fn timestamp_of(self, file_name: &str) -> Option<SnapshotTimestamp> {
        let rest = file_name.strip_prefix(self.stem)?.strip_prefix('-')?;
        let stamp = rest.strip_suffix(EXTENSION)?;
        SnapshotTimestamp::parse(stamp)
    }

    /// Pick the latest file of this series from a directory listing.
    ///
    /// Names that do not belong to the series are ignored. Among the rest the
    /// lexicographically greatest name wins.
    pub fn select_latest<I, S>(self, names: I) -> Option<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut matching: Vec<String> = names
            .into_iter()
            .filter(|name| self.timestamp_of(name.as_ref()).is_some())
            .map(|name| name.as_ref().to_owned())
            .collect();
        matching.sort();
        matching.pop()
    }
}

/// Second-precision UTC instant embedded in snapshot file names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SnapshotTimestamp(DateTime<Utc>);

impl SnapshotTimestamp {
    /// Wrap an instant, truncating sub-second precision.
    pub fn new(at: DateTime<Utc>) -> Self {
        Self(at.trunc_subsecs(0))
    }

    /// Parse the `YYYY-MM-DDTHH:MM:SSZ` form.
    ///
    /// Only the zero-padded rendering is accepted, so name order and date
    /// order agree.
    pub fn parse(raw: &str) -> Option<Self> {
        let naive = NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).ok()?;
        let stamp = Self(naive.and_utc());
        (stamp.to_string() == raw).then_some(stamp)
    }

    /// The wrapped instant.
    pub const fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }
}

impl fmt::Display for SnapshotTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(TIMESTAMP_FORMAT))
    }
}
