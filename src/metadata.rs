//! Parsing of the pipe-delimited metadata in FASTA descriptions.
//!
//! Descriptions look like `CA-CDC-1234|EPI_ISL_0000|2021-01-15`: the first
//! field starts with the two-letter location code, and the *last* field is
//! a date in `YYYY[-MM[-DD]]` form. Anything between is ignored.

use std::borrow::Borrow;
use std::fmt;

/// The minimum number of `|`-delimited fields a description must have.
pub const MIN_DESCRIPTION_FIELDS: usize = 3;

/// The month used when a date only has a year.
pub const DEFAULT_MONTH: &str = "01";

/// A two-character, upper-case location (e.g. US state) code.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LocationKey(String);

impl LocationKey {
    /// Build a [`LocationKey`] from the first field of a description: its first two
    /// characters, trimmed and upper-cased. This is not validated against any list
    /// of known codes.
    pub fn from_field(field: &str) -> Self {
        let prefix: String = field.chars().take(2).collect();
        LocationKey(prefix.trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for LocationKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocationKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A `YYYY-MM` month key. With zero-padded months, lexicographic order is
/// chronological order.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey(String);

impl MonthKey {
    pub fn new(year: &str, month: &str) -> Self {
        MonthKey(format!("{}-{}", year, month))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for MonthKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The date field of a description, classified by how many `-`-delimited
/// parts it has.
#[derive(Clone, Debug, PartialEq)]
pub enum DateField<'a> {
    FullDate {
        year: &'a str,
        month: &'a str,
        day: &'a str,
    },
    YearMonth {
        year: &'a str,
        month: &'a str,
    },
    YearOnly {
        year: &'a str,
    },
    /// Empty, or more than three parts.
    Invalid { parts: usize },
}

impl<'a> DateField<'a> {
    /// Classify a (trimmed) date string.
    pub fn parse(date: &'a str) -> Self {
        if date.is_empty() {
            return DateField::Invalid { parts: 0 };
        }
        let parts: Vec<&str> = date.split('-').collect();
        match parts[..] {
            [year, month, day] => DateField::FullDate { year, month, day },
            [year, month] => DateField::YearMonth { year, month },
            [year] => DateField::YearOnly { year },
            _ => DateField::Invalid { parts: parts.len() },
        }
    }

    /// The [`MonthKey`] for this date; `None` if the date is invalid.
    pub fn month_key(&self) -> Option<MonthKey> {
        match self {
            DateField::FullDate { year, month, .. } | DateField::YearMonth { year, month } => {
                Some(MonthKey::new(year, month))
            }
            DateField::YearOnly { year } => Some(MonthKey::new(year, DEFAULT_MONTH)),
            DateField::Invalid { .. } => None,
        }
    }

    /// A note for the user when the date was incomplete, but still usable.
    pub fn note(&self) -> Option<String> {
        match self {
            DateField::FullDate { .. } | DateField::Invalid { .. } => None,
            DateField::YearMonth { year, month } => {
                Some(format!("date '{}-{}' has no day", year, month))
            }
            DateField::YearOnly { year } => Some(format!(
                "date '{}' has no month, defaulting to '{}'",
                year, DEFAULT_MONTH
            )),
        }
    }
}

/// Why a description could not be used.
#[derive(Clone, Debug, PartialEq)]
pub enum SkipReason {
    TooFewFields(usize),
    InvalidDate(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SkipReason::TooFewFields(n) => write!(
                f,
                "description has {} '|'-delimited field(s), at least {} are required",
                n, MIN_DESCRIPTION_FIELDS
            ),
            SkipReason::InvalidDate(date) => write!(f, "could not parse date '{}'", date),
        }
    }
}

/// The keys extracted from a usable description.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordKeys {
    pub location: LocationKey,
    pub month: MonthKey,
    /// Set when the date was incomplete (see [`DateField::note`]).
    pub note: Option<String>,
}

/// Extract the location and month keys from a FASTA description.
pub fn parse_description(description: &str) -> Result<RecordKeys, SkipReason> {
    let fields: Vec<&str> = description.split('|').collect();
    if fields.len() < MIN_DESCRIPTION_FIELDS {
        return Err(SkipReason::TooFewFields(fields.len()));
    }

    let location = LocationKey::from_field(fields[0]);
    // the length check above guarantees a last field
    let date_str = fields[fields.len() - 1].trim();
    let date = DateField::parse(date_str);
    let month = date
        .month_key()
        .ok_or_else(|| SkipReason::InvalidDate(date_str.to_string()))?;

    Ok(RecordKeys {
        location,
        month,
        note: date.note(),
    })
}
