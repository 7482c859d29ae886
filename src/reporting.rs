//! Types for standardized reports to the user about pipeline steps.
//!
//! Parsing never aborts on a malformed FASTA record; instead the record
//! is dropped and an issue is added to a [`Report`], so that the user can
//! see exactly what was skipped or defaulted.
//!

use tracing::warn;

/// The [`CommandOutput<U>`] type output is generic over some data output
/// from a command, and a [`Report`] that reports information to the user.
pub struct CommandOutput<U> {
    pub value: U,
    pub report: Report,
}

impl<U> CommandOutput<U> {
    pub fn new(value: U, report: Report) -> Self {
        Self { value, report }
    }
}

/// A type to (semi) standardize reporting to the user.
#[derive(Debug, Default)]
pub struct Report {
    entries: Vec<String>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an issue, also logging it as a warning.
    pub fn add_issue(&mut self, message: String) {
        warn!("{}", message);
        self.entries.push(message)
    }

    pub fn issues(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
