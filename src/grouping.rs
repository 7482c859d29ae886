//! Grouping of sequences by location and month, with [`SequenceGroups`].

use std::collections::BTreeMap;

use crate::io::SequenceRecord;
use crate::metadata::{parse_description, LocationKey, MonthKey};
use crate::reporting::Report;
use crate::sequences::nucleotide::Nucleotides;

/// Raw sequences grouped by location, then by month. Both levels are
/// ordered by key.
#[derive(Clone, Debug, Default)]
pub struct SequenceGroups {
    groups: BTreeMap<LocationKey, BTreeMap<MonthKey, Vec<Nucleotides>>>,
}

impl SequenceGroups {
    /// Build the groups in a single pass over `records`.
    ///
    /// Records whose description cannot be used are dropped, and an issue is
    /// added to `report`. Records with an incomplete (but usable) date are kept,
    /// and also noted in `report`.
    pub fn from_records(
        records: impl IntoIterator<Item = SequenceRecord>,
        report: &mut Report,
    ) -> Self {
        let mut groups = SequenceGroups::default();
        for record in records {
            match parse_description(&record.description) {
                Ok(keys) => {
                    if let Some(note) = keys.note {
                        report.add_issue(format!(
                            "record '{}': {}",
                            record.description, note
                        ));
                    }
                    groups.push(keys.location, keys.month, record.sequence);
                }
                Err(reason) => report.add_issue(format!(
                    "skipping record '{}': {}",
                    record.description, reason
                )),
            }
        }
        groups
    }

    /// Append a sequence to the group for `location` and `month`.
    pub fn push(&mut self, location: LocationKey, month: MonthKey, sequence: Nucleotides) {
        self.groups
            .entry(location)
            .or_default()
            .entry(month)
            .or_default()
            .push(sequence);
    }

    /// Get the sequences for a location and month, if any.
    pub fn get(&self, location: &str, month: &str) -> Option<&[Nucleotides]> {
        self.groups
            .get(location)
            .and_then(|months| months.get(month))
            .map(|seqs| seqs.as_slice())
    }

    /// Iterate over all `(location, month, sequences)` groups, ordered by location
    /// then month.
    pub fn iter(&self) -> impl Iterator<Item = (&LocationKey, &MonthKey, &[Nucleotides])> {
        self.groups.iter().flat_map(|(location, months)| {
            months
                .iter()
                .map(move |(month, seqs)| (location, month, seqs.as_slice()))
        })
    }

    /// The number of (location, month) groups.
    pub fn len(&self) -> usize {
        self.groups.values().map(|months| months.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
