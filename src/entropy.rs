//! Column-wise Shannon entropy of sequence groups, and the [`EntropyTable`].
//!
//! For a group of aligned sequences, the entropy of column `i` is
//!
//! ```text
//! H_i = -sum_s p_s log10(p_s)
//! ```
//!
//! where `p_s` is the proportion of sequences with symbol `s` at `i`. Only
//! observed symbols are summed. The group entropy is the mean over all
//! columns.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

use crate::error::EntromapError;
use crate::grouping::SequenceGroups;
use crate::metadata::{LocationKey, MonthKey};
use crate::sequences::nucleotide::Nucleotides;

/// What to do when the sequences of a group do not all have the same length.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LengthPolicy {
    /// Fail with [`EntromapError::UnequalSequenceLengths`].
    #[default]
    Strict,
    /// Only use the columns shared by all sequences, i.e. clip to the shortest.
    Truncate,
}

/// Symbol counts for one alignment column.
#[derive(Clone, Debug)]
pub struct SymbolCounts {
    counts: [usize; 256],
    total: usize,
}

impl Default for SymbolCounts {
    fn default() -> Self {
        Self {
            counts: [0; 256],
            total: 0,
        }
    }
}

impl SymbolCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count all symbols of an iterator.
    pub fn from_symbols(symbols: impl IntoIterator<Item = u8>) -> Self {
        let mut counts = Self::new();
        for symbol in symbols {
            counts.add(symbol);
        }
        counts
    }

    pub fn add(&mut self, symbol: u8) {
        self.counts[symbol as usize] += 1;
        self.total += 1;
    }

    /// The proportion of each observed symbol, in byte order.
    pub fn proportions(&self) -> Vec<(u8, f64)> {
        let total = self.total as f64;
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, &count)| count > 0)
            .map(|(symbol, &count)| (symbol as u8, count as f64 / total))
            .collect()
    }

    /// Shannon entropy (base 10) of the observed symbol distribution.
    pub fn entropy(&self) -> f64 {
        let mut entropy = 0.0;
        for (_, p) in self.proportions() {
            entropy -= p * p.log10();
        }
        entropy
    }
}

/// The entropy of column `position` across `sequences`.
///
/// All sequences must be at least `position + 1` long; shorter sequences
/// are not counted.
pub fn column_entropy(sequences: &[Nucleotides], position: usize) -> f64 {
    SymbolCounts::from_symbols(sequences.iter().filter_map(|seq| seq.symbol(position))).entropy()
}

/// The number of columns to use for a group, according to `policy`.
fn group_length(
    location: &LocationKey,
    month: &MonthKey,
    sequences: &[Nucleotides],
    policy: LengthPolicy,
) -> Result<usize, EntromapError> {
    let reference = sequences.first().map_or(0, |seq| seq.len());
    match policy {
        LengthPolicy::Strict => {
            if let Some(seq) = sequences.iter().find(|seq| seq.len() != reference) {
                return Err(EntromapError::UnequalSequenceLengths {
                    location: location.to_string(),
                    month: month.to_string(),
                    expected: reference,
                    found: seq.len(),
                });
            }
            Ok(reference)
        }
        LengthPolicy::Truncate => Ok(sequences
            .iter()
            .map(|seq| seq.len())
            .min()
            .unwrap_or(0)),
    }
}

/// The mean column entropy of a group of sequences. A group with no columns
/// has an entropy of zero.
pub fn group_entropy(
    location: &LocationKey,
    month: &MonthKey,
    sequences: &[Nucleotides],
    policy: LengthPolicy,
) -> Result<f64, EntromapError> {
    let length = group_length(location, month, sequences, policy)?;
    if length == 0 {
        debug!("group {}/{} has no columns", location, month);
        return Ok(0.0);
    }
    let total: f64 = (0..length)
        .map(|position| column_entropy(sequences, position))
        .sum();
    Ok(total / length as f64)
}

/// The entropy of one (location, month) group.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroupEntropy {
    pub entropy: f64,
    pub n_sequences: usize,
}

/// One row of the tabular entropy output.
#[derive(Debug, Serialize, PartialEq)]
pub struct EntropyRow<'a> {
    pub location: &'a str,
    pub month: &'a str,
    pub n_sequences: usize,
    pub entropy: f64,
}

/// Entropy values for every (location, month) group, and their maximum.
#[derive(Clone, Debug)]
pub struct EntropyTable {
    values: BTreeMap<LocationKey, BTreeMap<MonthKey, GroupEntropy>>,
    max_entropy: f64,
}

impl EntropyTable {
    /// Compute the entropy of every group.
    ///
    /// # Errors
    /// Returns [`EntromapError::NoEntropyValues`] if there are no groups, and
    /// [`EntromapError::UnequalSequenceLengths`] if a group violates the
    /// [`LengthPolicy::Strict`] policy.
    pub fn from_groups(
        groups: &SequenceGroups,
        policy: LengthPolicy,
    ) -> Result<Self, EntromapError> {
        let mut values: BTreeMap<LocationKey, BTreeMap<MonthKey, GroupEntropy>> = BTreeMap::new();
        let mut max_entropy: Option<f64> = None;

        for (location, month, sequences) in groups.iter() {
            let entropy = group_entropy(location, month, sequences, policy)?;
            info!(
                "entropy for {} in {}: {:.6} ({} sequences)",
                location,
                month,
                entropy,
                sequences.len()
            );
            max_entropy = Some(max_entropy.map_or(entropy, |max| max.max(entropy)));
            values.entry(location.clone()).or_default().insert(
                month.clone(),
                GroupEntropy {
                    entropy,
                    n_sequences: sequences.len(),
                },
            );
        }

        let table = Self {
            values,
            max_entropy: max_entropy.unwrap_or_default(),
        };
        if table.is_empty() {
            return Err(EntromapError::NoEntropyValues);
        }
        info!(
            "computed {} group entropies; global maximum entropy: {:.6}",
            table.len(),
            table.max_entropy
        );
        Ok(table)
    }

    /// The entropy of a location in a month, if that group exists.
    pub fn get(&self, location: &str, month: &str) -> Option<f64> {
        self.values
            .get(location)
            .and_then(|months| months.get(month))
            .map(|group| group.entropy)
    }

    /// The largest entropy of any group.
    pub fn max_entropy(&self) -> f64 {
        self.max_entropy
    }

    /// All distinct months with at least one group, in ascending order.
    pub fn months(&self) -> Vec<MonthKey> {
        let months: BTreeSet<&MonthKey> = self.values.values().flat_map(|m| m.keys()).collect();
        months.into_iter().cloned().collect()
    }

    /// The number of (location, month) entries.
    pub fn len(&self) -> usize {
        self.values.values().map(|months| months.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over rows, ordered by location then month.
    pub fn rows(&self) -> impl Iterator<Item = EntropyRow<'_>> {
        self.values.iter().flat_map(|(location, months)| {
            months.iter().map(move |(month, group)| EntropyRow {
                location: location.as_str(),
                month: month.as_str(),
                n_sequences: group.n_sequences,
                entropy: group.entropy,
            })
        })
    }
}
