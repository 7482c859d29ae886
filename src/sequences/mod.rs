//! Types for working with raw sequence data.
//!
//! Sequences are kept exactly as read from the FASTA file (no case folding,
//! no alphabet validation), since entropy is computed over whatever symbols
//! appear in each column.

pub mod nucleotide;
