//! Types and methods for reading and parsing input and writing output.

pub mod fasta;
pub mod file;

pub use fasta::{read_sequence_records, SequenceRecord};
pub use file::{InputFile, OutputFile};
