//! Reading FASTA records with [`noodles::fasta`].

use noodles::fasta;
use std::path::PathBuf;

use crate::error::EntromapError;
use crate::io::file::InputFile;
use crate::sequences::nucleotide::Nucleotides;

/// A FASTA record: the full definition line (without the leading `>`), and
/// the raw sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct SequenceRecord {
    pub description: String,
    pub sequence: Nucleotides,
}

impl SequenceRecord {
    pub fn new(description: impl Into<String>, sequence: impl Into<Nucleotides>) -> Self {
        Self {
            description: description.into(),
            sequence: sequence.into(),
        }
    }
}

/// Use the [`noodles`] library to read all records of a (possibly gzipped) FASTA file.
///
/// `noodles` splits the definition line into a name and an optional description
/// at the first space; these are joined back together here, since the metadata
/// fields may contain spaces.
pub fn read_sequence_records(
    filepath: impl Into<PathBuf>,
) -> Result<Vec<SequenceRecord>, EntromapError> {
    let input_file = InputFile::new(filepath);
    let mut reader = fasta::Reader::new(input_file.reader()?);

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result?;
        let definition = record.definition();
        let mut description = String::from_utf8_lossy(definition.name().as_ref()).into_owned();
        if let Some(rest) = definition.description() {
            description.push(' ');
            description.push_str(&String::from_utf8_lossy(rest.as_ref()));
        }
        let sequence: Nucleotides = record.sequence().into();
        records.push(SequenceRecord {
            description,
            sequence,
        });
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::read_sequence_records;
    use crate::io::OutputFile;
    use crate::test_utilities::temp_fasta;
    use std::io::Write;

    #[test]
    fn test_read_records_keeps_full_definition() {
        let file = temp_fasta(&[
            ("CA|x|2021-01-15", "ACGT"),
            ("NY/123|EPI ISL|2020-05 extra", "AC\nGT"),
        ]);
        let records = read_sequence_records(file.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].description, "CA|x|2021-01-15");
        assert_eq!(records[1].description, "NY/123|EPI ISL|2020-05 extra");
        // multi-line sequences are joined
        assert_eq!(records[1].sequence.to_string(), "ACGT");
    }

    #[test]
    fn test_read_gzipped_fasta() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seqs.fa.gz");
        {
            let mut writer = OutputFile::new(&path).writer().unwrap();
            write!(writer, ">TX|a|2021-02-01\nACGA\n").unwrap();
        }
        let records = read_sequence_records(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].sequence.to_string(), "ACGA");
    }

    #[test]
    fn test_missing_fasta_is_an_error() {
        assert!(read_sequence_records("no/such/file.fasta").is_err());
    }
}
