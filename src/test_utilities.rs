//! Test cases and test utility functions.
//!

use rand::{seq::SliceRandom, thread_rng};
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

use crate::boundaries::DEFAULT_STATE_FIELD;
use crate::sequences::nucleotide::Nucleotides;

const NUCLEOTIDES: [u8; 4] = [b'A', b'C', b'G', b'T'];

/// Get the path to the `entromap` binary built for the integration tests.
pub fn entromap_binary_path() -> PathBuf {
    let mut path = std::env::current_exe().expect("could not get test binary path");
    path.pop();
    if path.ends_with("deps") {
        path.pop();
    }
    path.push(format!("entromap{}", std::env::consts::EXE_SUFFIX));
    path
}

/// Check two floats are within `tol`.
pub fn assert_float_eq(left: f64, right: f64, tol: f64) {
    assert!(
        (left - right).abs() < tol,
        "assertion failed: {} is not within {} of {}",
        left,
        tol,
        right
    );
}

/// Build a random nucleotide sequence of length `len`.
pub fn random_nucleotides(len: usize) -> Nucleotides {
    let mut rng = thread_rng();
    let seq: String = (0..len)
        .map(|_| *NUCLEOTIDES.choose(&mut rng).unwrap() as char)
        .collect();
    Nucleotides::from(seq)
}

/// Write `(description, sequence)` records to a temporary FASTA file.
pub fn temp_fasta(records: &[(&str, &str)]) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".fasta")
        .tempfile()
        .expect("could not create temporary FASTA file");
    for (description, sequence) in records {
        writeln!(file, ">{}\n{}", description, sequence).expect("could not write FASTA record");
    }
    file.flush().expect("could not flush FASTA file");
    file
}

/// A GeoJSON feature for a unit square with its lower left corner at
/// `(x, y)`, with `code` in the `field` property.
pub fn square_feature(field: &str, code: &str, x: f64, y: f64) -> String {
    format!(
        r#"{{"type": "Feature", "properties": {{"{field}": "{code}"}}, "geometry": {{"type": "Polygon", "coordinates": [[[{x0}, {y0}], [{x1}, {y0}], [{x1}, {y1}], [{x0}, {y1}], [{x0}, {y0}]]]}}}}"#,
        field = field,
        code = code,
        x0 = x,
        y0 = y,
        x1 = x + 1.0,
        y1 = y + 1.0
    )
}

/// A GeoJSON feature collection of unit squares, `(code, x, y)`.
pub fn squares_geojson(squares: &[(&str, f64, f64)]) -> String {
    let features: Vec<String> = squares
        .iter()
        .map(|(code, x, y)| square_feature(DEFAULT_STATE_FIELD, code, *x, *y))
        .collect();
    format!(
        r#"{{"type": "FeatureCollection", "features": [{}]}}"#,
        features.join(", ")
    )
}

/// Write [`squares_geojson`] to a temporary file.
pub fn temp_geojson(squares: &[(&str, f64, f64)]) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".geojson")
        .tempfile()
        .expect("could not create temporary GeoJSON file");
    file.write_all(squares_geojson(squares).as_bytes())
        .expect("could not write GeoJSON");
    file.flush().expect("could not flush GeoJSON file");
    file
}
