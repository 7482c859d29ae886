//! The [`EntromapError`] `enum` definition and error messages.
//!
use std::path::PathBuf;
use thiserror::Error;

/// The [`EntromapError`] defines the standard set of errors that should
/// be passed to the user.
///
/// Malformed FASTA records are *not* errors: they are skipped and noted in
/// the [`Report`](crate::reporting::Report).
#[derive(Debug, Error)]
pub enum EntromapError {
    // IO related errors
    #[error("File reading error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("TSV writing error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    // Boundary dataset errors
    #[error("Boundary dataset is invalid: {0}")]
    InvalidBoundaries(String),
    #[error("Invalid map extent '{0}': expected 'west,east,south,north'")]
    InvalidExtent(String),

    // Entropy errors
    #[error("No entropy values were computed; the input contained no usable records")]
    NoEntropyValues,
    #[error("Sequences in group {location}/{month} have unequal lengths: expected {expected}, found {found}.\nUse '--length-policy truncate' to clip each group to its shortest sequence.")]
    UnequalSequenceLengths {
        location: String,
        month: String,
        expected: usize,
        found: usize,
    },

    // Rendering errors
    #[error("Rendering error: {0}")]
    Render(String),
    #[error("Could not load font file '{}'", .0.display())]
    InvalidFont(PathBuf),
    #[error("Video encoding error: {0}")]
    VideoEncoding(String),
}
