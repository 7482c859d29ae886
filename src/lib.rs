//! # entromap: per-region, per-month sequence entropy maps
//!
//! `entromap` groups sequences from a FASTA file by the location and
//! collection month stored in each record's description, computes the mean
//! column-wise Shannon entropy of every (location, month) group, and renders
//! one choropleth frame per month which are then assembled into a video.
//!
//! ## Pipeline
//!
//!  1. [`grouping::SequenceGroups`]: parse records into groups, reporting any
//!     records that had to be skipped (see [`metadata`] for the description
//!     format).
//!  2. [`entropy::EntropyTable`]: compute the entropy of every group, and the
//!     global maximum used for the color scale.
//!  3. [`color::ColorScale`]: map entropy values onto a blue → red gradient.
//!  4. [`render`] and [`video`]: draw one frame per month and encode the
//!     frames into a video.
//!
//! The [`commands`] module ties these together, and is what the `entromap`
//! command line tool calls.

pub mod boundaries;
pub mod color;
pub mod commands;
pub mod entropy;
pub mod error;
pub mod grouping;
pub mod io;
pub mod metadata;
pub mod render;
pub mod reporting;
pub mod sequences;
pub mod test_utilities;
pub mod video;

/// The two-letter codes of the 50 US states, in the order frames are
/// built. Only these locations are rendered; other location keys are kept
/// in the entropy table but never drawn.
pub const STATE_CODES: [&str; 50] = [
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "FL", "GA", "HI", "ID", "IL", "IN", "IA",
    "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH", "NJ",
    "NM", "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT",
    "VA", "WA", "WV", "WI", "WY",
];

pub mod prelude {
    pub use crate::boundaries::Boundaries;
    pub use crate::color::{ColorRamp, ColorScale};
    pub use crate::entropy::{EntropyTable, LengthPolicy};
    pub use crate::error::EntromapError;
    pub use crate::grouping::SequenceGroups;
    pub use crate::io::{read_sequence_records, InputFile, OutputFile};
    pub use crate::metadata::{DateField, LocationKey, MonthKey};
    pub use crate::render::RenderConfig;
    pub use crate::sequences::nucleotide::Nucleotides;
}
