//! The pipeline commands run by the `entromap` command line tool.

use std::path::{Path, PathBuf};
use tracing::info;

use crate::{
    boundaries::Boundaries,
    entropy::{EntropyTable, LengthPolicy},
    error::EntromapError,
    grouping::SequenceGroups,
    io::{read_sequence_records, OutputFile},
    render::{render_frames, RenderConfig},
    reporting::{CommandOutput, Report},
    video::encode_video,
};

/// The files written by [`entromap_render`].
#[derive(Debug)]
pub struct RenderOutput {
    /// The frames, in ascending month order.
    pub frames: Vec<PathBuf>,
    pub video: PathBuf,
}

/// Read a FASTA file, group its records by location and month, and compute
/// the entropy of every group.
pub fn compute_entropy_table(
    fasta: &Path,
    policy: LengthPolicy,
) -> Result<CommandOutput<EntropyTable>, EntromapError> {
    let records = read_sequence_records(fasta)?;
    info!(
        "read {} records from '{}'",
        records.len(),
        fasta.display()
    );

    // For reporting stuff to the user.
    let mut report = Report::new();
    let groups = SequenceGroups::from_records(records, &mut report);
    info!(
        "built {} location/month groups ({} records skipped or defaulted)",
        groups.len(),
        report.len()
    );

    let table = EntropyTable::from_groups(&groups, policy)?;
    Ok(CommandOutput::new(table, report))
}

/// Compute the entropy table and write it as TSV, with a header row.
pub fn entromap_entropy(
    fasta: &PathBuf,
    output: Option<&PathBuf>,
    policy: LengthPolicy,
) -> Result<CommandOutput<()>, EntromapError> {
    let CommandOutput { value: table, report } = compute_entropy_table(fasta, policy)?;

    let output_stream = output.map_or(OutputFile::new_stdout(), |file| OutputFile::new(file));
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_writer(output_stream.writer()?);
    for row in table.rows() {
        writer.serialize(row)?;
    }
    writer.flush()?;

    if let Some(path) = output {
        info!("wrote entropy table '{}'", path.display());
    }
    Ok(CommandOutput::new((), report))
}

/// Run the whole pipeline: compute the entropy table, render one frame per
/// month and encode the frames into a video.
///
/// The boundaries are loaded after the entropy table is computed; if they
/// cannot be loaded, nothing is rendered.
pub fn entromap_render(
    fasta: &PathBuf,
    boundaries: &PathBuf,
    state_field: &str,
    config: &RenderConfig,
    video: &PathBuf,
    fps: u32,
    policy: LengthPolicy,
) -> Result<CommandOutput<RenderOutput>, EntromapError> {
    let CommandOutput { value: table, report } = compute_entropy_table(fasta, policy)?;

    let boundaries = Boundaries::from_path(boundaries, state_field)?;
    let frames = render_frames(&table, &boundaries, config)?;
    info!(
        "wrote {} frames to '{}'",
        frames.len(),
        config.frames_dir.display()
    );

    encode_video(&frames, video, fps)?;

    let output = RenderOutput {
        frames,
        video: video.clone(),
    };
    Ok(CommandOutput::new(output, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundaries::DEFAULT_STATE_FIELD;
    use crate::test_utilities::{temp_fasta, temp_geojson};

    #[test]
    fn test_compute_entropy_table_reports_skips() {
        let fasta = temp_fasta(&[
            ("CA|x|2021-01-15", "ACGT"),
            ("CA|x|2021-01-20", "ACGA"),
            ("X|Y", "ACGT"),
            ("TX|x|2020", "ACGT"),
        ]);
        let output = compute_entropy_table(fasta.path(), LengthPolicy::Strict).unwrap();
        assert_eq!(output.report.len(), 2);
        assert_eq!(output.value.len(), 2);
        assert_eq!(output.value.get("TX", "2020-01"), Some(0.0));
    }

    #[test]
    fn test_entropy_tsv() {
        let dir = tempfile::tempdir().unwrap();
        let fasta = temp_fasta(&[
            ("CA|x|2021-01-15", "ACGT"),
            ("CA|x|2021-01-20", "ACGA"),
            ("NY|x|2021-02-01", "ACGT"),
        ]);
        let tsv = dir.path().join("entropy.tsv");
        entromap_entropy(&fasta.path().to_path_buf(), Some(&tsv), LengthPolicy::Strict).unwrap();

        let contents = std::fs::read_to_string(&tsv).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "location\tmonth\tn_sequences\tentropy");
        assert!(lines[1].starts_with("CA\t2021-01\t2\t0.0752"));
        assert_eq!(lines[2], "NY\t2021-02\t1\t0.0");
    }

    #[test]
    fn test_unequal_lengths_fail_the_command() {
        let fasta = temp_fasta(&[("CA|x|2021-01-15", "ACGT"), ("CA|x|2021-01-20", "AC")]);
        assert!(matches!(
            compute_entropy_table(fasta.path(), LengthPolicy::Strict),
            Err(EntromapError::UnequalSequenceLengths { .. })
        ));
        assert!(compute_entropy_table(fasta.path(), LengthPolicy::Truncate).is_ok());
    }

    #[test]
    fn test_missing_boundaries_abort_rendering() {
        let dir = tempfile::tempdir().unwrap();
        let fasta = temp_fasta(&[("CA|x|2021-01-15", "ACGT")]);
        let frames_dir = dir.path().join("frames");
        let config = RenderConfig::new(&frames_dir);
        let video = dir.path().join("video.gif");
        let result = entromap_render(
            &fasta.path().to_path_buf(),
            &dir.path().join("missing.geojson"),
            DEFAULT_STATE_FIELD,
            &config,
            &video,
            1,
            LengthPolicy::Strict,
        );
        assert!(result.is_err());
        assert!(!frames_dir.exists());
        assert!(!video.exists());
    }

    #[test]
    fn test_render_pipeline_gif() {
        let dir = tempfile::tempdir().unwrap();
        let fasta = temp_fasta(&[
            ("CA|x|2021-01-15", "ACGT"),
            ("CA|x|2021-01-20", "ACGA"),
            ("NY|x|2021-02-01", "ACGT"),
            ("NY|x|2021-02-03", "TGCA"),
        ]);
        let geojson = temp_geojson(&[("CA", -120.0, 36.0), ("NY", -75.0, 42.0)]);
        let mut config = RenderConfig::new(dir.path().join("frames"));
        config.width = 200;
        config.height = 120;
        let video = dir.path().join("entropy.gif");

        let output = entromap_render(
            &fasta.path().to_path_buf(),
            &geojson.path().to_path_buf(),
            DEFAULT_STATE_FIELD,
            &config,
            &video,
            1,
            LengthPolicy::Strict,
        )
        .unwrap();
        assert_eq!(output.value.frames.len(), 2);
        assert!(output.value.frames[0].ends_with("entropy_2021-01.png"));
        assert!(output.value.frames[1].ends_with("entropy_2021-02.png"));
        assert!(video.exists());
    }
}
