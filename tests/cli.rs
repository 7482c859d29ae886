//! End-to-end tests of the `entromap` command line tool.

use entromap::test_utilities::{entromap_binary_path, temp_fasta, temp_geojson};
use std::process::Command;

#[test]
fn test_entropy_subcommand_to_stdout() {
    let fasta = temp_fasta(&[
        ("CA|x|2021-01-15", "ACGT"),
        ("CA|x|2021-01-20", "ACGA"),
        ("X|Y", "ACGT"),
        ("NY|x|2020", "ACGT"),
    ]);

    let output = Command::new(entromap_binary_path())
        .arg("entropy")
        .arg("--fasta")
        .arg(fasta.path())
        .output()
        .expect("entromap entropy failed");
    assert!(output.status.success(), "{:?}", output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "location\tmonth\tn_sequences\tentropy");
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("CA\t2021-01\t2\t"));
    assert_eq!(lines[2], "NY\t2020-01\t1\t0.0");

    // the skipped record is reported on standard error
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("skipping record 'X|Y'"), "{}", stderr);
}

#[test]
fn test_entropy_subcommand_length_policy() {
    let fasta = temp_fasta(&[("CA|x|2021-01-15", "ACGT"), ("CA|x|2021-01-20", "ACG")]);

    let strict = Command::new(entromap_binary_path())
        .args(["entropy", "--fasta"])
        .arg(fasta.path())
        .output()
        .expect("entromap entropy failed");
    assert!(!strict.status.success());
    assert!(String::from_utf8_lossy(&strict.stderr).contains("unequal lengths"));

    let truncate = Command::new(entromap_binary_path())
        .args(["entropy", "--length-policy", "truncate", "--fasta"])
        .arg(fasta.path())
        .output()
        .expect("entromap entropy failed");
    assert!(truncate.status.success(), "{:?}", truncate);
}

#[test]
fn test_empty_input_is_fatal() {
    let fasta = temp_fasta(&[("X|Y", "ACGT")]);
    let output = Command::new(entromap_binary_path())
        .args(["entropy", "--fasta"])
        .arg(fasta.path())
        .output()
        .expect("entromap entropy failed");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("No entropy values"));
}

#[test]
fn test_render_subcommand_gif() {
    let dir = tempfile::tempdir().unwrap();
    let fasta = temp_fasta(&[
        ("CA|x|2021-02-15", "ACGT"),
        ("CA|x|2021-02-20", "ACGA"),
        ("TX|x|2021-01-01", "ACGT"),
        ("TX|x|2021-03-01", "ACGT"),
        ("TX|x|2021-03-02", "TTGT"),
    ]);
    let geojson = temp_geojson(&[("CA", -121.0, 36.0), ("TX", -100.0, 31.0), ("ny", -76.0, 42.0)]);
    let frames_dir = dir.path().join("frames");
    let video = dir.path().join("entropy.gif");

    let output = Command::new(entromap_binary_path())
        .arg("render")
        .arg("--fasta")
        .arg(fasta.path())
        .arg("--boundaries")
        .arg(geojson.path())
        .arg("--frames-dir")
        .arg(&frames_dir)
        .arg("--video")
        .arg(&video)
        .args(["--width", "240", "--height", "150"])
        .args(["--extent", "-125,-66,24,50"])
        .output()
        .expect("entromap render failed");
    assert!(output.status.success(), "{:?}", output);

    let mut frames: Vec<String> = std::fs::read_dir(&frames_dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    frames.sort();
    assert_eq!(
        frames,
        vec![
            "entropy_2021-01.png",
            "entropy_2021-02.png",
            "entropy_2021-03.png"
        ]
    );
    assert!(video.exists());
}

#[test]
fn test_render_missing_boundaries() {
    let dir = tempfile::tempdir().unwrap();
    let fasta = temp_fasta(&[("CA|x|2021-02-15", "ACGT")]);
    let output = Command::new(entromap_binary_path())
        .arg("render")
        .arg("--fasta")
        .arg(fasta.path())
        .arg("--boundaries")
        .arg(dir.path().join("missing.geojson"))
        .arg("--frames-dir")
        .arg(dir.path().join("frames"))
        .arg("--video")
        .arg(dir.path().join("entropy.gif"))
        .output()
        .expect("entromap render failed");
    assert!(!output.status.success());
    assert!(!dir.path().join("entropy.gif").exists());
}

#[test]
fn test_render_rejects_zero_frame_size() {
    let dir = tempfile::tempdir().unwrap();
    let fasta = temp_fasta(&[("CA|x|2021-02-15", "ACGT")]);
    let geojson = temp_geojson(&[("CA", -121.0, 36.0)]);
    for size in [["--width", "0"], ["--height", "0"]] {
        let frames_dir = dir.path().join("frames");
        let output = Command::new(entromap_binary_path())
            .arg("render")
            .arg("--fasta")
            .arg(fasta.path())
            .arg("--boundaries")
            .arg(geojson.path())
            .arg("--frames-dir")
            .arg(&frames_dir)
            .arg("--video")
            .arg(dir.path().join("entropy.gif"))
            .args(size)
            .output()
            .expect("entromap render failed");
        assert!(!output.status.success());
        assert_eq!(output.status.code(), Some(2), "{:?}", output);
        assert!(!frames_dir.exists());
    }
}
