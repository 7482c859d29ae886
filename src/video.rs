//! Encoding of rendered frames into a video.
//!
//! GIF output (`.gif`) is encoded in-process with the [`image`] crate. Any
//! other container (e.g. `.mp4`) is produced by an external `ffmpeg`, which
//! must be on the `PATH`; frames are piped to it in order.

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::info;

use crate::error::EntromapError;

pub const DEFAULT_FPS: u32 = 1;

/// GIF quantization speed, from 1 (best quality) to 30 (fastest).
const GIF_SPEED: i32 = 10;

/// How a video file is written, chosen from its extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VideoFormat {
    Gif,
    Ffmpeg,
}

impl VideoFormat {
    pub fn from_path(path: &Path) -> Self {
        let is_gif = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map_or(false, |ext| ext.eq_ignore_ascii_case("gif"));
        if is_gif {
            VideoFormat::Gif
        } else {
            VideoFormat::Ffmpeg
        }
    }
}

/// Encode `frames`, in order, into a video at `fps` frames per second.
pub fn encode_video(frames: &[PathBuf], output: &Path, fps: u32) -> Result<(), EntromapError> {
    if frames.is_empty() {
        return Err(EntromapError::VideoEncoding("no frames to encode".to_string()));
    }
    if fps == 0 {
        return Err(EntromapError::VideoEncoding(
            "frame rate must be at least 1".to_string(),
        ));
    }
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    match VideoFormat::from_path(output) {
        VideoFormat::Gif => encode_gif(frames, output, fps)?,
        VideoFormat::Ffmpeg => encode_ffmpeg(frames, output, fps)?,
    }
    info!(
        "wrote video '{}' ({} frames at {} fps)",
        output.display(),
        frames.len(),
        fps
    );
    Ok(())
}

/// Frames are read back from disk one at a time.
fn encode_gif(frames: &[PathBuf], output: &Path, fps: u32) -> Result<(), EntromapError> {
    let writer = BufWriter::new(File::create(output)?);
    let mut encoder = GifEncoder::new_with_speed(writer, GIF_SPEED);
    encoder.set_repeat(Repeat::Infinite)?;
    let delay = Delay::from_numer_denom_ms(1000, fps);
    for path in frames {
        let image = image::open(path)?.to_rgba8();
        encoder.encode_frame(Frame::from_parts(image, 0, 0, delay))?;
    }
    Ok(())
}

fn encode_ffmpeg(frames: &[PathBuf], output: &Path, fps: u32) -> Result<(), EntromapError> {
    pipe_frames(Command::new("ffmpeg"), frames, output, fps)
}

/// Run `command` with the ffmpeg arguments and write every frame to its
/// standard input. The child is always waited on, and a failed exit status is
/// reported ahead of any write error.
fn pipe_frames(
    mut command: Command,
    frames: &[PathBuf],
    output: &Path,
    fps: u32,
) -> Result<(), EntromapError> {
    let fps = fps.to_string();
    let fps = fps.as_str();
    let mut child = command
        .args(["-y", "-loglevel", "error", "-nostats"])
        .args(["-f", "image2pipe", "-c:v", "png", "-framerate", fps, "-i", "-"])
        // H.264 needs even dimensions
        .args(["-vf", "pad=ceil(iw/2)*2:ceil(ih/2)*2"])
        .args(["-c:v", "libx264", "-pix_fmt", "yuv420p", "-r", fps])
        .arg(output)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .spawn()
        .map_err(|e| {
            EntromapError::VideoEncoding(format!(
                "could not run 'ffmpeg' ({}); install it, or write a '.gif' video instead",
                e
            ))
        })?;

    let written = match child.stdin.take() {
        Some(mut stdin) => send_frames(&mut stdin, frames),
        None => Err(EntromapError::VideoEncoding(
            "could not open 'ffmpeg' standard input".to_string(),
        )),
    };

    let status = child.wait()?;
    if !status.success() {
        return Err(EntromapError::VideoEncoding(format!(
            "'ffmpeg' exited with {}",
            status
        )));
    }
    written
}

/// Stops at the first frame that cannot be read or written.
fn send_frames(stdin: &mut impl Write, frames: &[PathBuf]) -> Result<(), EntromapError> {
    for path in frames {
        let bytes = fs::read(path)?;
        stdin.write_all(&bytes).map_err(|e| {
            EntromapError::VideoEncoding(format!(
                "could not send frame '{}' to 'ffmpeg': {}",
                path.display(),
                e
            ))
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::codecs::gif::GifDecoder;
    use image::{AnimationDecoder, Rgba, RgbaImage};
    use std::io::BufReader;

    fn write_frames(dir: &Path, colors: &[[u8; 4]]) -> Vec<PathBuf> {
        colors
            .iter()
            .enumerate()
            .map(|(i, color)| {
                let path = dir.join(format!("frame_{}.png", i));
                RgbaImage::from_pixel(8, 6, Rgba(*color)).save(&path).unwrap();
                path
            })
            .collect()
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(VideoFormat::from_path(Path::new("a/b.gif")), VideoFormat::Gif);
        assert_eq!(VideoFormat::from_path(Path::new("b.GIF")), VideoFormat::Gif);
        assert_eq!(VideoFormat::from_path(Path::new("b.mp4")), VideoFormat::Ffmpeg);
        assert_eq!(VideoFormat::from_path(Path::new("video")), VideoFormat::Ffmpeg);
    }

    #[test]
    fn test_gif_has_one_frame_per_image() {
        let dir = tempfile::tempdir().unwrap();
        let frames = write_frames(
            dir.path(),
            &[[0, 0, 255, 255], [0, 128, 0, 255], [255, 0, 0, 255]],
        );
        let output = dir.path().join("out/video.gif");
        encode_video(&frames, &output, 1).unwrap();

        let decoder = GifDecoder::new(BufReader::new(File::open(&output).unwrap())).unwrap();
        let decoded = decoder.into_frames().collect_frames().unwrap();
        assert_eq!(decoded.len(), 3);
        for frame in &decoded {
            let (numer, denom) = frame.delay().numer_denom_ms();
            assert_eq!(numer as f64 / denom as f64, 1000.0);
        }
    }

    /// A stand-in for ffmpeg: a shell script run through `sh`.
    #[cfg(unix)]
    fn fake_ffmpeg(dir: &Path, script: &str) -> Command {
        let path = dir.join("ffmpeg.sh");
        fs::write(&path, script).unwrap();
        let mut command = Command::new("sh");
        command.arg(path);
        command
    }

    #[cfg(unix)]
    #[test]
    fn test_ffmpeg_early_exit_reports_status() {
        let dir = tempfile::tempdir().unwrap();
        // large noisy frames, so writing them overflows the pipe buffer
        let frames: Vec<PathBuf> = (0..3)
            .map(|i| {
                let path = dir.path().join(format!("frame_{}.png", i));
                let image = RgbaImage::from_fn(1500, 1500, |x, y| {
                    let v = (x.wrapping_mul(7919) ^ y.wrapping_mul(104729) ^ i) as u8;
                    Rgba([v, v.wrapping_mul(3), v.wrapping_mul(5), 255])
                });
                image.save(&path).unwrap();
                path
            })
            .collect();
        let command = fake_ffmpeg(dir.path(), "echo 'Unknown encoder' >&2\nexit 1\n");
        let result = pipe_frames(command, &frames, &dir.path().join("video.mp4"), 1);
        match result {
            Err(EntromapError::VideoEncoding(message)) => {
                assert!(message.contains("exited with"), "{}", message)
            }
            other => panic!("expected a video encoding error, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_ffmpeg_success_consumes_all_frames() {
        let dir = tempfile::tempdir().unwrap();
        let frames = write_frames(dir.path(), &[[0, 0, 255, 255], [255, 0, 0, 255]]);
        let received = dir.path().join("received");
        let script = format!("cat > '{}'\n", received.display());
        let command = fake_ffmpeg(dir.path(), &script);
        pipe_frames(command, &frames, &dir.path().join("video.mp4"), 2).unwrap();

        let expected: usize = frames.iter().map(|f| fs::read(f).unwrap().len()).sum();
        assert_eq!(fs::read(&received).unwrap().len(), expected);
    }

    #[test]
    fn test_invalid_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("video.gif");
        assert!(matches!(
            encode_video(&[], &output, 1),
            Err(EntromapError::VideoEncoding(_))
        ));
        let frames = write_frames(dir.path(), &[[0, 0, 0, 255]]);
        assert!(matches!(
            encode_video(&frames, &output, 0),
            Err(EntromapError::VideoEncoding(_))
        ));
    }
}
