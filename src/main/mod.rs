use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use entromap::{
    boundaries::{Extent, DEFAULT_STATE_FIELD},
    commands::{entromap_entropy, entromap_render},
    prelude::{EntromapError, LengthPolicy, RenderConfig},
    render::{DEFAULT_HEIGHT, DEFAULT_WIDTH},
    reporting::Report,
    video::DEFAULT_FPS,
};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

const INFO: &str = "\
entromap: per-state, per-month sequence entropy maps
usage: entromap [--help] <subcommand>

Subcommands:

  entropy: compute the entropy of every location/month group, as TSV.
  render:  render one choropleth frame per month, and encode them into a video.

";

#[derive(Parser)]
#[clap(name = "entromap")]
#[clap(about = INFO)]
struct Cli {
    /// increase logging verbosity (-d for debug, -dd for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    debug: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    Entropy {
        /// a FASTA file (possibly gzipped) with 'location|...|YYYY-MM-DD' descriptions
        #[arg(long, required = true)]
        fasta: PathBuf,

        /// an optional output file (standard output will be used if not specified)
        #[arg(long)]
        output: Option<PathBuf>,

        /// how to handle sequences of unequal length within a group
        #[arg(long, value_enum, default_value_t = LengthPolicy::Strict)]
        length_policy: LengthPolicy,
    },
    Render {
        /// a FASTA file (possibly gzipped) with 'location|...|YYYY-MM-DD' descriptions
        #[arg(long, required = true)]
        fasta: PathBuf,

        /// a GeoJSON FeatureCollection (possibly gzipped) of region boundaries
        #[arg(long, required = true)]
        boundaries: PathBuf,

        /// the feature property holding the two-letter location codes
        #[arg(long, default_value = DEFAULT_STATE_FIELD)]
        state_field: String,

        /// the directory the per-month frames are written to
        #[arg(long, default_value = "frames")]
        frames_dir: PathBuf,

        /// the output video; '.gif' is encoded directly, anything else with ffmpeg
        #[arg(long, default_value = "entropy_evolution.mp4")]
        video: PathBuf,

        /// frames per second of the video
        #[arg(long, default_value_t = DEFAULT_FPS, value_parser = clap::value_parser!(u32).range(1..))]
        fps: u32,

        /// frame width, in pixels
        #[arg(long, default_value_t = DEFAULT_WIDTH, value_parser = clap::value_parser!(u32).range(1..))]
        width: u32,

        /// frame height, in pixels
        #[arg(long, default_value_t = DEFAULT_HEIGHT, value_parser = clap::value_parser!(u32).range(1..))]
        height: u32,

        /// a TrueType font for the title and legend (common system fonts are tried otherwise)
        #[arg(long)]
        font: Option<PathBuf>,

        /// the map extent in degrees, as 'west,east,south,north' (e.g. '-125,-66,24,50')
        #[arg(long, allow_hyphen_values = true)]
        extent: Option<Extent>,

        /// how to handle sequences of unequal length within a group
        #[arg(long, value_enum, default_value_t = LengthPolicy::Strict)]
        length_policy: LengthPolicy,
    },
}

fn init_logging(debug: u8) {
    let level = match debug {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();
}

fn summarize(report: &Report) {
    for issue in report.issues() {
        debug!("report: {}", issue);
    }
    if !report.is_empty() {
        warn!(
            "{} record(s) were skipped or had incomplete dates; see the warnings above",
            report.len()
        );
    }
}

fn run() -> Result<(), EntromapError> {
    let cli = Cli::parse();
    init_logging(cli.debug);
    match &cli.command {
        Some(Commands::Entropy {
            fasta,
            output,
            length_policy,
        }) => {
            let output = entromap_entropy(fasta, output.as_ref(), *length_policy)?;
            summarize(&output.report);
        }
        Some(Commands::Render {
            fasta,
            boundaries,
            state_field,
            frames_dir,
            video,
            fps,
            width,
            height,
            font,
            extent,
            length_policy,
        }) => {
            let config = RenderConfig {
                frames_dir: frames_dir.clone(),
                width: *width,
                height: *height,
                font: font.clone(),
                extent: *extent,
            };
            let output = entromap_render(
                fasta,
                boundaries,
                state_field,
                &config,
                video,
                *fps,
                *length_policy,
            )?;
            summarize(&output.report);
            info!(
                "frames: '{}', video: '{}'",
                config.frames_dir.display(),
                output.value.video.display()
            );
        }
        None => {
            println!("{}\n", INFO);
            std::process::exit(1);
        }
    };
    Ok(())
}

fn main() {
    match run() {
        Ok(_) => {}
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
