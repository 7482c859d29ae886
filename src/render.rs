//! Rendering of per-month choropleth frames with [`plotters`].
//!
//! Each frame fills every boundary region with the color of its entropy in
//! that month. Only the 50 states in [`STATE_CODES`] carry values; all other
//! regions, and states without data that month, are drawn with entropy zero.
//!
//! Text (the title and legend labels) needs a TrueType font, which is loaded
//! from [`RenderConfig::font`] or else from a few common system locations. If
//! no font can be found, frames are drawn without text.

use plotters::prelude::*;
use plotters::style::{register_font, FontStyle};
use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::boundaries::{Boundaries, Extent, Ring};
use crate::color::{ColorRamp, ColorScale};
use crate::entropy::EntropyTable;
use crate::error::EntromapError;
use crate::metadata::MonthKey;
use crate::STATE_CODES;

pub const DEFAULT_WIDTH: u32 = 4000;
pub const DEFAULT_HEIGHT: u32 = 2500;

const FONT_FAMILY: &str = "sans-serif";
const OUTLINE: RGBColor = RGBColor(211, 211, 211);

/// Fonts tried, in order, when no font is configured.
const SYSTEM_FONT_PATHS: [&str; 7] = [
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Settings for frame rendering.
#[derive(Clone, Debug)]
pub struct RenderConfig {
    /// Directory the frames are written to; created if needed.
    pub frames_dir: PathBuf,
    pub width: u32,
    pub height: u32,
    /// A TrueType font for the title and legend.
    pub font: Option<PathBuf>,
    /// The map extent; defaults to the extent of all boundaries.
    pub extent: Option<Extent>,
}

impl RenderConfig {
    pub fn new(frames_dir: impl Into<PathBuf>) -> Self {
        Self {
            frames_dir: frames_dir.into(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            font: None,
            extent: None,
        }
    }

    /// The path of the frame for `month`.
    pub fn frame_path(&self, month: &MonthKey) -> PathBuf {
        self.frames_dir.join(format!("entropy_{}.png", month))
    }
}

fn render_error(error: impl std::fmt::Display) -> EntromapError {
    EntromapError::Render(error.to_string())
}

fn register_font_file(path: &Path) -> Result<(), EntromapError> {
    let bytes = fs::read(path).map_err(|_| EntromapError::InvalidFont(path.to_path_buf()))?;
    // plotters keeps registered fonts for the life of the program
    let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
    register_font(FONT_FAMILY, FontStyle::Normal, bytes)
        .map_err(|_| EntromapError::InvalidFont(path.to_path_buf()))
}

/// Register the font used for text. Returns whether text can be drawn.
///
/// # Errors
/// A configured font that cannot be loaded is an error; if no font is
/// configured and none of the system fonts exist, this returns `Ok(false)`.
pub fn setup_font(font: Option<&Path>) -> Result<bool, EntromapError> {
    if let Some(path) = font {
        register_font_file(path)?;
        return Ok(true);
    }
    for candidate in SYSTEM_FONT_PATHS.iter().map(Path::new) {
        if candidate.is_file() && register_font_file(candidate).is_ok() {
            debug!("using font '{}'", candidate.display());
            return Ok(true);
        }
    }
    warn!("no font found (use --font to set one); frames will be drawn without text");
    Ok(false)
}

/// The entropy of every boundary region in `month`, in boundary order.
///
/// This is a left join of the 50 state values onto the boundaries: the states
/// take their value from `table` (zero if absent), every other region is zero.
pub fn frame_values(
    table: &EntropyTable,
    boundaries: &Boundaries,
    month: &MonthKey,
) -> Vec<(String, f64)> {
    let states: Vec<(&str, f64)> = STATE_CODES
        .iter()
        .map(|&state| (state, table.get(state, month.as_str()).unwrap_or(0.0)))
        .collect();
    boundaries
        .iter()
        .map(|(code, _)| {
            let entropy = states
                .iter()
                .find(|(state, _)| *state == code)
                .map_or(0.0, |(_, entropy)| *entropy);
            (code.to_string(), entropy)
        })
        .collect()
}

/// An equirectangular projection, with longitude scaled by the cosine of the
/// extent's mean latitude.
#[derive(Clone, Copy, Debug)]
struct Projection {
    x_scale: f64,
}

impl Projection {
    fn new(extent: &Extent) -> Self {
        let mean_lat = (extent.south + extent.north) / 2.0;
        Self {
            x_scale: mean_lat.to_radians().cos().abs().max(0.01),
        }
    }

    fn project(&self, ring: &Ring) -> Vec<(f64, f64)> {
        ring.iter().map(|&(x, y)| (x * self.x_scale, y)).collect()
    }

    /// Projected ranges covering `extent`, padded so that the aspect ratio
    /// matches a `width` by `height` pixel area.
    fn ranges(&self, extent: &Extent, width: u32, height: u32) -> (Range<f64>, Range<f64>) {
        let (mut x0, mut x1) = (extent.west * self.x_scale, extent.east * self.x_scale);
        let (mut y0, mut y1) = (extent.south, extent.north);
        let dx = (x1 - x0).max(f64::EPSILON);
        let dy = (y1 - y0).max(f64::EPSILON);
        let area_aspect = width.max(1) as f64 / height.max(1) as f64;
        if dx / dy > area_aspect {
            let pad = (dx / area_aspect - dy) / 2.0;
            y0 -= pad;
            y1 += pad;
        } else {
            let pad = (dy * area_aspect - dx) / 2.0;
            x0 -= pad;
            x1 += pad;
        }
        (x0..x1, y0..y1)
    }
}

/// Draws the frames for one entropy table.
pub struct FrameRenderer<'a> {
    table: &'a EntropyTable,
    boundaries: &'a Boundaries,
    config: &'a RenderConfig,
    scale: ColorScale,
    extent: Extent,
    projection: Projection,
    draw_text: bool,
}

impl<'a> FrameRenderer<'a> {
    /// Set up a renderer; this also registers the font (see [`setup_font`]).
    pub fn new(
        table: &'a EntropyTable,
        boundaries: &'a Boundaries,
        config: &'a RenderConfig,
    ) -> Result<Self, EntromapError> {
        let extent = match config.extent {
            Some(extent) => extent,
            None => boundaries.extent().ok_or_else(|| {
                EntromapError::InvalidBoundaries("boundaries have no points".to_string())
            })?,
        };
        let draw_text = setup_font(config.font.as_deref())?;
        Ok(Self {
            table,
            boundaries,
            config,
            scale: ColorScale::new(ColorRamp::new(), table.max_entropy()),
            projection: Projection::new(&extent),
            extent,
            draw_text,
        })
    }

    /// Draw and write the frame for `month`, returning its path.
    ///
    /// The bitmap is written and released before this returns.
    pub fn render(&self, month: &MonthKey) -> Result<PathBuf, EntromapError> {
        let path = self.config.frame_path(month);
        let (width, height) = (self.config.width, self.config.height);
        {
            let root = BitMapBackend::new(&path, (width, height)).into_drawing_area();
            root.fill(&WHITE).map_err(render_error)?;

            let legend_width = (width / 10).max(40).min(width / 2);
            let (map_area, legend_area) = root.split_horizontally(width - legend_width);

            let margin = (height / 50).max(2);
            let (map_width, _) = map_area.dim_in_pixel();
            let mut builder = ChartBuilder::on(&map_area);
            builder.margin(margin);
            if self.draw_text {
                builder.caption(
                    format!("Shannon entropy by state, {}", month),
                    (FONT_FAMILY, (height / 25).max(8) as f64),
                );
            }
            let chart_height = height.saturating_sub(2 * margin + height / 25);
            let (x_range, y_range) = self.projection.ranges(
                &self.extent,
                map_width.saturating_sub(2 * margin),
                chart_height,
            );
            let mut chart = builder
                .build_cartesian_2d(x_range, y_range)
                .map_err(render_error)?;

            let stroke = (height / 1000).max(1);
            for (code, entropy) in frame_values(self.table, self.boundaries, month) {
                let fill: RGBColor = self.scale.color(entropy).into();
                for polygon in self.boundaries.get(&code).unwrap_or_default() {
                    if let Some(exterior) = polygon.first() {
                        chart
                            .draw_series(std::iter::once(Polygon::new(
                                self.projection.project(exterior),
                                fill.filled(),
                            )))
                            .map_err(render_error)?;
                    }
                    for ring in polygon {
                        chart
                            .draw_series(std::iter::once(PathElement::new(
                                self.projection.project(ring),
                                OUTLINE.stroke_width(stroke),
                            )))
                            .map_err(render_error)?;
                    }
                }
            }

            self.draw_legend(&legend_area)?;
            root.present().map_err(render_error)?;
        }
        Ok(path)
    }

    /// A vertical color bar, with the scale labelled when text is available.
    fn draw_legend<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, plotters::coord::Shift>,
    ) -> Result<(), EntromapError> {
        let (width, height) = area.dim_in_pixel();
        let (width, height) = (width as i32, height as i32);
        let (x0, x1) = (width / 5, width / 2);
        let (top, bottom) = (height / 10, height * 9 / 10);
        let bar_height = (bottom - top).max(1);

        let ramp = ColorRamp::new();
        for y in top..bottom {
            let position = (bottom - y) as f64 / bar_height as f64;
            let color: RGBColor = ramp.color_at(position).into();
            area.draw(&Rectangle::new([(x0, y), (x1, y + 1)], color.filled()))
                .map_err(render_error)?;
        }
        area.draw(&Rectangle::new([(x0, top), (x1, bottom)], BLACK.stroke_width(1)))
            .map_err(render_error)?;

        if self.draw_text {
            let size = (self.config.height / 60).max(6) as f64;
            let max = self.scale.max();
            let labels = [(bottom, 0.0), ((top + bottom) / 2, max / 2.0), (top, max)];
            for (y, value) in labels {
                area.draw(&Text::new(
                    format!("{:.3}", value),
                    (x1 + width / 20, y),
                    (FONT_FAMILY, size).into_font(),
                ))
                .map_err(render_error)?;
            }
            area.draw(&Text::new(
                "Entropy".to_string(),
                (x0, top / 3),
                (FONT_FAMILY, size).into_font(),
            ))
            .map_err(render_error)?;
        }
        Ok(())
    }
}

/// Render one frame per month in `table`, in ascending month order, returning
/// the frame paths in that order.
pub fn render_frames(
    table: &EntropyTable,
    boundaries: &Boundaries,
    config: &RenderConfig,
) -> Result<Vec<PathBuf>, EntromapError> {
    fs::create_dir_all(&config.frames_dir)?;
    let renderer = FrameRenderer::new(table, boundaries, config)?;

    let months = table.months();
    let mut frames = Vec::with_capacity(months.len());
    for month in &months {
        let path = renderer.render(month)?;
        info!("wrote frame '{}'", path.display());
        frames.push(path);
    }
    Ok(frames)
}
