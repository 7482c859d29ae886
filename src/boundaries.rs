//! Geographic boundary polygons, loaded from GeoJSON into [`Boundaries`].
//!
//! The boundary dataset must be a GeoJSON `FeatureCollection` of `Polygon` or
//! `MultiPolygon` features, each with a string property holding its two-letter
//! location code (e.g. `STUSPS` in the US Census state boundary files).
//! Codes are upper-cased on load. Plaintext and gzip-compressed files are
//! both supported.

use geojson::{GeoJson, Geometry, Value};
use indexmap::IndexMap;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{debug, info};

use crate::error::EntromapError;
use crate::io::InputFile;

/// The default feature property holding location codes.
pub const DEFAULT_STATE_FIELD: &str = "STUSPS";

/// A closed ring of `(longitude, latitude)` points.
pub type Ring = Vec<(f64, f64)>;

/// A polygon: its exterior ring first, followed by any holes.
pub type Polygon = Vec<Ring>;

/// A rectangular map extent, in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Extent {
    pub west: f64,
    pub east: f64,
    pub south: f64,
    pub north: f64,
}

impl Extent {
    /// Grow this extent to include a point.
    fn include(&mut self, (x, y): (f64, f64)) {
        self.west = self.west.min(x);
        self.east = self.east.max(x);
        self.south = self.south.min(y);
        self.north = self.north.max(y);
    }
}

impl FromStr for Extent {
    type Err = EntromapError;

    /// Parse `west,east,south,north`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values: Vec<f64> = s
            .split(',')
            .map(|v| v.trim().parse::<f64>())
            .collect::<Result<_, _>>()
            .map_err(|_| EntromapError::InvalidExtent(s.to_string()))?;
        match values[..] {
            [west, east, south, north] if west < east && south < north => Ok(Extent {
                west,
                east,
                south,
                north,
            }),
            _ => Err(EntromapError::InvalidExtent(s.to_string())),
        }
    }
}

/// Boundary polygons keyed by upper-case location code, in file order.
#[derive(Clone, Debug, Default)]
pub struct Boundaries {
    regions: IndexMap<String, Vec<Polygon>>,
}

impl Boundaries {
    /// Load boundaries from a (possibly gzipped) GeoJSON file.
    ///
    /// # Arguments
    /// * `filepath`: the path to the GeoJSON file.
    /// * `state_field`: the feature property with the location code.
    pub fn from_path(
        filepath: impl Into<PathBuf>,
        state_field: &str,
    ) -> Result<Self, EntromapError> {
        let filepath = filepath.into();
        let contents = InputFile::new(&filepath).read_to_string()?;
        let boundaries = Self::from_geojson_str(&contents, state_field)?;
        info!(
            "loaded {} boundary regions from '{}'",
            boundaries.len(),
            filepath.display()
        );
        debug!("boundary codes: {}", boundaries.codes().join(", "));
        Ok(boundaries)
    }

    /// Parse boundaries from GeoJSON text.
    pub fn from_geojson_str(contents: &str, state_field: &str) -> Result<Self, EntromapError> {
        let geojson: GeoJson = contents
            .parse()
            .map_err(|e: geojson::Error| EntromapError::InvalidBoundaries(e.to_string()))?;
        let collection = match geojson {
            GeoJson::FeatureCollection(collection) => collection,
            _ => {
                return Err(EntromapError::InvalidBoundaries(
                    "expected a GeoJSON FeatureCollection".to_string(),
                ))
            }
        };

        let mut boundaries = Boundaries::default();
        for (index, feature) in collection.features.into_iter().enumerate() {
            let code = feature
                .properties
                .as_ref()
                .and_then(|properties| properties.get(state_field))
                .and_then(|value| value.as_str())
                .map(|code| code.trim().to_uppercase());
            let (code, geometry) = match (code, feature.geometry) {
                (Some(code), Some(geometry)) => (code, geometry),
                _ => {
                    debug!(
                        "boundary feature {} has no '{}' property or no geometry; skipping",
                        index, state_field
                    );
                    continue;
                }
            };
            let polygons = geometry_polygons(&geometry);
            if polygons.is_empty() {
                debug!("boundary feature {} ({}) has no polygons; skipping", index, code);
                continue;
            }
            boundaries.insert(code, polygons);
        }

        if boundaries.is_empty() {
            return Err(EntromapError::InvalidBoundaries(format!(
                "no polygon features with a '{}' property",
                state_field
            )));
        }
        Ok(boundaries)
    }

    /// Add polygons for a location code. Codes that appear in several features
    /// accumulate their polygons.
    pub fn insert(&mut self, code: impl Into<String>, polygons: Vec<Polygon>) {
        self.regions
            .entry(code.into().to_uppercase())
            .or_default()
            .extend(polygons);
    }

    pub fn get(&self, code: &str) -> Option<&[Polygon]> {
        self.regions.get(code).map(|polygons| polygons.as_slice())
    }

    /// Iterate over `(code, polygons)` in file order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Polygon])> {
        self.regions
            .iter()
            .map(|(code, polygons)| (code.as_str(), polygons.as_slice()))
    }

    pub fn codes(&self) -> Vec<String> {
        self.regions.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// The bounding box of every polygon point; `None` if there are no points.
    pub fn extent(&self) -> Option<Extent> {
        let mut points = self
            .regions
            .values()
            .flatten()
            .flatten()
            .flatten()
            .copied();
        let first = points.next()?;
        let mut extent = Extent {
            west: first.0,
            east: first.0,
            south: first.1,
            north: first.1,
        };
        points.for_each(|point| extent.include(point));
        Some(extent)
    }
}

fn ring_points(ring: &[Vec<f64>]) -> Ring {
    ring.iter()
        .filter_map(|position| match position[..] {
            [x, y, ..] => Some((x, y)),
            _ => None,
        })
        .collect()
}

fn polygon_rings(polygon: &[Vec<Vec<f64>>]) -> Polygon {
    polygon.iter().map(|ring| ring_points(ring)).collect()
}

/// All polygons of a geometry; other geometry types contribute nothing.
fn geometry_polygons(geometry: &Geometry) -> Vec<Polygon> {
    match &geometry.value {
        Value::Polygon(polygon) => vec![polygon_rings(polygon)],
        Value::MultiPolygon(polygons) => polygons.iter().map(|p| polygon_rings(p)).collect(),
        Value::GeometryCollection(geometries) => {
            geometries.iter().flat_map(geometry_polygons).collect()
        }
        _ => Vec::new(),
    }
}
