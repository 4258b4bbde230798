//! Map feature layers loaded from GeoJSON (e.g. Natural Earth exports)

use crate::error::MapError;
use geo::{BoundingRect, Coord, Intersects, LineString, MultiLineString, MultiPolygon, Polygon, Rect};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, warn};

/// The kinds of features a map can draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKind {
    Land,
    Ocean,
    Borders,
    Coastline,
    Rivers,
    Lakes,
}

impl LayerKind {
    pub const ALL: [LayerKind; 6] = [
        LayerKind::Land,
        LayerKind::Ocean,
        LayerKind::Borders,
        LayerKind::Coastline,
        LayerKind::Rivers,
        LayerKind::Lakes,
    ];

    /// File name looked up inside a features directory
    pub fn file_name(self) -> &'static str {
        match self {
            LayerKind::Land => "land.geojson",
            LayerKind::Ocean => "ocean.geojson",
            LayerKind::Borders => "borders.geojson",
            LayerKind::Coastline => "coastline.geojson",
            LayerKind::Rivers => "rivers.geojson",
            LayerKind::Lakes => "lakes.geojson",
        }
    }
}

/// Geometry of one layer in data coordinates (lon, lat)
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureLayer {
    pub polygons: MultiPolygon<f64>,
    pub lines: MultiLineString<f64>,
}

impl Default for FeatureLayer {
    fn default() -> Self {
        Self {
            polygons: MultiPolygon::new(Vec::new()),
            lines: MultiLineString::new(Vec::new()),
        }
    }
}

impl FeatureLayer {
    /// Polygons whose bounds overlap `window`
    pub fn polygons_in<'a>(&'a self, window: &'a Rect<f64>) -> impl Iterator<Item = &'a Polygon<f64>> {
        self.polygons.0.iter().filter(move |p| {
            p.bounding_rect()
                .map_or(false, |bounds| bounds.intersects(window))
        })
    }

    /// Every line to stroke: line geometries plus polygon rings
    pub fn outlines(&self) -> impl Iterator<Item = &LineString<f64>> {
        self.lines.0.iter().chain(
            self.polygons
                .0
                .iter()
                .flat_map(|p| std::iter::once(p.exterior()).chain(p.interiors())),
        )
    }

    fn is_empty(&self) -> bool {
        self.polygons.0.is_empty() && self.lines.0.is_empty()
    }
}

/// All layers available for a render
#[derive(Debug, Clone, Default)]
pub struct FeatureSet {
    layers: HashMap<LayerKind, FeatureLayer>,
}

impl FeatureSet {
    /// A set with no layers; maps show only their background colors
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load every known layer present in `dir`. Missing layer files are skipped.
    pub fn load_dir(dir: &Path) -> Result<Self, MapError> {
        if !dir.is_dir() {
            return Err(MapError::not_found("Features directory", dir));
        }

        let mut set = FeatureSet::default();
        for kind in LayerKind::ALL {
            let path = dir.join(kind.file_name());
            if !path.is_file() {
                warn!("No {:?} layer at {}, skipping", kind, path.display());
                continue;
            }
            let layer = load_layer(&path)?;
            debug!(
                "Loaded {:?} layer: {} polygons, {} lines",
                kind,
                layer.polygons.0.len(),
                layer.lines.0.len()
            );
            set.insert(kind, layer);
        }
        Ok(set)
    }

    pub fn insert(&mut self, kind: LayerKind, layer: FeatureLayer) {
        if !layer.is_empty() {
            self.layers.insert(kind, layer);
        }
    }

    pub fn get(&self, kind: LayerKind) -> Option<&FeatureLayer> {
        self.layers.get(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    geometry: Option<Geometry>,
}

/// GeoJSON positions may carry a third (elevation) value
type Position = Vec<f64>;

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum Geometry {
    Polygon { coordinates: Vec<Vec<Position>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Position>>> },
    LineString { coordinates: Vec<Position> },
    MultiLineString { coordinates: Vec<Vec<Position>> },
    #[serde(other)]
    Unsupported,
}

fn load_layer(path: &Path) -> Result<FeatureLayer, MapError> {
    let reader = BufReader::new(File::open(path)?);
    let collection: FeatureCollection =
        serde_json::from_reader(reader).map_err(|source| MapError::Features {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(layer_from_collection(collection))
}

/// Parse a GeoJSON FeatureCollection into a layer
pub fn parse_layer(text: &str) -> Result<FeatureLayer, MapError> {
    let collection: FeatureCollection = serde_json::from_str(text)?;
    Ok(layer_from_collection(collection))
}

fn layer_from_collection(collection: FeatureCollection) -> FeatureLayer {
    let mut polygons = Vec::new();
    let mut lines = Vec::new();
    for geometry in collection.features.into_iter().filter_map(|f| f.geometry) {
        match geometry {
            Geometry::Polygon { coordinates } => polygons.extend(polygon(coordinates)),
            Geometry::MultiPolygon { coordinates } => {
                polygons.extend(coordinates.into_iter().filter_map(polygon));
            }
            Geometry::LineString { coordinates } => lines.extend(line(coordinates)),
            Geometry::MultiLineString { coordinates } => {
                lines.extend(coordinates.into_iter().filter_map(line));
            }
            Geometry::Unsupported => {}
        }
    }
    FeatureLayer {
        polygons: MultiPolygon::new(polygons),
        lines: MultiLineString::new(lines),
    }
}

/// Line string from GeoJSON positions, ignoring elevation and non-finite positions
fn line(positions: Vec<Position>) -> Option<LineString<f64>> {
    let coords: Vec<Coord<f64>> = positions
        .into_iter()
        .filter_map(|p| match p[..] {
            [x, y, ..] if x.is_finite() && y.is_finite() => Some(Coord { x, y }),
            _ => None,
        })
        .collect();
    (coords.len() >= 2).then(|| LineString::new(coords))
}

fn polygon(rings: Vec<Vec<Position>>) -> Option<Polygon<f64>> {
    let mut rings = rings.into_iter().filter_map(line);
    let exterior = rings.next()?;
    Some(Polygon::new(exterior, rings.collect()))
}
