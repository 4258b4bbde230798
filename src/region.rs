//! Geographic bounding boxes

use crate::error::MapError;
use crate::geometry::LatLon;

/// Default marker location (latitude, longitude)
pub const DEFAULT_STAR: LatLon = LatLon::new(52.6698042403715, -8.577276842533156);

/// Minimum span (degrees) assumed for coincident points before padding
const MIN_AUTO_SPAN: f64 = 0.01;
/// Minimum padding (degrees) on each side of an auto-derived region
const MIN_AUTO_PAD: f64 = 0.5;
/// Padding as a share of the point set's span
const AUTO_PAD_RATIO: f64 = 0.35;

/// A lon/lat bounding box in degrees with `min <= max` on both axes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    min_lon: f64,
    max_lon: f64,
    min_lat: f64,
    max_lat: f64,
}

impl Region {
    /// Build a region from two longitudes and two latitudes in any order
    pub fn new(lon_a: f64, lon_b: f64, lat_a: f64, lat_b: f64) -> Self {
        Self {
            min_lon: lon_a.min(lon_b),
            max_lon: lon_a.max(lon_b),
            min_lat: lat_a.min(lat_b),
            max_lat: lat_a.max(lat_b),
        }
    }

    /// Build a region from `[lon_min, lon_max, lat_min, lat_max]`
    pub fn from_extent(values: &[f64]) -> Result<Self, MapError> {
        match *values {
            [lon_a, lon_b, lat_a, lat_b] => Ok(Self::new(lon_a, lon_b, lat_a, lat_b)),
            _ => Err(MapError::InvalidArgument(format!(
                "region expects 4 numbers, got {}",
                values.len()
            ))),
        }
    }

    /// The main map extent used when none is given
    pub fn default_world() -> Self {
        Self::new(-11.0, -5.0, 50.5, 56.5)
    }

    /// The inset extent used when none is given
    pub fn default_zoom() -> Self {
        Self::new(
            -8.742559512271514,
            -8.510014263814636,
            52.614007667018164,
            52.71198728589052,
        )
    }

    /// Derive a region that frames every point with some padding.
    ///
    /// An empty set falls back to [`Region::default_world`]; sets spanning more than
    /// half the globe in longitude get a full-width band.
    pub fn from_points(points: &[LatLon]) -> Self {
        let Some(first) = points.first() else {
            return Self::default_world();
        };

        let (mut lat0, mut lat1) = (first.lat, first.lat);
        let (mut lon0, mut lon1) = (first.lon, first.lon);
        for p in &points[1..] {
            lat0 = lat0.min(p.lat);
            lat1 = lat1.max(p.lat);
            lon0 = lon0.min(p.lon);
            lon1 = lon1.max(p.lon);
        }

        if lon1 - lon0 > 180.0 {
            return Self::new(-180.0, 180.0, (lat0 - 5.0).max(-80.0), (lat1 + 5.0).min(80.0));
        }

        let lat_span = (lat1 - lat0).max(MIN_AUTO_SPAN);
        let lon_span = (lon1 - lon0).max(MIN_AUTO_SPAN);
        let lat_pad = (lat_span * AUTO_PAD_RATIO).max(MIN_AUTO_PAD);
        let lon_pad = (lon_span * AUTO_PAD_RATIO).max(MIN_AUTO_PAD);

        Self::new(
            lon0 - lon_pad,
            lon1 + lon_pad,
            (lat0 - lat_pad).max(-90.0),
            (lat1 + lat_pad).min(90.0),
        )
    }

    pub fn min_lon(&self) -> f64 {
        self.min_lon
    }

    pub fn max_lon(&self) -> f64 {
        self.max_lon
    }

    pub fn min_lat(&self) -> f64 {
        self.min_lat
    }

    pub fn max_lat(&self) -> f64 {
        self.max_lat
    }

    pub fn lon_span(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    pub fn lat_span(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// `[lon_min, lon_max, lat_min, lat_max]`
    pub fn as_extent(&self) -> [f64; 4] {
        [self.min_lon, self.max_lon, self.min_lat, self.max_lat]
    }

    /// Corners in lower-left, lower-right, upper-left, upper-right order
    pub fn corners(&self) -> [LatLon; 4] {
        [
            LatLon::new(self.min_lat, self.min_lon),
            LatLon::new(self.min_lat, self.max_lon),
            LatLon::new(self.max_lat, self.min_lon),
            LatLon::new(self.max_lat, self.max_lon),
        ]
    }

    pub fn contains(&self, point: LatLon) -> bool {
        (self.min_lon..=self.max_lon).contains(&point.lon)
            && (self.min_lat..=self.max_lat).contains(&point.lat)
    }

    /// Check that the region can be used as a map extent
    pub fn ensure_drawable(&self, name: &str) -> Result<(), MapError> {
        if !self.as_extent().iter().all(|v| v.is_finite()) {
            return Err(MapError::InvalidRegion(format!(
                "{} has non-finite bounds: {:?}",
                name,
                self.as_extent()
            )));
        }
        if self.min_lat < -90.0 || self.max_lat > 90.0 {
            return Err(MapError::InvalidRegion(format!(
                "{} latitudes must lie within [-90, 90], got [{}, {}]",
                name, self.min_lat, self.max_lat
            )));
        }
        if self.lon_span() <= 0.0 || self.lat_span() <= 0.0 {
            return Err(MapError::InvalidRegion(format!(
                "{} must have a non-zero span on both axes, got {:?}",
                name,
                self.as_extent()
            )));
        }
        Ok(())
    }
}
