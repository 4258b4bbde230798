//! Geographic math and coordinate transforms
//!
//! Positions flow through a fixed chain of spaces:
//! geographic degrees → projected data space (Plate Carrée) → figure fractions
//! (0–1 across the output image, y up) → pixels (y down). Figure fractions are what
//! layout decisions are made in, so they hold regardless of the final image size.

use crate::region::Region;
use geo::{Coord, Rect};

/// Mean Earth radius in meters
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Typographic points per inch
const POINTS_PER_INCH: f64 = 72.0;

/// A latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Height/width ratio of a figure showing `region` so that a degree of latitude and a
/// degree of longitude look alike at the region's mean latitude.
///
/// Returns 1.0 when the longitude span (after compression) is zero.
pub fn geographic_aspect(region: &Region) -> f64 {
    let mean_lat = (region.min_lat() + region.max_lat()) / 2.0;
    let denominator = region.lon_span() * mean_lat.to_radians().cos();
    if denominator == 0.0 {
        return 1.0;
    }
    region.lat_span() / denominator
}

/// Great-circle distance between two points in meters (haversine formula)
pub fn haversine_distance(a: LatLon, b: LatLon) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let dphi = phi2 - phi1;
    let dlambda = (b.lon - a.lon).to_radians();

    let h = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    // Rounding can push h marginally above 1 for antipodal points
    2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}

/// Equirectangular projection: data coordinates are degrees
#[derive(Debug, Clone, Copy, Default)]
pub struct PlateCarree;

impl PlateCarree {
    /// Project a geographic position into data space
    pub fn project(&self, point: LatLon) -> Coord<f64> {
        Coord {
            x: point.lon,
            y: point.lat,
        }
    }
}

/// Axis-aligned rectangle in figure-fraction space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FigureRect {
    pub x0: f64,
    pub y0: f64,
    pub width: f64,
    pub height: f64,
}

impl FigureRect {
    pub fn new(x0: f64, y0: f64, width: f64, height: f64) -> Self {
        Self {
            x0,
            y0,
            width,
            height,
        }
    }

    /// The whole figure
    pub fn full() -> Self {
        Self::new(0.0, 0.0, 1.0, 1.0)
    }

    pub fn x1(&self) -> f64 {
        self.x0 + self.width
    }

    pub fn y1(&self) -> f64 {
        self.y0 + self.height
    }

    /// Corner at the given axes fraction, e.g. `(0, 0)` lower-left, `(1, 1)` upper-right
    pub fn at(&self, u: f64, v: f64) -> (f64, f64) {
        (self.x0 + u * self.width, self.y0 + v * self.height)
    }

    /// Largest rectangle centered in `self` whose on-screen height/width ratio is `aspect`
    pub fn fit_aspect(&self, aspect: f64, figure: &Figure) -> FigureRect {
        let width_px = self.width * figure.width_px as f64;
        let height_px = self.height * figure.height_px as f64;
        if width_px <= 0.0 || height_px <= 0.0 || !aspect.is_finite() || aspect <= 0.0 {
            return *self;
        }

        let (fit_w_px, fit_h_px) = if height_px / width_px > aspect {
            (width_px, width_px * aspect)
        } else {
            (height_px / aspect, height_px)
        };

        let width = fit_w_px / figure.width_px as f64;
        let height = fit_h_px / figure.height_px as f64;
        FigureRect::new(
            self.x0 + (self.width - width) / 2.0,
            self.y0 + (self.height - height) / 2.0,
            width,
            height,
        )
    }
}

impl From<Rect<f64>> for FigureRect {
    fn from(rect: Rect<f64>) -> Self {
        Self::new(rect.min().x, rect.min().y, rect.width(), rect.height())
    }
}

/// Output image geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Figure {
    pub width_px: u32,
    pub height_px: u32,
    pub dpi: u32,
}

impl Figure {
    /// Figure of `width_in` inches whose height follows from `aspect` (height/width)
    pub fn from_inches(width_in: f64, aspect: f64, dpi: u32) -> Self {
        let width_px = (width_in * dpi as f64).round().max(1.0) as u32;
        let height_px = (width_in * aspect * dpi as f64).round().max(1.0) as u32;
        Self {
            width_px,
            height_px,
            dpi,
        }
    }

    pub fn fraction_to_pixel(&self, (fx, fy): (f64, f64)) -> (f64, f64) {
        (
            fx * self.width_px as f64,
            (1.0 - fy) * self.height_px as f64,
        )
    }

    /// Convert a length in typographic points to pixels at this figure's DPI
    pub fn points_to_px(&self, points: f64) -> f64 {
        points * self.dpi as f64 / POINTS_PER_INCH
    }
}

/// A map axes: a figure rectangle showing a geographic extent
#[derive(Debug, Clone, Copy)]
pub struct AxesFrame {
    pub rect: FigureRect,
    pub extent: Region,
    pub projection: PlateCarree,
}

impl AxesFrame {
    pub fn new(rect: FigureRect, extent: Region) -> Self {
        Self {
            rect,
            extent,
            projection: PlateCarree,
        }
    }

    /// Data coordinates to axes fractions (0–1 inside the frame)
    pub fn data_to_axes(&self, c: Coord<f64>) -> (f64, f64) {
        (
            (c.x - self.extent.min_lon()) / self.extent.lon_span(),
            (c.y - self.extent.min_lat()) / self.extent.lat_span(),
        )
    }

    pub fn data_to_fraction(&self, c: Coord<f64>) -> (f64, f64) {
        let (u, v) = self.data_to_axes(c);
        self.rect.at(u, v)
    }

    pub fn geo_to_fraction(&self, point: LatLon) -> (f64, f64) {
        self.data_to_fraction(self.projection.project(point))
    }

    /// Clip window for this frame's extent in data space
    pub fn clip_rect(&self) -> Rect<f64> {
        Rect::new(
            Coord {
                x: self.extent.min_lon(),
                y: self.extent.min_lat(),
            },
            Coord {
                x: self.extent.max_lon(),
                y: self.extent.max_lat(),
            },
        )
    }
}
