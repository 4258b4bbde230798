//! Command-line interface definitions and argument parsing

use crate::error::MapError;
use crate::geometry::LatLon;
use crate::region::{Region, DEFAULT_STAR};
use clap::Parser;
use std::path::PathBuf;

/// Render a locator map with an inset zoom window, or a summary map of many points
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// CSV file of points (lat,lon per line). If provided, renders a summary map (no inset)
    #[arg(long)]
    pub summary_points: Option<PathBuf>,

    /// Minimum distance (meters) to merge nearby points in summary mode
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub min_distance_m: f64,

    /// Main map extent as lon_min lon_max lat_min lat_max
    #[arg(
        long,
        num_args = 4,
        value_names = ["LON_MIN", "LON_MAX", "LAT_MIN", "LAT_MAX"],
        allow_negative_numbers = true,
        default_values_t = Region::default_world().as_extent()
    )]
    pub world_region: Vec<f64>,

    /// Inset extent as lon_min lon_max lat_min lat_max
    #[arg(
        long,
        num_args = 4,
        value_names = ["LON_MIN", "LON_MAX", "LAT_MIN", "LAT_MAX"],
        allow_negative_numbers = true,
        default_values_t = Region::default_zoom().as_extent()
    )]
    pub zoom_region: Vec<f64>,

    /// Star (photo) location as latitude longitude
    #[arg(
        long,
        num_args = 2,
        value_names = ["LAT", "LON"],
        allow_negative_numbers = true,
        default_values_t = [DEFAULT_STAR.lat, DEFAULT_STAR.lon]
    )]
    pub star: Vec<f64>,

    /// Path to a theme JSON file
    #[arg(long)]
    pub theme: Option<PathBuf>,

    /// Label shown on the main map next to the zoom rectangle
    #[arg(long, default_value = "Limerick, Ireland")]
    pub title_main: String,

    /// Title shown inside the inset
    #[arg(long, default_value = "The University of Limerick")]
    pub title_inset: String,

    /// Optional caption (e.g. photo caption or location string)
    #[arg(long)]
    pub caption: Option<String>,

    /// Optional clock SVG rendered into the inset
    #[arg(long)]
    pub clock_svg: Option<PathBuf>,

    /// Clock badge size in pixels
    #[arg(long, default_value_t = 64)]
    pub clock_size: u32,

    /// Output image path
    #[arg(long, default_value = "locator_map_styled.png")]
    pub out: PathBuf,

    /// Output DPI
    #[arg(long, default_value_t = 300)]
    pub dpi: u32,

    /// Figure width in inches
    #[arg(long, default_value_t = 8.0)]
    pub fig_width: f64,

    /// Do not open a preview of the written image
    #[arg(long)]
    pub no_show: bool,

    /// Directory with land/ocean/borders/coastline/rivers/lakes .geojson layers
    #[arg(long, env = "LOCATOR_MAP_FEATURES")]
    pub features_dir: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn world_region(&self) -> Result<Region, MapError> {
        Region::from_extent(&self.world_region)
    }

    pub fn zoom_region(&self) -> Result<Region, MapError> {
        Region::from_extent(&self.zoom_region)
    }

    pub fn star(&self) -> Result<LatLon, MapError> {
        match self.star[..] {
            [lat, lon] => Ok(LatLon::new(lat, lon)),
            _ => Err(MapError::InvalidArgument(format!(
                "star expects 2 numbers (lat lon), got {}",
                self.star.len()
            ))),
        }
    }
}
