//! locator-map: render static locator maps with an inset zoom panel
//!
//! Two render modes share one pipeline: a detail map (base map, zoom rectangle, inset
//! panel, connectors and labels) and a summary map that clusters many points.

pub mod badge;
pub mod cli;
pub mod clip;
pub mod cluster;
pub mod data;
pub mod error;
pub mod features;
pub mod geometry;
pub mod layout;
pub mod region;
pub mod render;
pub mod theme;
pub mod viz;

// Re-export public items for easier access
pub use cli::Args;
pub use cluster::{cluster_points, Cluster, ClusterStats};
pub use data::read_points_csv;
pub use error::MapError;
pub use geometry::{geographic_aspect, haversine_distance, LatLon};
pub use region::Region;
pub use render::{
    detail_layout, render, render_detail_map, render_summary_map, DetailLayout, DetailParams,
    OutputOptions, RenderMode, RenderOutcome, SummaryParams,
};
pub use theme::Theme;

use features::FeatureSet;
use tracing::{info, warn};

/// Common result type used throughout the application
pub type Result<T> = anyhow::Result<T>;

/// Assemble the render request described by the command line, loading every input file.
///
/// All inputs are read and validated here, before any output is written.
pub fn build_render_mode(args: &Args) -> Result<RenderMode> {
    let theme = Theme::load(args.theme.as_deref())?;
    let features = match &args.features_dir {
        Some(dir) => {
            info!("Loading map features from {}", dir.display());
            let features = FeatureSet::load_dir(dir)?;
            if features.is_empty() {
                warn!("No feature layers found in {}", dir.display());
            }
            features
        }
        None => {
            info!("No features directory given; drawing background colors only");
            FeatureSet::empty()
        }
    };
    let output = OutputOptions {
        path: args.out.clone(),
        dpi: args.dpi,
        fig_width: args.fig_width,
        show: !args.no_show,
    };

    if let Some(points_path) = &args.summary_points {
        let points = read_points_csv(points_path)?;
        info!("Read {} points from {}", points.len(), points_path.display());
        return Ok(RenderMode::Summary(SummaryParams {
            points,
            min_distance_m: args.min_distance_m,
            caption: args.caption.clone(),
            theme,
            features,
            output,
        }));
    }

    Ok(RenderMode::Detail(DetailParams {
        world_region: args.world_region()?,
        zoom_region: args.zoom_region()?,
        star: args.star()?,
        title_main: args.title_main.clone(),
        title_inset: args.title_inset.clone(),
        caption: args.caption.clone(),
        badge: args.clock_svg.clone(),
        badge_size: args.clock_size,
        theme,
        features,
        output,
    }))
}

/// Parse inputs, render the selected map and report what was written
pub fn run(args: &Args) -> Result<RenderOutcome> {
    let mode = build_render_mode(args)?;
    let decoder = badge::default_decoder();
    render(&mode, decoder.as_deref())
}
