//! Detail and summary map rendering pipelines

use crate::badge::{missing_decoder, ImageDecoder};
use crate::cluster::{cluster_points, ClusterStats};
use crate::error::MapError;
use crate::features::{FeatureSet, LayerKind};
use crate::geometry::{geographic_aspect, AxesFrame, Figure, FigureRect, LatLon};
use crate::layout::{classify_inset_side, place_inset, HAlign, TitlePlacement, VAlign};
use crate::region::Region;
use crate::theme::Theme;
use crate::viz::{Label, MapCanvas};
use anyhow::Context;
use geo::Rect;
use image::RgbaImage;
use plotters::style::{Color, RGBColor};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info, warn};

/// Largest accepted image side in pixels
const MAX_IMAGE_SIDE_PX: f64 = 32_768.0;

/// Axes-fraction position of inset titles, captions and badges
const TEXT_INSET_FRACTION: f64 = 0.02;
const TITLE_TOP_FRACTION: f64 = 0.97;

const MAIN_LINE_PT: f64 = 0.5;
const INSET_LINE_PT: f64 = 0.25;
const RIVER_LINE_PT: f64 = 0.5;
const ZOOM_RECT_PT: f64 = 0.8;
const INSET_BORDER_PT: f64 = 1.0;
const CONNECTOR_PT: f64 = 0.8;
const CONNECTOR_ALPHA: f64 = 0.9;
const DETAIL_STAR_PT: f64 = 9.0;

/// Where and how the image is written
#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub path: PathBuf,
    pub dpi: u32,
    /// Figure width in inches
    pub fig_width: f64,
    /// Open the written image in the system viewer
    pub show: bool,
}

impl OutputOptions {
    fn figure(&self, aspect: f64) -> Result<Figure, MapError> {
        if self.dpi == 0 {
            return Err(MapError::InvalidArgument("dpi must be positive".to_string()));
        }
        if !(self.fig_width.is_finite() && self.fig_width > 0.0) {
            return Err(MapError::InvalidArgument(format!(
                "figure width must be positive, got {}",
                self.fig_width
            )));
        }
        let width_px = self.fig_width * self.dpi as f64;
        let height_px = width_px * aspect;
        if !(height_px.is_finite() && width_px <= MAX_IMAGE_SIDE_PX && height_px <= MAX_IMAGE_SIDE_PX)
        {
            return Err(MapError::InvalidArgument(format!(
                "image of {:.0}x{:.0} pixels is too large (limit {} per side)",
                width_px, height_px, MAX_IMAGE_SIDE_PX
            )));
        }
        Ok(Figure::from_inches(self.fig_width, aspect, self.dpi))
    }
}

/// Inputs for a locator map with an inset
#[derive(Debug, Clone)]
pub struct DetailParams {
    pub world_region: Region,
    pub zoom_region: Region,
    pub star: LatLon,
    pub title_main: String,
    pub title_inset: String,
    pub caption: Option<String>,
    pub badge: Option<PathBuf>,
    /// Badge side length in pixels
    pub badge_size: u32,
    pub theme: Theme,
    pub features: FeatureSet,
    pub output: OutputOptions,
}

/// Inputs for a map of clustered points
#[derive(Debug, Clone)]
pub struct SummaryParams {
    pub points: Vec<LatLon>,
    pub min_distance_m: f64,
    pub caption: Option<String>,
    pub theme: Theme,
    pub features: FeatureSet,
    pub output: OutputOptions,
}

/// The render selected on the command line
#[derive(Debug, Clone)]
pub enum RenderMode {
    Detail(DetailParams),
    Summary(SummaryParams),
}

/// Where the parts of a detail map land on the figure
#[derive(Debug, Clone, Copy)]
pub struct DetailLayout {
    pub figure: Figure,
    /// Main map axes covering the whole figure
    pub main: AxesFrame,
    /// Outline of the zoom region on the main map
    pub zoom_rect: FigureRect,
    /// Slot next to the marker that the inset is fitted into
    pub slot: FigureRect,
    /// Inset axes showing the zoom region
    pub panel: AxesFrame,
}

/// What a finished render produced
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOutcome {
    pub path: PathBuf,
    pub width_px: u32,
    pub height_px: u32,
    /// Present for summary maps
    pub clusters: Option<ClusterStats>,
}

/// Render a map according to `mode`
pub fn render(mode: &RenderMode, decoder: Option<&dyn ImageDecoder>) -> crate::Result<RenderOutcome> {
    match mode {
        RenderMode::Detail(params) => render_detail_map(params, decoder),
        RenderMode::Summary(params) => render_summary_map(params),
    }
}

/// Marker size in points for a cluster of `count` points
pub fn cluster_marker_size(count: usize) -> f64 {
    7.0 + (1.5 * (count.max(1) as f64).log10()).min(6.0)
}

fn prepare_output(path: &Path) -> crate::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory {}", parent.display()))?;
    }
    Ok(())
}

/// Ocean background, land and ocean fills, then border and coastline strokes
fn draw_base_map(
    canvas: &MapCanvas,
    frame: &AxesFrame,
    theme: &Theme,
    features: &FeatureSet,
) -> crate::Result<()> {
    let ocean: RGBColor = theme.oceancolor.into();
    let border: RGBColor = theme.bordercolor.into();

    canvas.fill_rect(&frame.rect, ocean)?;
    if let Some(land) = features.get(LayerKind::Land) {
        canvas.fill_layer(frame, land, theme.landcolor.into(), ocean)?;
    }
    if let Some(sea) = features.get(LayerKind::Ocean) {
        canvas.fill_layer(frame, sea, ocean, theme.landcolor.into())?;
    }
    for kind in [LayerKind::Borders, LayerKind::Coastline] {
        if let Some(layer) = features.get(kind) {
            canvas.stroke_layer(frame, layer, border, MAIN_LINE_PT)?;
        }
    }
    Ok(())
}

fn draw_inset_map(
    canvas: &MapCanvas,
    frame: &AxesFrame,
    theme: &Theme,
    features: &FeatureSet,
) -> crate::Result<()> {
    let water: RGBColor = theme.watercolor.into();
    let land: RGBColor = theme.landcolor.into();
    let border: RGBColor = theme.bordercolor.into();

    canvas.fill_rect(&frame.rect, water)?;
    if let Some(layer) = features.get(LayerKind::Land) {
        canvas.fill_layer(frame, layer, land, water)?;
    }
    for kind in [LayerKind::Borders, LayerKind::Coastline] {
        if let Some(layer) = features.get(kind) {
            canvas.stroke_layer(frame, layer, border, INSET_LINE_PT)?;
        }
    }
    if let Some(rivers) = features.get(LayerKind::Rivers) {
        canvas.stroke_layer(frame, rivers, water, RIVER_LINE_PT)?;
    }
    for kind in [LayerKind::Ocean, LayerKind::Lakes] {
        if let Some(layer) = features.get(kind) {
            canvas.fill_layer(frame, layer, water, land)?;
        }
    }
    Ok(())
}

fn load_badge(
    params: &DetailParams,
    decoder: Option<&dyn ImageDecoder>,
) -> crate::Result<Option<RgbaImage>> {
    let Some(path) = &params.badge else {
        return Ok(None);
    };
    let decoder = decoder.ok_or_else(missing_decoder)?;
    if !path.is_file() {
        return Err(MapError::not_found("Badge", path).into());
    }
    let source = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let image = decoder.decode(&source, params.badge_size)?;
    debug!("Decoded badge {} at {}px", path.display(), params.badge_size);
    Ok(Some(image))
}

/// Validate the regions and work out where the main map, zoom outline and inset go
pub fn detail_layout(params: &DetailParams) -> Result<DetailLayout, MapError> {
    let world = params.world_region;
    let zoom = params.zoom_region;
    world.ensure_drawable("world region")?;
    zoom.ensure_drawable("zoom region")?;

    let figure = params.output.figure(geographic_aspect(&world))?;
    let main = AxesFrame::new(FigureRect::full(), world);

    // Inset slot next to the marker, and the zoom extent fitted inside it
    let marker = main.geo_to_fraction(params.star);
    let slot = place_inset(marker, params.theme.inset_size, params.theme.inset_margin);
    let panel = AxesFrame::new(slot.fit_aspect(geographic_aspect(&zoom), &figure), zoom);
    debug!("Marker at {:?}, inset slot {:?}, panel {:?}", marker, slot, panel.rect);

    let [lower_left, .., upper_right] = zoom.corners();
    let zoom_rect = FigureRect::from(Rect::new(
        main.geo_to_fraction(lower_left),
        main.geo_to_fraction(upper_right),
    ));

    Ok(DetailLayout {
        figure,
        main,
        zoom_rect,
        slot,
        panel,
    })
}

/// Render the base map with an inset zoom panel linked to the zoom rectangle
pub fn render_detail_map(
    params: &DetailParams,
    decoder: Option<&dyn ImageDecoder>,
) -> crate::Result<RenderOutcome> {
    let theme = &params.theme;
    let zoom = params.zoom_region;
    let DetailLayout {
        figure,
        main,
        zoom_rect,
        slot,
        panel,
    } = detail_layout(params)?;
    let badge = load_badge(params, decoder)?;
    prepare_output(&params.output.path)?;

    info!(
        "Rendering detail map {}x{}px to {}",
        figure.width_px,
        figure.height_px,
        params.output.path.display()
    );

    let canvas = MapCanvas::create(&params.output.path, figure, &theme.fontfamily)?;
    draw_base_map(&canvas, &main, theme, &params.features)?;

    let inset_color: RGBColor = theme.insetcolor.into();
    canvas.stroke_rect(&zoom_rect, inset_color, ZOOM_RECT_PT)?;

    let side = classify_inset_side(&zoom_rect, &slot);
    let title = TitlePlacement::away_from(side, &zoom);
    debug!("Inset side {:?}, title anchored at {:?}", side, title.anchor);
    canvas.text(&Label {
        text: &params.title_main,
        position: main.geo_to_fraction(title.anchor),
        offset_pt: title.offset_pt,
        h_align: title.h_align,
        v_align: title.v_align,
        size_pt: theme.title_fontsize,
        color: theme.textcolor.into(),
    })?;

    let connector = inset_color.mix(CONNECTOR_ALPHA);
    for (u, v) in [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0)] {
        canvas.line(zoom_rect.at(u, v), panel.rect.at(u, v), connector, CONNECTOR_PT)?;
    }

    draw_inset_map(&canvas, &panel, theme, &params.features)?;
    if zoom.contains(params.star) {
        canvas.star(
            panel.geo_to_fraction(params.star),
            DETAIL_STAR_PT,
            theme.starcolor.into(),
            &panel.rect,
        )?;
    } else {
        warn!(
            "Star at ({}, {}) is outside the zoom region, not drawn in the inset",
            params.star.lat, params.star.lon
        );
    }
    canvas.text(&Label {
        text: &params.title_inset,
        position: panel.rect.at(TEXT_INSET_FRACTION, TITLE_TOP_FRACTION),
        offset_pt: (0.0, 0.0),
        h_align: HAlign::Left,
        v_align: VAlign::Top,
        size_pt: theme.inset_title_fontsize,
        color: theme.textcolor.into(),
    })?;
    let corner = panel.rect.at(TEXT_INSET_FRACTION, TEXT_INSET_FRACTION);
    if let Some(image) = &badge {
        canvas.image(corner, image)?;
    }
    if let Some(caption) = &params.caption {
        canvas.text(&Label {
            text: caption,
            position: corner,
            offset_pt: (0.0, 0.0),
            h_align: HAlign::Left,
            v_align: VAlign::Bottom,
            size_pt: theme.caption_fontsize,
            color: theme.textcolor.into(),
        })?;
    }
    canvas.stroke_rect(&panel.rect, inset_color, INSET_BORDER_PT)?;

    canvas
        .present()
        .with_context(|| format!("Failed to write {}", params.output.path.display()))?;
    finish(&params.output, &figure, None)
}

/// Render all points as clustered star markers on an auto-fitted map
pub fn render_summary_map(params: &SummaryParams) -> crate::Result<RenderOutcome> {
    let theme = &params.theme;
    if params.points.is_empty() {
        warn!("No points to plot, rendering the default region");
    }
    let region = Region::from_points(&params.points);
    region.ensure_drawable("summary region")?;
    let figure = params.output.figure(geographic_aspect(&region))?;

    let clusters = cluster_points(&params.points, params.min_distance_m);
    let stats = ClusterStats::from_clusters(&clusters);
    info!(
        "Clustered {} points into {} markers (min distance {} m)",
        stats.points, stats.clusters, params.min_distance_m
    );

    prepare_output(&params.output.path)?;
    let canvas = MapCanvas::create(&params.output.path, figure, &theme.fontfamily)?;
    let frame = AxesFrame::new(FigureRect::full(), region);
    draw_base_map(&canvas, &frame, theme, &params.features)?;

    for cluster in &clusters {
        canvas.star(
            frame.geo_to_fraction(cluster.centroid),
            cluster_marker_size(cluster.count),
            theme.starcolor.into(),
            &frame.rect,
        )?;
    }

    if let Some(caption) = &params.caption {
        canvas.text(&Label {
            text: caption,
            position: frame.rect.at(TEXT_INSET_FRACTION, TEXT_INSET_FRACTION),
            offset_pt: (0.0, 0.0),
            h_align: HAlign::Left,
            v_align: VAlign::Bottom,
            size_pt: theme.caption_fontsize,
            color: theme.textcolor.into(),
        })?;
    }

    canvas
        .present()
        .with_context(|| format!("Failed to write {}", params.output.path.display()))?;
    finish(&params.output, &figure, Some(stats))
}

fn finish(
    output: &OutputOptions,
    figure: &Figure,
    clusters: Option<ClusterStats>,
) -> crate::Result<RenderOutcome> {
    info!("Map saved to {}", output.path.display());
    if output.show {
        open_preview(&output.path);
    }
    Ok(RenderOutcome {
        path: output.path.clone(),
        width_px: figure.width_px,
        height_px: figure.height_px,
        clusters,
    })
}

/// Open the image with the platform's default viewer; failures are only logged
fn open_preview(path: &Path) {
    let mut command = if cfg!(target_os = "macos") {
        Command::new("open")
    } else if cfg!(target_os = "windows") {
        let mut c = Command::new("cmd");
        c.args(["/C", "start", ""]);
        c
    } else {
        Command::new("xdg-open")
    };
    if let Err(e) = command.arg(path).spawn() {
        warn!("Could not open a preview of {}: {}", path.display(), e);
    }
}
