//! Drawing primitives on a Plotters bitmap, addressed in figure fractions

use crate::clip::{clip_line_string, clip_polygon};
use crate::features::FeatureLayer;
use crate::geometry::{AxesFrame, Figure, FigureRect};
use crate::layout::{HAlign, VAlign};
use geo::{LineString, Rect};
use image::RgbaImage;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::f64::consts::PI;
use std::path::Path;
use tracing::warn;

/// Inner/outer radius ratio of the star marker
const STAR_INNER_RATIO: f64 = 0.382;

/// A piece of text positioned in figure fractions
#[derive(Debug, Clone)]
pub struct Label<'a> {
    pub text: &'a str,
    pub position: (f64, f64),
    /// Extra displacement in points, y up
    pub offset_pt: (f64, f64),
    pub h_align: HAlign,
    pub v_align: VAlign,
    pub size_pt: f64,
    pub color: RGBColor,
}

/// The output image being drawn
pub struct MapCanvas<'a> {
    area: DrawingArea<BitMapBackend<'a>, Shift>,
    figure: Figure,
    font_family: &'a str,
}

impl<'a> MapCanvas<'a> {
    pub fn create(path: &'a Path, figure: Figure, font_family: &'a str) -> crate::Result<Self> {
        let area =
            BitMapBackend::new(path, (figure.width_px, figure.height_px)).into_drawing_area();
        Ok(Self {
            area,
            figure,
            font_family,
        })
    }

    fn to_px(&self, fraction: (f64, f64)) -> (i32, i32) {
        let (x, y) = self.figure.fraction_to_pixel(fraction);
        (x.round() as i32, y.round() as i32)
    }

    fn line_px(&self, width_pt: f64) -> u32 {
        self.figure.points_to_px(width_pt).round().max(1.0) as u32
    }

    /// Fill a figure rectangle with a solid color
    pub fn fill_rect(&self, rect: &FigureRect, color: RGBColor) -> crate::Result<()> {
        let corners = [self.to_px(rect.at(0.0, 1.0)), self.to_px(rect.at(1.0, 0.0))];
        self.area.draw(&Rectangle::new(corners, color.filled()))?;
        Ok(())
    }

    /// Outline a figure rectangle
    pub fn stroke_rect(&self, rect: &FigureRect, color: RGBColor, width_pt: f64) -> crate::Result<()> {
        let ring = vec![
            self.to_px(rect.at(0.0, 0.0)),
            self.to_px(rect.at(1.0, 0.0)),
            self.to_px(rect.at(1.0, 1.0)),
            self.to_px(rect.at(0.0, 1.0)),
            self.to_px(rect.at(0.0, 0.0)),
        ];
        self.area
            .draw(&PathElement::new(ring, color.stroke_width(self.line_px(width_pt))))?;
        Ok(())
    }

    /// Draw a straight line between two figure positions
    pub fn line(
        &self,
        from: (f64, f64),
        to: (f64, f64),
        color: RGBAColor,
        width_pt: f64,
    ) -> crate::Result<()> {
        let points = vec![self.to_px(from), self.to_px(to)];
        self.area
            .draw(&PathElement::new(points, color.stroke_width(self.line_px(width_pt))))?;
        Ok(())
    }

    /// Fill the polygons of a layer inside an axes, painting holes with `hole_color`
    pub fn fill_layer(
        &self,
        frame: &AxesFrame,
        layer: &FeatureLayer,
        color: RGBColor,
        hole_color: RGBColor,
    ) -> crate::Result<()> {
        let window = frame.clip_rect();
        for polygon in layer.polygons_in(&window) {
            let Some(clipped) = clip_polygon(polygon, &window) else {
                continue;
            };
            self.fill_ring(frame, clipped.exterior(), color)?;
            for hole in clipped.interiors() {
                self.fill_ring(frame, hole, hole_color)?;
            }
        }
        Ok(())
    }

    fn project_line(&self, frame: &AxesFrame, line: &LineString<f64>) -> Vec<(i32, i32)> {
        line.coords()
            .map(|&c| self.to_px(frame.data_to_fraction(c)))
            .collect()
    }

    fn fill_ring(&self, frame: &AxesFrame, ring: &LineString<f64>, color: RGBColor) -> crate::Result<()> {
        self.area
            .draw(&Polygon::new(self.project_line(frame, ring), color.filled()))?;
        Ok(())
    }

    /// Stroke the lines and polygon outlines of a layer inside an axes
    pub fn stroke_layer(
        &self,
        frame: &AxesFrame,
        layer: &FeatureLayer,
        color: RGBColor,
        width_pt: f64,
    ) -> crate::Result<()> {
        let window = frame.clip_rect();
        let style = color.stroke_width(self.line_px(width_pt));
        for outline in layer.outlines() {
            for run in clip_line_string(outline, &window).0.iter() {
                self.area
                    .draw(&PathElement::new(self.project_line(frame, run), style))?;
            }
        }
        Ok(())
    }

    /// Draw a five-pointed star whose outer diameter is `size_pt`, clipped to `within`
    pub fn star(
        &self,
        center: (f64, f64),
        size_pt: f64,
        color: RGBColor,
        within: &FigureRect,
    ) -> crate::Result<()> {
        let (cx, cy) = self.figure.fraction_to_pixel(center);
        let outer = self.figure.points_to_px(size_pt) / 2.0;
        let inner = outer * STAR_INNER_RATIO;
        let outline: LineString<f64> = (0..10)
            .map(|i| {
                let radius = if i % 2 == 0 { outer } else { inner };
                // Start at the top point and walk clockwise in pixel space
                let angle = -PI / 2.0 + i as f64 * PI / 5.0;
                (cx + radius * angle.cos(), cy + radius * angle.sin())
            })
            .collect();

        let window = Rect::new(
            self.figure.fraction_to_pixel(within.at(0.0, 0.0)),
            self.figure.fraction_to_pixel(within.at(1.0, 1.0)),
        );
        let Some(clipped) = clip_polygon(&geo::Polygon::new(outline, vec![]), &window) else {
            return Ok(());
        };
        let points: Vec<(i32, i32)> = clipped
            .exterior()
            .coords()
            .map(|c| (c.x.round() as i32, c.y.round() as i32))
            .collect();
        self.area.draw(&Polygon::new(points, color.filled()))?;
        Ok(())
    }

    /// Draw a label. Text that cannot be drawn (e.g. no usable font) is skipped.
    pub fn text(&self, label: &Label) -> crate::Result<()> {
        let (x, y) = self.figure.fraction_to_pixel(label.position);
        let x = x + self.figure.points_to_px(label.offset_pt.0);
        let y = y - self.figure.points_to_px(label.offset_pt.1);

        let h = match label.h_align {
            HAlign::Left => HPos::Left,
            HAlign::Center => HPos::Center,
            HAlign::Right => HPos::Right,
        };
        let v = match label.v_align {
            VAlign::Top => VPos::Top,
            VAlign::Center => VPos::Center,
            VAlign::Bottom => VPos::Bottom,
        };
        let style = (self.font_family, self.figure.points_to_px(label.size_pt))
            .into_font()
            .color(&label.color)
            .pos(Pos::new(h, v));

        let element = Text::new(label.text, (x.round() as i32, y.round() as i32), style);
        if let Err(e) = self.area.draw(&element) {
            warn!("Could not draw label {:?}: {}", label.text, e);
        }
        Ok(())
    }

    /// Blend an image onto the canvas with its lower-left corner at `lower_left`
    pub fn image(&self, lower_left: (f64, f64), image: &RgbaImage) -> crate::Result<()> {
        let (left, bottom) = self.to_px(lower_left);
        let top = bottom - image.height() as i32;
        for (x, y, pixel) in image.enumerate_pixels() {
            let [r, g, b, a] = pixel.0;
            if a == 0 {
                continue;
            }
            let color = RGBAColor(r, g, b, a as f64 / 255.0);
            self.area
                .draw_pixel((left + x as i32, top + y as i32), &color)?;
        }
        Ok(())
    }

    /// Encode and write the image
    pub fn present(self) -> crate::Result<()> {
        self.area.present()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::parse_layer;
    use crate::region::Region;
    use tempfile::tempdir;

    #[test]
    fn test_canvas_draws_and_writes_png() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("canvas.png");
        let figure = Figure::from_inches(2.0, 1.0, 50);

        let layer = parse_layer(
            r#"{"type": "FeatureCollection", "features": [
                {"type": "Feature", "geometry": {"type": "Polygon",
                 "coordinates": [[[-20, -20], [5, -20], [5, 5], [-20, 5], [-20, -20]]]}}
            ]}"#,
        )
        .unwrap();

        {
            let canvas = MapCanvas::create(&path, figure, "serif").unwrap();
            let frame = AxesFrame::new(FigureRect::full(), Region::new(-10.0, 10.0, -10.0, 10.0));
            canvas.fill_rect(&FigureRect::full(), BLACK).unwrap();
            canvas.fill_layer(&frame, &layer, WHITE, BLACK).unwrap();
            canvas.stroke_layer(&frame, &layer, RED, 0.5).unwrap();
            canvas.star((0.5, 0.5), 9.0, YELLOW, &FigureRect::full()).unwrap();
            // Entirely outside its window: nothing drawn, no error
            canvas
                .star((0.9, 0.9), 9.0, YELLOW, &FigureRect::new(0.0, 0.0, 0.2, 0.2))
                .unwrap();
            canvas
                .image((0.1, 0.1), &RgbaImage::from_pixel(2, 2, image::Rgba([0, 0, 255, 255])))
                .unwrap();
            canvas.present().unwrap();
        }

        let written = std::fs::metadata(&path).unwrap();
        assert!(written.len() > 0);
    }
}
