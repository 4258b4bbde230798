//! Figure-fraction layout: inset placement and title anchoring

use crate::geometry::{FigureRect, LatLon};
use crate::region::Region;

/// Tolerance (figure fraction) below which boxes count as touching
pub const SIDE_EPSILON: f64 = 0.005;

/// Distance between the zoom rectangle and its title, in points
pub const TITLE_OFFSET_PT: f64 = 5.0;

/// Where the inset sits relative to the zoom rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsetSide {
    Above,
    Below,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAlign {
    Top,
    Center,
    Bottom,
}

/// Lower-left corner of the inset: offset from the marker by `margin`, clamped so the
/// whole inset stays `margin` away from the figure edges.
pub fn place_inset(marker: (f64, f64), size: f64, margin: f64) -> FigureRect {
    let clamp = |v: f64| (v + margin).max(margin).min(1.0 - size - margin);
    FigureRect::new(clamp(marker.0), clamp(marker.1), size, size)
}

/// Classify the inset's position relative to the zoom rectangle.
///
/// Vertical separation wins over horizontal. Returns `None` when the boxes overlap or
/// are within [`SIDE_EPSILON`] of each other on every axis.
pub fn classify_inset_side(rect: &FigureRect, inset: &FigureRect) -> Option<InsetSide> {
    if inset.y0 >= rect.y1() + SIDE_EPSILON {
        Some(InsetSide::Above)
    } else if inset.y1() <= rect.y0 - SIDE_EPSILON {
        Some(InsetSide::Below)
    } else if inset.x1() <= rect.x0 - SIDE_EPSILON {
        Some(InsetSide::Left)
    } else if inset.x0 >= rect.x1() + SIDE_EPSILON {
        Some(InsetSide::Right)
    } else {
        None
    }
}

/// Anchor and alignment of the main title next to the zoom rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TitlePlacement {
    /// Geographic anchor on the rectangle's outline
    pub anchor: LatLon,
    /// Offset from the anchor in points, y up
    pub offset_pt: (f64, f64),
    pub h_align: HAlign,
    pub v_align: VAlign,
}

impl TitlePlacement {
    /// Put the title on the side of `zoom` facing away from the inset; above by default
    pub fn away_from(side: Option<InsetSide>, zoom: &Region) -> Self {
        let mid_lat = (zoom.min_lat() + zoom.max_lat()) / 2.0;
        match side {
            Some(InsetSide::Above) => Self {
                anchor: LatLon::new(zoom.min_lat(), zoom.min_lon()),
                offset_pt: (TITLE_OFFSET_PT, -TITLE_OFFSET_PT),
                h_align: HAlign::Left,
                v_align: VAlign::Top,
            },
            Some(InsetSide::Below) | None => Self {
                anchor: LatLon::new(zoom.max_lat(), zoom.min_lon()),
                offset_pt: (TITLE_OFFSET_PT, TITLE_OFFSET_PT),
                h_align: HAlign::Left,
                v_align: VAlign::Bottom,
            },
            Some(InsetSide::Right) => Self {
                anchor: LatLon::new(mid_lat, zoom.min_lon()),
                offset_pt: (-TITLE_OFFSET_PT, 0.0),
                h_align: HAlign::Right,
                v_align: VAlign::Center,
            },
            Some(InsetSide::Left) => Self {
                anchor: LatLon::new(mid_lat, zoom.max_lon()),
                offset_pt: (TITLE_OFFSET_PT, 0.0),
                h_align: HAlign::Left,
                v_align: VAlign::Center,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inset_offset_from_marker() {
        let inset = place_inset((0.4, 0.3), 0.3, 0.02);
        assert!((inset.x0 - 0.42).abs() < 1e-12);
        assert!((inset.y0 - 0.32).abs() < 1e-12);
        assert_eq!((inset.width, inset.height), (0.3, 0.3));
    }

    #[test]
    fn test_inset_clamped_inside_figure() {
        let inset = place_inset((0.9, -0.5), 0.3, 0.02);
        assert!((inset.x0 - 0.68).abs() < 1e-12);
        assert!((inset.y0 - 0.02).abs() < 1e-12);
        assert!(inset.x1() <= 0.98 + 1e-12);
    }

    #[test]
    fn test_inset_below_rectangle() {
        let rect = FigureRect::new(0.4, 0.6, 0.1, 0.1);
        let inset = FigureRect::new(0.3, 0.1, 0.3, 0.3);
        assert_eq!(classify_inset_side(&rect, &inset), Some(InsetSide::Below));
    }

    #[test]
    fn test_inset_above_rectangle() {
        let rect = FigureRect::new(0.4, 0.2, 0.1, 0.1);
        let inset = FigureRect::new(0.3, 0.5, 0.3, 0.3);
        assert_eq!(classify_inset_side(&rect, &inset), Some(InsetSide::Above));
    }

    #[test]
    fn test_inset_beside_rectangle() {
        let rect = FigureRect::new(0.5, 0.4, 0.1, 0.1);
        let left = FigureRect::new(0.1, 0.3, 0.3, 0.3);
        let right = FigureRect::new(0.65, 0.3, 0.3, 0.3);
        assert_eq!(classify_inset_side(&rect, &left), Some(InsetSide::Left));
        assert_eq!(classify_inset_side(&rect, &right), Some(InsetSide::Right));
    }

    #[test]
    fn test_near_touching_is_undetermined() {
        let rect = FigureRect::new(0.4, 0.2, 0.1, 0.1);
        // Gap of 0.002 above the rectangle is within tolerance
        let inset = FigureRect::new(0.4, 0.302, 0.3, 0.3);
        assert_eq!(classify_inset_side(&rect, &inset), None);
        let overlapping = FigureRect::new(0.45, 0.25, 0.3, 0.3);
        assert_eq!(classify_inset_side(&rect, &overlapping), None);
    }

    #[test]
    fn test_title_faces_away_from_inset() {
        let zoom = Region::new(0.0, 2.0, 10.0, 12.0);

        let below = TitlePlacement::away_from(Some(InsetSide::Above), &zoom);
        assert_eq!(below.anchor, LatLon::new(10.0, 0.0));
        assert_eq!(below.v_align, VAlign::Top);
        assert_eq!(below.offset_pt, (5.0, -5.0));

        let above = TitlePlacement::away_from(Some(InsetSide::Below), &zoom);
        assert_eq!(above.anchor, LatLon::new(12.0, 0.0));
        assert_eq!(above.v_align, VAlign::Bottom);

        let left = TitlePlacement::away_from(Some(InsetSide::Right), &zoom);
        assert_eq!(left.anchor, LatLon::new(11.0, 0.0));
        assert_eq!(left.h_align, HAlign::Right);
        assert_eq!(left.offset_pt, (-5.0, 0.0));

        let right = TitlePlacement::away_from(Some(InsetSide::Left), &zoom);
        assert_eq!(right.anchor, LatLon::new(11.0, 2.0));
        assert_eq!(right.h_align, HAlign::Left);
    }

    #[test]
    fn test_title_defaults_above() {
        let zoom = Region::new(0.0, 2.0, 10.0, 12.0);
        assert_eq!(
            TitlePlacement::away_from(None, &zoom),
            TitlePlacement::away_from(Some(InsetSide::Below), &zoom)
        );
    }
}
