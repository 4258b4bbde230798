//! Clipping map geometry to an axes extent
//!
//! Rings are clipped with Sutherland-Hodgman and line strings with Cohen-Sutherland,
//! so only the part of a layer inside the window is rasterized.

use geo::{Coord, LineString, MultiLineString, Polygon, Rect};

/// Edge of the clipping rectangle
#[derive(Debug, Clone, Copy)]
enum Edge {
    Left,
    Right,
    Bottom,
    Top,
}

impl Edge {
    const ALL: [Edge; 4] = [Edge::Left, Edge::Right, Edge::Bottom, Edge::Top];

    fn is_inside(self, p: Coord<f64>, rect: &Rect<f64>) -> bool {
        match self {
            Edge::Left => p.x >= rect.min().x,
            Edge::Right => p.x <= rect.max().x,
            Edge::Bottom => p.y >= rect.min().y,
            Edge::Top => p.y <= rect.max().y,
        }
    }

    fn intersect(self, p: Coord<f64>, q: Coord<f64>, rect: &Rect<f64>) -> Coord<f64> {
        let dx = q.x - p.x;
        let dy = q.y - p.y;
        match self {
            Edge::Left => {
                let x = rect.min().x;
                Coord { x, y: p.y + (x - p.x) / dx * dy }
            }
            Edge::Right => {
                let x = rect.max().x;
                Coord { x, y: p.y + (x - p.x) / dx * dy }
            }
            Edge::Bottom => {
                let y = rect.min().y;
                Coord { x: p.x + (y - p.y) / dy * dx, y }
            }
            Edge::Top => {
                let y = rect.max().y;
                Coord { x: p.x + (y - p.y) / dy * dx, y }
            }
        }
    }
}

/// Clip a polygon against one edge (Sutherland-Hodgman step)
fn clip_ring_edge(vertices: &[Coord<f64>], edge: Edge, rect: &Rect<f64>) -> Vec<Coord<f64>> {
    let n = vertices.len();
    let mut output = Vec::with_capacity(n);

    for i in 0..n {
        let current = vertices[i];
        let next = vertices[(i + 1) % n];
        match (edge.is_inside(current, rect), edge.is_inside(next, rect)) {
            (true, true) => output.push(next),
            (true, false) => output.push(edge.intersect(current, next, rect)),
            (false, true) => {
                output.push(edge.intersect(current, next, rect));
                output.push(next);
            }
            (false, false) => {}
        }
    }

    output
}

/// Clip one ring; `None` when fewer than three vertices survive
fn clip_ring(ring: &LineString<f64>, rect: &Rect<f64>) -> Option<LineString<f64>> {
    let mut vertices = ring.0.clone();
    if vertices.len() > 1 && vertices.first() == vertices.last() {
        vertices.pop();
    }

    for edge in Edge::ALL {
        if vertices.is_empty() {
            return None;
        }
        vertices = clip_ring_edge(&vertices, edge, rect);
    }

    (vertices.len() >= 3).then(|| LineString::new(vertices))
}

/// Clip a polygon and its holes to `rect`.
///
/// Returns `None` when the exterior misses the window. Holes that miss it are dropped.
pub fn clip_polygon(polygon: &Polygon<f64>, rect: &Rect<f64>) -> Option<Polygon<f64>> {
    let exterior = clip_ring(polygon.exterior(), rect)?;
    let interiors = polygon
        .interiors()
        .iter()
        .filter_map(|ring| clip_ring(ring, rect))
        .collect();
    Some(Polygon::new(exterior, interiors))
}

/// Cohen-Sutherland region codes
const INSIDE: u8 = 0b0000;
const LEFT: u8 = 0b0001;
const RIGHT: u8 = 0b0010;
const BOTTOM: u8 = 0b0100;
const TOP: u8 = 0b1000;

fn outcode(p: Coord<f64>, rect: &Rect<f64>) -> u8 {
    let mut code = INSIDE;
    if p.x < rect.min().x {
        code |= LEFT;
    }
    if p.x > rect.max().x {
        code |= RIGHT;
    }
    if p.y < rect.min().y {
        code |= BOTTOM;
    }
    if p.y > rect.max().y {
        code |= TOP;
    }
    code
}

fn clip_segment(
    mut p0: Coord<f64>,
    mut p1: Coord<f64>,
    rect: &Rect<f64>,
) -> Option<(Coord<f64>, Coord<f64>)> {
    let mut code0 = outcode(p0, rect);
    let mut code1 = outcode(p1, rect);

    loop {
        if (code0 | code1) == 0 {
            return Some((p0, p1));
        }
        if (code0 & code1) != 0 {
            return None;
        }

        let code_out = if code0 != 0 { code0 } else { code1 };
        let dx = p1.x - p0.x;
        let dy = p1.y - p0.y;
        let (min, max) = (rect.min(), rect.max());

        let point = if code_out & TOP != 0 {
            Coord { x: p0.x + (max.y - p0.y) / dy * dx, y: max.y }
        } else if code_out & BOTTOM != 0 {
            Coord { x: p0.x + (min.y - p0.y) / dy * dx, y: min.y }
        } else if code_out & RIGHT != 0 {
            Coord { x: max.x, y: p0.y + (max.x - p0.x) / dx * dy }
        } else {
            Coord { x: min.x, y: p0.y + (min.x - p0.x) / dx * dy }
        };

        if code_out == code0 {
            p0 = point;
            code0 = outcode(p0, rect);
        } else {
            p1 = point;
            code1 = outcode(p1, rect);
        }
    }
}

/// Clip a line string, splitting it into the runs that fall inside `rect`
pub fn clip_line_string(line: &LineString<f64>, rect: &Rect<f64>) -> MultiLineString<f64> {
    fn flush(run: &mut Vec<Coord<f64>>, runs: &mut Vec<LineString<f64>>) {
        if run.len() >= 2 {
            runs.push(LineString::new(std::mem::take(run)));
        } else {
            run.clear();
        }
    }

    let mut runs = Vec::new();
    let mut run: Vec<Coord<f64>> = Vec::new();
    for window in line.0.windows(2) {
        match clip_segment(window[0], window[1], rect) {
            Some((c0, c1)) => {
                if run.last() != Some(&c0) {
                    flush(&mut run, &mut runs);
                    run.push(c0);
                }
                run.push(c1);
            }
            None => flush(&mut run, &mut runs),
        }
    }
    flush(&mut run, &mut runs);
    MultiLineString::new(runs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_rect() -> Rect<f64> {
        Rect::new(Coord { x: 0.0, y: 0.0 }, Coord { x: 10.0, y: 10.0 })
    }

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> LineString<f64> {
        LineString::from(vec![(x0, y0), (x1, y0), (x1, y1), (x0, y1), (x0, y0)])
    }

    #[test]
    fn test_clip_polygon_fully_inside() {
        let poly = Polygon::new(square(2.0, 2.0, 8.0, 8.0), vec![]);
        let clipped = clip_polygon(&poly, &unit_rect()).unwrap();
        // Polygon::new closes the ring again
        assert_eq!(clipped.exterior().0.len(), 5);
    }

    #[test]
    fn test_clip_polygon_partial() {
        let poly = Polygon::new(square(-5.0, -5.0, 5.0, 5.0), vec![]);
        let clipped = clip_polygon(&poly, &unit_rect()).unwrap();
        for coord in clipped.exterior().coords() {
            assert!(
                coord.x >= -1e-9 && coord.x <= 5.0 + 1e-9 && coord.y >= -1e-9 && coord.y <= 5.0 + 1e-9,
                "Clipped coord ({}, {}) outside window",
                coord.x,
                coord.y
            );
        }
    }

    #[test]
    fn test_clip_polygon_fully_outside() {
        let poly = Polygon::new(square(20.0, 20.0, 30.0, 30.0), vec![]);
        assert!(clip_polygon(&poly, &unit_rect()).is_none());
    }

    #[test]
    fn test_clip_polygon_keeps_inner_holes_only() {
        let poly = Polygon::new(
            square(-5.0, -5.0, 15.0, 15.0),
            vec![square(2.0, 2.0, 4.0, 4.0), square(12.0, 12.0, 14.0, 14.0)],
        );
        let clipped = clip_polygon(&poly, &unit_rect()).unwrap();
        assert_eq!(clipped.interiors().len(), 1);
        assert_eq!(clipped.interiors()[0], square(2.0, 2.0, 4.0, 4.0));
    }

    #[test]
    fn test_clip_line_partial() {
        let line = LineString::from(vec![(-5.0, 5.0), (15.0, 5.0)]);
        let runs = clip_line_string(&line, &unit_rect());
        assert_eq!(runs.0.len(), 1);
        assert_eq!(runs.0[0], LineString::from(vec![(0.0, 5.0), (10.0, 5.0)]));
    }

    #[test]
    fn test_clip_line_splits_runs() {
        // In, out, back in
        let line = LineString::from(vec![
            (1.0, 5.0),
            (5.0, 5.0),
            (15.0, 5.0),
            (15.0, 6.0),
            (5.0, 6.0),
            (2.0, 6.0),
        ]);
        let runs = clip_line_string(&line, &unit_rect());
        assert_eq!(runs.0.len(), 2);
        assert_eq!(runs.0[0], LineString::from(vec![(1.0, 5.0), (5.0, 5.0), (10.0, 5.0)]));
        assert_eq!(runs.0[1], LineString::from(vec![(10.0, 6.0), (5.0, 6.0), (2.0, 6.0)]));
    }

    #[test]
    fn test_clip_line_fully_outside() {
        let line = LineString::from(vec![(20.0, 20.0), (30.0, 30.0)]);
        assert!(clip_line_string(&line, &unit_rect()).0.is_empty());
    }
}
