use gw_platform::{CursorIcon, HitTestCode};
use gw_settings::defaults::{default_edge_size, default_glow_size};

use crate::OwnerSnapshot;

/// Rectangle in logical (DPI independent) units.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LogicalRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl LogicalRect {
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Point in logical units.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LogicalPoint {
    pub x: f64,
    pub y: f64,
}

impl LogicalPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalAlignment {
    Left,
    Right,
    Stretch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalAlignment {
    Top,
    Bottom,
    Stretch,
}

/// Which side of the owner a decoration sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Left, Edge::Right, Edge::Top, Edge::Bottom];

    pub fn name(self) -> &'static str {
        match self {
            Edge::Top => "Top",
            Edge::Bottom => "Bottom",
            Edge::Left => "Left",
            Edge::Right => "Right",
        }
    }
}

/// Maps owner geometry to one edge's decoration rectangle and classifies points on it.
///
/// The four processors tile a frame of constant `thickness` around the owner. Top and bottom
/// span the full outer width and so own the corner squares; left and right span exactly the
/// owner height. All functions are total: degenerate input is clamped, never propagated as NaN.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeGeometryProcessor {
    edge: Edge,
    thickness: f64,
    corner: f64,
}

#[inline]
fn extent(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

#[inline]
fn coordinate(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

impl EdgeGeometryProcessor {
    pub fn new(edge: Edge, thickness: f64, corner: f64) -> Self {
        let thickness = if thickness.is_finite() {
            thickness.max(0.0)
        } else {
            default_glow_size()
        };
        let corner = if corner.is_finite() {
            corner.max(0.0)
        } else {
            default_edge_size()
        };
        Self {
            edge,
            thickness,
            corner,
        }
    }

    pub fn with_defaults(edge: Edge) -> Self {
        Self::new(edge, default_glow_size(), default_edge_size())
    }

    /// One processor per edge, in [`Edge::ALL`] order.
    pub fn all(thickness: f64, corner: f64) -> [Self; 4] {
        Edge::ALL.map(|edge| Self::new(edge, thickness, corner))
    }

    #[inline]
    pub fn edge(&self) -> Edge {
        self.edge
    }

    #[inline]
    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    #[inline]
    pub fn corner(&self) -> f64 {
        self.corner
    }

    pub fn left(&self, owner_left: f64, owner_width: f64) -> f64 {
        let owner_left = coordinate(owner_left);
        match self.edge {
            Edge::Top | Edge::Bottom | Edge::Left => owner_left - self.thickness,
            Edge::Right => owner_left + extent(owner_width),
        }
    }

    pub fn top(&self, owner_top: f64, owner_height: f64) -> f64 {
        let owner_top = coordinate(owner_top);
        match self.edge {
            Edge::Top => owner_top - self.thickness,
            Edge::Bottom => owner_top + extent(owner_height),
            Edge::Left | Edge::Right => owner_top,
        }
    }

    pub fn width(&self, _owner_left: f64, owner_width: f64) -> f64 {
        match self.edge {
            Edge::Top | Edge::Bottom => extent(owner_width) + self.thickness * 2.0,
            Edge::Left | Edge::Right => self.thickness,
        }
    }

    pub fn height(&self, _owner_top: f64, owner_height: f64) -> f64 {
        match self.edge {
            Edge::Top | Edge::Bottom => self.thickness,
            Edge::Left | Edge::Right => extent(owner_height),
        }
    }

    pub fn rect_for(&self, left: f64, top: f64, width: f64, height: f64) -> LogicalRect {
        LogicalRect {
            left: self.left(left, width),
            top: self.top(top, height),
            width: self.width(left, width),
            height: self.height(top, height),
        }
    }

    pub fn rect(&self, owner: &OwnerSnapshot) -> LogicalRect {
        self.rect_for(owner.left, owner.top, owner.width, owner.height)
    }

    pub fn orientation(&self) -> Orientation {
        match self.edge {
            Edge::Top | Edge::Bottom => Orientation::Horizontal,
            Edge::Left | Edge::Right => Orientation::Vertical,
        }
    }

    /// Content alignment inside the decoration; the glow hugs the owner.
    pub fn alignment(&self) -> (HorizontalAlignment, VerticalAlignment) {
        match self.edge {
            Edge::Top => (HorizontalAlignment::Stretch, VerticalAlignment::Bottom),
            Edge::Bottom => (HorizontalAlignment::Stretch, VerticalAlignment::Top),
            Edge::Left => (HorizontalAlignment::Right, VerticalAlignment::Stretch),
            Edge::Right => (HorizontalAlignment::Left, VerticalAlignment::Stretch),
        }
    }

    /// Classify an edge-local point. Diagonal codes cover `corner` units from each outer
    /// frame corner along both adjoining edges.
    pub fn hit_test(&self, point: LogicalPoint, edge_width: f64, edge_height: f64) -> HitTestCode {
        let width = extent(edge_width);
        let height = extent(edge_height);
        let g = self.thickness;
        let c = self.corner;

        match self.edge {
            Edge::Top | Edge::Bottom => {
                let (near, far, middle) = if self.edge == Edge::Top {
                    (HitTestCode::TopLeft, HitTestCode::TopRight, HitTestCode::Top)
                } else {
                    (
                        HitTestCode::BottomLeft,
                        HitTestCode::BottomRight,
                        HitTestCode::Bottom,
                    )
                };
                if point.x < c {
                    near
                } else if point.x >= width - c {
                    far
                } else {
                    middle
                }
            }
            Edge::Left | Edge::Right => {
                let (near, far, middle) = if self.edge == Edge::Left {
                    (HitTestCode::TopLeft, HitTestCode::BottomLeft, HitTestCode::Left)
                } else {
                    (
                        HitTestCode::TopRight,
                        HitTestCode::BottomRight,
                        HitTestCode::Right,
                    )
                };
                if point.y + g < c {
                    near
                } else if point.y >= height + g - c {
                    far
                } else {
                    middle
                }
            }
        }
    }

    pub fn cursor(&self, point: LogicalPoint, edge_width: f64, edge_height: f64) -> CursorIcon {
        cursor_for(self.hit_test(point, edge_width, edge_height))
    }

    /// Code forwarded for a double click, if this edge maximizes on double click.
    pub fn double_click_code(&self) -> Option<HitTestCode> {
        match self.edge {
            Edge::Top => Some(HitTestCode::Top),
            Edge::Bottom => Some(HitTestCode::Bottom),
            Edge::Left | Edge::Right => None,
        }
    }
}

pub fn cursor_for(code: HitTestCode) -> CursorIcon {
    match code {
        HitTestCode::TopLeft | HitTestCode::BottomRight => CursorIcon::SizeNWSE,
        HitTestCode::TopRight | HitTestCode::BottomLeft => CursorIcon::SizeNESW,
        HitTestCode::Top | HitTestCode::Bottom => CursorIcon::SizeNS,
        HitTestCode::Left | HitTestCode::Right => CursorIcon::SizeWE,
        _ => CursorIcon::Arrow,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const G: f64 = 9.0;
    const C: f64 = 20.0;

    fn frame(left: f64, top: f64, width: f64, height: f64) -> Vec<LogicalRect> {
        EdgeGeometryProcessor::all(G, C)
            .iter()
            .map(|p| p.rect_for(left, top, width, height))
            .collect()
    }

    fn area(r: &LogicalRect) -> f64 {
        r.width * r.height
    }

    // Half-open: the right and bottom edges are outside.
    fn contains(r: &LogicalRect, x: f64, y: f64) -> bool {
        x >= r.left && x < r.right() && y >= r.top && y < r.bottom()
    }

    fn overlap(a: &LogicalRect, b: &LogicalRect) -> f64 {
        let w = a.right().min(b.right()) - a.left.max(b.left);
        let h = a.bottom().min(b.bottom()) - a.top.max(b.top);
        if w <= 0.0 || h <= 0.0 { 0.0 } else { w * h }
    }

    #[test]
    fn edges_tile_a_frame_around_the_owner() {
        for &(l, t, w, h) in &[
            (100.0, 50.0, 800.0, 600.0),
            (-30.0, -40.0, 1.0, 1.0),
            (0.0, 0.0, 0.0, 0.0),
            (10.0, 10.0, 0.0, 300.0),
            (10.0, 10.0, 300.0, 0.0),
        ] {
            let rects = frame(l, t, w, h);
            let owner = LogicalRect::new(l, t, w, h);
            let outer = LogicalRect::new(l - G, t - G, w + 2.0 * G, h + 2.0 * G);

            let total: f64 = rects.iter().map(area).sum();
            assert_eq!(total, area(&outer) - area(&owner), "owner {owner:?}");

            for (i, a) in rects.iter().enumerate() {
                assert_eq!(overlap(a, &owner), 0.0);
                assert_eq!(overlap(a, &outer), area(a));
                for b in rects.iter().skip(i + 1) {
                    assert_eq!(overlap(a, b), 0.0, "{a:?} overlaps {b:?}");
                }
            }
        }
    }

    #[test]
    fn corner_pixels_belong_to_top_and_bottom() {
        let rects = frame(0.0, 0.0, 100.0, 100.0);
        let owners = |x: f64, y: f64| {
            Edge::ALL
                .iter()
                .zip(&rects)
                .filter(|(_, r)| contains(r, x, y))
                .map(|(edge, _)| *edge)
                .collect::<Vec<_>>()
        };

        assert_eq!(owners(-G, -G), vec![Edge::Top]);
        assert_eq!(owners(100.0 + G - 1.0, -1.0), vec![Edge::Top]);
        assert_eq!(owners(-1.0, 100.0), vec![Edge::Bottom]);
        assert_eq!(owners(100.0, 100.0 + G - 1.0), vec![Edge::Bottom]);
        assert_eq!(owners(-1.0, 0.0), vec![Edge::Left]);
        assert_eq!(owners(100.0, 99.0), vec![Edge::Right]);
    }

    #[test]
    fn top_edge_hit_codes() {
        let top = EdgeGeometryProcessor::new(Edge::Top, G, C);
        let w = 100.0 + 2.0 * G;

        assert_eq!(top.hit_test(LogicalPoint::new(0.0, 0.0), w, G), HitTestCode::TopLeft);
        assert_eq!(top.hit_test(LogicalPoint::new(C, 4.0), w, G), HitTestCode::Top);
        assert_eq!(top.hit_test(LogicalPoint::new(w - C - 0.5, 4.0), w, G), HitTestCode::Top);
        assert_eq!(top.hit_test(LogicalPoint::new(w - C, 4.0), w, G), HitTestCode::TopRight);
        assert_eq!(top.cursor(LogicalPoint::new(50.0, 1.0), w, G), CursorIcon::SizeNS);
        assert_eq!(top.cursor(LogicalPoint::new(1.0, 1.0), w, G), CursorIcon::SizeNWSE);
        assert_eq!(top.cursor(LogicalPoint::new(w - 1.0, 1.0), w, G), CursorIcon::SizeNESW);
    }

    #[test]
    fn side_edge_diagonal_zone_continues_from_the_corner() {
        let left = EdgeGeometryProcessor::new(Edge::Left, G, C);
        let right = EdgeGeometryProcessor::new(Edge::Right, G, C);
        let h = 200.0;

        // Top corner zone spans C units from the outer corner, G of which are on the top edge.
        assert_eq!(left.hit_test(LogicalPoint::new(4.0, C - G - 1.0), G, h), HitTestCode::TopLeft);
        assert_eq!(left.hit_test(LogicalPoint::new(4.0, C - G), G, h), HitTestCode::Left);
        assert_eq!(left.hit_test(LogicalPoint::new(4.0, h - 1.0), G, h), HitTestCode::BottomLeft);
        assert_eq!(right.hit_test(LogicalPoint::new(4.0, 0.0), G, h), HitTestCode::TopRight);
        assert_eq!(right.hit_test(LogicalPoint::new(4.0, 100.0), G, h), HitTestCode::Right);
        assert_eq!(right.hit_test(LogicalPoint::new(4.0, h), G, h), HitTestCode::BottomRight);
        assert_eq!(right.cursor(LogicalPoint::new(4.0, 100.0), G, h), CursorIcon::SizeWE);
        assert_eq!(left.cursor(LogicalPoint::new(4.0, h - 1.0), G, h), CursorIcon::SizeNESW);
    }

    #[test]
    fn orientation_alignment_and_double_click() {
        let [left, right, top, bottom] = EdgeGeometryProcessor::all(G, C);

        assert_eq!(top.orientation(), Orientation::Horizontal);
        assert_eq!(bottom.orientation(), Orientation::Horizontal);
        assert_eq!(left.orientation(), Orientation::Vertical);
        assert_eq!(right.orientation(), Orientation::Vertical);

        assert_eq!(top.alignment().1, VerticalAlignment::Bottom);
        assert_eq!(left.alignment().0, HorizontalAlignment::Right);

        assert_eq!(top.double_click_code(), Some(HitTestCode::Top));
        assert_eq!(bottom.double_click_code(), Some(HitTestCode::Bottom));
        assert_eq!(left.double_click_code(), None);
        assert_eq!(right.double_click_code(), None);
    }

    #[test]
    fn degenerate_input_never_produces_nan() {
        for p in EdgeGeometryProcessor::all(G, C) {
            for &(l, t, w, h) in &[
                (f64::NAN, 0.0, f64::NAN, -5.0),
                (0.0, f64::INFINITY, f64::NEG_INFINITY, f64::NAN),
            ] {
                let r = p.rect_for(l, t, w, h);
                assert!(r.left.is_finite() && r.top.is_finite());
                assert!(r.width >= 0.0 && r.height >= 0.0);
            }
            let _ = p.hit_test(LogicalPoint::new(f64::NAN, f64::NAN), 0.0, 0.0);
        }

        let p = EdgeGeometryProcessor::new(Edge::Top, f64::NAN, -1.0);
        assert_eq!(p.thickness(), default_glow_size());
        assert_eq!(p.corner(), 0.0);
    }
}
