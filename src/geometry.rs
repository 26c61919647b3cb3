use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self::new(x, y)
    }
}

/// Axis-aligned rectangle in screen space.
///
/// ```text
///   (left, top) *-----------------* right
///               |                 |
///               |   (cx, cy) *    |
///               |                 |
///               *-----------------*
///                                   bottom
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn center_x(&self) -> f32 {
        self.left + self.width / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.top + self.height / 2.0
    }

    pub fn translate(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.left + dx, self.top + dy, self.width, self.height)
    }

    /// Grows the rectangle by `pad` on every side. Negative values shrink it.
    pub fn inflate(&self, pad: f32) -> Self {
        Self::new(
            self.left - pad,
            self.top - pad,
            self.width + pad * 2.0,
            self.height + pad * 2.0,
        )
    }

    pub fn is_finite(&self) -> bool {
        self.left.is_finite()
            && self.top.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
    }
}

/// Closed-interval test that does not care about the order of `a` and `b`.
pub fn is_between(c: f32, a: f32, b: f32) -> bool {
    (c >= a && c <= b) || (c >= b && c <= a)
}

/// Transversal intersection of two axis-aligned segments `p0-p1` and `p2-p3`.
///
/// A segment whose end points share `y` counts as horizontal, every other
/// segment as vertical. Two segments of the same orientation never intersect,
/// even when they overlap.
pub fn segments_intersect(p0: Point, p1: Point, p2: Point, p3: Point) -> bool {
    let (min_x1, max_x1) = (p0.x.min(p1.x), p0.x.max(p1.x));
    let (min_y1, max_y1) = (p0.y.min(p1.y), p0.y.max(p1.y));
    let (min_x2, max_x2) = (p2.x.min(p3.x), p2.x.max(p3.x));
    let (min_y2, max_y2) = (p2.y.min(p3.y), p2.y.max(p3.y));
    if max_x1 < min_x2 || min_x1 > max_x2 || max_y1 < min_y2 || min_y1 > max_y2 {
        return false;
    }

    let horizontal_a = p0.y == p1.y;
    let horizontal_b = p2.y == p3.y;
    if horizontal_a == horizontal_b {
        return false;
    }

    if horizontal_a {
        is_between(p2.x, p0.x, p1.x) && is_between(p0.y, p2.y, p3.y)
    } else {
        is_between(p0.x, p2.x, p3.x) && is_between(p2.y, p0.y, p1.y)
    }
}

/// Whether segment `a-b` touches `rect` grown by `padding`.
///
/// Axis-aligned segments are tested exactly. Anything diagonal that survives
/// the bounding-box check is reported as a hit.
pub fn segment_intersects_rect(a: Point, b: Point, rect: &Rect, padding: f32) -> bool {
    let min_x = a.x.min(b.x);
    let max_x = a.x.max(b.x);
    let min_y = a.y.min(b.y);
    let max_y = a.y.max(b.y);

    let padded = rect.inflate(padding);
    let (r_left, r_right) = (padded.left, padded.right());
    let (r_top, r_bottom) = (padded.top, padded.bottom());

    if max_x < r_left || min_x > r_right || max_y < r_top || min_y > r_bottom {
        return false;
    }

    if a.x == b.x {
        return a.x >= r_left && a.x <= r_right && max_y >= r_top && min_y <= r_bottom;
    }
    if a.y == b.y {
        return a.y >= r_top && a.y <= r_bottom && max_x >= r_left && min_x <= r_right;
    }
    true
}
