use crate::config::RoutingConfig;
use crate::geometry::{Point, Rect, segment_intersects_rect};
use crate::ir::NodeId;

use super::obstacles::ObstacleMap;
use super::types::{Connection, EdgeKey, Orientation, Route};

/// Returns the first obstacle touched by `points`, skipping the edge's own
/// endpoints. Segments are walked in order and obstacles in map order.
pub(super) fn first_collision<'a>(
    points: &[Point],
    obstacles: &'a ObstacleMap,
    key: &EdgeKey,
    padding: f32,
) -> Option<(&'a NodeId, &'a Rect)> {
    for segment in points.windows(2) {
        let (a, b) = (segment[0], segment[1]);
        for (id, rect) in obstacles.iter() {
            if *id == key.parent_id || *id == key.child_id {
                continue;
            }
            if segment_intersects_rect(a, b, rect, padding) {
                return Some((id, rect));
            }
        }
    }
    None
}

fn travel_sign(from: f32, to: f32) -> f32 {
    if to < from { -1.0 } else { 1.0 }
}

/// Four-point elbows in order of preference.
///
/// Turns near the ends are measured along the direction of travel, so edges
/// going up or left mirror the ones going down or right.
pub(super) fn candidate_paths(
    start: Point,
    end: Point,
    orientation: Orientation,
    config: &RoutingConfig,
) -> Vec<Vec<Point>> {
    let turn = config.turn_offset;
    match orientation {
        Orientation::Vertical => {
            let dir = travel_sign(start.y, end.y);
            let elbow = |y: f32| {
                vec![
                    start,
                    Point::new(start.x, y),
                    Point::new(end.x, y),
                    end,
                ]
            };
            vec![
                elbow((start.y + end.y) / 2.0),
                elbow(start.y + turn * dir),
                elbow(end.y - turn * dir),
            ]
        }
        Orientation::Horizontal => {
            let dir = travel_sign(start.x, end.x);
            let elbow = |x: f32| {
                vec![
                    start,
                    Point::new(x, start.y),
                    Point::new(x, end.y),
                    end,
                ]
            };
            let lift_y = start.y.min(end.y) - config.lift_offset;
            vec![
                elbow((start.x + end.x) / 2.0),
                elbow(start.x + turn * dir),
                elbow(end.x - turn * dir),
                vec![
                    start,
                    Point::new(start.x, lift_y),
                    Point::new(end.x, lift_y),
                    end,
                ],
            ]
        }
    }
}

/// Side-step around `blocker` for an edge running top to bottom.
///
/// ```text
///   start
///     |
///     +------+        branch row (skipped when start is already level)
///            |
///   [blocker]|        detour column
///            |
///     +------+        merge row
///     |
///    end
/// ```
fn downward_detour(start: Point, end: Point, blocker: &Rect, config: &RoutingConfig) -> Vec<Point> {
    let pad = config.detour_padding;
    let gap = config.detour_gap;
    let left_x = blocker.left - pad;
    let right_x = blocker.right() + pad;
    let detour_x = if (left_x - end.x).abs() < (right_x - end.x).abs() {
        left_x
    } else {
        right_x
    };

    let mut points = vec![start];
    if start.y > blocker.top - config.detour_start_tolerance {
        points.push(Point::new(detour_x, start.y));
    } else {
        let branch_y = ((start.y + blocker.top) / 2.0).min(blocker.top - gap);
        points.push(Point::new(start.x, branch_y));
        points.push(Point::new(detour_x, branch_y));
    }
    let merge_y = ((end.y + blocker.bottom()) / 2.0).max(blocker.bottom() + gap);
    points.push(Point::new(detour_x, merge_y));
    points.push(Point::new(end.x, merge_y));
    points.push(end);
    points
}

pub(super) fn robust_detour(
    start: Point,
    end: Point,
    blocker: &Rect,
    config: &RoutingConfig,
) -> Vec<Point> {
    if end.y >= start.y {
        return downward_detour(start, end, blocker, config);
    }
    // Upward edges: route in a y-mirrored frame and mirror back.
    let flip = |p: Point| Point::new(p.x, -p.y);
    let mirrored = Rect::new(blocker.left, -blocker.bottom(), blocker.width, blocker.height);
    downward_detour(flip(start), flip(end), &mirrored, config)
        .into_iter()
        .map(flip)
        .collect()
}

/// Routes one connection. Always returns a path.
///
/// The first collision-free candidate wins. Vertical edges whose candidates
/// are all blocked try a detour around the first blocker. If that also
/// collides, the simplest candidate is returned flagged as blocked.
pub fn route_connection(
    conn: &Connection,
    obstacles: &ObstacleMap,
    config: &RoutingConfig,
) -> Route {
    let padding = config.obstacle_padding;
    let candidates = candidate_paths(conn.start, conn.end, conn.orientation, config);

    let mut first_blocker: Option<(&NodeId, &Rect)> = None;
    for points in &candidates {
        match first_collision(points, obstacles, &conn.key, padding) {
            None => {
                return Route {
                    points: points.clone(),
                    is_blocked: false,
                    blocker: None,
                };
            }
            Some(hit) => {
                if first_blocker.is_none() {
                    first_blocker = Some(hit);
                }
            }
        }
    }

    if conn.orientation == Orientation::Vertical
        && let Some((_, rect)) = first_blocker
    {
        let detour = robust_detour(conn.start, conn.end, rect, config);
        if first_collision(&detour, obstacles, &conn.key, padding).is_none() {
            return Route {
                points: detour,
                is_blocked: false,
                blocker: None,
            };
        }
    }

    let points = candidates.into_iter().next().unwrap_or_else(|| vec![conn.start, conn.end]);
    Route {
        points,
        is_blocked: true,
        blocker: first_blocker.map(|(id, _)| id.clone()),
    }
}
