//! Anchor resolution and link path construction.

use kurbo::{BezPath, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Discrete direction a link leaves its initiating block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Face {
    #[default]
    None,
    Up,
    Down,
    Left,
    Right,
}

impl Face {
    /// Unit vector pointing out of the face (y grows downwards).
    pub fn vector(self) -> Vec2 {
        match self {
            Face::None => Vec2::ZERO,
            Face::Up => Vec2::new(0.0, -1.0),
            Face::Down => Vec2::new(0.0, 1.0),
            Face::Left => Vec2::new(-1.0, 0.0),
            Face::Right => Vec2::new(1.0, 0.0),
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Face::Left | Face::Right)
    }
}

/// Anchor points for a link and the direction it travels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchors {
    /// Where the link leaves the initiating block.
    pub start: Point,
    /// Where the link (and its arrowhead) meets the receiving block.
    pub end: Point,
    pub face: Face,
}

/// Computes anchor geometry for a link between two boxes.
///
/// Implementations must be pure functions of the two boxes.
pub trait GeometryResolver {
    fn resolve(&self, from: Rect, to: Rect) -> Anchors;
}

/// Anchors links at the midpoints of the facing edges.
///
/// The face is picked from the dominant axis of the offset between the two
/// box centers; ties go to the horizontal axis.
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeResolver;

impl GeometryResolver for EdgeResolver {
    fn resolve(&self, from: Rect, to: Rect) -> Anchors {
        let a = from.center();
        let b = to.center();
        let d = b - a;

        if d.x.abs() >= d.y.abs() {
            if d.x >= 0.0 {
                Anchors {
                    start: Point::new(from.x1, a.y),
                    end: Point::new(to.x0, b.y),
                    face: Face::Right,
                }
            } else {
                Anchors {
                    start: Point::new(from.x0, a.y),
                    end: Point::new(to.x1, b.y),
                    face: Face::Left,
                }
            }
        } else if d.y >= 0.0 {
            Anchors {
                start: Point::new(a.x, from.y1),
                end: Point::new(b.x, to.y0),
                face: Face::Down,
            }
        } else {
            Anchors {
                start: Point::new(a.x, from.y0),
                end: Point::new(b.x, to.y1),
                face: Face::Up,
            }
        }
    }
}

/// Build the curved link between two anchors.
///
/// Control points are pulled out along the face axis so the curve leaves the
/// start anchor and enters the end anchor head-on.
pub fn link_path(anchors: &Anchors) -> BezPath {
    let mut path = BezPath::new();
    path.move_to(anchors.start);

    let dir = anchors.face.vector();
    let span = anchors.end - anchors.start;
    let along = if anchors.face.is_horizontal() { span.x } else { span.y };
    let reach = along.abs() / 2.0;

    if dir == Vec2::ZERO || reach == 0.0 {
        path.line_to(anchors.end);
        return path;
    }

    path.curve_to(
        anchors.start + dir * reach,
        anchors.end - dir * reach,
        anchors.end,
    );
    path
}

/// Build a closed arrowhead triangle with its tip at `tip`, pointing along `face`.
pub fn arrow_head(tip: Point, face: Face, width: f64, height: f64) -> BezPath {
    let mut path = BezPath::new();
    let dir = face.vector();
    if dir == Vec2::ZERO {
        return path;
    }
    let perp = Vec2::new(-dir.y, dir.x);

    let back = tip - dir * height;
    let left = back + perp * (width / 2.0);
    let right = back - perp * (width / 2.0);

    path.move_to(tip);
    path.line_to(left);
    path.line_to(right);
    path.close_path();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Shape;

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Rect {
        Rect::new(x, y, x + w, y + h)
    }

    #[test]
    fn test_resolve_right() {
        let anchors = EdgeResolver.resolve(rect(0.0, 0.0, 50.0, 50.0), rect(200.0, 10.0, 50.0, 50.0));
        assert_eq!(anchors.face, Face::Right);
        assert_eq!(anchors.start, Point::new(50.0, 25.0));
        assert_eq!(anchors.end, Point::new(200.0, 35.0));
    }

    #[test]
    fn test_resolve_left() {
        let anchors = EdgeResolver.resolve(rect(200.0, 0.0, 50.0, 50.0), rect(0.0, 0.0, 50.0, 50.0));
        assert_eq!(anchors.face, Face::Left);
        assert_eq!(anchors.start, Point::new(200.0, 25.0));
        assert_eq!(anchors.end, Point::new(50.0, 25.0));
    }

    #[test]
    fn test_resolve_vertical() {
        let down = EdgeResolver.resolve(rect(0.0, 0.0, 50.0, 50.0), rect(10.0, 300.0, 50.0, 50.0));
        assert_eq!(down.face, Face::Down);
        assert_eq!(down.start, Point::new(25.0, 50.0));
        assert_eq!(down.end, Point::new(35.0, 300.0));

        let up = EdgeResolver.resolve(rect(10.0, 300.0, 50.0, 50.0), rect(0.0, 0.0, 50.0, 50.0));
        assert_eq!(up.face, Face::Up);
        assert_eq!(up.start, Point::new(35.0, 300.0));
        assert_eq!(up.end, Point::new(25.0, 50.0));
    }

    #[test]
    fn test_resolve_is_pure() {
        let a = rect(0.0, 0.0, 75.0, 75.0);
        let b = rect(150.0, 75.0, 75.0, 75.0);
        assert_eq!(EdgeResolver.resolve(a, b), EdgeResolver.resolve(a, b));
    }

    #[test]
    fn test_link_path_endpoints() {
        let anchors = Anchors {
            start: Point::new(0.0, 0.0),
            end: Point::new(100.0, 40.0),
            face: Face::Right,
        };
        let path = link_path(&anchors);
        let bbox = path.bounding_box();
        assert!(bbox.x0.abs() < 1e-9 && bbox.y0.abs() < 1e-9);
        assert!((bbox.x1 - 100.0).abs() < 1e-9 && (bbox.y1 - 40.0).abs() < 1e-9);
        assert_eq!(path.elements().len(), 2);
    }

    #[test]
    fn test_link_path_without_face_is_straight() {
        let anchors = Anchors {
            start: Point::new(0.0, 0.0),
            end: Point::new(10.0, 10.0),
            face: Face::None,
        };
        let path = link_path(&anchors);
        assert_eq!(path.elements().len(), 2);
        assert_eq!(path.bounding_box(), Rect::new(0.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn test_arrow_head_points_along_face() {
        let head = arrow_head(Point::new(100.0, 50.0), Face::Right, 10.0, 10.0);
        assert_eq!(head.bounding_box(), Rect::new(90.0, 45.0, 100.0, 55.0));

        let head = arrow_head(Point::new(100.0, 50.0), Face::Up, 10.0, 10.0);
        assert_eq!(head.bounding_box(), Rect::new(95.0, 50.0, 105.0, 60.0));
    }

    #[test]
    fn test_arrow_head_without_face_is_empty() {
        let head = arrow_head(Point::new(1.0, 1.0), Face::None, 10.0, 10.0);
        assert!(head.elements().is_empty());
    }
}
