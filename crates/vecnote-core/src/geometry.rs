//! Bounding boxes and lasso hit testing.

use crate::stroke::{Point, Stroke};
use kurbo::Rect;

/// Axis-aligned box enclosing a set of points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Grow the box by `padding` on every side.
    pub fn padded(self, padding: f64) -> Self {
        Self {
            min_x: self.min_x - padding,
            min_y: self.min_y - padding,
            max_x: self.max_x + padding,
            max_y: self.max_y + padding,
        }
    }

    /// Inclusive containment test.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.min_x && point.x <= self.max_x && point.y >= self.min_y && point.y <= self.max_y
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn to_rect(&self) -> Rect {
        Rect::new(self.min_x, self.min_y, self.max_x, self.max_y)
    }
}

/// Box enclosing every point of every stroke, without padding.
///
/// Returns `None` when there are no points at all.
pub fn bounding_box<'a, I>(strokes: I) -> Option<BoundingBox>
where
    I: IntoIterator<Item = &'a Stroke>,
{
    let mut bounds: Option<BoundingBox> = None;
    for point in strokes.into_iter().flat_map(|s| s.points.iter()) {
        bounds = Some(match bounds {
            None => BoundingBox {
                min_x: point.x,
                min_y: point.y,
                max_x: point.x,
                max_y: point.y,
            },
            Some(b) => BoundingBox {
                min_x: b.min_x.min(point.x),
                min_y: b.min_y.min(point.y),
                max_x: b.max_x.max(point.x),
                max_y: b.max_y.max(point.y),
            },
        });
    }
    bounds
}

/// Box enclosing the selected strokes only.
pub fn selection_bounds(strokes: &[Stroke]) -> Option<BoundingBox> {
    bounding_box(strokes.iter().filter(|s| s.selected))
}

/// Even-odd ray casting test.
///
/// The polygon is closed implicitly between its last and first vertex.
/// Fewer than three vertices never contain anything.
pub fn point_in_polygon(point: Point, polygon: &[Point]) -> bool {
    if polygon.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let (xi, yi) = (polygon[i].x, polygon[i].y);
        let (xj, yj) = (polygon[j].x, polygon[j].y);

        // Horizontal edges fail the first test, so the division is safe.
        let crosses = (yi > point.y) != (yj > point.y)
            && point.x < (xj - xi) * (point.y - yi) / (yj - yi) + xi;
        if crosses {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Whether any point of `stroke` lies inside the lasso polygon.
pub fn stroke_in_lasso(stroke: &Stroke, lasso: &[Point]) -> bool {
    stroke.points.iter().any(|p| point_in_polygon(*p, lasso))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stroke(points: &[(f64, f64)]) -> Stroke {
        Stroke::new(
            "s",
            points.iter().map(|&(x, y)| Point::new(x, y)).collect(),
            "#FFFFFF",
            3.0,
        )
    }

    fn square() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, 10.0),
            Point::new(10.0, 10.0),
            Point::new(10.0, 0.0),
        ]
    }

    #[test]
    fn test_bounding_box_empty() {
        assert!(bounding_box(&Vec::<Stroke>::new()).is_none());
        assert!(bounding_box(&[stroke(&[])]).is_none());
    }

    #[test]
    fn test_bounding_box_multiple_strokes() {
        let strokes = [stroke(&[(0.0, 5.0), (10.0, 20.0)]), stroke(&[(-3.0, 7.0)])];
        let bounds = bounding_box(&strokes).unwrap();
        assert_eq!(
            bounds,
            BoundingBox {
                min_x: -3.0,
                min_y: 5.0,
                max_x: 10.0,
                max_y: 20.0
            }
        );
    }

    #[test]
    fn test_single_point_box_has_zero_size() {
        let bounds = bounding_box(&[stroke(&[(4.0, 4.0)])]).unwrap();
        assert_eq!(bounds.width(), 0.0);
        assert_eq!(bounds.height(), 0.0);
        assert!(bounds.contains(Point::new(4.0, 4.0)));
    }

    #[test]
    fn test_padded_contains() {
        let bounds = bounding_box(&[stroke(&[(0.0, 0.0), (20.0, 20.0)])]).unwrap();
        assert!(!bounds.contains(Point::new(-3.0, 10.0)));
        assert!(bounds.padded(5.0).contains(Point::new(-3.0, 10.0)));
        assert!(bounds.padded(5.0).contains(Point::new(25.0, 25.0)));
        assert!(!bounds.padded(5.0).contains(Point::new(25.1, 25.0)));
    }

    #[test]
    fn test_selection_bounds_ignores_unselected() {
        let mut a = stroke(&[(0.0, 0.0), (1.0, 1.0)]);
        a.selected = true;
        let b = stroke(&[(100.0, 100.0)]);
        let bounds = selection_bounds(&[a, b.clone()]).unwrap();
        assert_eq!(bounds.max_x, 1.0);
        assert!(selection_bounds(&[b]).is_none());
    }

    #[test]
    fn test_point_in_square() {
        let polygon = square();
        assert!(point_in_polygon(Point::new(5.0, 5.0), &polygon));
        assert!(!point_in_polygon(Point::new(20.0, 20.0), &polygon));
        assert!(!point_in_polygon(Point::new(-1.0, 5.0), &polygon));
    }

    #[test]
    fn test_degenerate_polygons() {
        assert!(!point_in_polygon(Point::new(0.0, 0.0), &[]));
        assert!(!point_in_polygon(Point::new(0.0, 0.0), &[Point::new(0.0, 0.0)]));
        assert!(!point_in_polygon(
            Point::new(0.5, 0.5),
            &[Point::new(0.0, 0.0), Point::new(1.0, 1.0)]
        ));
        // Collinear triangle has no interior.
        let flat = [Point::new(0.0, 0.0), Point::new(5.0, 0.0), Point::new(10.0, 0.0)];
        assert!(!point_in_polygon(Point::new(5.0, 0.0), &flat));
    }

    #[test]
    fn test_self_intersecting_polygon_uses_even_odd() {
        // Bow tie crossing at (5, 5).
        let bow_tie = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(10.0, 0.0),
            Point::new(0.0, 10.0),
        ];
        assert!(point_in_polygon(Point::new(2.0, 5.0), &bow_tie));
        assert!(point_in_polygon(Point::new(8.0, 5.0), &bow_tie));
        assert!(!point_in_polygon(Point::new(5.0, 1.0), &bow_tie));
    }

    #[test]
    fn test_stroke_in_lasso_any_point() {
        let lasso = square();
        assert!(stroke_in_lasso(&stroke(&[(50.0, 50.0), (5.0, 5.0)]), &lasso));
        assert!(!stroke_in_lasso(&stroke(&[(20.0, 20.0), (30.0, 30.0)]), &lasso));
    }
}
