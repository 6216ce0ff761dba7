/// Absolute screen position in pixels.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(&self, dx: i32, dy: i32) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }
}

/// Axis-aligned screen rectangle, defined by its top-left corner.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    /// Build a rectangle from two corner points. Returns `None` unless
    /// `top_left` is strictly above and to the left of `bottom_right`.
    pub fn from_corners(top_left: Point, bottom_right: Point) -> Option<Rect> {
        if top_left.x < bottom_right.x && top_left.y < bottom_right.y {
            Some(Rect {
                x: top_left.x,
                y: top_left.y,
                width: (bottom_right.x - top_left.x) as u32,
                height: (bottom_right.y - top_left.y) as u32,
            })
        } else {
            None
        }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_corners_valid() {
        let r = Rect::from_corners(Point::new(10, 20), Point::new(110, 70)).unwrap();
        assert_eq!(r.x, 10);
        assert_eq!(r.y, 20);
        assert_eq!(r.width, 100);
        assert_eq!(r.height, 50);
    }

    #[test]
    fn test_from_corners_rejects_degenerate() {
        // Zero-area (corners equal)
        assert!(Rect::from_corners(Point::new(5, 5), Point::new(5, 5)).is_none());
        // Inverted on one axis
        assert!(Rect::from_corners(Point::new(50, 5), Point::new(5, 50)).is_none());
        // Zero width only
        assert!(Rect::from_corners(Point::new(5, 5), Point::new(5, 50)).is_none());
    }
}
