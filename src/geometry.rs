use std::f64::consts::{FRAC_PI_2, PI};
use std::ops::{Add, Mul, Sub};

/// Width of the logical board, in logical units.
pub const BOARD_WIDTH: f64 = 224.0;
/// Height of the logical board, in logical units.
pub const BOARD_HEIGHT: f64 = 288.0;

const POSITION_EPSILON: f64 = 1e-8;
const DIRECTION_EPSILON: f64 = 1e-5;
/// Rounding slack allowed when checking a clipped endpoint against its box.
pub const CLIP_SLACK: f64 = 1e-6;

/// A point (or a displacement) on the logical board.
/// The origin is the bottom-left corner and y grows upward.
#[derive(Debug, Clone, Copy, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const ZERO: Position = Position { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_out_of_bounds(&self) -> bool {
        self.x < 0.0 || self.y < 0.0 || self.x > BOARD_WIDTH || self.y > BOARD_HEIGHT
    }

    /// Angle of this vector. No wraparound is applied beyond the vertical axis
    /// special case, so compare results with `==` (tolerant) only.
    pub fn to_direction(&self) -> Direction {
        if self.x == 0.0 {
            let radians = if self.y >= 0.0 { FRAC_PI_2 } else { -FRAC_PI_2 };
            return Direction::new(radians);
        }
        let radians = (self.y / self.x).atan();
        if self.x < 0.0 {
            Direction::new(radians + PI)
        } else {
            Direction::new(radians)
        }
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        (self.x - other.x).abs() < POSITION_EPSILON && (self.y - other.y).abs() < POSITION_EPSILON
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        Position::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Position {
    type Output = Position;

    fn sub(self, rhs: Position) -> Position {
        Position::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Position {
    type Output = Position;

    fn mul(self, factor: f64) -> Position {
        Position::new(self.x * factor, self.y * factor)
    }
}

/// Rotation hint handed to the renderer. Opaque to the simulation.
#[derive(Debug, Clone, Copy)]
pub struct Direction {
    pub radians: f64,
}

impl Direction {
    pub const UP: Direction = Direction { radians: FRAC_PI_2 };

    pub fn new(radians: f64) -> Self {
        Self { radians }
    }

    /// Nearest whole number of counter-clockwise quarter turns away from
    /// [`Direction::UP`], in `0..4`. Sprites are only ever drawn at these.
    pub fn quarter_turns(&self) -> usize {
        ((self.radians - FRAC_PI_2) / FRAC_PI_2)
            .round()
            .rem_euclid(4.0) as usize
    }
}

impl PartialEq for Direction {
    fn eq(&self, other: &Self) -> bool {
        (self.radians - other.radians).abs() < DIRECTION_EPSILON
    }
}

/// Axis-aligned box given by its bottom-left and top-right corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub bottom_left: Position,
    pub top_right: Position,
}

impl BoundingBox {
    pub fn centered_on(center: Position, width: f64, height: f64) -> Self {
        let half = Position::new(width / 2.0, height / 2.0);
        Self {
            bottom_left: center - half,
            top_right: center + half,
        }
    }

    pub fn left(&self) -> f64 {
        self.bottom_left.x
    }

    pub fn right(&self) -> f64 {
        self.top_right.x
    }

    pub fn bottom(&self) -> f64 {
        self.bottom_left.y
    }

    pub fn top(&self) -> f64 {
        self.top_right.y
    }

    pub fn width(&self) -> f64 {
        self.right() - self.left()
    }

    pub fn height(&self) -> f64 {
        self.top() - self.bottom()
    }

    pub fn is_out_of_bounds(&self) -> bool {
        self.bottom_left.is_out_of_bounds() || self.top_right.is_out_of_bounds()
    }

    /// True if `point` lies inside the box, allowing `slack` on every edge.
    pub fn contains(&self, point: Position, slack: f64) -> bool {
        point.x >= self.left() - slack
            && point.x <= self.right() + slack
            && point.y >= self.bottom() - slack
            && point.y <= self.top() + slack
    }
}

/// A straight segment between two positions, typically the path an entity
/// swept during one move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub start: Position,
    pub end: Position,
}

impl LineSegment {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    pub fn min_x(&self) -> f64 {
        self.start.x.min(self.end.x)
    }

    pub fn max_x(&self) -> f64 {
        self.start.x.max(self.end.x)
    }

    pub fn min_y(&self) -> f64 {
        self.start.y.min(self.end.y)
    }

    pub fn max_y(&self) -> f64 {
        self.start.y.max(self.end.y)
    }

    pub fn is_vertical(&self) -> bool {
        self.start.x == self.end.x
    }

    /// `(slope, intercept)` of the carrying line, or `None` for a vertical segment.
    pub fn slope_intercept(&self) -> Option<(f64, f64)> {
        if self.is_vertical() {
            return None;
        }
        let slope = (self.end.y - self.start.y) / (self.end.x - self.start.x);
        Some((slope, self.start.y - slope * self.start.x))
    }

    /// Returns whether `start` is the rightmost endpoint. Ties on x fall back to y.
    fn start_is_rightmost(&self) -> bool {
        self.start.x > self.end.x || (self.start.x == self.end.x && self.start.y > self.end.y)
    }

    /// Clips this segment in place so it lies within `target`.
    ///
    /// Returns `false` without touching the segment when its bounding box is
    /// disjoint from `target`, or when the carrying line passes the box by a
    /// corner so that nothing is left to clip to.
    pub fn fit_within(&mut self, target: &BoundingBox) -> bool {
        if self.max_x() < target.left()
            || self.min_x() > target.right()
            || self.max_y() < target.bottom()
            || self.min_y() > target.top()
        {
            return false;
        }

        let Some((slope, intercept)) = self.slope_intercept() else {
            self.start.y = self.start.y.clamp(target.bottom(), target.top());
            self.end.y = self.end.y.clamp(target.bottom(), target.top());
            return true;
        };

        let (right, left) = if self.start_is_rightmost() {
            (self.start, self.end)
        } else {
            (self.end, self.start)
        };
        let y_at = |x: f64| slope * x + intercept;
        let x_at = |y: f64| (y - intercept) / slope;
        let in_y_range = |y: f64| y >= target.bottom() && y <= target.top();

        let right_edge = right.x.min(target.right());
        let clipped_right = if in_y_range(y_at(right_edge)) {
            Position::new(right_edge, y_at(right_edge))
        } else {
            let edge = if slope > 0.0 { target.top() } else { target.bottom() };
            Position::new(x_at(edge), edge)
        };

        let left_edge = left.x.max(target.left());
        let clipped_left = if in_y_range(y_at(left_edge)) {
            Position::new(left_edge, y_at(left_edge))
        } else {
            let edge = if slope > 0.0 { target.bottom() } else { target.top() };
            Position::new(x_at(edge), edge)
        };

        if !target.contains(clipped_left, CLIP_SLACK) || !target.contains(clipped_right, CLIP_SLACK)
        {
            return false;
        }

        if self.start_is_rightmost() {
            self.start = clipped_right;
            self.end = clipped_left;
        } else {
            self.start = clipped_left;
            self.end = clipped_right;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f64::consts::FRAC_PI_4;

    fn unit_box() -> BoundingBox {
        BoundingBox {
            bottom_left: Position::new(0.0, 0.0),
            top_right: Position::new(10.0, 10.0),
        }
    }

    #[test]
    fn test_direction_of_diagonals() {
        assert_eq!(Position::new(1.0, 1.0).to_direction(), Direction::new(FRAC_PI_4));
        assert_eq!(
            Position::new(-1.0, -1.0).to_direction(),
            Direction::new(5.0 * FRAC_PI_4)
        );
    }

    #[test]
    fn test_direction_of_vertical_axis() {
        assert_eq!(Position::new(0.0, 3.0).to_direction(), Direction::new(FRAC_PI_2));
        assert_eq!(Position::new(0.0, -3.0).to_direction(), Direction::new(-FRAC_PI_2));
    }

    #[test]
    fn test_quarter_turns() {
        assert_eq!(Direction::UP.quarter_turns(), 0);
        assert_eq!(Direction::new(FRAC_PI_2 + 0.3).quarter_turns(), 0);
        assert_eq!(Direction::new(PI).quarter_turns(), 1);
        assert_eq!(Direction::new(0.0).quarter_turns(), 3);
        assert_eq!(Direction::new(-FRAC_PI_2).quarter_turns(), 2);
        assert_eq!(Direction::new(3.0 * FRAC_PI_2).quarter_turns(), 2);
    }

    #[test]
    fn test_tolerant_equality() {
        assert_eq!(
            Position::new(1.0, 1.0),
            Position::new(0.9999999999, 0.9999999999)
        );
        assert_ne!(Position::new(1.0, 1.0), Position::new(1.0001, 1.0));
        assert_eq!(
            Position::new(1.0, 1.0).to_direction(),
            Position::new(0.9999999999, 0.9999999999).to_direction()
        );
        assert_ne!(Direction::new(0.0), Direction::new(0.001));
    }

    #[test]
    fn test_arithmetic_produces_new_values() {
        let a = Position::new(1.0, 2.0);
        let b = Position::new(3.0, -1.0);
        assert_eq!(a + b, Position::new(4.0, 1.0));
        assert_eq!(a - b, Position::new(-2.0, 3.0));
        assert_eq!(a * 2.0, Position::new(2.0, 4.0));
        assert_eq!(a, Position::new(1.0, 2.0));
    }

    #[test]
    fn test_out_of_bounds() {
        assert!(!Position::new(0.0, 0.0).is_out_of_bounds());
        assert!(!Position::new(BOARD_WIDTH, BOARD_HEIGHT).is_out_of_bounds());
        assert!(Position::new(-0.1, 5.0).is_out_of_bounds());
        assert!(Position::new(5.0, BOARD_HEIGHT + 0.1).is_out_of_bounds());
    }

    #[test]
    fn test_fit_within_leaves_inside_segment_unchanged() {
        let mut segment = LineSegment::new(Position::new(2.0, 3.0), Position::new(7.0, 8.0));
        let before = segment;
        assert!(segment.fit_within(&unit_box()));
        assert_eq!(segment, before);
    }

    #[test]
    fn test_fit_within_clips_right_edge() {
        let mut segment = LineSegment::new(Position::new(5.0, 5.0), Position::new(15.0, 7.0));
        assert!(segment.fit_within(&unit_box()));
        assert_eq!(segment.start, Position::new(5.0, 5.0));
        assert_eq!(segment.end, Position::new(10.0, 6.0));
    }

    #[test]
    fn test_fit_within_clips_top_edge() {
        let mut segment = LineSegment::new(Position::new(4.0, 6.0), Position::new(6.0, 14.0));
        assert!(segment.fit_within(&unit_box()));
        assert_eq!(segment.start, Position::new(4.0, 6.0));
        assert_eq!(segment.end, Position::new(5.0, 10.0));
    }

    #[test]
    fn test_fit_within_clips_descending_left_segment() {
        // Enters through the top while travelling left and down.
        let mut segment = LineSegment::new(Position::new(8.0, 4.0), Position::new(4.0, 12.0));
        assert!(segment.fit_within(&unit_box()));
        assert_eq!(segment.start, Position::new(8.0, 4.0));
        assert_eq!(segment.end, Position::new(5.0, 10.0));
    }

    #[test]
    fn test_fit_within_clamps_vertical_segment() {
        let mut segment = LineSegment::new(Position::new(3.0, -4.0), Position::new(3.0, 20.0));
        assert!(segment.fit_within(&unit_box()));
        assert_eq!(segment.start, Position::new(3.0, 0.0));
        assert_eq!(segment.end, Position::new(3.0, 10.0));
    }

    #[test]
    fn test_fit_within_rejects_disjoint_segment() {
        let mut segment = LineSegment::new(Position::new(11.0, 0.0), Position::new(20.0, 5.0));
        let before = segment;
        assert!(!segment.fit_within(&unit_box()));
        assert_eq!(segment, before);

        let mut above = LineSegment::new(Position::new(3.0, 11.0), Position::new(3.0, 15.0));
        assert!(!above.fit_within(&unit_box()));
    }

    #[test]
    fn test_fit_within_rejects_corner_graze() {
        // Bounding boxes overlap near (10, 10) but the line itself stays outside.
        let mut segment = LineSegment::new(Position::new(8.0, 13.0), Position::new(13.0, 8.0));
        let before = segment;
        assert!(!segment.fit_within(&unit_box()));
        assert_eq!(segment, before);
    }

    proptest! {
        #[test]
        fn prop_clipped_segment_stays_inside_box(
            x1 in -20.0f64..30.0, y1 in -20.0f64..30.0,
            x2 in -20.0f64..30.0, y2 in -20.0f64..30.0,
        ) {
            let target = unit_box();
            let mut segment = LineSegment::new(Position::new(x1, y1), Position::new(x2, y2));
            if segment.fit_within(&target) {
                prop_assert!(target.contains(segment.start, 1e-6));
                prop_assert!(target.contains(segment.end, 1e-6));
            }
        }
    }
}
