//! Swept-segment vs sprite-mask collision.
//!
//! A moving entity's path over one step is a [`LineSegment`]. The segment is
//! clipped to the target's bounding box and then sampled in one-unit steps
//! along its dominant axis (x, or y for vertical paths). Each sample is mapped
//! into the target's rendered mask; the first painted pixel is a hit.
//!
//! Sampling is discrete, so a path can slip past sprites narrower than one
//! logical unit or graze a thin diagonal without registering.

use crate::entity::Entity;
use crate::geometry::{BoundingBox, LineSegment, Position, CLIP_SLACK};
use crate::sprite::SpriteMask;

/// Tests `movement` against `target`'s rendered sprite. Targets that have not
/// been rendered yet can never be hit.
///
/// With `debug_assertions` set, a clipped segment that escapes the target box
/// is treated as a broken invariant and panics.
pub fn intersects_with(movement: &LineSegment, target: &Entity, debug_assertions: bool) -> bool {
    let Some(mask) = target.shape.mask() else {
        return false;
    };
    let bounds = target.bounding_box();

    let mut clipped = *movement;
    if !clipped.fit_within(&bounds) {
        return false;
    }
    if debug_assertions {
        assert!(
            bounds.contains(clipped.start, CLIP_SLACK) && bounds.contains(clipped.end, CLIP_SLACK),
            "clipped segment {clipped:?} escapes {bounds:?}"
        );
    }

    sample_points(&clipped).any(|point| mask_is_painted_at(mask, &bounds, point))
}

/// Whether `point` falls on a painted pixel of `target`'s rendered sprite.
pub fn is_painted_at(target: &Entity, point: Position) -> bool {
    let bounds = target.bounding_box();
    match target.shape.mask() {
        Some(mask) if bounds.contains(point, 0.0) => mask_is_painted_at(mask, &bounds, point),
        _ => false,
    }
}

/// Points along `segment` one unit apart on its dominant axis, always ending
/// with the far endpoint.
fn sample_points(segment: &LineSegment) -> impl Iterator<Item = Position> {
    let (from, to, line) = match segment.slope_intercept() {
        Some(line) => (segment.min_x(), segment.max_x(), Some(line)),
        None => (segment.min_y(), segment.max_y(), None),
    };
    let fixed_x = segment.start.x;
    let steps = (to - from).floor() as usize;

    (0..=steps)
        .map(move |i| from + i as f64)
        .chain(std::iter::once(to))
        .map(move |t| match line {
            Some((slope, intercept)) => Position::new(t, slope * t + intercept),
            None => Position::new(fixed_x, t),
        })
}

/// Maps a logical point inside `bounds` onto the mask. Pixel rows run from the
/// top of the box downward.
fn mask_is_painted_at(mask: &SpriteMask, bounds: &BoundingBox, point: Position) -> bool {
    let columns = mask.width() as f64;
    let rows = mask.height() as f64;
    let px = ((point.x - bounds.left()) / bounds.width() * columns)
        .floor()
        .clamp(0.0, columns - 1.0);
    let py = ((bounds.top() - point.y) / bounds.height() * rows)
        .floor()
        .clamp(0.0, rows - 1.0);
    mask.is_painted(px as usize, py as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{LifeStatus, Shape};
    use crate::sprite::Rgb;

    const INK: Rgb = Rgb::WHITE;
    const PAPER: Rgb = Rgb::BLACK;

    /// A 16x16 target at (50, 50) whose mask is blank except for the listed pixels.
    fn target_with_pixels(painted: &[(usize, usize)]) -> Entity {
        let mut pixels = vec![PAPER; 16 * 16];
        for &(x, y) in painted {
            pixels[y * 16 + x] = INK;
        }
        let mut shape = Shape::new("target", 16.0, 16.0);
        shape.attach_mask(SpriteMask::new(16, 16, pixels, PAPER).unwrap());
        Entity::new(Position::new(50.0, 50.0), shape, LifeStatus::new(1))
    }

    fn vertical_shot(x: f64, from_y: f64, to_y: f64) -> LineSegment {
        LineSegment::new(Position::new(x, from_y), Position::new(x, to_y))
    }

    #[test]
    fn test_unrendered_target_is_never_hit() {
        let target = Entity::new(
            Position::new(50.0, 50.0),
            Shape::new("target", 16.0, 16.0),
            LifeStatus::new(1),
        );
        assert!(!intersects_with(&vertical_shot(50.0, 30.0, 70.0), &target, true));
    }

    #[test]
    fn test_solid_target_is_hit_by_path_through_it() {
        let mut target = target_with_pixels(&[]);
        target
            .shape
            .attach_mask(SpriteMask::solid(16, 16, INK, PAPER).unwrap());
        assert!(intersects_with(&vertical_shot(50.0, 30.0, 45.0), &target, true));
    }

    #[test]
    fn test_path_missing_bounding_box_is_not_a_hit() {
        let mut target = target_with_pixels(&[]);
        target
            .shape
            .attach_mask(SpriteMask::solid(16, 16, INK, PAPER).unwrap());
        assert!(!intersects_with(&vertical_shot(70.0, 30.0, 70.0), &target, true));
        assert!(!intersects_with(&vertical_shot(50.0, 10.0, 41.0), &target, true));
    }

    #[test]
    fn test_transparent_pixels_do_not_collide() {
        // Only the top-left pixel is painted: logical (42..43, 57..58).
        let target = target_with_pixels(&[(0, 0)]);
        assert!(!intersects_with(&vertical_shot(50.0, 30.0, 70.0), &target, true));
        assert!(intersects_with(&vertical_shot(42.5, 30.0, 70.0), &target, true));
    }

    #[test]
    fn test_pixel_rows_are_flipped_against_logical_y() {
        // Bottom-right pixel of the image is the bottom-right of the box.
        let target = target_with_pixels(&[(15, 15)]);
        let segment = LineSegment::new(Position::new(57.5, 40.0), Position::new(57.5, 42.5));
        assert!(intersects_with(&segment, &target, true));
        let top = LineSegment::new(Position::new(57.5, 57.5), Position::new(57.5, 70.0));
        assert!(!intersects_with(&top, &target, true));
    }

    #[test]
    fn test_diagonal_path_samples_along_x() {
        let target = target_with_pixels(&[(8, 9)]);
        // Sample at x = 50 lands on logical (50, 49), which is pixel (8, 9).
        let segment = LineSegment::new(Position::new(40.0, 59.0), Position::new(60.0, 39.0));
        assert!(intersects_with(&segment, &target, true));
    }

    #[test]
    fn test_mask_resolution_scales_with_box() {
        // 32x32 image for a 16x16 box: each logical unit covers 2x2 pixels.
        let mut pixels = vec![PAPER; 32 * 32];
        pixels[31 * 32 + 31] = INK;
        let mut shape = Shape::new("target", 16.0, 16.0);
        shape.attach_mask(SpriteMask::new(32, 32, pixels, PAPER).unwrap());
        let target = Entity::new(Position::new(50.0, 50.0), shape, LifeStatus::new(1));
        assert!(intersects_with(&vertical_shot(57.9, 30.0, 42.2), &target, true));
        assert!(!intersects_with(&vertical_shot(57.0, 30.0, 42.2), &target, true));
    }

    #[test]
    fn test_is_painted_at_reads_single_points() {
        let target = target_with_pixels(&[(0, 0)]);
        assert!(is_painted_at(&target, Position::new(42.5, 57.5)));
        assert!(!is_painted_at(&target, Position::new(50.0, 50.0)));
        assert!(!is_painted_at(&target, Position::new(10.0, 10.0)));
    }
}
