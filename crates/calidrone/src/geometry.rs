//! Conversion between user space and render space.
//!
//! Operators think in a right-handed frame where X points forward, Y to the
//! right and Z up. The 3D view uses a Y-up engine convention. The two are
//! related by a fixed axis permutation, and every conversion in the crate goes
//! through this module:
//!
//! ```text
//! render = (user.y, user.z, user.x)
//! user   = (render.z, render.x, render.y)
//! ```
//!
//! Placement, line rendering and picking must all use the same permutation or
//! waypoints drift between edit and preview.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::path::Waypoint;

/// A point in render space (Y up).
pub type RenderVec3 = DVec3;

/// Height substituted for ground picks whose vertical component snaps to 0.
///
/// A click on the ground plane carries no vertical intent, so the waypoint is
/// placed at hover height instead of on the ground. This also applies to a
/// pick that lands exactly on 0, which cannot be told apart from "no intent".
pub const MIN_HOVER_HEIGHT: f64 = 1.0;

/// Size reported for an empty bounding box.
pub const EMPTY_BOUNDS_SIZE: f64 = 5.0;

/// Closest a framing camera is ever placed.
pub const MIN_FRAMING_DISTANCE: f64 = 5.0;

/// How far beyond the box size a framing camera sits.
const FRAMING_FACTOR: f64 = 1.5;

/// Convert a waypoint to render space.
#[must_use]
pub fn to_render_space(waypoint: &Waypoint) -> RenderVec3 {
    DVec3::new(waypoint.y(), waypoint.z(), waypoint.x())
}

/// Convert a render-space point back to a waypoint.
#[must_use]
pub fn to_user_space(point: RenderVec3) -> Waypoint {
    Waypoint::new(point.z, point.x, point.y)
}

/// Snap a picked render-space point to the grid.
///
/// Each axis is rounded to the nearest multiple of `cell_size`. A non-positive
/// or non-finite cell size leaves the point unrounded. If the vertical axis
/// ends up at 0 it is lifted to [`MIN_HOVER_HEIGHT`].
#[must_use]
pub fn snap_to_grid(point: RenderVec3, cell_size: f64) -> RenderVec3 {
    let mut snapped = if cell_size.is_finite() && cell_size > 0.0 {
        (point / cell_size).round() * cell_size
    } else {
        point
    };
    // -0.0 + 0.0 == +0.0
    snapped += DVec3::ZERO;

    if snapped.y == 0.0 {
        snapped.y = MIN_HOVER_HEIGHT;
    }
    snapped
}

/// Axis-aligned bounds of a set of waypoints, in render space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Lowest corner.
    pub min: RenderVec3,
    /// Highest corner.
    pub max: RenderVec3,
    /// Midpoint of `min` and `max`.
    pub center: RenderVec3,
    /// Largest extent across the three axes.
    pub size: f64,
}

impl BoundingBox {
    /// Bounds used when there is nothing to frame.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            min: DVec3::ZERO,
            max: DVec3::ZERO,
            center: DVec3::ZERO,
            size: EMPTY_BOUNDS_SIZE,
        }
    }
}

/// Compute the render-space bounds of `points`.
///
/// Empty input yields [`BoundingBox::empty`] so a framing camera never
/// divides by zero.
#[must_use]
pub fn bounding_box(points: &[Waypoint]) -> BoundingBox {
    let mut render = points.iter().map(to_render_space);
    let Some(first) = render.next() else {
        return BoundingBox::empty();
    };

    let (min, max) = render.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
    let extent = max - min;

    BoundingBox {
        min,
        max,
        center: (min + max) * 0.5,
        size: extent.max_element(),
    }
}

/// Camera distance that keeps a box of the given size in view.
#[must_use]
pub fn framing_distance(size: f64) -> f64 {
    (size * FRAMING_FACTOR).max(MIN_FRAMING_DISTANCE)
}

/// Where a preview camera should sit to show a whole path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Framing {
    /// Bounds of the framed points.
    pub bounds: BoundingBox,
    /// Distance from the bounds center to the eye.
    pub distance: f64,
    /// Camera position, on the (1, 1, 1) diagonal from the center.
    pub eye: RenderVec3,
    /// Point the camera looks at.
    pub target: RenderVec3,
}

impl Framing {
    /// Frame the given waypoints.
    #[must_use]
    pub fn for_points(points: &[Waypoint]) -> Self {
        let bounds = bounding_box(points);
        let distance = framing_distance(bounds.size);
        let eye = bounds.center + DVec3::ONE.normalize() * distance;
        Self {
            bounds,
            distance,
            eye,
            target: bounds.center,
        }
    }
}
