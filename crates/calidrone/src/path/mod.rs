//! Waypoints, saved paths and the editable draft.
//!
//! A [`Waypoint`] is a user-space point. A [`Path`] is a named, timestamped,
//! ordered sequence of waypoints that never changes once it has been saved.
//! The [`DraftPath`] is the single path being edited.

mod draft;

pub use draft::{DraftPath, ManualInput};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name given to paths saved without one.
pub const DEFAULT_PATH_NAME: &str = "Untitled Path";

/// A single point of a flight path, in user space (X forward, Y right, Z up).
///
/// Coordinates may be missing (paths drawn before altitude existed have no
/// `z`). Missing coordinates read as 0 without changing the stored value, and
/// equality compares the values as read.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Waypoint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    z: Option<f64>,
}

impl Waypoint {
    /// A waypoint with all three coordinates.
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            z: Some(z),
        }
    }

    /// A waypoint with any coordinate possibly missing.
    #[must_use]
    pub const fn partial(x: Option<f64>, y: Option<f64>, z: Option<f64>) -> Self {
        Self { x, y, z }
    }

    /// Forward coordinate (0 if missing).
    #[must_use]
    pub fn x(&self) -> f64 {
        self.x.unwrap_or(0.0)
    }

    /// Right coordinate (0 if missing).
    #[must_use]
    pub fn y(&self) -> f64 {
        self.y.unwrap_or(0.0)
    }

    /// Up coordinate (0 if missing).
    #[must_use]
    pub fn z(&self) -> f64 {
        self.z.unwrap_or(0.0)
    }

    /// Whether all three coordinates were given.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.x.is_some() && self.y.is_some() && self.z.is_some()
    }

    /// A copy with missing coordinates filled in with 0.
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self::new(self.x(), self.y(), self.z())
    }

    /// Straight-line distance to another waypoint.
    #[must_use]
    pub fn distance_to(&self, other: &Waypoint) -> f64 {
        let dx = self.x() - other.x();
        let dy = self.y() - other.y();
        let dz = self.z() - other.z();
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

impl PartialEq for Waypoint {
    fn eq(&self, other: &Self) -> bool {
        self.x() == other.x() && self.y() == other.y() && self.z() == other.z()
    }
}

impl std::fmt::Display for Waypoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.1}, {:.1}, {:.1})", self.x(), self.y(), self.z())
    }
}

/// A saved flight path.
///
/// The waypoint sequence is private: once built, a path is only ever read.
/// Editing a saved path means loading a copy into the draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    id: Uuid,
    name: String,
    points: Vec<Waypoint>,
    created_at: DateTime<Utc>,
}

impl Path {
    /// Build a path. An empty name becomes [`DEFAULT_PATH_NAME`].
    #[must_use]
    pub fn new(
        id: Uuid,
        name: impl Into<String>,
        points: Vec<Waypoint>,
        created_at: DateTime<Utc>,
    ) -> Self {
        let name = name.into();
        let name = if name.is_empty() {
            DEFAULT_PATH_NAME.to_string()
        } else {
            name
        };
        Self {
            id,
            name,
            points,
            created_at,
        }
    }

    /// Unique identifier.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Waypoints in flight order.
    #[must_use]
    pub fn points(&self) -> &[Waypoint] {
        &self.points
    }

    /// When the path was saved.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Number of waypoints.
    #[must_use]
    pub fn waypoint_count(&self) -> usize {
        self.points.len()
    }

    /// Sum of the leg lengths between consecutive waypoints.
    #[must_use]
    pub fn total_distance(&self) -> f64 {
        self.points
            .windows(2)
            .map(|leg| leg[0].distance_to(&leg[1]))
            .sum()
    }

    /// Time to fly the whole path at `speed` units per second.
    ///
    /// Returns zero for a non-positive or non-finite speed.
    #[must_use]
    pub fn estimated_flight_time(&self, speed: f64) -> std::time::Duration {
        if !(speed.is_finite() && speed > 0.0) {
            return std::time::Duration::ZERO;
        }
        std::time::Duration::from_secs_f64(self.total_distance() / speed)
    }

    /// A new path flying the same waypoints in the opposite order.
    #[must_use]
    pub fn reversed(&self, id: Uuid, created_at: DateTime<Utc>) -> Self {
        let points = self.points.iter().rev().copied().collect();
        Self::new(id, format!("{} (reversed)", self.name), points, created_at)
    }

    /// A copy of this path under a new id, named `<name> (Copy)`.
    #[must_use]
    pub fn duplicated(&self, id: Uuid, created_at: DateTime<Utc>) -> Self {
        Self::new(id, format!("{} (Copy)", self.name), self.points.clone(), created_at)
    }
}
