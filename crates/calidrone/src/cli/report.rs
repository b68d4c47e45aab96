//! Printable summaries for CLI output.

use serde::Serialize;
use uuid::Uuid;

use crate::geometry::{Framing, RenderVec3};
use crate::path::Path;

/// Everything `path info` prints about a path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathReport {
    /// Path id.
    pub id: Uuid,
    /// Path name.
    pub name: String,
    /// Number of waypoints.
    pub waypoints: usize,
    /// Sum of leg lengths.
    pub total_distance: f64,
    /// Flight time at the configured cruise speed, in seconds.
    pub estimated_flight_seconds: f64,
    /// Render-space bounds minimum.
    pub bounds_min: RenderVec3,
    /// Render-space bounds maximum.
    pub bounds_max: RenderVec3,
    /// Largest bounds extent.
    pub bounds_size: f64,
    /// Preview camera distance.
    pub framing_distance: f64,
}

impl PathReport {
    /// Summarize `path` for a drone flying at `cruise_speed`.
    #[must_use]
    pub fn new(path: &Path, cruise_speed: f64) -> Self {
        let framing = Framing::for_points(path.points());
        Self {
            id: path.id(),
            name: path.name().to_string(),
            waypoints: path.waypoint_count(),
            total_distance: path.total_distance(),
            estimated_flight_seconds: path.estimated_flight_time(cruise_speed).as_secs_f64(),
            bounds_min: framing.bounds.min,
            bounds_max: framing.bounds.max,
            bounds_size: framing.bounds.size,
            framing_distance: framing.distance,
        }
    }
}

impl std::fmt::Display for PathReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f, "{}", "-".repeat(self.name.chars().count()))?;
        writeln!(f, "Id:               {}", self.id)?;
        writeln!(f, "Waypoints:        {}", self.waypoints)?;
        writeln!(f, "Distance:         {:.1}", self.total_distance)?;
        writeln!(f, "Flight time:      {:.1}s", self.estimated_flight_seconds)?;
        writeln!(f, "Bounds size:      {:.1}", self.bounds_size)?;
        write!(f, "Framing distance: {:.1}", self.framing_distance)
    }
}
