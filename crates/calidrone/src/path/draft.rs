//! The editable draft path.

use tracing::{debug, info};
use uuid::Uuid;

use super::{Path, Waypoint};
use crate::catalog::PathCatalog;
use crate::clock::{Clock, IdGenerator};
use crate::error::{Error, Result};
use crate::geometry::{self, RenderVec3};

/// Text of the manual-entry fields.
///
/// Mirrors the selected waypoint while a selection is active. Fields that are
/// empty or do not parse read as 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManualInput {
    /// Forward coordinate text.
    pub x: String,
    /// Right coordinate text.
    pub y: String,
    /// Up coordinate text.
    pub z: String,
}

impl ManualInput {
    /// Fill the fields from a waypoint.
    #[must_use]
    pub fn from_waypoint(waypoint: &Waypoint) -> Self {
        Self {
            x: waypoint.x().to_string(),
            y: waypoint.y().to_string(),
            z: waypoint.z().to_string(),
        }
    }

    /// Whether every field has text.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.x.trim().is_empty() && !self.y.trim().is_empty() && !self.z.trim().is_empty()
    }

    /// Whether every field is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty() && self.y.is_empty() && self.z.is_empty()
    }

    /// Parse the fields into a waypoint.
    #[must_use]
    pub fn to_waypoint(&self) -> Waypoint {
        Waypoint::new(
            parse_coordinate(&self.x),
            parse_coordinate(&self.y),
            parse_coordinate(&self.z),
        )
    }

    /// Empty all fields.
    pub fn clear(&mut self) {
        self.x.clear();
        self.y.clear();
        self.z.clear();
    }
}

fn parse_coordinate(text: &str) -> f64 {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// The single path being edited.
///
/// Invariant: `selected`, when set, indexes into `points`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DraftPath {
    name: String,
    points: Vec<Waypoint>,
    selected: Option<usize>,
    input: ManualInput,
}

impl DraftPath {
    /// An empty, unnamed draft.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The name the draft will be saved under.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the draft.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Stored waypoints, exactly as added.
    #[must_use]
    pub fn points(&self) -> &[Waypoint] {
        &self.points
    }

    /// Waypoints with missing coordinates read as 0, for editing and rendering.
    #[must_use]
    pub fn normalized_points(&self) -> Vec<Waypoint> {
        self.points.iter().map(Waypoint::normalized).collect()
    }

    /// Render-space positions, in flight order.
    #[must_use]
    pub fn render_points(&self) -> Vec<RenderVec3> {
        self.points.iter().map(geometry::to_render_space).collect()
    }

    /// Index of the selected waypoint.
    #[must_use]
    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    /// The manual-entry fields.
    #[must_use]
    pub fn input(&self) -> &ManualInput {
        &self.input
    }

    /// Mutable access to the manual-entry fields.
    pub fn input_mut(&mut self) -> &mut ManualInput {
        &mut self.input
    }

    /// Number of waypoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the draft has no waypoints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Append a waypoint. The selection is left alone.
    pub fn add_point(&mut self, x: f64, y: f64, z: f64) {
        self.push(Waypoint::new(x, y, z));
    }

    /// Append a waypoint picked on the ground plane of the 3D view.
    pub fn add_point_from_pick(&mut self, pick: RenderVec3, cell_size: f64) {
        let snapped = geometry::snap_to_grid(pick, cell_size);
        self.push(geometry::to_user_space(snapped));
    }

    /// Append the waypoint typed into the manual-entry fields and empty them.
    pub fn add_manual_point(&mut self) {
        let waypoint = self.input.to_waypoint();
        self.input.clear();
        self.push(waypoint);
    }

    fn push(&mut self, waypoint: Waypoint) {
        debug!(index = self.points.len(), %waypoint, "Adding waypoint");
        self.points.push(waypoint);
    }

    /// Insert a waypoint before `index` (or at the end when `index == len`).
    ///
    /// # Errors
    ///
    /// Returns a validation error if `index` is past the end.
    pub fn insert_point(&mut self, index: usize, waypoint: Waypoint) -> Result<()> {
        if index > self.points.len() {
            return Err(Error::validation(format!(
                "cannot insert at {index}: draft has {} waypoints",
                self.points.len()
            )));
        }
        self.points.insert(index, waypoint);
        self.deselect();
        Ok(())
    }

    /// Move the waypoint at `from` so it ends up at `to`.
    ///
    /// # Errors
    ///
    /// Returns a validation error if either index is out of range.
    pub fn move_point(&mut self, from: usize, to: usize) -> Result<()> {
        let len = self.points.len();
        if from >= len || to >= len {
            return Err(Error::validation(format!(
                "cannot move waypoint {from} to {to}: draft has {len} waypoints"
            )));
        }
        let waypoint = self.points.remove(from);
        self.points.insert(to, waypoint);
        self.deselect();
        Ok(())
    }

    /// Remove the last waypoint, if any, and clear the selection.
    pub fn undo(&mut self) {
        if self.points.pop().is_some() {
            self.deselect();
        }
    }

    /// Remove every waypoint and reset the name, selection and input.
    pub fn clear(&mut self) {
        self.points.clear();
        self.name.clear();
        self.deselect();
    }

    /// Toggle the selection of the waypoint at `index`.
    ///
    /// Selecting copies the waypoint into the manual-entry fields; selecting
    /// the already-selected waypoint clears both.
    ///
    /// # Errors
    ///
    /// Returns a validation error if `index` is out of range.
    pub fn select(&mut self, index: usize) -> Result<()> {
        if self.selected == Some(index) {
            self.deselect();
            return Ok(());
        }

        let waypoint = self.points.get(index).ok_or_else(|| {
            Error::validation(format!(
                "no waypoint #{}: draft has {} waypoints",
                index + 1,
                self.points.len()
            ))
        })?;
        self.input = ManualInput::from_waypoint(&waypoint.normalized());
        self.selected = Some(index);
        Ok(())
    }

    /// Drop the selection and empty the manual-entry fields.
    pub fn cancel_selection(&mut self) {
        self.deselect();
    }

    fn deselect(&mut self) {
        self.selected = None;
        self.input.clear();
    }

    fn require_selection(&self, action: &str) -> Result<usize> {
        self.selected
            .ok_or_else(|| Error::validation(format!("select a waypoint to {action}")))
    }

    /// Replace the selected waypoint, keeping its position in the path.
    ///
    /// # Errors
    ///
    /// Returns a validation error if nothing is selected.
    pub fn update_selected(&mut self, x: f64, y: f64, z: f64) -> Result<()> {
        let index = self.require_selection("update")?;
        self.points[index] = Waypoint::new(x, y, z);
        debug!(index, "Updated waypoint");
        self.deselect();
        Ok(())
    }

    /// Replace the selected waypoint with the manual-entry fields.
    ///
    /// # Errors
    ///
    /// Returns a validation error if nothing is selected or a field is empty.
    pub fn update_selected_from_input(&mut self) -> Result<()> {
        self.require_selection("update")?;
        if !self.input.is_complete() {
            return Err(Error::validation("all three coordinates are required"));
        }
        let w = self.input.to_waypoint();
        self.update_selected(w.x(), w.y(), w.z())
    }

    /// Remove the selected waypoint. Later waypoints shift down by one.
    ///
    /// # Errors
    ///
    /// Returns a validation error if nothing is selected.
    pub fn delete_selected(&mut self) -> Result<()> {
        let index = self.require_selection("delete")?;
        self.points.remove(index);
        debug!(index, "Deleted waypoint");
        self.deselect();
        Ok(())
    }

    /// Save the draft into `catalog` and start a fresh draft.
    ///
    /// The saved path holds the normalized waypoints. If the catalog rejects
    /// the path the draft is left as it was.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty draft, or the catalog's error.
    pub fn save(
        &mut self,
        catalog: &mut PathCatalog,
        ids: &dyn IdGenerator,
        clock: &dyn Clock,
    ) -> Result<Uuid> {
        if self.points.is_empty() {
            return Err(Error::validation("at least one waypoint required"));
        }

        let path = Path::new(
            ids.next_id(),
            self.name.clone(),
            self.normalized_points(),
            clock.now(),
        );
        let id = path.id();
        let count = path.waypoint_count();
        catalog.add(path)?;

        info!(%id, waypoints = count, "Saved path");
        self.clear();
        Ok(id)
    }

    /// Replace the draft with a copy of a saved path's waypoints.
    pub fn load_from_path(&mut self, path: &Path) {
        self.points = path.points().to_vec();
        self.name.clear();
        self.deselect();
        debug!(id = %path.id(), waypoints = self.points.len(), "Loaded path into draft");
    }
}
