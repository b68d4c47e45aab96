//! The ground station: one planner, one recorder, and their catalogs.
//!
//! [`GroundStation`] owns the draft, both catalogs and the recording session
//! for its whole lifetime. A host (UI, CLI) drives it from a single event
//! loop; camera work goes through the [`CameraDevice`] passed in per call.

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::catalog::{PathCatalog, RecordingCatalog};
use crate::clock::{Clock, IdGenerator, RandomIds, SystemClock};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::geometry::{Framing, RenderVec3};
use crate::path::{DraftPath, Path};
use crate::recording::{CameraDevice, RecordingSession, SessionStatus, TickEvent};

/// Application state of a ground station.
#[derive(Debug)]
pub struct GroundStation {
    config: Config,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    draft: DraftPath,
    paths: PathCatalog,
    recordings: RecordingCatalog,
    session: RecordingSession,
}

impl GroundStation {
    /// Create a station with injected time and id sources.
    #[must_use]
    pub fn new(config: Config, clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        let session = RecordingSession::new(&config.camera, Arc::clone(&clock), Arc::clone(&ids));
        Self {
            config,
            clock,
            ids,
            draft: DraftPath::new(),
            paths: PathCatalog::new(),
            recordings: RecordingCatalog::new(),
            session,
        }
    }

    /// Create a station on the system clock with random ids.
    #[must_use]
    pub fn with_system(config: Config) -> Self {
        Self::new(config, Arc::new(SystemClock), Arc::new(RandomIds))
    }

    /// The configuration the station was built with.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The draft path.
    #[must_use]
    pub fn draft(&self) -> &DraftPath {
        &self.draft
    }

    /// Mutable access to the draft path.
    pub fn draft_mut(&mut self) -> &mut DraftPath {
        &mut self.draft
    }

    /// Saved paths.
    #[must_use]
    pub fn paths(&self) -> &PathCatalog {
        &self.paths
    }

    /// Finished recordings.
    #[must_use]
    pub fn recordings(&self) -> &RecordingCatalog {
        &self.recordings
    }

    /// The recording session.
    #[must_use]
    pub fn session(&self) -> &RecordingSession {
        &self.session
    }

    /// Mutable access to the recording session.
    pub fn session_mut(&mut self) -> &mut RecordingSession {
        &mut self.session
    }

    /// Add a waypoint where the operator clicked in the 3D view.
    pub fn add_point_from_pick(&mut self, pick: RenderVec3) {
        self.draft
            .add_point_from_pick(pick, self.config.planner.snap_size);
    }

    /// Save the draft into the path catalog.
    ///
    /// An unnamed draft is saved under the configured default name.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty draft.
    pub fn save_draft(&mut self) -> Result<Uuid> {
        let original_name = self.draft.name().to_string();
        if original_name.trim().is_empty() {
            self.draft
                .set_name(self.config.planner.default_path_name.clone());
        }

        let result = self
            .draft
            .save(&mut self.paths, self.ids.as_ref(), self.clock.as_ref());
        if result.is_err() {
            self.draft.set_name(original_name);
        }
        result
    }

    /// Delete a saved path.
    pub fn delete_path(&mut self, id: Uuid) -> Option<Path> {
        self.paths.remove(id)
    }

    /// Save a copy of a saved path under a new id.
    ///
    /// # Errors
    ///
    /// Returns a validation error if no path has that id.
    pub fn duplicate_path(&mut self, id: Uuid) -> Result<Uuid> {
        let copy = self
            .paths
            .get(id)
            .ok_or_else(|| Error::validation(format!("no saved path {id}")))?
            .duplicated(self.ids.next_id(), self.clock.now());
        let copy_id = copy.id();
        self.paths.add(copy)?;
        info!(source = %id, id = %copy_id, "Duplicated path");
        Ok(copy_id)
    }

    /// Copy a saved path into the draft for editing.
    ///
    /// # Errors
    ///
    /// Returns a validation error if no path has that id.
    pub fn load_path(&mut self, id: Uuid) -> Result<()> {
        let path = self
            .paths
            .get(id)
            .ok_or_else(|| Error::validation(format!("no saved path {id}")))?;
        self.draft.load_from_path(path);
        Ok(())
    }

    /// Camera framing for a saved path preview.
    #[must_use]
    pub fn path_framing(&self, id: Uuid) -> Option<Framing> {
        self.paths
            .get(id)
            .map(|path| Framing::for_points(path.points()))
    }

    /// Camera framing for the draft.
    #[must_use]
    pub fn draft_framing(&self) -> Framing {
        Framing::for_points(&self.draft.normalized_points())
    }

    /// Start recording.
    ///
    /// # Errors
    ///
    /// See [`RecordingSession::start`].
    pub async fn start_recording(&mut self, device: &mut dyn CameraDevice) -> Result<SessionStatus> {
        self.session.start(device).await
    }

    /// Stop recording and file the artifact.
    ///
    /// Returns the id of the new recording, if one was produced.
    ///
    /// # Errors
    ///
    /// See [`RecordingSession::stop`].
    pub async fn stop_recording(&mut self, device: &mut dyn CameraDevice) -> Result<Option<Uuid>> {
        match self.session.stop(device).await? {
            Some(artifact) => self.file_recording(artifact).map(Some),
            None => Ok(None),
        }
    }

    /// Apply a duration tick, filing the artifact if a demo recording stopped.
    ///
    /// # Errors
    ///
    /// Returns an integrity error if the id generator repeats an id.
    pub fn handle_tick(&mut self, event: TickEvent) -> Result<Option<Uuid>> {
        match self.session.handle_tick(event) {
            Some(artifact) => self.file_recording(artifact).map(Some),
            None => Ok(None),
        }
    }

    fn file_recording(&mut self, artifact: crate::recording::RecordingArtifact) -> Result<Uuid> {
        let id = artifact.id;
        self.recordings.add(artifact)?;
        info!(%id, total = self.recordings.len(), "Recording saved");
        Ok(id)
    }

    /// Delete a recording, releasing its playback handle.
    pub fn delete_recording(&mut self, id: Uuid) -> bool {
        self.recordings.remove(id)
    }

    /// Tear down the recorder and release every playback handle.
    pub fn shutdown(&mut self, device: &mut dyn CameraDevice) {
        debug!("Shutting down ground station");
        self.session.teardown(device);
        self.recordings.release_all();
    }
}
