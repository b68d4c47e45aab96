//! The recording state machine.
//!
//! ```text
//! idle      --start()-->  acquiring
//! acquiring --acquired--> recording
//! acquiring --failed-->   errored     (feed falls back to demo)
//! errored   --start()-->  recording   (demo)
//! recording --stop()-->   stopped     (artifact produced)
//! recording --demo limit reached on tick--> stopped
//! stopped   --start()-->  acquiring
//! ```
//!
//! Every exit from `recording` cancels the tick timer of that recording, and
//! ticks from an older timer are ignored.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::{
    CameraDevice, EncoderSettings, FeedSource, RecordingArtifact, RecordingSettings,
    SessionStatus, StreamConstraints, Thumbnail, TickEvent, TickHandle, VideoStream, DEMO_PAYLOAD,
};
use crate::clock::{Clock, IdGenerator};
use crate::config::CameraConfig;
use crate::error::{Error, ErrorKind, Result};

/// Lowest zoom factor.
pub const MIN_ZOOM: f64 = 0.5;

/// Highest zoom factor.
pub const MAX_ZOOM: f64 = 3.0;

/// Zoom change per zoom-in/zoom-out step.
pub const ZOOM_STEP: f64 = 0.25;

/// A camera recording session.
#[derive(Debug)]
pub struct RecordingSession {
    config: CameraConfig,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    feed_source: FeedSource,
    status: SessionStatus,
    settings: RecordingSettings,
    started_at: Option<DateTime<Utc>>,
    elapsed_seconds: u64,
    last_error: Option<ErrorKind>,
    zoom: f64,
    stream: Option<VideoStream>,
    encoding: bool,
    recording_source: FeedSource,
    tick: Option<TickHandle>,
    generation: u64,
}

impl RecordingSession {
    /// Create an idle session.
    #[must_use]
    pub fn new(config: &CameraConfig, clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            config: config.clone(),
            clock,
            ids,
            feed_source: config.feed_source,
            status: SessionStatus::Idle,
            settings: config.recording_settings(),
            started_at: None,
            elapsed_seconds: 0,
            last_error: None,
            zoom: 1.0,
            stream: None,
            encoding: false,
            recording_source: config.feed_source,
            tick: None,
            generation: 0,
        }
    }

    /// Current status.
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Whether a recording is in progress.
    #[must_use]
    pub fn is_recording(&self) -> bool {
        self.status == SessionStatus::Recording
    }

    /// Selected feed source.
    #[must_use]
    pub fn feed_source(&self) -> FeedSource {
        self.feed_source
    }

    /// Format, quality and framerate used for the next recording.
    #[must_use]
    pub fn settings(&self) -> RecordingSettings {
        self.settings
    }

    /// When the current recording started.
    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Whole seconds recorded so far, as of the last tick.
    #[must_use]
    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    /// Kind of the most recent failure.
    #[must_use]
    pub fn last_error(&self) -> Option<ErrorKind> {
        self.last_error
    }

    /// Current zoom factor.
    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Whether a camera stream is held.
    #[must_use]
    pub fn has_stream(&self) -> bool {
        self.stream.is_some()
    }

    /// Tick timer of the current recording. Spawn [`super::run_ticker`] with it.
    #[must_use]
    pub fn tick_handle(&self) -> Option<&TickHandle> {
        self.tick.as_ref()
    }

    /// How long a demo recording may run.
    #[must_use]
    pub fn demo_limit(&self) -> Duration {
        self.config.demo_auto_stop()
    }

    /// Start recording and return the new status.
    ///
    /// A live feed acquires the camera first (reusing a stream held from an
    /// earlier recording). If the camera cannot be acquired or refuses to
    /// encode, the session moves to [`SessionStatus::Errored`] and switches
    /// the feed to demo; the next `start` records from the demo source.
    ///
    /// # Errors
    ///
    /// Returns an invalid-state error while acquiring or recording.
    pub async fn start(&mut self, device: &mut dyn CameraDevice) -> Result<SessionStatus> {
        if self.status.is_busy() {
            return Err(Error::invalid_state(format!(
                "cannot start while {}",
                self.status
            )));
        }

        match self.feed_source {
            FeedSource::Demo => self.begin_recording(FeedSource::Demo),
            FeedSource::Live => {
                self.status = SessionStatus::Acquiring;
                if let Err(err) = self.start_live(device).await {
                    self.fall_back_to_demo(&err);
                } else {
                    self.begin_recording(FeedSource::Live);
                }
            }
        }
        Ok(self.status)
    }

    async fn start_live(&mut self, device: &mut dyn CameraDevice) -> Result<()> {
        if self.stream.is_none() {
            let constraints = StreamConstraints::from_config(&self.config, self.settings.framerate);
            debug!(device = device.name(), ?constraints, "Acquiring camera");
            self.stream = Some(device.acquire(&constraints).await?);
        }

        let Some(stream) = self.stream.as_ref() else {
            return Err(Error::internal("camera stream missing after acquisition"));
        };
        if let Err(err) = device.start_encoding(stream, &EncoderSettings::from(self.settings)) {
            if let Some(stream) = self.stream.take() {
                device.release_stream(stream);
            }
            return Err(err);
        }
        self.encoding = true;
        Ok(())
    }

    fn fall_back_to_demo(&mut self, err: &Error) {
        warn!(error = %err, "Camera unavailable, switching to demo feed");
        self.status = SessionStatus::Errored;
        self.feed_source = FeedSource::Demo;
        self.last_error = Some(err.kind());
    }

    fn begin_recording(&mut self, source: FeedSource) {
        self.generation += 1;
        self.tick = Some(TickHandle::new(self.generation));
        self.started_at = Some(self.clock.now());
        self.elapsed_seconds = 0;
        self.recording_source = source;
        self.last_error = None;
        self.status = SessionStatus::Recording;
        info!(
            source = %source,
            format = %self.settings.format,
            quality = %self.settings.quality,
            "Recording started"
        );
    }

    fn elapsed_since_start(&self, now: DateTime<Utc>) -> u64 {
        self.started_at.map_or(0, |start| {
            u64::try_from((now - start).num_seconds()).unwrap_or(0)
        })
    }

    fn cancel_tick(&mut self) {
        if let Some(tick) = self.tick.take() {
            tick.cancel();
        }
    }

    fn finish(&mut self) {
        self.cancel_tick();
        self.status = SessionStatus::Stopped;
        self.started_at = None;
        self.elapsed_seconds = 0;
    }

    /// Stop recording and return the finished artifact.
    ///
    /// Does nothing unless a recording is in progress.
    ///
    /// # Errors
    ///
    /// Returns a finalize error if the camera could not produce the encoded
    /// video. The session still stops, with no artifact.
    pub async fn stop(
        &mut self,
        device: &mut dyn CameraDevice,
    ) -> Result<Option<RecordingArtifact>> {
        if !self.is_recording() {
            debug!(status = %self.status, "Stop requested while not recording");
            return Ok(None);
        }

        self.cancel_tick();
        let now = self.clock.now();
        let mut duration = self.elapsed_since_start(now);

        let (data, thumbnail) = match self.recording_source {
            FeedSource::Demo => {
                duration = duration.min(self.demo_limit().as_secs());
                (DEMO_PAYLOAD.to_vec(), None)
            }
            FeedSource::Live => match self.finalize_live(device).await {
                Ok(output) => output,
                Err(err) => {
                    warn!(error = %err, "Failed to finalize recording");
                    let err = match err {
                        Error::Finalize { .. } => err,
                        other => Error::finalize(other.to_string()),
                    };
                    self.finish();
                    self.last_error = Some(err.kind());
                    return Err(err);
                }
            },
        };

        let artifact = self.build_artifact(data, duration, now, thumbnail);
        self.finish();
        Ok(Some(artifact))
    }

    async fn finalize_live(
        &mut self,
        device: &mut dyn CameraDevice,
    ) -> Result<(Vec<u8>, Option<Thumbnail>)> {
        let thumbnail = match self.stream.as_ref() {
            Some(stream) => device.capture_still(stream).await.map(Thumbnail::new),
            None => None,
        };
        self.encoding = false;
        let chunks = device.finish_encoding().await?;
        Ok((chunks.concat(), thumbnail))
    }

    fn build_artifact(
        &self,
        data: Vec<u8>,
        duration_seconds: u64,
        created_at: DateTime<Utc>,
        thumbnail: Option<Thumbnail>,
    ) -> RecordingArtifact {
        let artifact = RecordingArtifact::new(
            self.ids.next_id(),
            data,
            duration_seconds,
            &self.settings,
            created_at,
            thumbnail,
        );
        info!(
            id = %artifact.id,
            duration = artifact.duration_seconds,
            size = artifact.size_bytes,
            "Recording finished"
        );
        artifact
    }

    /// Grab a still frame from the held camera stream.
    ///
    /// Returns `None` on the demo feed, and when the camera has no frame to
    /// give. Works between recordings as long as the stream is still held.
    ///
    /// # Errors
    ///
    /// Returns an invalid-state error on the live feed when no camera stream
    /// is held.
    pub async fn screenshot(&self, device: &mut dyn CameraDevice) -> Result<Option<Thumbnail>> {
        if self.feed_source == FeedSource::Demo {
            debug!("Screenshot ignored on demo feed");
            return Ok(None);
        }
        let Some(stream) = self.stream.as_ref() else {
            return Err(Error::invalid_state("no camera stream to capture from"));
        };
        let still = device.capture_still(stream).await.map(Thumbnail::new);
        debug!(device = device.name(), captured = still.is_some(), "Screenshot taken");
        Ok(still)
    }

    /// Refresh the elapsed time from the clock.
    ///
    /// A demo recording that has reached its limit stops here, and the
    /// artifact is returned with its duration clamped to the limit.
    pub fn tick(&mut self) -> Option<RecordingArtifact> {
        if !self.is_recording() {
            return None;
        }

        let now = self.clock.now();
        self.elapsed_seconds = self.elapsed_since_start(now);

        let limit = self.demo_limit().as_secs();
        if self.recording_source == FeedSource::Demo && self.elapsed_seconds >= limit {
            debug!(elapsed = self.elapsed_seconds, limit, "Demo recording reached its limit");
            self.cancel_tick();
            let artifact = self.build_artifact(DEMO_PAYLOAD.to_vec(), limit, now, None);
            self.finish();
            return Some(artifact);
        }
        None
    }

    /// Apply a tick from a timer, ignoring ticks of earlier recordings.
    pub fn handle_tick(&mut self, event: TickEvent) -> Option<RecordingArtifact> {
        match &self.tick {
            Some(tick) if tick.generation() == event.generation && !tick.is_cancelled() => {
                self.tick()
            }
            _ => {
                debug!(generation = event.generation, "Ignoring stale tick");
                None
            }
        }
    }

    fn ensure_idle(&self, what: &str) -> Result<()> {
        if self.status.is_busy() {
            return Err(Error::invalid_state(format!(
                "cannot change {what} while {}",
                self.status
            )));
        }
        Ok(())
    }

    /// Choose the feed source for the next recording.
    ///
    /// # Errors
    ///
    /// Returns an invalid-state error while acquiring or recording.
    pub fn set_feed_source(&mut self, source: FeedSource) -> Result<()> {
        self.ensure_idle("feed source")?;
        if self.feed_source != source {
            debug!(from = %self.feed_source, to = %source, "Feed source changed");
            self.feed_source = source;
        }
        Ok(())
    }

    /// Switch between live and demo.
    ///
    /// # Errors
    ///
    /// Returns an invalid-state error while acquiring or recording.
    pub fn toggle_feed_source(&mut self) -> Result<FeedSource> {
        self.set_feed_source(self.feed_source.toggled())?;
        Ok(self.feed_source)
    }

    /// Change format, quality or framerate for the next recording.
    ///
    /// # Errors
    ///
    /// Returns an invalid-state error while acquiring or recording, or a
    /// validation error for a zero framerate.
    pub fn set_settings(&mut self, settings: RecordingSettings) -> Result<()> {
        self.ensure_idle("recording settings")?;
        if settings.framerate == 0 {
            return Err(Error::validation("framerate must be greater than 0"));
        }
        self.settings = settings;
        Ok(())
    }

    /// Set the zoom factor, clamped to [`MIN_ZOOM`]..=[`MAX_ZOOM`].
    ///
    /// NaN leaves the zoom unchanged. Returns the zoom in effect.
    pub fn set_zoom(&mut self, zoom: f64) -> f64 {
        if !zoom.is_nan() {
            self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        }
        self.zoom
    }

    /// Zoom in by one step.
    pub fn zoom_in(&mut self) -> f64 {
        self.set_zoom(self.zoom + ZOOM_STEP)
    }

    /// Zoom out by one step.
    pub fn zoom_out(&mut self) -> f64 {
        self.set_zoom(self.zoom - ZOOM_STEP)
    }

    /// Shut the session down.
    ///
    /// Cancels the tick timer, discards an in-flight recording without
    /// producing an artifact, releases the camera and returns to idle.
    pub fn teardown(&mut self, device: &mut dyn CameraDevice) {
        self.cancel_tick();
        if self.encoding {
            device.abort_encoding();
            self.encoding = false;
        }
        if let Some(stream) = self.stream.take() {
            debug!(device = device.name(), "Releasing camera stream");
            device.release_stream(stream);
        }
        self.status = SessionStatus::Idle;
        self.started_at = None;
        self.elapsed_seconds = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{ManualClock, SequentialIds};
    use crate::recording::{Quality, UnavailableCamera, VideoFormat};

    #[derive(Debug, Default)]
    struct ScriptedCamera {
        fail_acquire: bool,
        fail_encoder: bool,
        fail_finish: bool,
        chunks: Vec<Vec<u8>>,
        still: Option<Vec<u8>>,
        acquired: usize,
        released: usize,
        aborted: usize,
        encoder: Option<EncoderSettings>,
    }

    #[async_trait::async_trait]
    impl CameraDevice for ScriptedCamera {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn acquire(&mut self, constraints: &StreamConstraints) -> Result<VideoStream> {
            if self.fail_acquire {
                return Err(Error::camera_unavailable("permission denied"));
            }
            self.acquired += 1;
            Ok(VideoStream {
                label: "front".to_string(),
                width: constraints.width,
                height: constraints.height,
                framerate: constraints.framerate,
            })
        }

        fn start_encoding(&mut self, _stream: &VideoStream, settings: &EncoderSettings) -> Result<()> {
            if self.fail_encoder {
                return Err(Error::camera_unavailable("unsupported mime type"));
            }
            self.encoder = Some(settings.clone());
            Ok(())
        }

        async fn finish_encoding(&mut self) -> Result<Vec<Vec<u8>>> {
            if self.fail_finish {
                return Err(Error::finalize("encoder crashed"));
            }
            Ok(self.chunks.clone())
        }

        fn abort_encoding(&mut self) {
            self.aborted += 1;
        }

        async fn capture_still(&mut self, _stream: &VideoStream) -> Option<Vec<u8>> {
            self.still.clone()
        }

        fn release_stream(&mut self, _stream: VideoStream) {
            self.released += 1;
        }
    }

    fn session_with(feed_source: FeedSource) -> (RecordingSession, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::default());
        let config = CameraConfig {
            feed_source,
            ..CameraConfig::default()
        };
        let session = RecordingSession::new(&config, clock.clone(), Arc::new(SequentialIds::new()));
        (session, clock)
    }

    #[tokio::test]
    async fn test_demo_auto_stop_at_limit() {
        let (mut session, clock) = session_with(FeedSource::Demo);
        let status = session.start(&mut UnavailableCamera).await.unwrap();
        assert_eq!(status, SessionStatus::Recording);

        let event = session.tick_handle().unwrap().event();
        let mut artifacts = Vec::new();
        for _ in 0..12 {
            clock.advance(Duration::from_secs(1));
            artifacts.extend(session.handle_tick(event));
        }

        assert_eq!(artifacts.len(), 1);
        assert_eq!(artifacts[0].duration_seconds, 10);
        assert_eq!(&*artifacts[0].data, DEMO_PAYLOAD);
        assert_eq!(session.status(), SessionStatus::Stopped);
        assert!(session.tick_handle().is_none());
    }

    #[tokio::test]
    async fn test_demo_auto_stop_clamps_duration() {
        let (mut session, clock) = session_with(FeedSource::Demo);
        session.start(&mut UnavailableCamera).await.unwrap();

        clock.advance(Duration::from_secs(14));
        let artifact = session.tick().unwrap();
        assert_eq!(artifact.duration_seconds, 10);
    }

    #[tokio::test]
    async fn test_demo_stop_past_limit_clamps_duration() {
        let (mut session, clock) = session_with(FeedSource::Demo);
        session.start(&mut UnavailableCamera).await.unwrap();

        clock.advance(Duration::from_secs(14));
        let artifact = session.stop(&mut UnavailableCamera).await.unwrap().unwrap();
        assert_eq!(artifact.duration_seconds, 10);
        assert_eq!(session.status(), SessionStatus::Stopped);
    }

    #[tokio::test]
    async fn test_tick_updates_elapsed() {
        let (mut session, clock) = session_with(FeedSource::Demo);
        session.start(&mut UnavailableCamera).await.unwrap();

        clock.advance(Duration::from_millis(3_900));
        assert!(session.tick().is_none());
        assert_eq!(session.elapsed_seconds(), 3);
    }

    #[tokio::test]
    async fn test_live_failure_falls_back_to_demo() {
        crate::logging::init_test_logging();
        let (mut session, _clock) = session_with(FeedSource::Live);

        let status = session.start(&mut UnavailableCamera).await.unwrap();
        assert_eq!(status, SessionStatus::Errored);
        assert_eq!(session.feed_source(), FeedSource::Demo);
        assert_eq!(session.last_error(), Some(ErrorKind::CameraUnavailable));

        let status = session.start(&mut UnavailableCamera).await.unwrap();
        assert_eq!(status, SessionStatus::Recording);
    }

    #[tokio::test]
    async fn test_encoder_failure_releases_stream() {
        let (mut session, _clock) = session_with(FeedSource::Live);
        let mut camera = ScriptedCamera {
            fail_encoder: true,
            ..ScriptedCamera::default()
        };

        let status = session.start(&mut camera).await.unwrap();
        assert_eq!(status, SessionStatus::Errored);
        assert_eq!(camera.released, 1);
        assert!(!session.has_stream());
        assert_eq!(session.last_error(), Some(ErrorKind::CameraUnavailable));
    }

    #[tokio::test]
    async fn test_screenshot_from_held_stream() {
        let (mut session, _clock) = session_with(FeedSource::Live);
        let mut camera = ScriptedCamera {
            still: Some(b"jpeg".to_vec()),
            ..ScriptedCamera::default()
        };

        session.start(&mut camera).await.unwrap();
        let shot = session.screenshot(&mut camera).await.unwrap().unwrap();
        assert_eq!(&*shot.data, b"jpeg");

        // the stream stays held between recordings
        session.stop(&mut camera).await.unwrap();
        assert!(session.screenshot(&mut camera).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_screenshot_without_stream_rejected() {
        let (session, _clock) = session_with(FeedSource::Live);
        let err = session
            .screenshot(&mut ScriptedCamera::default())
            .await
            .unwrap_err();
        assert!(err.is_invalid_state());
    }

    #[tokio::test]
    async fn test_screenshot_on_demo_feed_is_noop() {
        let (mut session, _clock) = session_with(FeedSource::Demo);
        let mut camera = ScriptedCamera {
            still: Some(b"jpeg".to_vec()),
            ..ScriptedCamera::default()
        };
        session.start(&mut camera).await.unwrap();

        assert!(session.screenshot(&mut camera).await.unwrap().is_none());
        assert_eq!(camera.acquired, 0);
    }

    #[tokio::test]
    async fn test_live_recording_produces_artifact() {
        let (mut session, clock) = session_with(FeedSource::Live);
        let mut camera = ScriptedCamera {
            chunks: vec![b"ab".to_vec(), b"cd".to_vec()],
            still: Some(b"jpeg".to_vec()),
            ..ScriptedCamera::default()
        };
        session
            .set_settings(RecordingSettings {
                format: VideoFormat::Webm,
                quality: Quality::Low,
                framerate: 30,
            })
            .unwrap();

        session.start(&mut camera).await.unwrap();
        assert_eq!(camera.encoder.as_ref().unwrap().bitrate, 1_000_000);

        clock.advance(Duration::from_millis(3_700));
        let artifact = session.stop(&mut camera).await.unwrap().unwrap();

        assert_eq!(&*artifact.data, b"abcd");
        assert_eq!(artifact.size_bytes, 4);
        assert_eq!(artifact.duration_seconds, 3);
        assert_eq!(artifact.format, VideoFormat::Webm);
        assert!(artifact.thumbnail.is_some());
        assert_eq!(session.status(), SessionStatus::Stopped);
        assert_eq!(session.elapsed_seconds(), 0);
    }

    #[tokio::test]
    async fn test_held_stream_is_reused() {
        let (mut session, _clock) = session_with(FeedSource::Live);
        let mut camera = ScriptedCamera::default();

        session.start(&mut camera).await.unwrap();
        session.stop(&mut camera).await.unwrap();
        session.start(&mut camera).await.unwrap();

        assert_eq!(camera.acquired, 1);
        assert!(session.has_stream());
    }

    #[tokio::test]
    async fn test_finalize_failure_stops_without_artifact() {
        let (mut session, _clock) = session_with(FeedSource::Live);
        let mut camera = ScriptedCamera {
            fail_finish: true,
            ..ScriptedCamera::default()
        };

        session.start(&mut camera).await.unwrap();
        let err = session.stop(&mut camera).await.unwrap_err();

        assert!(matches!(err, Error::Finalize { .. }));
        assert_eq!(session.status(), SessionStatus::Stopped);
        assert_eq!(session.last_error(), Some(ErrorKind::Finalize));
    }

    #[tokio::test]
    async fn test_stop_when_not_recording_is_noop() {
        let (mut session, _clock) = session_with(FeedSource::Demo);
        assert!(session.stop(&mut UnavailableCamera).await.unwrap().is_none());
        assert_eq!(session.status(), SessionStatus::Idle);
    }

    #[tokio::test]
    async fn test_start_while_recording_rejected() {
        let (mut session, _clock) = session_with(FeedSource::Demo);
        session.start(&mut UnavailableCamera).await.unwrap();

        let err = session.start(&mut UnavailableCamera).await.unwrap_err();
        assert!(err.is_invalid_state());
        assert_eq!(session.status(), SessionStatus::Recording);
    }

    #[tokio::test]
    async fn test_toggle_rejected_while_recording() {
        let (mut session, _clock) = session_with(FeedSource::Demo);
        session.start(&mut UnavailableCamera).await.unwrap();

        let err = session.toggle_feed_source().unwrap_err();
        assert!(err.is_invalid_state());
        assert_eq!(session.feed_source(), FeedSource::Demo);

        let err = session.set_settings(RecordingSettings::default()).unwrap_err();
        assert!(err.is_invalid_state());
    }

    #[tokio::test]
    async fn test_toggle_back_to_live_after_error() {
        let (mut session, _clock) = session_with(FeedSource::Live);
        session.start(&mut UnavailableCamera).await.unwrap();

        assert_eq!(session.toggle_feed_source().unwrap(), FeedSource::Live);
        let mut camera = ScriptedCamera::default();
        let status = session.start(&mut camera).await.unwrap();
        assert_eq!(status, SessionStatus::Recording);
        assert_eq!(camera.acquired, 1);
        assert_eq!(session.last_error(), None);
    }

    #[tokio::test]
    async fn test_stale_tick_ignored() {
        let (mut session, clock) = session_with(FeedSource::Demo);
        session.start(&mut UnavailableCamera).await.unwrap();
        let old = session.tick_handle().unwrap().clone();

        session.stop(&mut UnavailableCamera).await.unwrap();
        assert!(old.is_cancelled());

        session.start(&mut UnavailableCamera).await.unwrap();
        clock.advance(Duration::from_secs(20));

        assert!(session.handle_tick(old.event()).is_none());
        assert_eq!(session.status(), SessionStatus::Recording);
        assert_eq!(session.elapsed_seconds(), 0);
    }

    #[tokio::test]
    async fn test_teardown_aborts_and_releases() {
        let (mut session, _clock) = session_with(FeedSource::Live);
        let mut camera = ScriptedCamera::default();
        session.start(&mut camera).await.unwrap();
        let tick = session.tick_handle().unwrap().clone();

        session.teardown(&mut camera);

        assert_eq!(camera.aborted, 1);
        assert_eq!(camera.released, 1);
        assert!(tick.is_cancelled());
        assert_eq!(session.status(), SessionStatus::Idle);
        assert!(!session.has_stream());
    }

    #[test]
    fn test_zoom_clamps() {
        let (mut session, _clock) = session_with(FeedSource::Demo);
        assert!((session.set_zoom(5.0) - MAX_ZOOM).abs() < f64::EPSILON);
        assert!((session.set_zoom(0.1) - MIN_ZOOM).abs() < f64::EPSILON);
        assert!((session.set_zoom(f64::NAN) - MIN_ZOOM).abs() < f64::EPSILON);

        session.set_zoom(1.0);
        assert!((session.zoom_in() - 1.25).abs() < f64::EPSILON);
        assert!((session.zoom_out() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_set_settings_rejects_zero_framerate() {
        let (mut session, _clock) = session_with(FeedSource::Demo);
        let err = session
            .set_settings(RecordingSettings {
                framerate: 0,
                ..RecordingSettings::default()
            })
            .unwrap_err();
        assert!(err.is_validation());
    }
}
