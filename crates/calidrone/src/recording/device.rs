//! The camera device seam.
//!
//! [`RecordingSession`](super::RecordingSession) never touches media APIs
//! directly. A host binds a [`CameraDevice`] that knows how to open the
//! camera, encode from it and hand back the encoded chunks.

use tracing::debug;

use super::{RecordingSettings, VideoFormat};
use crate::config::CameraConfig;
use crate::error::{Error, Result};

/// What the session asks for when opening the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamConstraints {
    /// Ideal width in pixels.
    pub width: u32,
    /// Ideal height in pixels.
    pub height: u32,
    /// Ideal frames per second.
    pub framerate: u32,
}

impl StreamConstraints {
    /// Constraints from the camera configuration, at the given framerate.
    #[must_use]
    pub fn from_config(config: &CameraConfig, framerate: u32) -> Self {
        Self {
            width: config.width,
            height: config.height,
            framerate,
        }
    }
}

/// An open camera stream.
///
/// Owned by the session while it holds the camera and given back to the
/// device on release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoStream {
    /// Device-specific label of the stream.
    pub label: String,
    /// Actual width in pixels.
    pub width: u32,
    /// Actual height in pixels.
    pub height: u32,
    /// Actual frames per second.
    pub framerate: u32,
}

/// Parameters for the encoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderSettings {
    /// Container format.
    pub format: VideoFormat,
    /// MIME type, e.g. `video/mp4`.
    pub mime_type: String,
    /// Target bitrate in bits per second.
    pub bitrate: u32,
}

impl From<RecordingSettings> for EncoderSettings {
    fn from(settings: RecordingSettings) -> Self {
        Self {
            format: settings.format,
            mime_type: settings.format.mime_type(),
            bitrate: settings.quality.bitrate(),
        }
    }
}

/// A camera the recorder can capture from.
///
/// Acquisition and finalization are single-shot asynchronous operations; the
/// session applies its state transition only once they resolve.
#[async_trait::async_trait]
pub trait CameraDevice: Send + Sync {
    /// The name of this device (for logging).
    fn name(&self) -> &str;

    /// Open the camera.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CameraUnavailable`] if there is no camera or access
    /// was denied.
    async fn acquire(&mut self, constraints: &StreamConstraints) -> Result<VideoStream>;

    /// Begin encoding frames from `stream`.
    ///
    /// # Errors
    ///
    /// Returns an error if the encoder rejects the settings.
    fn start_encoding(&mut self, stream: &VideoStream, settings: &EncoderSettings) -> Result<()>;

    /// Stop encoding and return the encoded chunks, in order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Finalize`] if the encoder could not flush its output.
    async fn finish_encoding(&mut self) -> Result<Vec<Vec<u8>>>;

    /// Stop encoding and discard whatever was captured.
    fn abort_encoding(&mut self) {}

    /// Grab a single still frame, if the device supports it.
    async fn capture_still(&mut self, _stream: &VideoStream) -> Option<Vec<u8>> {
        None
    }

    /// Close a stream previously returned by [`acquire`](Self::acquire).
    fn release_stream(&mut self, stream: VideoStream);
}

/// The device used when the host has no camera binding.
///
/// Every acquisition fails, which sends the session to its demo fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableCamera;

#[async_trait::async_trait]
impl CameraDevice for UnavailableCamera {
    fn name(&self) -> &str {
        "unavailable"
    }

    async fn acquire(&mut self, _constraints: &StreamConstraints) -> Result<VideoStream> {
        debug!("No camera binding available");
        Err(Error::camera_unavailable(
            "no camera device is available on this host",
        ))
    }

    fn start_encoding(&mut self, _stream: &VideoStream, _settings: &EncoderSettings) -> Result<()> {
        Err(Error::camera_unavailable("no camera device to encode from"))
    }

    async fn finish_encoding(&mut self) -> Result<Vec<Vec<u8>>> {
        Err(Error::finalize("no encoder is running"))
    }

    fn release_stream(&mut self, _stream: VideoStream) {}
}
