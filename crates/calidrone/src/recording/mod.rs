//! Camera feed recording.
//!
//! This module contains the recording state machine and everything it talks
//! to:
//!
//! - [`RecordingSession`]: the idle → acquiring → recording → stopped machine
//! - [`CameraDevice`]: the seam to whatever actually owns the camera
//! - [`RecordingArtifact`]: an immutable finished recording
//! - [`TickHandle`] and [`run_ticker`]: the once-per-second duration tick

mod artifact;
mod device;
mod session;
mod ticker;

pub use artifact::{PlaybackHandle, Player, RecordingArtifact, Thumbnail, DEMO_PAYLOAD};
pub use device::{CameraDevice, EncoderSettings, StreamConstraints, UnavailableCamera, VideoStream};
pub use session::{RecordingSession, MAX_ZOOM, MIN_ZOOM, ZOOM_STEP};
pub use ticker::{run_ticker, TickEvent, TickHandle};

use serde::{Deserialize, Serialize};

/// Where recorded frames come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedSource {
    /// The physical camera.
    #[default]
    Live,
    /// A synthetic source used when no camera is available.
    Demo,
}

impl FeedSource {
    /// The other source.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Live => Self::Demo,
            Self::Demo => Self::Live,
        }
    }
}

impl std::fmt::Display for FeedSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Live => write!(f, "live"),
            Self::Demo => write!(f, "demo"),
        }
    }
}

/// Where a [`RecordingSession`] is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// Nothing has been started yet.
    #[default]
    Idle,
    /// Waiting for the camera.
    Acquiring,
    /// Frames are being captured.
    Recording,
    /// The last recording finished.
    Stopped,
    /// The camera could not be acquired; the feed fell back to demo.
    Errored,
}

impl SessionStatus {
    /// Whether the feed source and settings are locked.
    #[must_use]
    pub fn is_busy(self) -> bool {
        matches!(self, Self::Acquiring | Self::Recording)
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Acquiring => write!(f, "acquiring"),
            Self::Recording => write!(f, "recording"),
            Self::Stopped => write!(f, "stopped"),
            Self::Errored => write!(f, "errored"),
        }
    }
}

/// Container format of a recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoFormat {
    /// MPEG-4.
    #[default]
    Mp4,
    /// Audio Video Interleave.
    Avi,
    /// QuickTime.
    Mov,
    /// WebM.
    Webm,
}

impl VideoFormat {
    /// File extension, without the dot.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Mp4 => "mp4",
            Self::Avi => "avi",
            Self::Mov => "mov",
            Self::Webm => "webm",
        }
    }

    /// MIME type requested from the encoder.
    #[must_use]
    pub fn mime_type(self) -> String {
        format!("video/{}", self.extension())
    }
}

impl std::fmt::Display for VideoFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

impl std::str::FromStr for VideoFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mp4" => Ok(Self::Mp4),
            "avi" => Ok(Self::Avi),
            "mov" => Ok(Self::Mov),
            "webm" => Ok(Self::Webm),
            other => Err(format!(
                "unknown format '{other}' (expected mp4, avi, mov or webm)"
            )),
        }
    }
}

/// Recording quality tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    /// 8 Mbps.
    Ultra,
    /// 4 Mbps.
    #[default]
    High,
    /// 2 Mbps.
    Medium,
    /// 1 Mbps.
    Low,
}

impl Quality {
    /// Encoder bitrate for this tier, in bits per second.
    #[must_use]
    pub fn bitrate(self) -> u32 {
        match self {
            Self::Ultra => 8_000_000,
            Self::High => 4_000_000,
            Self::Medium => 2_000_000,
            Self::Low => 1_000_000,
        }
    }
}

impl std::fmt::Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ultra => write!(f, "ultra"),
            Self::High => write!(f, "high"),
            Self::Medium => write!(f, "medium"),
            Self::Low => write!(f, "low"),
        }
    }
}

impl std::str::FromStr for Quality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ultra" => Ok(Self::Ultra),
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            other => Err(format!(
                "unknown quality '{other}' (expected ultra, high, medium or low)"
            )),
        }
    }
}

/// User-adjustable recording settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordingSettings {
    /// Container format.
    pub format: VideoFormat,
    /// Quality tier.
    pub quality: Quality,
    /// Frames per second.
    pub framerate: u32,
}

impl Default for RecordingSettings {
    fn default() -> Self {
        Self {
            format: VideoFormat::Mp4,
            quality: Quality::High,
            framerate: 30,
        }
    }
}
