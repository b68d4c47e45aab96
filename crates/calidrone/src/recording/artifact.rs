//! Finished recordings and their playback handles.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use super::{Quality, RecordingSettings, VideoFormat};
use crate::error::{Error, Result};

/// Payload of a demo recording.
pub const DEMO_PAYLOAD: &[u8] = b"mock video data";

/// A still frame shown next to a recording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    /// Encoded image bytes.
    pub data: Arc<[u8]>,
}

impl Thumbnail {
    /// Wrap encoded image bytes.
    #[must_use]
    pub fn new(data: Vec<u8>) -> Self {
        Self { data: data.into() }
    }
}

#[derive(Debug, Default)]
struct HandleState {
    release_requested: bool,
    released: bool,
    open_players: usize,
    revocations: usize,
}

#[derive(Debug)]
struct HandleInner {
    url: String,
    data: Arc<[u8]>,
    state: Mutex<HandleState>,
}

impl HandleInner {
    fn state(&self) -> MutexGuard<'_, HandleState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A releasable reference to a recording's bytes, exposed as a URL.
///
/// Releasing revokes the URL exactly once. A release requested while a
/// [`Player`] is open is deferred until the last player is dropped.
#[derive(Debug, Clone)]
pub struct PlaybackHandle {
    inner: Arc<HandleInner>,
}

impl PlaybackHandle {
    fn new(url: String, data: Arc<[u8]>) -> Self {
        Self {
            inner: Arc::new(HandleInner {
                url,
                data,
                state: Mutex::new(HandleState::default()),
            }),
        }
    }

    /// The playback URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.inner.url
    }

    /// Open a player on the recording.
    ///
    /// # Errors
    ///
    /// Returns an invalid-state error once a release has been requested.
    pub fn open(&self) -> Result<Player> {
        let mut state = self.inner.state();
        if state.release_requested {
            return Err(Error::invalid_state(format!(
                "{} has been released",
                self.inner.url
            )));
        }
        state.open_players += 1;
        Ok(Player {
            handle: self.clone(),
        })
    }

    /// Request release of the handle.
    ///
    /// Returns `true` if this call revoked the URL. Returns `false` if the
    /// handle was already released or a release was already pending, and also
    /// when players are open, in which case the last player to close revokes it.
    pub fn release(&self) -> bool {
        let mut state = self.inner.state();
        if state.release_requested {
            return false;
        }
        state.release_requested = true;
        if state.open_players > 0 {
            debug!(url = %self.inner.url, players = state.open_players, "Deferring release");
            return false;
        }
        Self::revoke(&self.inner.url, &mut state);
        true
    }

    fn revoke(url: &str, state: &mut HandleState) {
        state.released = true;
        state.revocations += 1;
        debug!(url, "Revoked playback handle");
    }

    /// Whether both handles refer to the same playback URL.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Whether the URL has been revoked.
    #[must_use]
    pub fn is_released(&self) -> bool {
        self.inner.state().released
    }

    /// Whether a release was requested but is waiting on open players.
    #[must_use]
    pub fn is_release_pending(&self) -> bool {
        let state = self.inner.state();
        state.release_requested && !state.released
    }

    /// Number of players currently open.
    #[must_use]
    pub fn open_players(&self) -> usize {
        self.inner.state().open_players
    }

    /// How many times the URL was actually revoked (0 or 1).
    #[must_use]
    pub fn release_count(&self) -> usize {
        self.inner.state().revocations
    }
}

/// An open player. Keeps the playback handle alive until dropped.
#[derive(Debug)]
pub struct Player {
    handle: PlaybackHandle,
}

impl Player {
    /// The URL being played.
    #[must_use]
    pub fn url(&self) -> &str {
        self.handle.url()
    }

    /// The recording bytes.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.handle.inner.data
    }
}

impl Drop for Player {
    fn drop(&mut self) {
        let inner = &self.handle.inner;
        let mut state = inner.state();
        state.open_players = state.open_players.saturating_sub(1);
        if state.open_players == 0 && state.release_requested && !state.released {
            PlaybackHandle::revoke(&inner.url, &mut state);
        }
    }
}

/// A finished recording. Its bytes never change.
#[derive(Debug, Clone)]
pub struct RecordingArtifact {
    /// Unique identifier.
    pub id: Uuid,
    /// Display name, `Recording <timestamp>`.
    pub name: String,
    /// Encoded video bytes.
    pub data: Arc<[u8]>,
    /// Handle through which the recording is played.
    pub playback: PlaybackHandle,
    /// Length of `data`.
    pub size_bytes: u64,
    /// Recorded duration in whole seconds.
    pub duration_seconds: u64,
    /// Container format.
    pub format: VideoFormat,
    /// Quality tier it was recorded at.
    pub quality: Quality,
    /// When the recording finished.
    pub created_at: DateTime<Utc>,
    /// Still frame, when the camera could provide one.
    pub thumbnail: Option<Thumbnail>,
}

impl RecordingArtifact {
    /// Package recorded bytes into an artifact.
    #[must_use]
    pub fn new(
        id: Uuid,
        data: Vec<u8>,
        duration_seconds: u64,
        settings: &RecordingSettings,
        created_at: DateTime<Utc>,
        thumbnail: Option<Thumbnail>,
    ) -> Self {
        let data: Arc<[u8]> = data.into();
        let url = format!("blob:calidrone/{id}.{}", settings.format.extension());
        Self {
            id,
            name: format!("Recording {}", created_at.format("%Y-%m-%d %H:%M:%S")),
            playback: PlaybackHandle::new(url, Arc::clone(&data)),
            size_bytes: data.len() as u64,
            data,
            duration_seconds,
            format: settings.format,
            quality: settings.quality,
            created_at,
            thumbnail,
        }
    }

    /// The name with characters that are unsafe in file names replaced.
    #[must_use]
    pub fn file_stem(&self) -> String {
        self.name
            .chars()
            .map(|c| match c {
                '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '-',
                c if c.is_control() => '-',
                c => c,
            })
            .collect()
    }

    /// File name used when exporting, `<file_stem>.<ext>`.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.file_stem(), self.format.extension())
    }
}
