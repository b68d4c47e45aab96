use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path as FsPath, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::recording::RecordingArtifact;

/// Totals over every recording in a catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordingStats {
    /// Number of recordings.
    pub count: usize,
    /// Sum of the recording durations, in seconds.
    pub total_duration_seconds: u64,
    /// Sum of the recording sizes, in bytes.
    pub total_size_bytes: u64,
}

/// Finished recordings, in the order they were made.
///
/// Removing or replacing a recording releases its playback handle. Dropping
/// the catalog releases every handle it still holds.
#[derive(Debug, Default)]
pub struct RecordingCatalog {
    recordings: Vec<RecordingArtifact>,
}

impl RecordingCatalog {
    /// An empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a recording.
    ///
    /// # Errors
    ///
    /// Returns an integrity error if a recording with the same id is present.
    pub fn add(&mut self, artifact: RecordingArtifact) -> Result<()> {
        if self.get(artifact.id).is_some() {
            return Err(Error::integrity(format!(
                "recording {} is already in the catalog",
                artifact.id
            )));
        }
        debug!(id = %artifact.id, "Adding recording to catalog");
        self.recordings.push(artifact);
        Ok(())
    }

    /// Remove a recording and release its playback handle.
    ///
    /// Returns `false` if no recording has that id.
    pub fn remove(&mut self, id: Uuid) -> bool {
        let Some(index) = self.recordings.iter().position(|r| r.id == id) else {
            return false;
        };
        let artifact = self.recordings.remove(index);
        artifact.playback.release();
        debug!(%id, "Removed recording");
        true
    }

    /// Swap in a new version of a recording, releasing the old handle.
    ///
    /// # Errors
    ///
    /// Returns a validation error if no recording has the artifact's id.
    pub fn replace(&mut self, artifact: RecordingArtifact) -> Result<()> {
        let slot = self
            .recordings
            .iter_mut()
            .find(|r| r.id == artifact.id)
            .ok_or_else(|| Error::validation(format!("no recording {}", artifact.id)))?;
        let old = std::mem::replace(slot, artifact);
        if !old.playback.same_as(&slot.playback) {
            old.playback.release();
        }
        Ok(())
    }

    /// Look up a recording by id.
    #[must_use]
    pub fn get(&self, id: Uuid) -> Option<&RecordingArtifact> {
        self.recordings.iter().find(|r| r.id == id)
    }

    /// All recordings, oldest first.
    #[must_use]
    pub fn list(&self) -> &[RecordingArtifact] {
        &self.recordings
    }

    /// Number of recordings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.recordings.len()
    }

    /// Whether there are no recordings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.recordings.is_empty()
    }

    /// Count, total duration and total size.
    #[must_use]
    pub fn aggregate(&self) -> RecordingStats {
        self.recordings
            .iter()
            .fold(RecordingStats::default(), |mut stats, r| {
                stats.count += 1;
                stats.total_duration_seconds += r.duration_seconds;
                stats.total_size_bytes += r.size_bytes;
                stats
            })
    }

    /// Release every playback handle. Safe to call more than once.
    pub fn release_all(&self) {
        let released = self
            .recordings
            .iter()
            .filter(|r| r.playback.release())
            .count();
        if released > 0 {
            debug!(released, "Released playback handles");
        }
    }

    /// Write one recording into `dir` as `<name>.<ext>`.
    ///
    /// A name already present in `dir` gets a ` (n)` suffix instead of being
    /// overwritten.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an unknown id, or an error if the file
    /// cannot be written.
    pub fn export(&self, id: Uuid, dir: &FsPath) -> Result<PathBuf> {
        let artifact = self
            .get(id)
            .ok_or_else(|| Error::validation(format!("no recording {id}")))?;
        write_artifact(artifact, dir)
    }

    /// Write every recording into `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error on the first file that cannot be written.
    pub fn export_all(&self, dir: &FsPath) -> Result<Vec<PathBuf>> {
        let written = self
            .recordings
            .iter()
            .map(|artifact| write_artifact(artifact, dir))
            .collect::<Result<Vec<_>>>()?;
        info!(count = written.len(), dir = %dir.display(), "Exported recordings");
        Ok(written)
    }
}

impl Drop for RecordingCatalog {
    fn drop(&mut self) {
        self.release_all();
    }
}

fn write_artifact(artifact: &RecordingArtifact, dir: &FsPath) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|source| Error::FileWrite {
        path: dir.to_path_buf(),
        source,
    })?;
    let (path, mut file) = create_unique(dir, &artifact.file_stem(), artifact.format.extension())?;
    file.write_all(&artifact.data).map_err(|source| Error::FileWrite {
        path: path.clone(),
        source,
    })?;
    debug!(id = %artifact.id, path = %path.display(), "Wrote recording");
    Ok(path)
}

/// Create `<stem>.<ext>` in `dir`, or `<stem> (n).<ext>` with the first free
/// `n` when the name is taken. Existing files are never opened.
fn create_unique(dir: &FsPath, stem: &str, extension: &str) -> Result<(PathBuf, File)> {
    let mut attempt = 0u32;
    loop {
        let name = if attempt == 0 {
            format!("{stem}.{extension}")
        } else {
            format!("{stem} ({attempt}).{extension}")
        };
        let path = dir.join(name);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => {
                if attempt > 0 {
                    debug!(path = %path.display(), "File name taken, wrote under a new name");
                }
                return Ok((path, file));
            }
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => attempt += 1,
            Err(source) => return Err(Error::FileWrite { path, source }),
        }
    }
}

/// Human-readable size, e.g. `"1.5 KB"`.
///
/// Uses 1024-byte units up to GB, with at most two decimals.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = (value * 100.0).round() / 100.0;
    format!("{rounded} {}", UNITS[unit])
}

/// Duration as `m:ss`, e.g. `"1:05"`.
#[must_use]
pub fn format_duration(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::{RecordingSettings, DEMO_PAYLOAD};
    use chrono::DateTime;

    fn artifact(id: u128, duration: u64) -> RecordingArtifact {
        RecordingArtifact::new(
            Uuid::from_u128(id),
            DEMO_PAYLOAD.to_vec(),
            duration,
            &RecordingSettings::default(),
            DateTime::from_timestamp(1_700_000_000 + i64::try_from(id).unwrap(), 0).unwrap(),
            None,
        )
    }

    #[test]
    fn test_add_duplicate_id() {
        let mut catalog = RecordingCatalog::new();
        catalog.add(artifact(1, 5)).unwrap();
        let err = catalog.add(artifact(1, 6)).unwrap_err();
        assert!(matches!(err, Error::Integrity { .. }));
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_double_remove_releases_once() {
        let mut catalog = RecordingCatalog::new();
        let recording = artifact(1, 5);
        let handle = recording.playback.clone();
        catalog.add(recording).unwrap();

        assert!(catalog.remove(Uuid::from_u128(1)));
        assert!(!catalog.remove(Uuid::from_u128(1)));

        assert!(handle.is_released());
        assert_eq!(handle.release_count(), 1);
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut catalog = RecordingCatalog::new();
        let recording = artifact(1, 5);
        let handle = recording.playback.clone();
        catalog.add(recording).unwrap();

        assert!(!catalog.remove(Uuid::from_u128(2)));
        assert_eq!(catalog.len(), 1);
        assert!(!handle.is_released());
    }

    #[test]
    fn test_remove_while_playing_defers_release() {
        let mut catalog = RecordingCatalog::new();
        let recording = artifact(1, 5);
        let handle = recording.playback.clone();
        catalog.add(recording).unwrap();

        let player = handle.open().unwrap();
        catalog.remove(Uuid::from_u128(1));
        assert!(!handle.is_released());

        drop(player);
        assert!(handle.is_released());
        assert_eq!(handle.release_count(), 1);
    }

    #[test]
    fn test_replace_releases_old_handle() {
        let mut catalog = RecordingCatalog::new();
        let first = artifact(1, 5);
        let old_handle = first.playback.clone();
        catalog.add(first).unwrap();

        let mut second = artifact(1, 5);
        second.duration_seconds = 7;
        catalog.replace(second).unwrap();

        assert!(old_handle.is_released());
        assert_eq!(catalog.get(Uuid::from_u128(1)).unwrap().duration_seconds, 7);
        assert!(catalog.replace(artifact(9, 1)).is_err());
    }

    #[test]
    fn test_replace_with_shared_bytes_releases_old_handle() {
        let mut catalog = RecordingCatalog::new();
        let first = artifact(1, 5);
        let old_handle = first.playback.clone();
        let mut second = artifact(1, 5);
        second.data = std::sync::Arc::clone(&first.data);
        catalog.add(first).unwrap();

        catalog.replace(second).unwrap();
        assert!(old_handle.is_released());
    }

    #[test]
    fn test_replace_with_same_handle_keeps_it() {
        let mut catalog = RecordingCatalog::new();
        let first = artifact(1, 5);
        let handle = first.playback.clone();
        let mut renamed = first.clone();
        renamed.name = "Flyover".to_string();
        catalog.add(first).unwrap();

        catalog.replace(renamed).unwrap();
        assert!(!handle.is_released());
        assert_eq!(catalog.get(Uuid::from_u128(1)).unwrap().name, "Flyover");
    }

    #[test]
    fn test_aggregate() {
        let mut catalog = RecordingCatalog::new();
        assert_eq!(catalog.aggregate(), RecordingStats::default());

        catalog.add(artifact(1, 10)).unwrap();
        catalog.add(artifact(2, 65)).unwrap();

        let stats = catalog.aggregate();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.total_duration_seconds, 75);
        assert_eq!(stats.total_size_bytes, 30);
    }

    #[test]
    fn test_release_all_and_drop() {
        let mut catalog = RecordingCatalog::new();
        let a = artifact(1, 1);
        let b = artifact(2, 1);
        let (ha, hb) = (a.playback.clone(), b.playback.clone());
        catalog.add(a).unwrap();
        catalog.add(b).unwrap();

        catalog.release_all();
        drop(catalog);

        assert_eq!(ha.release_count(), 1);
        assert_eq!(hb.release_count(), 1);
    }

    #[test]
    fn test_export() {
        let dir = tempfile::tempdir().unwrap();
        let mut catalog = RecordingCatalog::new();
        catalog.add(artifact(1, 1)).unwrap();
        catalog.add(artifact(2, 1)).unwrap();

        let path = catalog.export(Uuid::from_u128(1), dir.path()).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), DEMO_PAYLOAD);
        assert!(path.to_string_lossy().ends_with(".mp4"));

        let all = catalog.export_all(&dir.path().join("all")).unwrap();
        assert_eq!(all.len(), 2);
        assert!(all.iter().all(|p| p.exists()));

        let err = catalog.export(Uuid::from_u128(3), dir.path()).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_export_same_second_keeps_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let created = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let mut catalog = RecordingCatalog::new();
        for id in 1..=2 {
            let mut recording = artifact(id, 1);
            recording.created_at = created;
            recording.name = "Recording 2023-11-14 22:13:20".to_string();
            catalog.add(recording).unwrap();
        }

        let written = catalog.export_all(dir.path()).unwrap();
        assert_eq!(
            written,
            vec![
                dir.path().join("Recording 2023-11-14 22-13-20.mp4"),
                dir.path().join("Recording 2023-11-14 22-13-20 (1).mp4"),
            ]
        );
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_export_does_not_overwrite_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut catalog = RecordingCatalog::new();
        catalog.add(artifact(1, 1)).unwrap();
        let name = catalog.get(Uuid::from_u128(1)).unwrap().file_name();
        std::fs::write(dir.path().join(&name), b"keep me").unwrap();

        let path = catalog.export(Uuid::from_u128(1), dir.path()).unwrap();
        assert_ne!(path, dir.path().join(&name));
        assert_eq!(std::fs::read(dir.path().join(&name)).unwrap(), b"keep me");
        assert_eq!(std::fs::read(&path).unwrap(), DEMO_PAYLOAD);
    }

    #[test]
    fn test_export_unwritable_dir() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();

        let mut catalog = RecordingCatalog::new();
        catalog.add(artifact(1, 1)).unwrap();
        let err = catalog.export(Uuid::from_u128(1), &blocker).unwrap_err();
        assert!(matches!(err, Error::FileWrite { .. }));
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 B");
        assert_eq!(format_file_size(15), "15 B");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(1024 * 1024), "1 MB");
        assert_eq!(format_file_size(5 * 1024 * 1024 * 1024 * 1024), "5120 GB");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0:00");
        assert_eq!(format_duration(65), "1:05");
        assert_eq!(format_duration(600), "10:00");
    }
}
