//! Core data types shared between the presenter engine and the UI.
//!
//! `MediaDescriptor` is the static record describing one playable item.
//! It is immutable once created, with a single exception: a video file's
//! real length overwrites `duration_ms` once the backend has measured it.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use tempfile::NamedTempFile;

use crate::core::error::PresentError;

/// Display time for operator-supplied still images.
pub const IMAGE_DURATION_MS: u64 = 5_000;

/// Fallback display time for embedded video with no declared duration.
pub const EMBED_DURATION_MS: u64 = 30_000;

/// The closed set of media classes the presenter knows how to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// Static picture, shown for a fixed duration.
    Image,
    /// Local video file; plays itself out and signals its own end.
    VideoFile,
    /// Externally-hosted embed; timed by our own wall clock only.
    EmbeddedVideo,
}

/// Where an item came from. Operator items are ephemeral and carry a
/// transient handle; bundled items are durable and never evicted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Bundled,
    Operator,
}

#[derive(Debug, Clone)]
pub enum SourceLocation {
    /// Local file (bundled asset or transient temp copy).
    Path(PathBuf),
    /// Remote identifier for an embedded player.
    Url(String),
}

/// Owns the temp-file backing of operator-supplied bytes.
///
/// Shared via `Arc` because descriptor copies may alias one upload.
/// `release()` deletes the backing file at most once, no matter how many
/// removal paths run; `times_released` is the observable witness.
#[derive(Debug)]
pub struct TransientHandle {
    path: PathBuf,
    temp: Mutex<Option<NamedTempFile>>,
    releases: AtomicUsize,
}

impl TransientHandle {
    pub fn from_bytes(bytes: &[u8]) -> std::io::Result<Self> {
        let mut temp = NamedTempFile::new()?;
        temp.write_all(bytes)?;
        temp.flush()?;

        Ok(Self {
            path: temp.path().to_path_buf(),
            temp: Mutex::new(Some(temp)),
            releases: AtomicUsize::new(0),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Drop the backing temp file. Idempotent: only the first call counts.
    pub fn release(&self) {
        let taken = self.temp.lock().map(|mut slot| slot.take()).unwrap_or(None);
        if taken.is_some() {
            // Dropping the NamedTempFile deletes the file on disk.
            self.releases.fetch_add(1, Ordering::SeqCst);
        }
    }

    pub fn is_released(&self) -> bool {
        self.times_released() > 0
    }

    pub fn times_released(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }
}

/// One playable item.
#[derive(Debug, Clone)]
pub struct MediaDescriptor {
    pub kind: MediaKind,
    pub source: SourceLocation,
    /// Authoritative for `Image` and `EmbeddedVideo`; 0 (unknown) for
    /// `VideoFile` until the backend measures the real length.
    pub duration_ms: u64,
    pub label: Option<String>,
    pub origin: Origin,
    pub(crate) handle: Option<Arc<TransientHandle>>,
}

impl MediaDescriptor {
    pub fn bundled_image(path: impl Into<PathBuf>, duration_ms: u64) -> Self {
        Self {
            kind: MediaKind::Image,
            source: SourceLocation::Path(path.into()),
            duration_ms,
            label: None,
            origin: Origin::Bundled,
            handle: None,
        }
    }

    pub fn bundled_video(path: impl Into<PathBuf>) -> Self {
        Self {
            kind: MediaKind::VideoFile,
            source: SourceLocation::Path(path.into()),
            duration_ms: 0,
            label: None,
            origin: Origin::Bundled,
            handle: None,
        }
    }

    /// Build an operator descriptor from raw bytes (file picker, camera).
    ///
    /// The bytes are copied into a transient temp file that the playlist
    /// releases when the item is removed.
    pub fn from_operator_bytes(
        label: impl Into<String>,
        bytes: &[u8],
        kind: MediaKind,
    ) -> Result<Self, PresentError> {
        if kind == MediaKind::EmbeddedVideo {
            return Err(PresentError::InvalidReference(
                "embedded video has no byte source".into(),
            ));
        }

        let handle = Arc::new(TransientHandle::from_bytes(bytes)?);
        let duration_ms = match kind {
            MediaKind::Image => IMAGE_DURATION_MS,
            MediaKind::VideoFile | MediaKind::EmbeddedVideo => 0,
        };

        Ok(Self {
            kind,
            source: SourceLocation::Path(handle.path().to_path_buf()),
            duration_ms,
            label: Some(label.into()),
            origin: Origin::Operator,
            handle: Some(handle),
        })
    }

    pub fn with_label(mut self, label: Option<String>) -> Self {
        if label.is_some() {
            self.label = label;
        }
        self
    }

    pub fn path(&self) -> Option<&Path> {
        match &self.source {
            SourceLocation::Path(p) => Some(p),
            SourceLocation::Url(_) => None,
        }
    }

    pub fn url(&self) -> Option<&str> {
        match &self.source {
            SourceLocation::Path(_) => None,
            SourceLocation::Url(u) => Some(u),
        }
    }

    pub fn has_transient_handle(&self) -> bool {
        self.handle.is_some()
    }

    /// Human-readable name: label, else file stem, else the URL.
    pub fn display_name(&self) -> String {
        if let Some(label) = &self.label {
            return label.clone();
        }

        match &self.source {
            SourceLocation::Path(p) => p
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("Untitled")
                .to_string(),
            SourceLocation::Url(u) => u.clone(),
        }
    }
}

/// Read an operator-selected source from disk, mapping a runtime refusal
/// to `PermissionDenied` so the UI can distinguish it from a plain miss.
pub fn read_operator_source(path: &Path) -> Result<Vec<u8>, PresentError> {
    std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::PermissionDenied {
            PresentError::PermissionDenied(path.display().to_string())
        } else {
            PresentError::Io(e)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_handle_releases_once() {
        let handle = TransientHandle::from_bytes(b"payload").unwrap();
        let path = handle.path().to_path_buf();
        assert!(path.is_file());

        handle.release();
        handle.release();
        handle.release();

        assert!(!path.is_file());
        assert_eq!(handle.times_released(), 1);
    }

    #[test]
    fn operator_bytes_build_a_backed_descriptor() {
        let d =
            MediaDescriptor::from_operator_bytes("shot.png", b"bytes", MediaKind::Image).unwrap();

        assert_eq!(d.origin, Origin::Operator);
        assert_eq!(d.duration_ms, IMAGE_DURATION_MS);
        assert!(d.has_transient_handle());
        assert!(d.path().is_some_and(|p| p.is_file()));
    }

    #[test]
    fn operator_embed_bytes_are_rejected() {
        let err =
            MediaDescriptor::from_operator_bytes("x", b"y", MediaKind::EmbeddedVideo).unwrap_err();
        assert!(matches!(err, PresentError::InvalidReference(_)));
    }

    #[test]
    fn display_name_falls_back_to_file_stem() {
        let d = MediaDescriptor::bundled_image("shows/intro.png", 5_000);
        assert_eq!(d.display_name(), "intro");
    }
}
