//! core/error.rs
//! Failure taxonomy for the presenter core.
//!
//! Every variant is recoverable: the playback loop evicts, skips, or cleanly
//! stops — it never dies on a single bad item.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PresentError {
    /// The underlying resource failed to decode or load.
    /// Operator-supplied items are evicted from the playlist on this;
    /// bundled items are skipped once, never evicted.
    #[error("load failure: {0}")]
    LoadFailure(String),

    /// A supplied identifier could not be classified into a playable
    /// descriptor (e.g. an unparseable embed URL). Surfaced to the UI;
    /// never enters the playlist.
    #[error("invalid reference: {0}")]
    InvalidReference(String),

    /// Nothing available to play. Not a hard failure: the engine stops
    /// with a warning and restarts once items are (re)populated.
    #[error("the playlist is empty")]
    EmptyPlaylist,

    /// The runtime refused access to an operator source (capture device,
    /// unreadable file). Surfaced to the UI; playback state is untouched.
    #[error("access denied: {0}")]
    PermissionDenied(String),

    /// Generic I/O failure (file read, transient-storage write).
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),
}
