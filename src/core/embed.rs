//! core/embed.rs
//! Classification of embeddable third-party video sources.
//!
//! A source string is an embed when the recognized watch-URL pattern
//! yields an 11-character opaque video id. The pattern covers the usual
//! shapes: `watch?v=ID`, `youtu.be/ID`, `embed/ID`, `v/ID`.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::core::error::PresentError;
use crate::core::types::{MediaDescriptor, MediaKind, Origin, SourceLocation};

static VIDEO_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^.*((youtu\.be/)|(v/)|(/u/\w/)|(embed/)|(watch\?))\??v?=?([^#&?]*).*$")
        .expect("video id pattern")
});

/// Pull the opaque video id out of a host URL; `None` when the string is
/// not a recognized embed address.
pub fn extract_video_id(url: &str) -> Option<String> {
    let caps = VIDEO_ID.captures(url)?;
    let id = caps.get(7)?.as_str();
    (id.len() == 11).then(|| id.to_string())
}

/// Turn operator free text into an embedded-video descriptor.
///
/// `duration_ms == 0` means "use the default at presentation time".
pub fn classify_embed(
    raw: &str,
    duration_ms: u64,
    origin: Origin,
) -> Result<MediaDescriptor, PresentError> {
    let parsed = Url::parse(raw.trim())
        .map_err(|e| PresentError::InvalidReference(format!("not a valid URL: {e}")))?;

    let video_id = extract_video_id(parsed.as_str()).ok_or_else(|| {
        PresentError::InvalidReference(format!("no recognizable video id in {raw}"))
    })?;

    Ok(MediaDescriptor {
        kind: MediaKind::EmbeddedVideo,
        source: SourceLocation::Url(parsed.into()),
        duration_ms,
        label: Some(format!("YouTube Video: {video_id}")),
        origin,
        handle: None,
    })
}
