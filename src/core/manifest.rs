//! core/manifest.rs
//! Seed playlist: an optional JSON manifest next to the binary, with a
//! built-in sample as fallback so the presenter always has something to
//! loop on first launch.

use std::fs;
use std::path::Path;

use log::{debug, error, warn};
use serde::Deserialize;

use crate::core::embed::classify_embed;
use crate::core::error::PresentError;
use crate::core::types::{IMAGE_DURATION_MS, MediaDescriptor, Origin};

pub const MANIFEST_FILE: &str = "marquee.json";

const SAMPLE_EMBED_URL: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";
const SAMPLE_EMBED_DURATION_MS: u64 = 60_000;

/// A bundled clip the presenter picks up when it sits next to the binary.
const BUNDLED_CLIP_FILE: &str = "countdown.mp4";

#[derive(Debug, Deserialize)]
struct Manifest {
    items: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
struct Entry {
    /// "image", "video" or "embed".
    kind: String,
    /// Local path for image/video, watch URL for embed.
    source: String,
    #[serde(default)]
    duration_ms: u64,
    #[serde(default)]
    label: Option<String>,
}

/// The bundled seed list: manifest if present and non-empty, sample
/// otherwise. Never fails; a broken manifest degrades to the sample.
pub fn seed_playlist() -> Vec<MediaDescriptor> {
    let path = Path::new(MANIFEST_FILE);
    if path.is_file() {
        let loaded = fs::read_to_string(path)
            .map_err(|e| format!("read failed: {e}"))
            .and_then(|json| parse_manifest(&json));

        match loaded {
            Ok(items) if !items.is_empty() => {
                debug!("seed playlist: {} item(s) from {MANIFEST_FILE}", items.len());
                return items;
            }
            Ok(_) => warn!("{MANIFEST_FILE} has no usable items, using the sample seed"),
            Err(e) => warn!("could not load {MANIFEST_FILE}: {e}"),
        }
    }

    sample_seed()
}

/// Parse a manifest document. Individually broken entries are skipped
/// with a warning rather than sinking the whole seed.
pub fn parse_manifest(json: &str) -> Result<Vec<MediaDescriptor>, String> {
    let manifest: Manifest =
        serde_json::from_str(json).map_err(|e| format!("manifest parse failed: {e}"))?;

    let mut items = Vec::with_capacity(manifest.items.len());
    for entry in manifest.items {
        match descriptor_from_entry(&entry) {
            Ok(d) => items.push(d),
            Err(e) => warn!("skipping manifest entry {:?}: {e}", entry.source),
        }
    }

    Ok(items)
}

fn descriptor_from_entry(entry: &Entry) -> Result<MediaDescriptor, PresentError> {
    match entry.kind.as_str() {
        "image" => {
            let duration = if entry.duration_ms > 0 {
                entry.duration_ms
            } else {
                IMAGE_DURATION_MS
            };
            Ok(MediaDescriptor::bundled_image(&entry.source, duration)
                .with_label(entry.label.clone()))
        }
        "video" => {
            Ok(MediaDescriptor::bundled_video(&entry.source).with_label(entry.label.clone()))
        }
        "embed" => classify_embed(&entry.source, entry.duration_ms, Origin::Bundled)
            .map(|d| d.with_label(entry.label.clone())),
        other => Err(PresentError::InvalidReference(format!(
            "unknown media kind {other:?}"
        ))),
    }
}

fn sample_seed() -> Vec<MediaDescriptor> {
    let mut items = Vec::new();

    match classify_embed(SAMPLE_EMBED_URL, SAMPLE_EMBED_DURATION_MS, Origin::Bundled) {
        Ok(d) => items.push(d),
        Err(e) => error!("sample embed rejected: {e}"),
    }

    let clip = Path::new(BUNDLED_CLIP_FILE);
    if clip.is_file() {
        debug!("found bundled clip {BUNDLED_CLIP_FILE}");
        items.push(MediaDescriptor::bundled_video(clip));
    }

    items
}
