//! gui/util.rs
//! Small helpers shared by the GUI modules.

use std::path::Path;

use marquee::core::types::MediaKind;

const VIDEO_EXTENSIONS: &[&str] = &["mp4", "m4v", "mov", "mkv", "webm", "avi"];

/// File-picker type tag: video by extension, image otherwise.
pub(crate) fn media_kind_for_path(path: &Path) -> MediaKind {
    let is_video = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            VIDEO_EXTENSIONS
                .iter()
                .any(|v| ext.eq_ignore_ascii_case(v))
        });

    if is_video {
        MediaKind::VideoFile
    } else {
        MediaKind::Image
    }
}

pub(crate) fn fmt_duration(ms: u64) -> String {
    let s = ms / 1000;
    let m = s / 60;
    let s = s % 60;
    format!("{m}:{s:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_tagging_is_case_insensitive() {
        assert_eq!(media_kind_for_path(Path::new("a.MP4")), MediaKind::VideoFile);
        assert_eq!(media_kind_for_path(Path::new("b.png")), MediaKind::Image);
        assert_eq!(media_kind_for_path(Path::new("noext")), MediaKind::Image);
    }

    #[test]
    fn durations_format_as_minutes_seconds() {
        assert_eq!(fmt_duration(0), "0:00");
        assert_eq!(fmt_duration(61_000), "1:01");
    }
}
