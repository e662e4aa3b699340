//! core/presenter/backend.rs
//! Per-media-kind presentation strategies behind one contract:
//! `present` resolves with the item's timing or rejects with a
//! `PresentError`; `pause`/`resume`/`stop` are no-ops where a backend
//! has nothing to drive.
//!
//! - Image: decode proves loadability; timing is the declared duration.
//! - VideoFile: symphonia probes the real length (overwriting whatever
//!   the descriptor declared); audio plays through a rodio sink when an
//!   output device exists, otherwise a silent playback clock stands in.
//!   This is the one backend that signals its own natural end.
//! - EmbeddedVideo: resolves immediately; elapsed time is always a
//!   wall-clock estimate, and pausing only pauses our bookkeeping, not
//!   the remote player.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::{Duration, Instant};

use log::{debug, warn};
use rodio::mixer::Mixer;
use rodio::{Decoder, Sink};
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::{MediaSourceStream, MediaSourceStreamOptions};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::units::TimeBase;

use crate::core::embed::extract_video_id;
use crate::core::error::PresentError;
use crate::core::types::{EMBED_DURATION_MS, MediaDescriptor, MediaKind};

pub(crate) struct ResolvedTiming {
    pub duration_ms: u64,
    pub start: Instant,
}

pub(crate) enum Backend {
    Image(ImageBackend),
    Video(VideoBackend),
    Embed(EmbedBackend),
}

impl Backend {
    pub fn present(
        descriptor: &MediaDescriptor,
        mixer: Option<&Mixer>,
        now: Instant,
    ) -> Result<(Self, ResolvedTiming), PresentError> {
        match descriptor.kind {
            MediaKind::Image => {
                ImageBackend::present(descriptor, now).map(|(b, t)| (Backend::Image(b), t))
            }
            MediaKind::VideoFile => {
                VideoBackend::present(descriptor, mixer, now).map(|(b, t)| (Backend::Video(b), t))
            }
            MediaKind::EmbeddedVideo => {
                EmbedBackend::present(descriptor, now).map(|(b, t)| (Backend::Embed(b), t))
            }
        }
    }

    pub fn pause(&mut self, now: Instant) {
        match self {
            Backend::Video(v) => v.pause(now),
            Backend::Image(_) | Backend::Embed(_) => {}
        }
    }

    pub fn resume(&mut self, now: Instant) {
        match self {
            Backend::Video(v) => v.resume(now),
            Backend::Image(_) | Backend::Embed(_) => {}
        }
    }

    pub fn stop(&mut self) {
        match self {
            Backend::Video(v) => v.stop(),
            Backend::Image(_) | Backend::Embed(_) => {}
        }
    }

    /// Native playback position; `None` for backends whose elapsed time
    /// the engine derives from its own wall clock.
    pub fn position_ms(&self, now: Instant) -> Option<u64> {
        match self {
            Backend::Video(v) => Some(v.position_ms(now)),
            Backend::Image(_) | Backend::Embed(_) => None,
        }
    }

    /// Natural-end signal. Only video files end themselves; everything
    /// else is advanced by the boundary timer.
    pub fn finished(&self, now: Instant) -> bool {
        match self {
            Backend::Video(v) => v.finished(now),
            Backend::Image(_) | Backend::Embed(_) => false,
        }
    }

    pub fn embed_id(&self) -> Option<&str> {
        match self {
            Backend::Embed(e) => Some(&e.video_id),
            Backend::Image(_) | Backend::Video(_) => None,
        }
    }
}

pub(crate) struct ImageBackend;

impl ImageBackend {
    fn present(
        descriptor: &MediaDescriptor,
        now: Instant,
    ) -> Result<(Self, ResolvedTiming), PresentError> {
        let path = descriptor
            .path()
            .ok_or_else(|| PresentError::LoadFailure("image has no local source".into()))?;

        decode_check(path)?;

        Ok((
            ImageBackend,
            ResolvedTiming {
                duration_ms: descriptor.duration_ms,
                start: now,
            },
        ))
    }
}

/// Full decode, not just a header sniff: a truncated or corrupt file must
/// reject here so the failure policy can evict or skip it.
fn decode_check(path: &Path) -> Result<(), PresentError> {
    let reader = image::ImageReader::open(path)
        .map_err(|e| PresentError::LoadFailure(format!("open failed: {e}")))?
        .with_guessed_format()
        .map_err(|e| PresentError::LoadFailure(format!("format sniff failed: {e}")))?;

    reader
        .decode()
        .map_err(|e| PresentError::LoadFailure(format!("decode failed: {e}")))?;

    Ok(())
}

pub(crate) struct VideoBackend {
    sink: Option<Sink>,
    duration_ms: u64,
    clock: PlaybackClock,
}

impl VideoBackend {
    fn present(
        descriptor: &MediaDescriptor,
        mixer: Option<&Mixer>,
        now: Instant,
    ) -> Result<(Self, ResolvedTiming), PresentError> {
        let path = descriptor
            .path()
            .ok_or_else(|| PresentError::LoadFailure("video has no local source".into()))?;

        // Metadata first: the true media length replaces the descriptor's.
        let duration_ms = probe_duration_ms(path)?;

        let sink = match mixer {
            Some(mixer) => match start_audio(path, mixer) {
                Ok(sink) => Some(sink),
                Err(e) => {
                    warn!("{}: audio unavailable, presenting silent: {e}", path.display());
                    None
                }
            },
            None => None,
        };

        Ok((
            Self {
                sink,
                duration_ms,
                clock: PlaybackClock::started_at(now),
            },
            ResolvedTiming {
                duration_ms,
                start: now,
            },
        ))
    }

    fn pause(&mut self, now: Instant) {
        if let Some(sink) = &self.sink {
            sink.pause();
        }
        self.clock.pause(now);
    }

    fn resume(&mut self, now: Instant) {
        if let Some(sink) = &self.sink {
            sink.play();
        }
        self.clock.resume(now);
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }

    fn position_ms(&self, now: Instant) -> u64 {
        match &self.sink {
            Some(sink) => sink.get_pos().as_millis() as u64,
            None => self.clock.position(now).as_millis() as u64,
        }
    }

    fn finished(&self, now: Instant) -> bool {
        match &self.sink {
            Some(sink) => sink.empty(),
            None => self.clock.position(now).as_millis() as u64 >= self.duration_ms,
        }
    }
}

pub(crate) struct EmbedBackend {
    video_id: String,
}

impl EmbedBackend {
    fn present(
        descriptor: &MediaDescriptor,
        now: Instant,
    ) -> Result<(Self, ResolvedTiming), PresentError> {
        let url = descriptor
            .url()
            .ok_or_else(|| PresentError::InvalidReference("embedded item has no URL".into()))?;

        let video_id = extract_video_id(url).ok_or_else(|| {
            PresentError::InvalidReference(format!("no recognizable video id in {url}"))
        })?;

        let duration_ms = if descriptor.duration_ms > 0 {
            descriptor.duration_ms
        } else {
            EMBED_DURATION_MS
        };

        debug!("embedding video {video_id} for {duration_ms}ms");

        Ok((
            Self { video_id },
            ResolvedTiming {
                duration_ms,
                start: now,
            },
        ))
    }
}

/// Accumulated play time, excluding paused spans. Stands in for a native
/// position when no audio device is driving the sink.
struct PlaybackClock {
    resumed_at: Option<Instant>,
    accumulated: Duration,
}

impl PlaybackClock {
    fn started_at(now: Instant) -> Self {
        Self {
            resumed_at: Some(now),
            accumulated: Duration::ZERO,
        }
    }

    fn pause(&mut self, now: Instant) {
        if let Some(at) = self.resumed_at.take() {
            self.accumulated += now.saturating_duration_since(at);
        }
    }

    fn resume(&mut self, now: Instant) {
        if self.resumed_at.is_none() {
            self.resumed_at = Some(now);
        }
    }

    fn position(&self, now: Instant) -> Duration {
        let running = self
            .resumed_at
            .map(|at| now.saturating_duration_since(at))
            .unwrap_or(Duration::ZERO);
        self.accumulated + running
    }
}

/// Probe the container for its playable length in milliseconds.
fn probe_duration_ms(path: &Path) -> Result<u64, PresentError> {
    let file = File::open(path).map_err(|e| PresentError::LoadFailure(format!("open failed: {e}")))?;
    let mss = MediaSourceStream::new(Box::new(file), MediaSourceStreamOptions::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| PresentError::LoadFailure(format!("container probe failed: {e}")))?;

    let track = probed
        .format
        .default_track()
        .ok_or_else(|| PresentError::LoadFailure("no playable track in container".into()))?
        .codec_params
        .clone();

    let duration_ms = duration_from_params(track.time_base, track.n_frames)
        .ok_or_else(|| PresentError::LoadFailure("media length unknown".into()))?;

    if duration_ms == 0 {
        return Err(PresentError::LoadFailure("media reports zero length".into()));
    }

    Ok(duration_ms)
}

fn duration_from_params(time_base: Option<TimeBase>, n_frames: Option<u64>) -> Option<u64> {
    let tb = time_base?;
    let frames = n_frames?;

    let t = tb.calc_time(frames);
    // Time is { seconds: u64, frac: f64 } in symphonia 0.5.x.
    Some(((t.seconds as f64) * 1000.0 + t.frac * 1000.0).round() as u64)
}

/// Decode the file's audio through rodio. Best-effort: a video without a
/// decodable audio track presents silently instead of failing.
fn start_audio(path: &Path, mixer: &Mixer) -> Result<Sink, String> {
    let file = File::open(path).map_err(|e| format!("open failed: {e}"))?;
    let reader = BufReader::new(file);

    let decoder = Decoder::new(reader).map_err(|e| format!("audio decode failed: {e}"))?;

    let sink = Sink::connect_new(mixer);
    sink.append(decoder);
    sink.play();

    Ok(sink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::core::presenter::testutil::{png_bytes, temp_file, wav_bytes};
    use crate::core::types::{MediaDescriptor, Origin, SourceLocation};

    #[test]
    fn probe_measures_wav_duration() {
        // 4000 frames at 8 kHz -> exactly 500 ms.
        let file = temp_file(&wav_bytes(4_000, 8_000), ".wav");
        assert_eq!(probe_duration_ms(file.path()).unwrap(), 500);
    }

    #[test]
    fn probe_rejects_garbage() {
        let file = temp_file(b"definitely not a media container", ".wav");
        assert!(matches!(
            probe_duration_ms(file.path()),
            Err(PresentError::LoadFailure(_))
        ));
    }

    #[test]
    fn silent_video_tracks_position_and_end() {
        let file = temp_file(&wav_bytes(4_000, 8_000), ".wav");
        let descriptor = MediaDescriptor::bundled_video(file.path());

        let t0 = Instant::now();
        let (mut video, timing) = VideoBackend::present(&descriptor, None, t0).unwrap();
        assert_eq!(timing.duration_ms, 500);

        assert_eq!(video.position_ms(t0 + Duration::from_millis(250)), 250);
        assert!(!video.finished(t0 + Duration::from_millis(250)));
        assert!(video.finished(t0 + Duration::from_millis(600)));

        // Paused spans do not advance the silent clock.
        video.pause(t0 + Duration::from_millis(300));
        video.resume(t0 + Duration::from_millis(900));
        assert_eq!(video.position_ms(t0 + Duration::from_millis(1_000)), 400);
        assert!(!video.finished(t0 + Duration::from_millis(1_000)));
    }

    #[test]
    fn image_decode_failure_rejects() {
        let file = temp_file(b"not an image", ".png");
        let descriptor = MediaDescriptor::bundled_image(file.path(), 5_000);

        assert!(matches!(
            Backend::present(&descriptor, None, Instant::now()),
            Err(PresentError::LoadFailure(_))
        ));
    }

    #[test]
    fn image_present_resolves_with_declared_duration() {
        let file = temp_file(&png_bytes(), ".png");

        let descriptor = MediaDescriptor::bundled_image(file.path(), 7_500);
        let (_, timing) = Backend::present(&descriptor, None, Instant::now()).unwrap();
        assert_eq!(timing.duration_ms, 7_500);
    }

    #[test]
    fn embed_resolves_immediately_with_default_duration() {
        let descriptor = MediaDescriptor {
            kind: MediaKind::EmbeddedVideo,
            source: SourceLocation::Url("https://youtu.be/dQw4w9WgXcQ".into()),
            duration_ms: 0,
            label: None,
            origin: Origin::Bundled,
            handle: None,
        };

        let (backend, timing) = Backend::present(&descriptor, None, Instant::now()).unwrap();
        assert_eq!(timing.duration_ms, EMBED_DURATION_MS);
        assert_eq!(backend.embed_id(), Some("dQw4w9WgXcQ"));
    }
}
