//! core/presenter/engine.rs
//! Playback state machine (presenter owner).
//!
//! Owns:
//! - the PlaylistStore and playback phase
//! - the active backend for the current item
//! - boundary timers and the 100 ms progress tick
//!
//! Runs on its own thread: a command loop with a tick timeout, the same
//! shape as a single-threaded event loop. Boundary timers are detached
//! sleepers that post `BoundaryElapsed { generation }` back into the
//! command channel; every state transition bumps the generation, so a
//! late firing from a superseded item can never touch the current one.

use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, warn};
use rodio::{OutputStream, OutputStreamBuilder};

use super::backend::Backend;
use super::progress;
use super::{FailureNotice, PresenterCommand, PresenterEvent};
use crate::core::error::PresentError;
use crate::core::playlist::PlaylistStore;
use crate::core::types::{MediaDescriptor, MediaKind, Origin};

const TICK_MS: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlaybackPhase {
    Stopped,
    Playing,
    /// Temporary suspension; only reachable from `Playing`.
    Paused,
}

/// Bookkeeping for the armed boundary sleeper.
struct PendingBoundary {
    generation: u64,
    after: Duration,
}

pub struct PresenterEngine {
    playlist: PlaylistStore,
    /// Bundled fallback for the maintenance sweep.
    seed: Vec<MediaDescriptor>,

    phase: PlaybackPhase,
    backend: Option<Backend>,
    item_started: Instant,
    item_duration_ms: u64,
    /// Elapsed time captured at the moment of pause, so paused wall time
    /// never counts against the item.
    paused_elapsed: Option<Duration>,

    boundary: Option<PendingBoundary>,
    generation: u64,

    /// Set when the engine stopped because it ran out of items, so
    /// repopulation can restart playback on its own.
    auto_stopped: bool,

    // Keep the stream alive for the engine's lifetime.
    audio: Option<OutputStream>,

    command_tx: Sender<PresenterCommand>,
    event_tx: Sender<PresenterEvent>,
}

impl PresenterEngine {
    pub fn new(
        seed: Vec<MediaDescriptor>,
        command_tx: Sender<PresenterCommand>,
        event_tx: Sender<PresenterEvent>,
    ) -> Self {
        let mut playlist = PlaylistStore::new();
        playlist.set_all(seed.clone());

        Self {
            playlist,
            seed,
            phase: PlaybackPhase::Stopped,
            backend: None,
            item_started: Instant::now(),
            item_duration_ms: 0,
            paused_elapsed: None,
            boundary: None,
            generation: 0,
            auto_stopped: false,
            audio: None,
            command_tx,
            event_tx,
        }
    }

    pub fn run(&mut self, command_rx: Receiver<PresenterCommand>) {
        self.init_audio();

        let tick = Duration::from_millis(TICK_MS);

        loop {
            match command_rx.recv_timeout(tick) {
                Ok(cmd) => {
                    if self.handle(cmd, Instant::now()) {
                        break;
                    }
                    while let Ok(cmd) = command_rx.try_recv() {
                        if self.handle(cmd, Instant::now()) {
                            return;
                        }
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }

            self.tick(Instant::now());
        }

        self.stop(false);
    }

    /// Process one command. Returns true on shutdown.
    fn handle(&mut self, cmd: PresenterCommand, now: Instant) -> bool {
        match cmd {
            PresenterCommand::Start => self.start(now),
            PresenterCommand::Stop => self.stop(false),
            PresenterCommand::Pause => self.pause(now),
            PresenterCommand::Resume => self.resume(now),
            PresenterCommand::Next => self.advance_next(now),
            PresenterCommand::Previous => self.advance_previous(now),
            PresenterCommand::SetPlaylist(items) => self.set_playlist(items, now),
            PresenterCommand::Append(item) => self.append_one(item, now),
            PresenterCommand::AppendMany(items) => {
                for item in items {
                    self.append_one(item, now);
                }
            }
            PresenterCommand::ClearEphemeral => self.clear_ephemeral(now),
            PresenterCommand::BoundaryElapsed { generation } => {
                self.boundary_elapsed(generation, now);
            }
            PresenterCommand::Shutdown => {
                self.stop(false);
                return true;
            }
        }

        false
    }

    /// Periodic work while playing: poll the natural-end signal and emit
    /// progress. Paused and stopped phases emit nothing, so a stale ratio
    /// can never be reported for a since-replaced item.
    fn tick(&mut self, now: Instant) {
        if self.phase != PlaybackPhase::Playing {
            return;
        }
        let Some(backend) = &self.backend else {
            return;
        };

        if backend.finished(now) {
            debug!("item signalled its natural end");
            self.advance_next(now);
            return;
        }

        let percent = match backend.position_ms(now) {
            // Video: native position over native length.
            Some(position_ms) => progress::percent(position_ms, self.item_duration_ms),
            // Image/embed: wall clock over declared duration.
            None => {
                let elapsed_ms =
                    now.saturating_duration_since(self.item_started).as_millis() as u64;
                progress::percent(elapsed_ms, self.item_duration_ms)
            }
        };

        self.emit(PresenterEvent::Progress { percent });
    }

    fn start(&mut self, now: Instant) {
        if self.playlist.is_empty() {
            warn!("start requested: {}", PresentError::EmptyPlaylist);
            self.auto_stopped = true;
            return;
        }

        self.phase = PlaybackPhase::Playing;
        self.paused_elapsed = None;
        self.auto_stopped = false;
        self.present_current(now);
    }

    fn stop(&mut self, auto: bool) {
        self.bump_generation();
        if let Some(mut backend) = self.backend.take() {
            backend.stop();
        }
        self.paused_elapsed = None;
        self.auto_stopped = auto;

        if self.phase != PlaybackPhase::Stopped {
            self.phase = PlaybackPhase::Stopped;
            self.emit(PresenterEvent::Stopped);
        }
    }

    fn pause(&mut self, now: Instant) {
        if self.phase != PlaybackPhase::Playing {
            return;
        }

        self.phase = PlaybackPhase::Paused;
        self.bump_generation();
        self.paused_elapsed = Some(now.saturating_duration_since(self.item_started));

        if let Some(backend) = &mut self.backend {
            backend.pause(now);
        }

        self.emit(PresenterEvent::Paused);
    }

    fn resume(&mut self, now: Instant) {
        if self.phase != PlaybackPhase::Paused {
            return;
        }
        self.phase = PlaybackPhase::Playing;

        if self.backend.is_none() {
            // The cursor moved while paused; nothing is on stage yet.
            self.paused_elapsed = None;
            self.emit(PresenterEvent::Resumed);
            self.present_current(now);
            return;
        }

        if matches!(self.backend, Some(Backend::Video(_))) {
            // Native playback picks up where it left off; the end signal
            // is still pending, so no re-timer.
            if let Some(backend) = &mut self.backend {
                backend.resume(now);
            }
            self.paused_elapsed = None;
            self.emit(PresenterEvent::Resumed);
            return;
        }

        let elapsed = self.paused_elapsed.take().unwrap_or(Duration::ZERO);
        let remaining = Duration::from_millis(self.item_duration_ms).saturating_sub(elapsed);

        if remaining.is_zero() {
            // Paused through expiry: the item already finished.
            self.emit(PresenterEvent::Resumed);
            self.advance_next(now);
        } else {
            self.item_started = now - elapsed;
            self.schedule_boundary(remaining);
            self.emit(PresenterEvent::Resumed);
        }
    }

    fn advance_next(&mut self, now: Instant) {
        let len = self.playlist.len();
        if len == 0 {
            warn!("advance requested on an empty playlist");
            return;
        }

        let next = (self.playlist.current_index() + 1) % len;
        self.move_to(next, now);
    }

    fn advance_previous(&mut self, now: Instant) {
        let len = self.playlist.len();
        if len == 0 {
            warn!("advance requested on an empty playlist");
            return;
        }

        let index = self.playlist.current_index();
        let previous = if index == 0 { len - 1 } else { index - 1 };
        self.move_to(previous, now);
    }

    /// Move the cursor; present the new item only while playing.
    fn move_to(&mut self, index: usize, now: Instant) {
        self.bump_generation();
        if let Some(mut backend) = self.backend.take() {
            backend.stop();
        }
        self.paused_elapsed = None;

        self.playlist.set_current_index(index);
        self.emit(PresenterEvent::PositionChanged {
            index: index + 1,
            total: self.playlist.len(),
        });

        if self.phase == PlaybackPhase::Playing {
            self.present_current(now);
        }
    }

    fn boundary_elapsed(&mut self, generation: u64, now: Instant) {
        if generation != self.generation {
            debug!("ignoring stale boundary (generation {generation})");
            return;
        }

        if let Some(boundary) = self.boundary.take() {
            debug!(
                "boundary elapsed after {:?} (generation {})",
                boundary.after, boundary.generation
            );
        }

        if self.phase != PlaybackPhase::Playing {
            return;
        }

        self.advance_next(now);
    }

    /// Present whatever the cursor points at, applying the failure policy
    /// until something presents or the lap is exhausted. Iterative on
    /// purpose: eviction and skipping must never recurse.
    fn present_current(&mut self, now: Instant) {
        let mut attempts = 0;

        loop {
            let total = self.playlist.len();
            if total == 0 {
                warn!("presentation halted: {}", PresentError::EmptyPlaylist);
                self.stop(true);
                return;
            }
            if attempts >= total {
                warn!("every playlist item failed to present; stopping");
                self.stop(true);
                return;
            }

            let index = self.playlist.current_index();
            let Some(descriptor) = self.playlist.current().cloned() else {
                self.playlist.set_current_index(0);
                continue;
            };

            // Cancel anything a previous attempt may have armed.
            self.bump_generation();

            let mixer = self.audio.as_ref().map(|stream| stream.mixer());
            match Backend::present(&descriptor, mixer, now) {
                Ok((backend, timing)) => {
                    if descriptor.kind == MediaKind::VideoFile
                        && timing.duration_ms != descriptor.duration_ms
                    {
                        self.playlist.set_measured_duration(index, timing.duration_ms);
                    }

                    self.item_started = timing.start;
                    self.item_duration_ms = timing.duration_ms;
                    self.paused_elapsed = None;

                    match descriptor.kind {
                        MediaKind::Image | MediaKind::EmbeddedVideo => {
                            self.schedule_boundary(Duration::from_millis(timing.duration_ms));
                        }
                        // Video files signal their own end; no timer.
                        MediaKind::VideoFile => {}
                    }

                    debug!(
                        "presenting {}/{}: {} ({:?}, {}ms)",
                        index + 1,
                        total,
                        descriptor.display_name(),
                        descriptor.kind,
                        timing.duration_ms
                    );

                    self.emit(PresenterEvent::Started {
                        index: index + 1,
                        total,
                        kind: descriptor.kind,
                        label: descriptor.display_name(),
                        source: descriptor.path().map(|p| p.to_path_buf()),
                        embed_id: backend.embed_id().map(|s| s.to_string()),
                        duration_ms: timing.duration_ms,
                    });

                    self.backend = Some(backend);
                    return;
                }
                Err(error) => {
                    attempts += 1;
                    warn!("{} failed to present: {error}", descriptor.display_name());
                    self.emit(PresenterEvent::Failure(FailureNotice::from_error(&error)));

                    let evict = descriptor.origin == Origin::Operator
                        && descriptor
                            .handle
                            .as_ref()
                            .is_some_and(|handle| !handle.is_released());

                    if evict {
                        // Broken uploads are gone for good; the store
                        // releases the handle. Retry whatever now occupies
                        // the (re-clamped) slot.
                        self.playlist.remove_at(index);
                        self.emit(PresenterEvent::PlaylistChanged {
                            total: self.playlist.len(),
                        });
                    } else {
                        // Bundled items are durable: skip once, never evict.
                        let len = self.playlist.len();
                        let next = (index + 1) % len;
                        self.playlist.set_current_index(next);
                        self.emit(PresenterEvent::PositionChanged {
                            index: next + 1,
                            total: len,
                        });
                    }
                }
            }
        }
    }

    fn set_playlist(&mut self, items: Vec<MediaDescriptor>, now: Instant) {
        self.bump_generation();
        if let Some(mut backend) = self.backend.take() {
            backend.stop();
        }
        self.paused_elapsed = None;

        self.playlist.set_all(items);
        let total = self.playlist.len();

        self.emit(PresenterEvent::PlaylistChanged { total });
        self.emit(PresenterEvent::PositionChanged {
            index: if total == 0 { 0 } else { 1 },
            total,
        });

        match self.phase {
            PlaybackPhase::Playing => {
                if total > 0 {
                    self.present_current(now);
                } else {
                    self.stop(true);
                }
            }
            PlaybackPhase::Stopped => {
                if self.auto_stopped && total > 0 {
                    self.start(now);
                }
            }
            // The fresh current item presents on resume.
            PlaybackPhase::Paused => {}
        }
    }

    fn append_one(&mut self, item: MediaDescriptor, now: Instant) {
        self.playlist.append(item);
        self.emit(PresenterEvent::PlaylistChanged {
            total: self.playlist.len(),
        });

        // An engine that stopped for lack of items restarts on its own.
        if self.phase == PlaybackPhase::Stopped && self.auto_stopped {
            self.start(now);
        }
    }

    /// Maintenance sweep: purge operator items and their handles; fall
    /// back to the bundled seed and restart when nothing remains.
    fn clear_ephemeral(&mut self, now: Instant) {
        debug!("maintenance sweep: purging operator media");

        self.bump_generation();
        if let Some(mut backend) = self.backend.take() {
            backend.stop();
        }
        self.paused_elapsed = None;

        self.playlist.retain_bundled();
        self.emit(PresenterEvent::PlaylistChanged {
            total: self.playlist.len(),
        });

        if self.playlist.is_empty() {
            self.playlist.set_all(self.seed.clone());
            self.emit(PresenterEvent::PlaylistChanged {
                total: self.playlist.len(),
            });
            self.phase = PlaybackPhase::Stopped;
            self.start(now);
            return;
        }

        self.emit(PresenterEvent::PositionChanged {
            index: self.playlist.current_index() + 1,
            total: self.playlist.len(),
        });

        if self.phase == PlaybackPhase::Playing {
            self.present_current(now);
        }
    }

    fn schedule_boundary(&mut self, after: Duration) {
        let generation = self.generation;
        self.boundary = Some(PendingBoundary { generation, after });

        let tx = self.command_tx.clone();
        thread::spawn(move || {
            thread::sleep(after);
            // Best-effort: if the engine is gone the firing is dropped.
            let _ = tx.send(PresenterCommand::BoundaryElapsed { generation });
        });
    }

    /// Invalidate every armed timer and in-flight progress emission.
    fn bump_generation(&mut self) {
        self.generation += 1;
        self.boundary = None;
    }

    fn init_audio(&mut self) {
        match OutputStreamBuilder::open_default_stream() {
            Ok(stream) => self.audio = Some(stream),
            Err(e) => warn!("no audio output, video files will present silently: {e}"),
        }
    }

    fn emit(&self, event: PresenterEvent) {
        let _ = self.event_tx.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    use crate::core::presenter::testutil::{png_bytes, temp_file, wav_bytes};
    use crate::core::types::MediaDescriptor;

    fn engine_with(seed: Vec<MediaDescriptor>) -> (PresenterEngine, mpsc::Receiver<PresenterEvent>) {
        let (command_tx, _command_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        (PresenterEngine::new(seed, command_tx, event_tx), event_rx)
    }

    fn drain(rx: &mpsc::Receiver<PresenterEvent>) -> Vec<PresenterEvent> {
        let mut out = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            out.push(ev);
        }
        out
    }

    fn started_indexes(events: &[PresenterEvent]) -> Vec<usize> {
        events
            .iter()
            .filter_map(|ev| match ev {
                PresenterEvent::Started { index, .. } => Some(*index),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn wraparound_comes_back_to_the_start() {
        let png = temp_file(&png_bytes(), ".png");
        let items: Vec<_> = (0..3)
            .map(|_| MediaDescriptor::bundled_image(png.path(), 5_000))
            .collect();
        let (mut engine, _events) = engine_with(items);

        let t0 = Instant::now();
        engine.handle(PresenterCommand::Start, t0);
        assert_eq!(engine.playlist.current_index(), 0);

        for _ in 0..3 {
            engine.handle(PresenterCommand::Next, t0);
        }
        assert_eq!(engine.playlist.current_index(), 0);
    }

    #[test]
    fn previous_from_zero_wraps_to_last() {
        let png = temp_file(&png_bytes(), ".png");
        let items: Vec<_> = (0..3)
            .map(|_| MediaDescriptor::bundled_image(png.path(), 5_000))
            .collect();
        let (mut engine, _events) = engine_with(items);

        let t0 = Instant::now();
        engine.handle(PresenterCommand::Start, t0);
        engine.handle(PresenterCommand::Previous, t0);
        assert_eq!(engine.playlist.current_index(), 2);
    }

    #[test]
    fn single_item_list_re_presents_itself() {
        let png = temp_file(&png_bytes(), ".png");
        let (mut engine, events) =
            engine_with(vec![MediaDescriptor::bundled_image(png.path(), 5_000)]);

        let t0 = Instant::now();
        engine.handle(PresenterCommand::Start, t0);
        engine.handle(PresenterCommand::Next, t0);
        engine.handle(PresenterCommand::Previous, t0);

        assert_eq!(engine.playlist.current_index(), 0);
        // Presented three times, always as item 1.
        assert_eq!(started_indexes(&drain(&events)), vec![1, 1, 1]);
    }

    #[test]
    fn pause_resume_reschedules_the_remaining_time() {
        let png = temp_file(&png_bytes(), ".png");
        let (mut engine, _events) =
            engine_with(vec![MediaDescriptor::bundled_image(png.path(), 5_000)]);

        let t0 = Instant::now();
        engine.handle(PresenterCommand::Start, t0);
        engine.handle(PresenterCommand::Pause, t0 + Duration::from_millis(2_000));
        assert!(engine.boundary.is_none());

        // Ten seconds paused must not count against the item.
        engine.handle(PresenterCommand::Resume, t0 + Duration::from_millis(12_000));

        let boundary = engine.boundary.as_ref().expect("rescheduled boundary");
        assert_eq!(boundary.after, Duration::from_millis(3_000));
        assert_eq!(boundary.generation, engine.generation);
    }

    #[test]
    fn paused_through_expiry_advances_on_resume() {
        let png = temp_file(&png_bytes(), ".png");
        let items: Vec<_> = (0..2)
            .map(|_| MediaDescriptor::bundled_image(png.path(), 5_000))
            .collect();
        let (mut engine, _events) = engine_with(items);

        let t0 = Instant::now();
        engine.handle(PresenterCommand::Start, t0);
        engine.handle(PresenterCommand::Pause, t0 + Duration::from_millis(6_000));
        engine.handle(PresenterCommand::Resume, t0 + Duration::from_millis(7_000));

        assert_eq!(engine.playlist.current_index(), 1);
        assert_eq!(engine.phase, PlaybackPhase::Playing);
    }

    #[test]
    fn stale_boundary_does_not_double_advance() {
        let png = temp_file(&png_bytes(), ".png");
        let items: Vec<_> = (0..3)
            .map(|_| MediaDescriptor::bundled_image(png.path(), 5_000))
            .collect();
        let (mut engine, _events) = engine_with(items);

        let t0 = Instant::now();
        engine.handle(PresenterCommand::Start, t0);
        let stale = engine.generation;

        engine.handle(PresenterCommand::Next, t0);
        assert_eq!(engine.playlist.current_index(), 1);

        // The superseded item's timer fires late; it must be ignored.
        engine.handle(PresenterCommand::BoundaryElapsed { generation: stale }, t0);
        assert_eq!(engine.playlist.current_index(), 1);
    }

    #[test]
    fn failed_operator_item_is_evicted_and_released() {
        let broken =
            MediaDescriptor::from_operator_bytes("broken.png", b"junk", MediaKind::Image).unwrap();
        let witness = broken.handle.clone().unwrap();
        let good =
            MediaDescriptor::from_operator_bytes("good.png", &png_bytes(), MediaKind::Image)
                .unwrap();

        let (mut engine, events) = engine_with(vec![broken, good]);

        let t0 = Instant::now();
        engine.handle(PresenterCommand::Start, t0);

        assert_eq!(engine.playlist.len(), 1);
        assert_eq!(witness.times_released(), 1);

        let drained = drain(&events);
        assert!(drained.iter().any(|ev| matches!(
            ev,
            PresenterEvent::Failure(notice) if notice.kind == super::super::FailureKind::Load
        )));
        assert!(drained.iter().any(|ev| matches!(
            ev,
            PresenterEvent::Started { label, .. } if label == "good.png"
        )));
    }

    #[test]
    fn failed_bundled_item_is_skipped_not_evicted() {
        let png = temp_file(&png_bytes(), ".png");
        let missing = MediaDescriptor::bundled_image("/nonexistent/missing.png", 5_000);
        let good = MediaDescriptor::bundled_image(png.path(), 5_000);

        let (mut engine, _events) = engine_with(vec![missing, good]);

        let t0 = Instant::now();
        engine.handle(PresenterCommand::Start, t0);

        assert_eq!(engine.playlist.len(), 2);
        assert_eq!(engine.playlist.current_index(), 1);
        assert_eq!(engine.phase, PlaybackPhase::Playing);
    }

    #[test]
    fn a_full_lap_of_failures_stops_cleanly_and_restarts_on_append() {
        let items = vec![
            MediaDescriptor::bundled_image("/nonexistent/a.png", 5_000),
            MediaDescriptor::bundled_image("/nonexistent/b.png", 5_000),
        ];
        let (mut engine, _events) = engine_with(items);

        let t0 = Instant::now();
        engine.handle(PresenterCommand::Start, t0);
        assert_eq!(engine.phase, PlaybackPhase::Stopped);

        let good =
            MediaDescriptor::from_operator_bytes("late.png", &png_bytes(), MediaKind::Image)
                .unwrap();
        engine.handle(PresenterCommand::Append(good), t0);
        assert_eq!(engine.phase, PlaybackPhase::Playing);
    }

    #[test]
    fn empty_start_warns_and_restarts_once_repopulated() {
        let (mut engine, _events) = engine_with(Vec::new());

        let t0 = Instant::now();
        engine.handle(PresenterCommand::Start, t0);
        assert_eq!(engine.phase, PlaybackPhase::Stopped);

        let good =
            MediaDescriptor::from_operator_bytes("first.png", &png_bytes(), MediaKind::Image)
                .unwrap();
        engine.handle(PresenterCommand::Append(good), t0);
        assert_eq!(engine.phase, PlaybackPhase::Playing);
        assert_eq!(engine.playlist.current_index(), 0);
    }

    #[test]
    fn video_file_advances_on_its_own_end_signal() {
        let wav = temp_file(&wav_bytes(4_000, 8_000), ".wav");
        let png = temp_file(&png_bytes(), ".png");
        let items = vec![
            MediaDescriptor::bundled_video(wav.path()),
            MediaDescriptor::bundled_image(png.path(), 5_000),
        ];
        let (mut engine, _events) = engine_with(items);

        let t0 = Instant::now();
        engine.handle(PresenterCommand::Start, t0);
        assert!(engine.boundary.is_none(), "video must not use a boundary timer");
        // The probe overwrites the unknown duration with the real 500 ms.
        assert_eq!(engine.playlist.get(0).unwrap().duration_ms, 500);

        engine.tick(t0 + Duration::from_millis(250));
        assert_eq!(engine.playlist.current_index(), 0);

        engine.tick(t0 + Duration::from_millis(600));
        assert_eq!(engine.playlist.current_index(), 1);
    }

    #[test]
    fn progress_is_emitted_while_playing_and_silenced_when_paused() {
        let png = temp_file(&png_bytes(), ".png");
        let (mut engine, events) =
            engine_with(vec![MediaDescriptor::bundled_image(png.path(), 5_000)]);

        let t0 = Instant::now();
        engine.handle(PresenterCommand::Start, t0);
        drain(&events);

        engine.tick(t0 + Duration::from_millis(1_000));
        let drained = drain(&events);
        assert!(drained.iter().any(|ev| matches!(
            ev,
            PresenterEvent::Progress { percent } if (*percent - 20.0).abs() < 0.01
        )));

        engine.handle(PresenterCommand::Pause, t0 + Duration::from_millis(1_500));
        drain(&events);
        engine.tick(t0 + Duration::from_millis(2_000));
        assert!(
            !drain(&events)
                .iter()
                .any(|ev| matches!(ev, PresenterEvent::Progress { .. }))
        );
    }

    #[test]
    fn stop_cancels_timers_but_keeps_the_playlist() {
        let png = temp_file(&png_bytes(), ".png");
        let items: Vec<_> = (0..2)
            .map(|_| MediaDescriptor::bundled_image(png.path(), 5_000))
            .collect();
        let (mut engine, events) = engine_with(items);

        let t0 = Instant::now();
        engine.handle(PresenterCommand::Start, t0);
        engine.handle(PresenterCommand::Stop, t0);

        assert_eq!(engine.phase, PlaybackPhase::Stopped);
        assert!(engine.boundary.is_none());
        assert_eq!(engine.playlist.len(), 2);
        assert!(
            drain(&events)
                .iter()
                .any(|ev| matches!(ev, PresenterEvent::Stopped))
        );
    }

    #[test]
    fn sweep_falls_back_to_the_seed_and_restarts() {
        let png = temp_file(&png_bytes(), ".png");
        let seed = vec![MediaDescriptor::bundled_image(png.path(), 5_000)];
        let (mut engine, events) = engine_with(seed);

        let upload =
            MediaDescriptor::from_operator_bytes("upload.png", &png_bytes(), MediaKind::Image)
                .unwrap();
        let witness = upload.handle.clone().unwrap();

        let t0 = Instant::now();
        engine.handle(PresenterCommand::SetPlaylist(vec![upload]), t0);
        engine.handle(PresenterCommand::Start, t0);
        drain(&events);

        engine.handle(PresenterCommand::ClearEphemeral, t0);

        assert_eq!(witness.times_released(), 1);
        assert_eq!(engine.playlist.len(), 1);
        assert_eq!(engine.playlist.current_index(), 0);
        assert_eq!(engine.phase, PlaybackPhase::Playing);
        assert_eq!(started_indexes(&drain(&events)), vec![1]);
    }
}
