//! gui/update/presenter.rs
//! GUI-presenter engine bridge.
//!
//! Design goals:
//! - GUI never touches backends, timers, or the playlist directly.
//! - All playback state shown on screen is mirrored from engine events.

use std::cell::RefCell;
use std::path::Path;

use iced::Task;
use log::warn;

use super::super::state::{Marquee, Message, NowShowing};
use super::super::util::media_kind_for_path;
use marquee::core::embed::classify_embed;
use marquee::core::manifest::seed_playlist;
use marquee::core::presenter::{PresenterCommand, PresenterEvent, start_presenter};
use marquee::core::types::{
    EMBED_DURATION_MS, MediaDescriptor, MediaKind, Origin, read_operator_source,
};

fn ensure_engine(state: &mut Marquee) {
    if state.presenter.is_some() && state.presenter_events.is_some() {
        return;
    }

    let (handle, events) = start_presenter(seed_playlist());
    handle.send(PresenterCommand::Start);

    state.presenter = Some(handle);
    state.presenter_events = Some(RefCell::new(events));
}

fn command(state: &mut Marquee, cmd: PresenterCommand) {
    ensure_engine(state);
    if let Some(handle) = &state.presenter {
        handle.send(cmd);
    }
}

pub(crate) fn drain_events(state: &mut Marquee) -> Task<Message> {
    ensure_engine(state);

    let Some(rx_cell) = state.presenter_events.as_ref() else {
        return Task::none();
    };

    let mut drained: Vec<PresenterEvent> = Vec::new();
    {
        // Receiver::try_recv only needs &self, so borrow() is enough.
        let rx = rx_cell.borrow();
        while let Ok(ev) = rx.try_recv() {
            drained.push(ev);
        }
    }

    for ev in drained {
        apply_event(state, ev);
    }

    Task::none()
}

fn apply_event(state: &mut Marquee, event: PresenterEvent) {
    match event {
        PresenterEvent::Started {
            index,
            total,
            kind,
            label,
            source,
            embed_id,
            duration_ms,
        } => {
            state.current_index = index;
            state.total = total;
            state.is_playing = true;
            state.is_paused = false;
            state.progress = 0.0;

            let image = match kind {
                MediaKind::Image => source
                    .as_ref()
                    .map(iced::widget::image::Handle::from_path),
                MediaKind::VideoFile | MediaKind::EmbeddedVideo => None,
            };

            state.status = format!("Now showing: {label}");
            state.current = Some(NowShowing {
                kind,
                label,
                image,
                embed_id,
                duration_ms,
            });
        }
        PresenterEvent::PositionChanged { index, total } => {
            state.current_index = index;
            state.total = total;
        }
        PresenterEvent::PlaylistChanged { total } => state.total = total,
        PresenterEvent::Paused => state.is_paused = true,
        PresenterEvent::Resumed => {
            state.is_playing = true;
            state.is_paused = false;
        }
        PresenterEvent::Stopped => {
            state.is_playing = false;
            state.is_paused = false;
            state.progress = 0.0;
        }
        PresenterEvent::Progress { percent } => state.progress = percent,
        PresenterEvent::Failure(notice) => {
            warn!("presenter failure ({:?}): {}", notice.kind, notice.message);
            state.status = notice.message;
        }
    }
}

pub(crate) fn toggle_play_pause(state: &mut Marquee) -> Task<Message> {
    if state.is_playing && !state.is_paused {
        command(state, PresenterCommand::Pause);
    } else if state.is_paused {
        command(state, PresenterCommand::Resume);
    } else {
        command(state, PresenterCommand::Start);
    }

    Task::none()
}

pub(crate) fn stop(state: &mut Marquee) -> Task<Message> {
    command(state, PresenterCommand::Stop);
    Task::none()
}

pub(crate) fn next(state: &mut Marquee) -> Task<Message> {
    command(state, PresenterCommand::Next);
    Task::none()
}

pub(crate) fn previous(state: &mut Marquee) -> Task<Message> {
    command(state, PresenterCommand::Previous);
    Task::none()
}

pub(crate) fn clear_ephemeral(state: &mut Marquee) -> Task<Message> {
    command(state, PresenterCommand::ClearEphemeral);
    state.status = "Clearing session media…".to_string();
    Task::none()
}

/// Operator URL entry -> embedded-video descriptor.
pub(crate) fn add_embed_url(state: &mut Marquee) -> Task<Message> {
    let input = state.url_input.trim().to_string();
    if input.is_empty() {
        return Task::none();
    }

    match classify_embed(&input, EMBED_DURATION_MS, Origin::Operator) {
        Ok(descriptor) => {
            let label = descriptor.display_name();
            command(state, PresenterCommand::Append(descriptor));
            state.url_input.clear();
            state.show_add_panel = false;
            state.status = format!("Added {label}");
        }
        Err(e) => state.status = e.to_string(),
    }

    Task::none()
}

/// Operator file entry: read the bytes, tag image/video by extension,
/// hand the engine a transient-backed descriptor.
pub(crate) fn add_local_path(state: &mut Marquee) -> Task<Message> {
    let input = state.path_input.trim().to_string();
    if input.is_empty() {
        return Task::none();
    }

    let path = Path::new(&input);
    if !path.is_file() {
        state.status = format!("Not a file: {input}");
        return Task::none();
    }

    let bytes = match read_operator_source(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            state.status = e.to_string();
            return Task::none();
        }
    };

    let label = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| input.clone());

    match MediaDescriptor::from_operator_bytes(label.clone(), &bytes, media_kind_for_path(path)) {
        Ok(descriptor) => {
            command(state, PresenterCommand::Append(descriptor));
            state.path_input.clear();
            state.show_add_panel = false;
            state.status = format!("Added {label}");
        }
        Err(e) => state.status = e.to_string(),
    }

    Task::none()
}
