//! core/presenter/mod.rs
//! Presenter core module: the command/event contract and the engine
//! bootstrap. The GUI never touches backends or timers directly — all
//! control flows through `PresenterCommand`, all feedback through
//! `PresenterEvent`.

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

mod backend;
mod engine;
mod progress;
#[cfg(test)]
pub(crate) mod testutil;

pub use engine::PresenterEngine;

use crate::core::error::PresentError;
use crate::core::types::{MediaDescriptor, MediaKind};

#[derive(Clone)]
pub struct PresenterHandle {
    command_tx: Sender<PresenterCommand>,
}

impl PresenterHandle {
    /// Best-effort send. If the engine died, the command is dropped.
    pub fn send(&self, cmd: PresenterCommand) {
        let _ = self.command_tx.send(cmd);
    }
}

#[derive(Debug)]
pub enum PresenterCommand {
    Start,
    Stop,
    Pause,
    Resume,
    Next,
    Previous,

    SetPlaylist(Vec<MediaDescriptor>),
    Append(MediaDescriptor),
    AppendMany(Vec<MediaDescriptor>),

    /// Maintenance sweep: purge operator items, fall back to the seed
    /// list when nothing remains.
    ClearEphemeral,

    /// Posted by a boundary sleeper when a timed item's display duration
    /// elapses. Ignored unless `generation` still matches.
    BoundaryElapsed { generation: u64 },

    Shutdown,
}

#[derive(Debug, Clone)]
pub enum PresenterEvent {
    /// An item began presenting. `index` is 1-based for display.
    Started {
        index: usize,
        total: usize,
        kind: MediaKind,
        label: String,
        source: Option<PathBuf>,
        embed_id: Option<String>,
        duration_ms: u64,
    },
    /// The cursor moved without (necessarily) presenting.
    PositionChanged { index: usize, total: usize },
    PlaylistChanged { total: usize },
    Paused,
    Resumed,
    Stopped,
    /// Elapsed/total ratio, clamped to `[0, 100]`.
    Progress { percent: f32 },
    Failure(FailureNotice),
}

/// Structured failure notification for toast display.
#[derive(Debug, Clone)]
pub struct FailureNotice {
    pub kind: FailureKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Load,
    InvalidReference,
    Io,
}

impl FailureNotice {
    pub fn from_error(error: &PresentError) -> Self {
        let kind = match error {
            PresentError::LoadFailure(_) | PresentError::EmptyPlaylist => FailureKind::Load,
            PresentError::InvalidReference(_) => FailureKind::InvalidReference,
            PresentError::PermissionDenied(_) | PresentError::Io(_) => FailureKind::Io,
        };

        Self {
            kind,
            message: error.to_string(),
        }
    }
}

/// Spawns the presenter thread and returns:
/// - `PresenterHandle` (store in GUI state)
/// - `Receiver<PresenterEvent>` (drain from the GUI tick)
pub fn start_presenter(seed: Vec<MediaDescriptor>) -> (PresenterHandle, Receiver<PresenterEvent>) {
    let (command_tx, command_rx) = mpsc::channel::<PresenterCommand>();
    let (event_tx, event_rx) = mpsc::channel::<PresenterEvent>();

    let engine_tx = command_tx.clone();
    thread::spawn(move || {
        let mut engine = PresenterEngine::new(seed, engine_tx, event_tx);
        engine.run(command_rx);
    });

    (PresenterHandle { command_tx }, event_rx)
}
