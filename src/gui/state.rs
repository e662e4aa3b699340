//! GUI state + messages.
//! Pure data definitions used by update.rs + view.rs.

use std::cell::RefCell;
use std::sync::mpsc::Receiver;

use marquee::core::presenter::{PresenterEvent, PresenterHandle};
use marquee::core::types::MediaKind;

/// What is currently on stage, as far as the GUI knows.
pub(crate) struct NowShowing {
    pub kind: MediaKind,
    pub label: String,
    /// Decoded handle for images; `None` for the other kinds.
    pub image: Option<iced::widget::image::Handle>,
    pub embed_id: Option<String>,
    pub duration_ms: u64,
}

/// App state
pub(crate) struct Marquee {
    pub status: String,

    // Engine plumbing (created lazily on the first tick)
    pub presenter: Option<PresenterHandle>,
    pub presenter_events: Option<RefCell<Receiver<PresenterEvent>>>,

    // Mirrored playback state
    pub current: Option<NowShowing>,
    pub current_index: usize, // 1-based for display
    pub total: usize,
    pub is_playing: bool,
    pub is_paused: bool,
    pub progress: f32, // 0..=100

    // Chrome
    pub show_chrome: bool,
    pub show_add_panel: bool,
    pub url_input: String,
    pub path_input: String,
}

impl Default for Marquee {
    fn default() -> Self {
        Self {
            status: "Starting the loop…".to_string(),

            presenter: None,
            presenter_events: None,

            current: None,
            current_index: 0,
            total: 0,
            is_playing: false,
            is_paused: false,
            progress: 0.0,

            show_chrome: true,
            show_add_panel: false,
            url_input: String::new(),
            path_input: String::new(),
        }
    }
}

/// Message = "something happened".
#[derive(Debug, Clone)]
pub(crate) enum Message {
    /// 100 ms heartbeat: drain engine events.
    Tick,

    // Transport
    TogglePlayPause,
    StopPressed,
    Next,
    Previous,

    // Chrome
    RevealChrome,
    HideChrome,
    ToggleAddPanel,

    // Add media
    UrlInputChanged(String),
    AddUrlPressed,
    PathInputChanged(String),
    AddPathPressed,

    // Maintenance
    ClearEphemeral,
}
