//! gui/update.rs
//! Update logic (router).
//! Mutates state in response to `Message` events.

use iced::Task;

use super::state::{Marquee, Message};

mod presenter;

pub(crate) fn update(state: &mut Marquee, message: Message) -> Task<Message> {
    match message {
        Message::Tick => presenter::drain_events(state),

        // Transport
        Message::TogglePlayPause => presenter::toggle_play_pause(state),
        Message::StopPressed => presenter::stop(state),
        Message::Next => presenter::next(state),
        Message::Previous => presenter::previous(state),

        // Chrome
        Message::RevealChrome => {
            state.show_chrome = true;
            Task::none()
        }
        Message::HideChrome => {
            state.show_chrome = false;
            state.show_add_panel = false;
            Task::none()
        }
        Message::ToggleAddPanel => {
            state.show_add_panel = !state.show_add_panel;
            Task::none()
        }

        // Add media
        Message::UrlInputChanged(s) => {
            state.url_input = s;
            Task::none()
        }
        Message::AddUrlPressed => presenter::add_embed_url(state),
        Message::PathInputChanged(s) => {
            state.path_input = s;
            Task::none()
        }
        Message::AddPathPressed => presenter::add_local_path(state),

        // Maintenance
        Message::ClearEphemeral => presenter::clear_ephemeral(state),
    }
}
