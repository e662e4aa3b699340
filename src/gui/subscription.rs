//! gui/subscription.rs
//! Periodic ticks + keyboard transport.
//!
//! - 100 ms tick: drain engine events (progress, advances, failures).
//! - 30 min tick: maintenance sweep of operator-supplied media.
//! - Arrow keys / space / escape mirror the on-screen controls.

use std::time::Duration;

use iced::keyboard::{self, key};
use iced::{Subscription, time};

use super::state::{Marquee, Message};

const SWEEP_INTERVAL: Duration = Duration::from_secs(30 * 60);

// The tick must always run (it bootstraps the engine on first fire), so
// nothing here depends on state yet.
pub(crate) fn subscription(_state: &Marquee) -> Subscription<Message> {
    Subscription::batch([
        time::every(Duration::from_millis(100)).map(|_| Message::Tick),
        time::every(SWEEP_INTERVAL).map(|_| Message::ClearEphemeral),
        keyboard::on_key_press(handle_key),
    ])
}

fn handle_key(key: keyboard::Key, _modifiers: keyboard::Modifiers) -> Option<Message> {
    match key {
        keyboard::Key::Named(key::Named::ArrowLeft) => Some(Message::Previous),
        keyboard::Key::Named(key::Named::ArrowRight) => Some(Message::Next),
        keyboard::Key::Named(key::Named::Space) => Some(Message::TogglePlayPause),
        keyboard::Key::Named(key::Named::Escape) => Some(Message::HideChrome),
        _ => None,
    }
}
