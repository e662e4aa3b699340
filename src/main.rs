//! Marquee
//!
//! A full-screen continuous media presenter: an ordered playlist of
//! images, local video files, and embedded third-party video, looping
//! indefinitely, with transport controls and runtime additions.
//!
//! # Architecture
//! - `marquee::core::presenter` owns the playback state machine: which
//!   item is current, how long it stays up, advance/wraparound,
//!   pause/resume arithmetic, and recovery from per-item load failures.
//!   It runs on its own thread and talks to the GUI only through
//!   command/event channels.
//! - `marquee::core::playlist` owns the ordered media list and releases
//!   the transient storage behind operator uploads on every removal path.
//! - `gui` is an iced shell: it renders mirrored engine state and sends
//!   commands. It makes no playback decisions.
//!
//! The engine is constructed and owned explicitly (no globals); the GUI
//! creates it lazily on its first tick and keeps the handle in state.

mod gui;

use gui::Marquee;

fn main() -> iced::Result {
    env_logger::init();

    iced::application(Marquee::default, gui::update, gui::view)
        .subscription(gui::subscription)
        .title("Marquee")
        .run()
}
