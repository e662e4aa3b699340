//! Marquee core: playlist data, media classification, and the playback
//! engine behind the full-screen presenter.
//!
//! The binary target wraps this in an iced shell; everything with real
//! state-transition logic, timing arithmetic, or failure-recovery policy
//! lives here and is testable without a window or an audio device.

pub mod core;
