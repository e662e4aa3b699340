//! The GUI renderer.
//! This file does not mutate state: it reads `&Marquee` and produces
//! widgets. The stage fills the window; chrome overlays below it and can
//! be hidden for an uninterrupted loop.

use iced::widget::{Column, button, column, container, image, mouse_area, progress_bar, row, text, text_input};
use iced::{Alignment, Element, Length};

use super::state::{Marquee, Message, NowShowing};
use super::util::fmt_duration;
use marquee::core::types::MediaKind;

pub(crate) fn view(state: &Marquee) -> Column<'_, Message> {
    let stage = mouse_area(build_stage(state)).on_press(Message::RevealChrome);

    let progress = progress_bar(0.0..=100.0, state.progress);

    let mut page = column![stage, progress].spacing(8).padding(8);

    if state.show_chrome {
        page = page.push(build_chrome(state));

        if state.show_add_panel {
            page = page.push(build_add_panel(state));
        }

        page = page.push(text(&state.status).size(14));
    }

    page
}

fn build_stage(state: &Marquee) -> Element<'_, Message> {
    let inner: Element<'_, Message> = match &state.current {
        Some(now) => stage_content(now),
        None => text("Nothing to show yet").size(24).into(),
    };

    container(inner)
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
}

fn stage_content(now: &NowShowing) -> Element<'_, Message> {
    match now.kind {
        MediaKind::Image => match &now.image {
            Some(handle) => image(handle.clone())
                .width(Length::Fill)
                .height(Length::Fill)
                .into(),
            None => text(format!("⚠ {}", now.label)).size(24).into(),
        },
        MediaKind::VideoFile => column![
            text("🎞").size(64),
            text(&now.label).size(24),
            text(fmt_duration(now.duration_ms)).size(16),
        ]
        .spacing(12)
        .align_x(Alignment::Center)
        .into(),
        MediaKind::EmbeddedVideo => {
            let id = now.embed_id.as_deref().unwrap_or("?");
            column![
                text("▶").size(64),
                text(&now.label).size(24),
                text(format!("embedded player · {id}")).size(16),
            ]
            .spacing(12)
            .align_x(Alignment::Center)
            .into()
        }
    }
}

fn build_chrome(state: &Marquee) -> iced::widget::Row<'_, Message> {
    let prev_btn = button("⏮").on_press(Message::Previous);

    let play_label = if state.is_playing && !state.is_paused {
        "Pause"
    } else {
        "Play"
    };
    let play_btn = button(play_label).on_press(Message::TogglePlayPause);

    let next_btn = button("⏭").on_press(Message::Next);
    let stop_btn = button("⏹").on_press(Message::StopPressed);

    let position = text(format!("{} / {}", state.current_index, state.total)).size(16);

    let add_btn = button("Add media").on_press(Message::ToggleAddPanel);
    let sweep_btn = button("Clear session").on_press(Message::ClearEphemeral);
    let hide_btn = button("Hide").on_press(Message::HideChrome);

    row![
        row![prev_btn, play_btn, next_btn, stop_btn]
            .spacing(8)
            .align_y(Alignment::Center),
        position,
        row![add_btn, sweep_btn, hide_btn]
            .spacing(8)
            .align_y(Alignment::Center),
    ]
    .spacing(16)
    .align_y(Alignment::Center)
}

fn build_add_panel(state: &Marquee) -> Column<'_, Message> {
    let url_input = text_input("YouTube URL", &state.url_input)
        .on_input(Message::UrlInputChanged)
        .on_submit(Message::AddUrlPressed)
        .width(Length::Fill);

    let url_row = row![url_input, button("Add URL").on_press(Message::AddUrlPressed)].spacing(8);

    let path_input = text_input("Local image or video path", &state.path_input)
        .on_input(Message::PathInputChanged)
        .on_submit(Message::AddPathPressed)
        .width(Length::Fill);

    let path_row = row![path_input, button("Add file").on_press(Message::AddPathPressed)].spacing(8);

    column![url_row, path_row].spacing(8)
}
