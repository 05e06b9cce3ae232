use petfit_core::progress::ProgressState;
use ratatui::Frame;
use ratatui::layout::{Margin, Rect};
use ratatui::text::{Line, Text};
use ratatui::widgets::Gauge;

use crate::theme;
use crate::ui::modal::{ModalSpec, render_modal};

const WAIT_MESSAGE: &str = "AI is fitting the garment, please wait";

pub(crate) fn progress_label(state: ProgressState) -> String {
    format!("{}%", state.value.min(100))
}

pub(crate) fn render_progress_modal(
    frame: &mut Frame<'_>,
    title: &str,
    state: ProgressState,
    key_hint: &str,
    width_pct: u16,
    height_pct: u16,
) {
    let body = Text::from(vec![Line::from(""), Line::from(WAIT_MESSAGE)]);
    let rendered = render_modal(
        frame,
        ModalSpec {
            title,
            title_style: Some(theme::focus_prompt()),
            body,
            key_hint: Some(key_hint),
            width_pct,
            height_pct,
        },
    );

    let inner = rendered.body_area.inner(Margin {
        vertical: 1,
        horizontal: 2,
    });
    if inner.height < 4 || inner.width == 0 {
        return;
    }

    let gauge_area = Rect::new(inner.x, inner.y + 3, inner.width, 1);
    let gauge = Gauge::default()
        .gauge_style(theme::progress_bar())
        .percent(u16::from(state.value.min(100)))
        .label(progress_label(state));
    frame.render_widget(gauge, gauge_area);
}
