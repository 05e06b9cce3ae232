use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::Clear;

use crate::centered_rect;
use crate::theme;
use crate::ui::text::{key_hint_height, key_hint_paragraph, wrapped_paragraph};

pub(crate) struct ModalSpec<'a> {
    pub(crate) title: &'a str,
    pub(crate) title_style: Option<Style>,
    pub(crate) body: Text<'a>,
    pub(crate) key_hint: Option<&'a str>,
    pub(crate) width_pct: u16,
    pub(crate) height_pct: u16,
}

pub(crate) struct ModalRenderResult {
    pub(crate) body_area: Rect,
}

pub(crate) fn render_modal(frame: &mut Frame<'_>, spec: ModalSpec<'_>) -> ModalRenderResult {
    let area = centered_rect(spec.width_pct, spec.height_pct, frame.area());
    let title = match spec.title_style {
        Some(style) => Line::from(Span::styled(spec.title.to_string(), style)),
        None => Line::from(spec.title.to_string()),
    };
    let mut body_area = area;
    let key_area = spec.key_hint.map(|key_hint| {
        let footer_height = key_hint_height(area.width, key_hint);
        choose_key_area(frame.area(), area, footer_height).unwrap_or_else(|| {
            let [inner_body, inner_key] = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(3), Constraint::Length(footer_height)])
                .areas(area);
            body_area = inner_body;
            inner_key
        })
    });

    frame.render_widget(Clear, body_area);
    frame.render_widget(
        wrapped_paragraph(spec.body).block(theme::chrome(title)),
        body_area,
    );

    if let (Some(key_hint), Some(key_area)) = (spec.key_hint, key_area) {
        frame.render_widget(Clear, key_area);
        frame.render_widget(
            key_hint_paragraph(key_hint).block(theme::key_block()),
            key_area,
        );
    }

    ModalRenderResult { body_area }
}

fn choose_key_area(screen: Rect, body: Rect, footer_height: u16) -> Option<Rect> {
    let screen_top = screen.y;
    let screen_bottom = screen.y.saturating_add(screen.height);
    let below_y = body.y.saturating_add(body.height);
    if below_y.saturating_add(footer_height) <= screen_bottom {
        return Some(Rect::new(body.x, below_y, body.width, footer_height));
    }

    let above_y = body.y.saturating_sub(footer_height);
    if above_y >= screen_top {
        return Some(Rect::new(body.x, above_y, body.width, footer_height));
    }

    None
}

pub(crate) fn render_error_modal(
    frame: &mut Frame<'_>,
    message: &str,
    width_pct: u16,
    height_pct: u16,
    footer: &str,
) {
    render_modal(
        frame,
        ModalSpec {
            title: "Error",
            title_style: Some(theme::error_prompt()),
            body: text_from_message(message),
            key_hint: Some(footer),
            width_pct,
            height_pct,
        },
    );
}

/// Blocking browser-style alert drawn over everything else.
pub(crate) fn render_alert_modal(frame: &mut Frame<'_>, message: &str) {
    render_modal(
        frame,
        ModalSpec {
            title: "Alert",
            title_style: Some(theme::warning_text()),
            body: text_from_message(message),
            key_hint: Some("Enter/Esc: OK"),
            width_pct: 56,
            height_pct: 24,
        },
    );
}

pub(crate) fn text_from_message(message: &str) -> Text<'static> {
    let base = message.trim_end();
    let lines: Vec<Line<'static>> = if base.is_empty() {
        vec![Line::from("")]
    } else {
        base.lines()
            .map(|line| Line::from(line.to_string()))
            .collect()
    };
    Text::from(lines)
}
