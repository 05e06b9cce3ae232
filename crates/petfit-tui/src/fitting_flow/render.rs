use petfit_app::{MessageTone, ModalScreen, ResultContent};
use petfit_core::time::elapsed_label;
use ratatui::layout::{Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span, Text};
use tui_input::Input;

use super::{DIALOG_HEIGHT_PCT, DIALOG_WIDTH_PCT, FittingFlow, ManualField};
use crate::theme;
use crate::ui::modal::{ModalSpec, render_alert_modal, render_modal};
use crate::ui::progress::render_progress_modal;
use crate::ui::text::{
    compact_hint, focus_line, key_hint_height, key_hint_paragraph, label_value_line,
    size_row_line, wrapped_paragraph,
};

const BREED_LABEL: &str = "Breed: ";
const PHOTO_LABEL: &str = "Photo: ";

impl FittingFlow {
    pub(super) fn render(&self, frame: &mut ratatui::Frame<'_>) {
        self.render_page(frame);

        match self.controller.screen() {
            ModalScreen::Closed => {}
            ModalScreen::PetSelect => self.render_pet_select(frame),
            ModalScreen::ManualUpload => self.render_manual_upload(frame),
            ModalScreen::Loading => render_progress_modal(
                frame,
                "AI fitting",
                self.controller.progress(),
                "Esc: cancel",
                DIALOG_WIDTH_PCT,
                DIALOG_HEIGHT_PCT,
            ),
            ModalScreen::Result => {
                if let Some(result) = self.controller.result() {
                    render_result(frame, "Fitting result", theme::success_prompt(), result);
                }
            }
            ModalScreen::ErrorDisplay => {
                if let Some(result) = self.controller.result() {
                    render_result(frame, "Fitting failed", theme::error_prompt(), result);
                }
            }
        }

        if let Some(message) = self.alerts.front() {
            render_alert_modal(frame, message);
        }
    }

    fn render_page(&self, frame: &mut ratatui::Frame<'_>) {
        let area = frame.area();
        let key_text = if self.controller.session_ended() {
            "Redirecting to login"
        } else {
            compact_hint(
                area.width,
                "f: try it on my dog    Left/Right or h/l: size    Space/s: choose size    Esc/q: exit",
                "f: fit    h/l: size    s: choose    q: exit",
                "f fit | h/l size | s choose | q exit",
            )
        };
        let footer_height = key_hint_height(area.width, key_text);
        let [header, body, footer] = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(6),
                Constraint::Length(footer_height),
            ])
            .areas(area);

        let title = wrapped_paragraph(focus_line("petfit")).block(theme::chrome("Shop"));
        frame.render_widget(title, header);

        let page = self.controller.page();
        let mut lines = Vec::new();
        match &page.product {
            Some(product) => {
                lines.push(label_value_line("Product", product.name.clone()));
                lines.push(label_value_line("Image", product.image_url.clone()));
            }
            None => lines.push(Line::from(Span::styled(
                "No product on this page",
                theme::secondary_text(),
            ))),
        }
        lines.push(Line::from(""));
        lines.push(size_row_line(
            "Size",
            self.controller.product_size(),
            self.controller.screen() == ModalScreen::Closed,
        ));
        lines.push(Line::from(""));
        lines.push(label_value_line(
            "Saved pets",
            page.pets.len().to_string(),
        ));

        let product = wrapped_paragraph(Text::from(lines)).block(theme::chrome("Product"));
        frame.render_widget(product, body);

        let hints = key_hint_paragraph(key_text).block(theme::key_block());
        frame.render_widget(hints, footer);
    }

    fn render_pet_select(&self, frame: &mut ratatui::Frame<'_>) {
        let pets = self.controller.pets();
        let mut lines = vec![focus_line("Choose the pet to dress"), Line::from("")];

        for (index, profile) in pets.profiles().iter().enumerate() {
            let marker = if pets.is_active(index) { "(*)" } else { "( )" };
            let mut spans = vec![Span::raw(format!("{marker} {}", profile.display_name()))];
            if !profile.has_image {
                spans.push(Span::styled("  no photo", theme::secondary_text()));
            }
            let line = Line::from(spans);
            lines.push(if index == pets.cursor() {
                line.style(theme::list_highlight())
            } else {
                line
            });
        }

        if pets.warning_visible() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "This pet has no photo. Register one in the pet profile first.",
                theme::warning_text(),
            )));
        }

        lines.push(Line::from(""));
        lines.push(size_row_line("AI size", self.controller.ai_size(), true));

        let key_hint = compact_hint(
            frame.area().width,
            "Enter: start fitting    Up/Down: move    Space: select pet    h/l + s: AI size    Esc: close",
            "Enter: fit    j/k: move    Space: pick    h/l s: size    Esc: close",
            "Enter fit | Space pick | Esc close",
        );
        render_modal(
            frame,
            ModalSpec {
                title: "Try it on my dog",
                title_style: Some(theme::focus_prompt()),
                body: Text::from(lines),
                key_hint: Some(key_hint),
                width_pct: DIALOG_WIDTH_PCT,
                height_pct: DIALOG_HEIGHT_PCT,
            },
        );
    }

    fn render_manual_upload(&self, frame: &mut ratatui::Frame<'_>) {
        let form = self.controller.form();
        let photo_status = match &form.photo {
            Some(photo) => format!("loaded {} ({})", photo.file_name, photo.mime_type),
            None => "not loaded yet".to_string(),
        };

        let lines = vec![
            focus_line("Upload a photo of your dog"),
            Line::from(""),
            field_line(BREED_LABEL, &self.breed_input, self.manual_field == ManualField::Breed),
            field_line(PHOTO_LABEL, &self.photo_input, self.manual_field == ManualField::Photo),
            Line::from(Span::styled(
                format!("       {photo_status}"),
                theme::secondary_text(),
            )),
            Line::from(""),
            size_row_line(
                "AI size",
                self.controller.ai_size(),
                self.manual_field == ManualField::Size,
            ),
        ];

        let key_hint = compact_hint(
            frame.area().width,
            "Enter: start fitting    Tab/Shift+Tab: next field    h/l + Space: AI size    Esc: close",
            "Enter: fit    Tab: field    h/l Space: size    Esc: close",
            "Enter fit | Tab field | Esc close",
        );
        let rendered = render_modal(
            frame,
            ModalSpec {
                title: "Try it on my dog",
                title_style: Some(theme::focus_prompt()),
                body: Text::from(lines),
                key_hint: Some(key_hint),
                width_pct: DIALOG_WIDTH_PCT,
                height_pct: DIALOG_HEIGHT_PCT,
            },
        );

        let focused = match self.manual_field {
            ManualField::Breed => Some((&self.breed_input, BREED_LABEL, 2)),
            ManualField::Photo => Some((&self.photo_input, PHOTO_LABEL, 3)),
            ManualField::Size => None,
        };
        if let Some((input, label, row)) = focused
            && self.alerts.is_empty()
        {
            place_cursor(frame, rendered.body_area, input, label, row);
        }
    }
}

fn field_line(label: &'static str, input: &Input, focused: bool) -> Line<'static> {
    let label_style = if focused {
        theme::focus_prompt()
    } else {
        theme::secondary_text()
    };
    Line::from(vec![
        Span::styled(label, label_style),
        Span::raw(input.value().to_string()),
    ])
}

fn place_cursor(
    frame: &mut ratatui::Frame<'_>,
    body_area: Rect,
    input: &Input,
    label: &str,
    row: u16,
) {
    let inner = body_area.inner(Margin {
        vertical: 1,
        horizontal: 1,
    });
    if inner.height <= row || inner.width == 0 {
        return;
    }

    let label_width = label.chars().count() as u16;
    let max_x = inner.x.saturating_add(inner.width.saturating_sub(1));
    let x = inner
        .x
        .saturating_add(label_width)
        .saturating_add(input.visual_cursor() as u16)
        .min(max_x);
    frame.set_cursor_position((x, inner.y + row));
}

fn render_result(
    frame: &mut ratatui::Frame<'_>,
    title: &str,
    title_style: Style,
    result: &ResultContent,
) {
    let mut lines = Vec::new();
    if let Some(image_url) = &result.image_url {
        lines.push(label_value_line("Result image", image_url.clone()));
        lines.push(Line::from(""));
    }

    let message_style = match result.message.tone {
        MessageTone::Success => theme::success_prompt(),
        MessageTone::Error => theme::error_prompt(),
    };
    for line in result.message.text.lines() {
        lines.push(Line::from(Span::styled(line.to_string(), message_style)));
    }

    if let Some(elapsed) = result.elapsed {
        lines.push(Line::from(""));
        lines.push(label_value_line("Took", elapsed_label(elapsed)));
    }

    render_modal(
        frame,
        ModalSpec {
            title,
            title_style: Some(title_style),
            body: Text::from(lines),
            key_hint: Some("Enter: try again    Esc: close"),
            width_pct: DIALOG_WIDTH_PCT,
            height_pct: DIALOG_HEIGHT_PCT,
        },
    );
}
