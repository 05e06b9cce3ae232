mod render;

use std::collections::VecDeque;
use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use crossterm::event::{Event, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use petfit_app::{App, ModalController, ModalEvent, ModalScreen};
use petfit_core::page::PageContext;
use petfit_core::request::UploadImage;
use ratatui::layout::{Position, Rect};
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;

use crate::{UiExit, centered_rect, keymap};

pub(crate) const DIALOG_WIDTH_PCT: u16 = 76;
pub(crate) const DIALOG_HEIGHT_PCT: u16 = 60;

pub(crate) trait FittingFlowOps {
    fn load_photo(&self, path: &Path) -> Result<UploadImage>;
}

impl FittingFlowOps for App {
    fn load_photo(&self, path: &Path) -> Result<UploadImage> {
        self.load_upload_image(path)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ManualField {
    Breed,
    Photo,
    Size,
}

impl ManualField {
    fn next(self) -> Self {
        match self {
            Self::Breed => Self::Photo,
            Self::Photo => Self::Size,
            Self::Size => Self::Breed,
        }
    }

    fn previous(self) -> Self {
        match self {
            Self::Breed => Self::Size,
            Self::Photo => Self::Breed,
            Self::Size => Self::Photo,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum FlowSignal {
    Continue,
    Exit(UiExit),
}

struct FittingFlow {
    controller: ModalController,
    breed_input: Input,
    photo_input: Input,
    loaded_photo_path: Option<String>,
    manual_field: ManualField,
    alerts: VecDeque<String>,
    login_url: Option<String>,
}

pub(crate) struct FittingScreen {
    flow: FittingFlow,
}

impl FittingScreen {
    pub(crate) fn new(app: &App, page: PageContext) -> Self {
        Self {
            flow: FittingFlow::new(app.controller(page)),
        }
    }

    pub(crate) fn render(&self, frame: &mut ratatui::Frame<'_>) {
        self.flow.render(frame);
    }

    pub(crate) fn on_key(&mut self, key: KeyEvent, app: &App) -> Result<Option<UiExit>> {
        match self.flow.on_key(key, app)? {
            FlowSignal::Continue => Ok(None),
            FlowSignal::Exit(exit) => Ok(Some(exit)),
        }
    }

    pub(crate) fn on_mouse(&mut self, mouse: MouseEvent, area: Rect) {
        self.flow.on_mouse(mouse, area);
    }

    pub(crate) fn on_tick(&mut self, now: Instant) {
        self.flow.on_tick(now);
    }

    pub(crate) fn pending_exit(&self) -> Option<UiExit> {
        self.flow.pending_exit()
    }
}

impl FittingFlow {
    fn new(controller: ModalController) -> Self {
        Self {
            controller,
            breed_input: Input::default(),
            photo_input: Input::default(),
            loaded_photo_path: None,
            manual_field: ManualField::Breed,
            alerts: VecDeque::new(),
            login_url: None,
        }
    }

    fn on_key(&mut self, key: KeyEvent, ops: &dyn FittingFlowOps) -> Result<FlowSignal> {
        if !self.alerts.is_empty() {
            if keymap::is_confirm(key) || keymap::is_back(key) {
                self.alerts.pop_front();
            }
            return Ok(FlowSignal::Continue);
        }

        let signal = match self.controller.screen() {
            ModalScreen::Closed => self.on_key_page(key),
            ModalScreen::PetSelect => {
                self.on_key_pet_select(key);
                FlowSignal::Continue
            }
            ModalScreen::ManualUpload => {
                let outcome = self.on_key_manual(key, ops);
                self.collect_events();
                outcome?;
                FlowSignal::Continue
            }
            ModalScreen::Loading => {
                if keymap::is_back(key) {
                    self.controller.close();
                }
                FlowSignal::Continue
            }
            ModalScreen::Result | ModalScreen::ErrorDisplay => {
                if keymap::is_back(key) {
                    self.controller.close();
                } else if keymap::is_confirm(key) {
                    self.controller.back_to_input();
                }
                FlowSignal::Continue
            }
        };

        self.collect_events();
        Ok(signal)
    }

    fn on_key_page(&mut self, key: KeyEvent) -> FlowSignal {
        if keymap::is_quit(key) || keymap::is_back(key) {
            return FlowSignal::Exit(UiExit::Completed);
        }

        if keymap::is_open(key) {
            self.controller.open();
        } else if keymap::is_left(key) {
            self.controller.product_size_mut().move_left();
        } else if keymap::is_right(key) {
            self.controller.product_size_mut().move_right();
        } else if keymap::is_toggle(key) || keymap::is_size_click(key) {
            self.controller.product_size_mut().click_cursor();
        }

        FlowSignal::Continue
    }

    fn on_key_pet_select(&mut self, key: KeyEvent) {
        if keymap::is_back(key) {
            self.controller.close();
        } else if keymap::is_confirm(key) {
            self.controller.start_profile(Instant::now());
        } else if keymap::is_up(key) {
            self.controller.pets_mut().move_up();
        } else if keymap::is_down(key) {
            self.controller.pets_mut().move_down();
        } else if keymap::is_toggle(key) {
            self.controller.pets_mut().select_cursor();
        } else if keymap::is_left(key) {
            self.controller.ai_size_mut().move_left();
        } else if keymap::is_right(key) {
            self.controller.ai_size_mut().move_right();
        } else if keymap::is_size_click(key) {
            self.controller.ai_size_mut().click_cursor();
        }
    }

    fn on_key_manual(&mut self, key: KeyEvent, ops: &dyn FittingFlowOps) -> Result<()> {
        if keymap::is_back(key) {
            self.controller.close();
            return Ok(());
        }
        if keymap::is_next_field(key) {
            self.manual_field = self.manual_field.next();
            return Ok(());
        }
        if keymap::is_previous_field(key) {
            self.manual_field = self.manual_field.previous();
            return Ok(());
        }
        if keymap::is_confirm(key) {
            self.sync_photo(ops)?;
            self.controller.submit_manual(Instant::now());
            return Ok(());
        }

        match self.manual_field {
            ManualField::Breed => {
                if self.breed_input.handle_event(&Event::Key(key)).is_some() {
                    self.controller.set_breed(self.breed_input.value());
                }
            }
            ManualField::Photo => {
                self.photo_input.handle_event(&Event::Key(key));
            }
            ManualField::Size => {
                if keymap::is_left(key) {
                    self.controller.ai_size_mut().move_left();
                } else if keymap::is_right(key) {
                    self.controller.ai_size_mut().move_right();
                } else if keymap::is_toggle(key) || keymap::is_size_click(key) {
                    self.controller.ai_size_mut().click_cursor();
                }
            }
        }
        Ok(())
    }

    /// Loads the typed photo path into the form when it changed since the
    /// last successful load. An empty path clears the photo.
    fn sync_photo(&mut self, ops: &dyn FittingFlowOps) -> Result<()> {
        let path = self.photo_input.value().trim().to_string();
        if path.is_empty() {
            self.controller.clear_photo();
            self.loaded_photo_path = None;
            return Ok(());
        }
        if self.loaded_photo_path.as_deref() == Some(path.as_str()) {
            return Ok(());
        }

        match ops.load_photo(Path::new(&path)) {
            Ok(image) => {
                self.controller.set_photo(image);
                self.loaded_photo_path = Some(path);
                Ok(())
            }
            Err(error) => {
                self.controller.clear_photo();
                self.loaded_photo_path = None;
                Err(error)
            }
        }
    }

    fn on_mouse(&mut self, mouse: MouseEvent, area: Rect) {
        if !matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left)) {
            return;
        }
        if !self.alerts.is_empty() || self.controller.visible_region().is_none() {
            return;
        }

        let dialog = centered_rect(DIALOG_WIDTH_PCT, DIALOG_HEIGHT_PCT, area);
        if !dialog.contains(Position::new(mouse.column, mouse.row)) {
            self.controller.close();
            self.collect_events();
        }
    }

    fn on_tick(&mut self, now: Instant) {
        self.controller.on_tick(now);
        self.collect_events();
    }

    fn collect_events(&mut self) {
        for event in self.controller.drain_events() {
            match event {
                ModalEvent::Alert(message) => self.alerts.push_back(message),
                ModalEvent::NavigateToLogin { url } => self.login_url = Some(url),
                ModalEvent::ScreenChanged(ModalScreen::ManualUpload) => {
                    self.manual_field = ManualField::Breed;
                }
                ModalEvent::ScreenChanged(ModalScreen::Closed) => {
                    self.breed_input = Input::default();
                    self.photo_input = Input::default();
                    self.loaded_photo_path = None;
                }
                ModalEvent::ScreenChanged(_) => {}
            }
        }
    }

    /// The login redirect fires once its alert has been acknowledged.
    fn pending_exit(&self) -> Option<UiExit> {
        if !self.alerts.is_empty() {
            return None;
        }
        self.login_url
            .clone()
            .map(|url| UiExit::LoginRedirect { url })
    }
}
