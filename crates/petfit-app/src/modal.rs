use std::sync::Arc;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::{Duration, Instant};

use petfit_core::config::StyleConfig;
use petfit_core::page::PageContext;
use petfit_core::pet_panel::{PanelError, PetSelectionPanel};
use petfit_core::progress::{ProgressSimulator, ProgressState};
use petfit_core::request::{FittingInput, FittingRequest, ProductContext, UploadImage};
use petfit_core::response::{DEFAULT_FAILURE_MESSAGE, FittingResult};
use petfit_core::size_picker::SizePicker;

use crate::loader::{FittingLoader, FittingSettled};

pub const PRODUCT_SIZE_INPUT_ID: &str = "product-size";
pub const AI_SIZE_INPUT_ID: &str = "ai-size";

pub const LOGIN_REQUIRED_ALERT: &str = "Login required!";
pub const MISSING_BREED_ALERT: &str = "Please enter the dog breed!";
pub const MISSING_PHOTO_ALERT: &str = "Please select a photo!";
pub const NETWORK_FAILURE_ALERT: &str = "An error occurred during AI processing.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalScreen {
    Closed,
    PetSelect,
    ManualUpload,
    Loading,
    Result,
    ErrorDisplay,
}

impl ModalScreen {
    pub fn label(self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::PetSelect => "pet_select",
            Self::ManualUpload => "manual_upload",
            Self::Loading => "loading",
            Self::Result => "result",
            Self::ErrorDisplay => "error_display",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalEvent {
    ScreenChanged(ModalScreen),
    Alert(String),
    NavigateToLogin { url: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageTone {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledMessage {
    pub text: String,
    pub tone: MessageTone,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultContent {
    pub image_url: Option<String>,
    pub message: StyledMessage,
    pub elapsed: Option<Duration>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    NoPetSelected,
    PetWithoutImage,
    MissingBreed,
    MissingPhoto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Submitted { token: u64 },
    Rejected(Rejection),
    Ignored,
}

#[derive(Debug, Clone, Default)]
pub struct ManualForm {
    pub breed: String,
    pub photo: Option<UploadImage>,
}

#[derive(Debug, Clone)]
pub struct ControllerSettings {
    pub style: StyleConfig,
    pub login_url: String,
    pub progress_interval: Duration,
}

struct PendingRequest {
    token: u64,
    receiver: Receiver<FittingSettled>,
    started_at: Instant,
}

/// Headless state machine behind the fitting dialog. Front ends call the
/// input methods, drive `on_tick` from their event loop and render from the
/// read accessors; side effects they must perform come out of
/// `drain_events`.
pub struct ModalController {
    page: PageContext,
    settings: ControllerSettings,
    loader: Arc<dyn FittingLoader>,
    screen: ModalScreen,
    idle_screen: ModalScreen,
    pets: PetSelectionPanel,
    product_size: SizePicker,
    ai_size: SizePicker,
    form: ManualForm,
    result: Option<ResultContent>,
    progress: ProgressSimulator,
    pending: Option<PendingRequest>,
    active_token: Option<u64>,
    next_token: u64,
    session_ended: bool,
    events: Vec<ModalEvent>,
}

impl ModalController {
    pub fn new(
        page: PageContext,
        settings: ControllerSettings,
        loader: Arc<dyn FittingLoader>,
    ) -> Self {
        let progress = ProgressSimulator::new(settings.progress_interval);
        Self::with_progress(page, settings, loader, progress)
    }

    pub fn with_progress(
        page: PageContext,
        settings: ControllerSettings,
        loader: Arc<dyn FittingLoader>,
        progress: ProgressSimulator,
    ) -> Self {
        let pets = PetSelectionPanel::new(page.pets.clone());
        let product_size = SizePicker::new(
            page.sizes.options.clone(),
            page.sizes.product.as_deref(),
            Some(PRODUCT_SIZE_INPUT_ID),
        );
        let ai_size = SizePicker::new(
            page.sizes.options.clone(),
            page.sizes.ai_fit.as_deref(),
            Some(AI_SIZE_INPUT_ID),
        );

        Self {
            page,
            settings,
            loader,
            screen: ModalScreen::Closed,
            idle_screen: ModalScreen::ManualUpload,
            pets,
            product_size,
            ai_size,
            form: ManualForm::default(),
            result: None,
            progress,
            pending: None,
            active_token: None,
            next_token: 1,
            session_ended: false,
            events: Vec::new(),
        }
    }

    pub fn open(&mut self) -> ModalScreen {
        if self.session_ended {
            tracing::debug!("ignoring open after login redirect");
            return self.screen;
        }
        if self.screen != ModalScreen::Closed {
            return self.screen;
        }

        self.idle_screen = if self.page.has_pet_list() {
            ModalScreen::PetSelect
        } else {
            ModalScreen::ManualUpload
        };
        self.enter(self.idle_screen);
        self.screen
    }

    /// Close control and outside click both land here.
    pub fn close(&mut self) {
        if self.screen == ModalScreen::Closed {
            return;
        }
        self.enter(ModalScreen::Closed);
    }

    pub fn select_pet(&mut self, pet_id: &str) -> Result<(), PanelError> {
        self.pets.select(pet_id)
    }

    pub fn pets_mut(&mut self) -> &mut PetSelectionPanel {
        &mut self.pets
    }

    pub fn click_product_size(&mut self, index: usize) -> Option<String> {
        self.product_size.click(index).map(str::to_string)
    }

    pub fn click_ai_size(&mut self, index: usize) -> Option<String> {
        self.ai_size.click(index).map(str::to_string)
    }

    pub fn product_size_mut(&mut self) -> &mut SizePicker {
        &mut self.product_size
    }

    pub fn ai_size_mut(&mut self) -> &mut SizePicker {
        &mut self.ai_size
    }

    /// AI-fit size when chosen, otherwise the product size.
    pub fn effective_size(&self) -> Option<String> {
        self.ai_size
            .value()
            .or_else(|| self.product_size.value())
            .map(str::to_string)
    }

    pub fn set_breed(&mut self, breed: impl Into<String>) {
        self.form.breed = breed.into();
    }

    pub fn set_photo(&mut self, photo: UploadImage) {
        self.form.photo = Some(photo);
    }

    pub fn clear_photo(&mut self) {
        self.form.photo = None;
    }

    pub fn start_profile(&mut self, now: Instant) -> StartOutcome {
        if self.screen != ModalScreen::PetSelect {
            return StartOutcome::Ignored;
        }

        let selection = self.pets.current();
        let Some(pet_id) = selection.selected_pet_id else {
            self.pets.show_warning();
            return StartOutcome::Rejected(Rejection::NoPetSelected);
        };
        if !selection.selected_has_image {
            self.pets.show_warning();
            return StartOutcome::Rejected(Rejection::PetWithoutImage);
        }

        self.begin_loading(FittingInput::Profile { pet_id }, now)
    }

    pub fn submit_manual(&mut self, now: Instant) -> StartOutcome {
        if self.screen != ModalScreen::ManualUpload {
            return StartOutcome::Ignored;
        }

        let breed = self.form.breed.trim().to_string();
        if breed.is_empty() {
            self.alert(MISSING_BREED_ALERT);
            return StartOutcome::Rejected(Rejection::MissingBreed);
        }
        let Some(image) = self.form.photo.clone() else {
            self.alert(MISSING_PHOTO_ALERT);
            return StartOutcome::Rejected(Rejection::MissingPhoto);
        };

        let size = self.effective_size();
        self.begin_loading(FittingInput::Manual { image, breed, size }, now)
    }

    pub fn back_to_input(&mut self) {
        if matches!(self.screen, ModalScreen::Result | ModalScreen::ErrorDisplay) {
            self.enter(self.idle_screen);
        }
    }

    pub fn on_tick(&mut self, now: Instant) {
        if self.screen == ModalScreen::Loading {
            self.progress.on_tick(now);
        }

        let Some(pending) = &self.pending else {
            return;
        };

        let settled = match pending.receiver.try_recv() {
            Ok(settled) => settled,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => FittingSettled {
                token: pending.token,
                result: FittingResult::NetworkFailure {
                    reason: "fitting worker exited without a response".to_string(),
                },
            },
        };
        self.apply_settled(settled, now);
    }

    /// Applies a settled response. Responses whose token is not the active
    /// one belong to an interaction that was closed and are dropped.
    pub fn apply_settled(&mut self, settled: FittingSettled, now: Instant) {
        if Some(settled.token) != self.active_token {
            tracing::debug!(
                token = settled.token,
                outcome = settled.result.label(),
                "dropping stale fitting response"
            );
            return;
        }

        let elapsed = self
            .pending
            .take()
            .map(|pending| now.saturating_duration_since(pending.started_at));
        self.active_token = None;
        self.progress.stop();

        tracing::info!(
            token = settled.token,
            outcome = settled.result.label(),
            "fitting response applied"
        );

        match settled.result {
            FittingResult::AuthRequired => {
                self.alert(LOGIN_REQUIRED_ALERT);
                self.events.push(ModalEvent::NavigateToLogin {
                    url: self.settings.login_url.clone(),
                });
                self.session_ended = true;
                self.enter(ModalScreen::Closed);
            }
            FittingResult::ImageRequired => {
                self.idle_screen = ModalScreen::ManualUpload;
                self.enter(ModalScreen::ManualUpload);
            }
            FittingResult::Success {
                result_image_url,
                message,
            } => {
                self.enter(ModalScreen::Result);
                self.result = Some(ResultContent {
                    image_url: result_image_url,
                    message: StyledMessage {
                        text: message,
                        tone: MessageTone::Success,
                    },
                    elapsed,
                });
            }
            FittingResult::Failure {
                result_image_url,
                message,
            } => {
                self.enter(ModalScreen::ErrorDisplay);
                self.result = Some(ResultContent {
                    image_url: result_image_url,
                    message: StyledMessage {
                        text: message.unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string()),
                        tone: MessageTone::Error,
                    },
                    elapsed,
                });
            }
            FittingResult::NetworkFailure { reason } => {
                tracing::warn!(reason = %reason, "fitting request failed in transport");
                self.alert(NETWORK_FAILURE_ALERT);
                self.enter(self.idle_screen);
            }
        }
    }

    pub fn drain_events(&mut self) -> Vec<ModalEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn screen(&self) -> ModalScreen {
        self.screen
    }

    /// The single visible dialog region, if any.
    pub fn visible_region(&self) -> Option<ModalScreen> {
        (self.screen != ModalScreen::Closed).then_some(self.screen)
    }

    pub fn result(&self) -> Option<&ResultContent> {
        self.result.as_ref()
    }

    pub fn progress(&self) -> ProgressState {
        self.progress.state()
    }

    pub fn pets(&self) -> &PetSelectionPanel {
        &self.pets
    }

    pub fn product_size(&self) -> &SizePicker {
        &self.product_size
    }

    pub fn ai_size(&self) -> &SizePicker {
        &self.ai_size
    }

    pub fn form(&self) -> &ManualForm {
        &self.form
    }

    pub fn page(&self) -> &PageContext {
        &self.page
    }

    pub fn active_token(&self) -> Option<u64> {
        self.active_token
    }

    pub fn session_ended(&self) -> bool {
        self.session_ended
    }

    fn begin_loading(&mut self, input: FittingInput, now: Instant) -> StartOutcome {
        let request = FittingRequest {
            product: self.page.product.as_ref().map(|product| ProductContext {
                image_url: product.image_url.clone(),
                name: product.name.clone(),
                size: self.effective_size(),
            }),
            input,
            style: self.settings.style.clone(),
        };

        let token = self.next_token;
        self.next_token = self.next_token.saturating_add(1);
        self.active_token = Some(token);

        tracing::info!(token, input = request.input.kind_label(), "starting fitting request");
        let receiver = self.loader.spawn_submit(request, token);
        self.pending = Some(PendingRequest {
            token,
            receiver,
            started_at: now,
        });

        self.enter(ModalScreen::Loading);
        self.progress.start(now);
        StartOutcome::Submitted { token }
    }

    fn enter(&mut self, next: ModalScreen) {
        self.result = None;

        match next {
            ModalScreen::Closed => {
                self.form = ManualForm::default();
                self.progress.reset();
                self.pending = None;
                self.active_token = None;
            }
            ModalScreen::PetSelect => self.pets.ensure_default(),
            ModalScreen::ManualUpload
            | ModalScreen::Loading
            | ModalScreen::Result
            | ModalScreen::ErrorDisplay => {}
        }

        if self.screen != next {
            tracing::debug!(from = self.screen.label(), to = next.label(), "modal screen change");
        }
        self.screen = next;
        self.events.push(ModalEvent::ScreenChanged(next));
    }

    fn alert(&mut self, message: &str) {
        self.events.push(ModalEvent::Alert(message.to_string()));
    }
}
