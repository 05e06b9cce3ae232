use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Result, bail};
use petfit_core::page::PageContext;
use petfit_core::request::UploadImage;
use petfit_core::size_picker::SizePicker;

use crate::App;
use crate::modal::{ModalController, ModalEvent, ModalScreen, Rejection, ResultContent, StartOutcome};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FitSource {
    Profile { pet_id: String },
    Manual { photo: PathBuf, breed: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FitRequest {
    pub source: FitSource,
    pub product_size: Option<String>,
    pub ai_size: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FitOutcome {
    pub screen: ModalScreen,
    pub rejection: Option<Rejection>,
    pub result: Option<ResultContent>,
    pub alerts: Vec<String>,
    pub login_url: Option<String>,
}

impl App {
    /// One complete fitting interaction without a terminal UI.
    pub fn fit(&self, page: PageContext, request: &FitRequest) -> Result<FitOutcome> {
        let photo = match &request.source {
            FitSource::Manual { photo, .. } => Some(self.load_upload_image(photo)?),
            FitSource::Profile { .. } => None,
        };
        let mut controller = self.controller(page);
        drive_fit(
            &mut controller,
            request,
            photo,
            self.config.progress.interval(),
        )
    }
}

pub fn drive_fit(
    controller: &mut ModalController,
    request: &FitRequest,
    photo: Option<UploadImage>,
    poll: Duration,
) -> Result<FitOutcome> {
    if let Some(size) = &request.product_size {
        let index = size_index(controller.product_size(), size)?;
        controller.click_product_size(index);
    }
    if let Some(size) = &request.ai_size {
        let index = size_index(controller.ai_size(), size)?;
        controller.click_ai_size(index);
    }

    let screen = controller.open();
    let outcome = match &request.source {
        FitSource::Profile { pet_id } => {
            if screen != ModalScreen::PetSelect {
                bail!("page has no saved pet profiles; use --photo and --breed instead");
            }
            controller.select_pet(pet_id)?;
            controller.start_profile(Instant::now())
        }
        FitSource::Manual { breed, .. } => {
            if screen != ModalScreen::ManualUpload {
                bail!("page offers saved pet profiles; use --pet instead");
            }
            controller.set_breed(breed.as_str());
            if let Some(photo) = photo {
                controller.set_photo(photo);
            }
            controller.submit_manual(Instant::now())
        }
    };

    let rejection = match outcome {
        StartOutcome::Rejected(rejection) => Some(rejection),
        StartOutcome::Submitted { .. } | StartOutcome::Ignored => None,
    };

    while controller.screen() == ModalScreen::Loading {
        std::thread::sleep(poll);
        controller.on_tick(Instant::now());
    }

    let mut alerts = Vec::new();
    let mut login_url = None;
    for event in controller.drain_events() {
        match event {
            ModalEvent::Alert(message) => alerts.push(message),
            ModalEvent::NavigateToLogin { url } => login_url = Some(url),
            ModalEvent::ScreenChanged(_) => {}
        }
    }

    Ok(FitOutcome {
        screen: controller.screen(),
        rejection,
        result: controller.result().cloned(),
        alerts,
        login_url,
    })
}

fn size_index(picker: &SizePicker, size: &str) -> Result<usize> {
    match picker.options().iter().position(|option| option == size) {
        Some(index) => Ok(index),
        None if picker.options().is_empty() => {
            bail!("page offers no size options, cannot choose '{size}'")
        }
        None => bail!(
            "size '{size}' is not offered (choose one of {})",
            picker.options().join(", ")
        ),
    }
}
