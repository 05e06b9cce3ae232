pub mod fit;
pub mod loader;
pub mod modal;
mod upload;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use petfit_core::config::{PetfitConfig, load_config, resolve_config_path};
use petfit_core::doctor::{DoctorReport, run_doctor};
use petfit_core::page::PageContext;
use petfit_core::request::UploadImage;
use petfit_core::transport::{FittingTransport, HttpFittingTransport};

pub use fit::{FitOutcome, FitRequest, FitSource};
pub use loader::{FittingLoader, FittingSettled, SystemFittingLoader};
pub use modal::{
    ControllerSettings, ManualForm, MessageTone, ModalController, ModalEvent, ModalScreen,
    Rejection, ResultContent, StartOutcome, StyledMessage,
};
pub use upload::UploadError;

pub struct App {
    pub config: PetfitConfig,
    transport: Arc<dyn FittingTransport>,
}

impl App {
    pub fn new(config: PetfitConfig, transport: Arc<dyn FittingTransport>) -> Self {
        Self { config, transport }
    }

    pub fn from_config(config: PetfitConfig) -> Result<Self> {
        let transport = HttpFittingTransport::new(&config.server)
            .context("failed to prepare fitting endpoint client")?;
        tracing::debug!(endpoint = transport.endpoint(), "fitting transport ready");
        Ok(Self::new(config, Arc::new(transport)))
    }

    pub fn controller_settings(&self) -> ControllerSettings {
        ControllerSettings {
            style: self.config.style.clone(),
            login_url: self.config.server.login_url(),
            progress_interval: self.config.progress.interval(),
        }
    }

    pub fn loader(&self) -> Arc<dyn FittingLoader> {
        Arc::new(SystemFittingLoader::new(Arc::clone(&self.transport)))
    }

    pub fn controller(&self, page: PageContext) -> ModalController {
        ModalController::new(page, self.controller_settings(), self.loader())
    }

    pub fn load_upload_image(&self, path: &Path) -> Result<UploadImage> {
        upload::load_upload_image(path)
            .with_context(|| format!("failed to load photo {}", path.display()))
    }
}

pub fn doctor(page: Option<&Path>) -> DoctorReport {
    run_doctor(page)
}

pub fn ensure_config_ready() -> Result<PetfitConfig> {
    let config_path = resolve_config_path().context("failed to resolve config path")?;

    if !config_path.exists() {
        bail!(
            "missing config at {}\nCreate ~/.config/petfit/config.toml with a [server] base_url. See README.md for setup instructions.",
            config_path.display()
        );
    }

    load_config(&config_path).map_err(|error| {
        anyhow!(
            "invalid config at {}: {error}\nFix the config and retry. See README.md for setup instructions.",
            config_path.display()
        )
    })
}

pub fn load_page(path: &Path) -> Result<PageContext> {
    petfit_core::page::load_page(path)
        .with_context(|| format!("failed to load page description {}", path.display()))
}
