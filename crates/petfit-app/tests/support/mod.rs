use std::fs;
use std::path::Path;
use std::sync::Mutex;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;

use petfit_app::{ControllerSettings, FittingLoader, FittingSettled, ModalController};
use petfit_core::config::StyleConfig;
use petfit_core::page::{PageContext, PetProfile, ProductRegion, SizeOptions};
use petfit_core::progress::ProgressSimulator;
use petfit_core::request::{FittingRequest, UploadImage};
use petfit_core::response::FittingResult;
use rand::SeedableRng;
use rand::rngs::StdRng;

#[allow(dead_code)]
pub static ENV_LOCK: Mutex<()> = Mutex::new(());

pub const PERIOD: Duration = Duration::from_millis(100);

#[derive(Default)]
pub struct ScriptedLoader {
    calls: Mutex<Vec<(u64, FittingRequest)>>,
    senders: Mutex<Vec<Sender<FittingSettled>>>,
}

#[allow(dead_code)]
impl ScriptedLoader {
    pub fn requests(&self) -> Vec<FittingRequest> {
        self.calls
            .lock()
            .expect("calls lock")
            .iter()
            .map(|(_, request)| request.clone())
            .collect()
    }

    pub fn tokens(&self) -> Vec<u64> {
        self.calls
            .lock()
            .expect("calls lock")
            .iter()
            .map(|(token, _)| *token)
            .collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("calls lock").len()
    }

    /// Answers the most recent submission. Returns false when the
    /// controller already dropped its receiver.
    pub fn respond(&self, result: FittingResult) -> bool {
        let index = self.call_count().checked_sub(1).expect("a submission");
        self.respond_to(index, result)
    }

    pub fn respond_to(&self, index: usize, result: FittingResult) -> bool {
        let token = self.tokens()[index];
        let sender = self.senders.lock().expect("senders lock")[index].clone();
        sender.send(FittingSettled { token, result }).is_ok()
    }

    pub fn hang_up_last(&self) {
        let _ = self.senders.lock().expect("senders lock").pop();
    }
}

impl FittingLoader for ScriptedLoader {
    fn spawn_submit(&self, request: FittingRequest, token: u64) -> Receiver<FittingSettled> {
        self.calls
            .lock()
            .expect("calls lock")
            .push((token, request));
        let (sender, receiver) = mpsc::channel();
        self.senders.lock().expect("senders lock").push(sender);
        receiver
    }
}

pub fn settings() -> ControllerSettings {
    ControllerSettings {
        style: StyleConfig::default(),
        login_url: "http://shop.test/login".to_string(),
        progress_interval: PERIOD,
    }
}

pub fn controller(page: PageContext, loader: Arc<ScriptedLoader>) -> ModalController {
    let progress = ProgressSimulator::with_rng(PERIOD, StdRng::seed_from_u64(11));
    ModalController::with_progress(page, settings(), loader, progress)
}

fn sizes() -> SizeOptions {
    SizeOptions {
        options: vec!["S".to_string(), "M".to_string(), "L".to_string()],
        product: Some("M".to_string()),
        ai_fit: None,
    }
}

fn pet(id: &str, name: &str, has_image: bool) -> PetProfile {
    PetProfile {
        id: id.to_string(),
        name: Some(name.to_string()),
        has_image,
    }
}

/// Product detail page with two saved pets; the first has a photo.
pub fn pet_page() -> PageContext {
    PageContext {
        product: Some(ProductRegion {
            image_url: "/static/img/raincoat.jpg".to_string(),
            name: "Yellow Raincoat".to_string(),
        }),
        sizes: sizes(),
        pets: vec![pet("1", "Bori", true), pet("2", "Kong", false)],
    }
}

/// Page without pet cards or a product region.
pub fn plain_page() -> PageContext {
    PageContext {
        product: None,
        sizes: sizes(),
        pets: Vec::new(),
    }
}

#[allow(dead_code)]
pub fn photo() -> UploadImage {
    UploadImage {
        file_name: "dog.jpg".to_string(),
        mime_type: "image/jpeg".to_string(),
        bytes: vec![1, 2, 3],
    }
}

#[allow(dead_code)]
pub fn write_valid_config(home: &Path) {
    let config_dir = home.join(".config").join("petfit");
    fs::create_dir_all(&config_dir).expect("create config dir");
    fs::write(
        config_dir.join("config.toml"),
        r#"
version = 1

[server]
base_url = "http://127.0.0.1:5000"

[progress]
interval_ms = 5
"#,
    )
    .expect("write config");
}
