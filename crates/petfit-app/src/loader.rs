use std::sync::Arc;
use std::sync::mpsc::{self, Receiver};

use petfit_core::request::FittingRequest;
use petfit_core::response::FittingResult;
use petfit_core::transport::{self, FittingTransport};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FittingSettled {
    pub token: u64,
    pub result: FittingResult,
}

/// Runs a fitting request off the UI thread. The settled result comes back
/// on the returned channel, tagged with the caller's token.
pub trait FittingLoader: Send + Sync {
    fn spawn_submit(&self, request: FittingRequest, token: u64) -> Receiver<FittingSettled>;
}

pub struct SystemFittingLoader {
    transport: Arc<dyn FittingTransport>,
}

impl SystemFittingLoader {
    pub fn new(transport: Arc<dyn FittingTransport>) -> Self {
        Self { transport }
    }
}

impl FittingLoader for SystemFittingLoader {
    fn spawn_submit(&self, request: FittingRequest, token: u64) -> Receiver<FittingSettled> {
        let (sender, receiver) = mpsc::channel();
        let transport = Arc::clone(&self.transport);
        std::thread::spawn(move || {
            let result = transport::submit(transport.as_ref(), &request);
            if sender.send(FittingSettled { token, result }).is_err() {
                tracing::debug!(token, "fitting response arrived after receiver was dropped");
            }
        });
        receiver
    }
}
