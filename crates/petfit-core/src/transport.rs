use reqwest::blocking::Client;
use reqwest::blocking::multipart::{Form, Part};
use thiserror::Error;

use crate::config::ServerConfig;
use crate::request::{FittingRequest, FormField};
use crate::response::{FittingResult, classify_body};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to build http client: {0}")]
    Build(#[source] reqwest::Error),
    #[error("invalid upload content type '{mime}': {source}")]
    InvalidMime {
        mime: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("request to {endpoint} failed: {source}")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
}

pub trait FittingTransport: Send + Sync {
    fn post_form(&self, request: &FittingRequest) -> Result<HttpReply, TransportError>;
}

#[derive(Debug, Clone)]
pub struct HttpFittingTransport {
    endpoint: String,
    client: Client,
}

impl HttpFittingTransport {
    pub fn new(server: &ServerConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(server.timeout())
            .build()
            .map_err(TransportError::Build)?;
        Ok(Self {
            endpoint: server.endpoint_url(),
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl FittingTransport for HttpFittingTransport {
    fn post_form(&self, request: &FittingRequest) -> Result<HttpReply, TransportError> {
        let mut form = Form::new();
        for field in request.form_fields() {
            form = match field {
                FormField::Text { name, value } => form.text(name, value),
                FormField::File { name, image } => {
                    let part = Part::bytes(image.bytes)
                        .file_name(image.file_name)
                        .mime_str(&image.mime_type)
                        .map_err(|source| TransportError::InvalidMime {
                            mime: image.mime_type.clone(),
                            source,
                        })?;
                    form.part(name, part)
                }
            };
        }

        let request_error = |source| TransportError::Request {
            endpoint: self.endpoint.clone(),
            source,
        };
        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .map_err(request_error)?;
        let status = response.status().as_u16();
        let body = response.text().map_err(request_error)?;

        Ok(HttpReply { status, body })
    }
}

/// Sends one fitting request and classifies the outcome. Error statuses
/// still carry a classifiable JSON body (the server answers
/// `login_required` with 401), so only unreadable bodies and transport
/// errors become `NetworkFailure`.
pub fn submit(transport: &dyn FittingTransport, request: &FittingRequest) -> FittingResult {
    tracing::debug!(input = request.input.kind_label(), "submitting fitting request");

    let reply = match transport.post_form(request) {
        Ok(reply) => reply,
        Err(error) => {
            tracing::warn!(error = %error, "fitting request transport failed");
            return FittingResult::NetworkFailure {
                reason: error.to_string(),
            };
        }
    };

    let result = match classify_body(&reply.body) {
        FittingResult::NetworkFailure { reason } => FittingResult::NetworkFailure {
            reason: format!("HTTP {}: {reason}", reply.status),
        },
        result => result,
    };

    tracing::info!(
        status = reply.status,
        outcome = result.label(),
        "fitting request settled"
    );
    result
}
