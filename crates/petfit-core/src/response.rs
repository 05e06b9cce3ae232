use serde::Deserialize;

pub const DEFAULT_FAILURE_MESSAGE: &str = "Error occurred";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FittingResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub result_image: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FittingResult {
    AuthRequired,
    ImageRequired,
    Success {
        result_image_url: Option<String>,
        message: String,
    },
    Failure {
        result_image_url: Option<String>,
        message: Option<String>,
    },
    NetworkFailure {
        reason: String,
    },
}

impl FittingResult {
    pub fn label(&self) -> &'static str {
        match self {
            Self::AuthRequired => "auth_required",
            Self::ImageRequired => "image_required",
            Self::Success { .. } => "success",
            Self::Failure { .. } => "failure",
            Self::NetworkFailure { .. } => "network_failure",
        }
    }
}

impl FittingResponse {
    pub fn classify(self) -> FittingResult {
        match self.error.as_deref() {
            Some("login_required") => return FittingResult::AuthRequired,
            Some("no_image") => return FittingResult::ImageRequired,
            _ => {}
        }

        if self.success == Some(true) {
            return FittingResult::Success {
                result_image_url: self.result_image,
                message: self.message.unwrap_or_default(),
            };
        }

        FittingResult::Failure {
            result_image_url: self.result_image,
            message: self.message,
        }
    }
}

/// Classifies a raw response body. A body that is not a JSON object is a
/// transport-level failure, the same as a dropped connection.
pub fn classify_body(body: &str) -> FittingResult {
    match serde_json::from_str::<FittingResponse>(body) {
        Ok(response) => response.classify(),
        Err(error) => FittingResult::NetworkFailure {
            reason: format!("response body was not valid JSON: {error}"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::{FittingResult, classify_body};

    #[test]
    fn login_required_is_auth_required() {
        assert_eq!(
            classify_body(r#"{"error": "login_required"}"#),
            FittingResult::AuthRequired
        );
    }

    #[test]
    fn no_image_is_image_required_even_with_failure_fields() {
        assert_eq!(
            classify_body(r#"{"error": "no_image", "success": false, "message": "x"}"#),
            FittingResult::ImageRequired
        );
    }

    #[test]
    fn success_true_is_success_even_with_unexpected_fields() {
        let result = classify_body(
            r#"{"success": true, "result_image": "x.png", "message": "Done", "extra": 1}"#,
        );
        assert_eq!(
            result,
            FittingResult::Success {
                result_image_url: Some("x.png".to_string()),
                message: "Done".to_string(),
            }
        );
    }

    #[test]
    fn success_true_with_unrecognized_error_stays_success() {
        let result = classify_body(r#"{"success": true, "error": "Pet ID required"}"#);
        assert_eq!(result.label(), "success");
    }

    #[test]
    fn other_payloads_are_failures_with_optional_fields() {
        assert_eq!(
            classify_body(r#"{"error": "Pet image required"}"#),
            FittingResult::Failure {
                result_image_url: None,
                message: None,
            }
        );
        assert_eq!(
            classify_body(r#"{"success": false, "result_image": "p.png", "message": "busy"}"#),
            FittingResult::Failure {
                result_image_url: Some("p.png".to_string()),
                message: Some("busy".to_string()),
            }
        );
    }

    #[test]
    fn invalid_json_is_network_failure() {
        let result = classify_body("<html>502 Bad Gateway</html>");
        assert_eq!(result.label(), "network_failure");
    }
}
