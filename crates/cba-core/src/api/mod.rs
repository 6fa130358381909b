//! The seam between the pages and the remote recommendation service.
//!
//! [`IndicatorApi`] names the three remote calls. Pages only ever talk to
//! this trait, so the HTTP client in `cba-indicators` and the
//! [`memory::InMemoryApi`] used in tests are interchangeable.
//!
//! # Wire shapes
//!
//! | Call | Request | Response |
//! |------|---------|----------|
//! | [`chat`](IndicatorApi::chat) | [`ChatRequest`] | [`ChatResponse`] |
//! | [`upload_file`](IndicatorApi::upload_file) | [`UploadFile`] (raw body) | [`UploadResponse`] |
//! | [`get_recommendations`](IndicatorApi::get_recommendations) | `session_id` | [`RecommendationsResponse`] |
//!
//! Every call is fire-once: no retries, no caching, no state kept between
//! calls. Failures surface as [`ApiError`] with a human-readable message.

pub mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::{Indicator, ProjectProfile};

/// Body of `POST /chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<ProjectProfile>,
}

/// Reply from `POST /chat`.
///
/// `profile` is the service's view of the project profile after this turn,
/// when it chooses to report one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    pub session_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_recommendations: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<ProjectProfile>,
}

/// Fields the service extracted from an uploaded document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoundFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commodity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<String>,
}

impl FoundFields {
    /// Present fields as `(label, value)` pairs in display order.
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        [
            ("location", &self.location),
            ("commodity", &self.commodity),
            ("budget", &self.budget),
        ]
        .into_iter()
        .filter_map(|(k, v)| v.as_deref().map(|v| (k, v)))
        .collect()
    }
}

/// Reply from `POST /upload`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub found: FoundFields,
    #[serde(default)]
    pub missing: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s3_uri: Option<String>,
}

/// Reply from `GET /recommendations`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationsResponse {
    #[serde(default)]
    pub indicators: Vec<Indicator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// A file picked for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    /// MIME type as reported by the picker.
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    pub fn size_mb(&self) -> f64 {
        self.bytes.len() as f64 / 1024.0 / 1024.0
    }
}

/// Which remote call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiOperation {
    Chat,
    Upload,
    Recommendations,
}

impl ApiOperation {
    /// Message used when the service gives no usable `error` field.
    pub fn default_message(&self) -> &'static str {
        match self {
            ApiOperation::Chat => "Chat failed",
            ApiOperation::Upload => "Upload failed",
            ApiOperation::Recommendations => "Failed to fetch recommendations",
        }
    }
}

/// A failed remote call: non-2xx status, transport failure, or an
/// undecodable success body.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("{message}")]
    Chat { status: Option<u16>, message: String },
    #[error("{message}")]
    Upload { status: Option<u16>, message: String },
    #[error("{message}")]
    Recommendations { status: Option<u16>, message: String },
}

impl ApiError {
    pub fn new(op: ApiOperation, status: Option<u16>, message: impl Into<String>) -> Self {
        let message = message.into();
        match op {
            ApiOperation::Chat => ApiError::Chat { status, message },
            ApiOperation::Upload => ApiError::Upload { status, message },
            ApiOperation::Recommendations => ApiError::Recommendations { status, message },
        }
    }

    /// Build the error for a non-2xx reply from its raw body.
    ///
    /// Uses the JSON `error` field when it is a non-empty string (or an
    /// object carrying a `message`), otherwise the operation's default.
    pub fn from_error_body(op: ApiOperation, status: u16, body: &[u8]) -> Self {
        let message = serde_json::from_slice::<serde_json::Value>(body)
            .ok()
            .and_then(|json| {
                let err = json.get("error")?;
                let text = match err {
                    serde_json::Value::String(s) => s.clone(),
                    serde_json::Value::Object(o) => o.get("message")?.as_str()?.to_string(),
                    _ => return None,
                };
                if text.is_empty() {
                    None
                } else {
                    Some(text)
                }
            })
            .unwrap_or_else(|| op.default_message().to_string());
        Self::new(op, Some(status), message)
    }

    pub fn operation(&self) -> ApiOperation {
        match self {
            ApiError::Chat { .. } => ApiOperation::Chat,
            ApiError::Upload { .. } => ApiOperation::Upload,
            ApiError::Recommendations { .. } => ApiOperation::Recommendations,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Chat { status, .. }
            | ApiError::Upload { status, .. }
            | ApiError::Recommendations { status, .. } => *status,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::Chat { message, .. }
            | ApiError::Upload { message, .. }
            | ApiError::Recommendations { message, .. } => message,
        }
    }
}

/// The three calls the pages make against the recommendation service.
#[async_trait]
pub trait IndicatorApi: Send + Sync {
    /// Send one user turn. The service mints a session when `session_id` is `None`.
    async fn chat(
        &self,
        message: &str,
        session_id: Option<&str>,
        profile: Option<&ProjectProfile>,
    ) -> Result<ChatResponse, ApiError>;

    /// Submit a document for profile extraction.
    async fn upload_file(&self, file: &UploadFile) -> Result<UploadResponse, ApiError>;

    /// Fetch the recommendation set for a session.
    async fn get_recommendations(
        &self,
        session_id: &str,
    ) -> Result<RecommendationsResponse, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_field_string() {
        let e = ApiError::from_error_body(ApiOperation::Chat, 500, br#"{"error": "agent down"}"#);
        assert_eq!(e.message(), "agent down");
        assert_eq!(e.status(), Some(500));
        assert_eq!(e.operation(), ApiOperation::Chat);
        assert_eq!(e.to_string(), "agent down");
    }

    #[test]
    fn error_field_object() {
        let body = br#"{"error": {"code": "not_found", "message": "no such session"}}"#;
        let e = ApiError::from_error_body(ApiOperation::Recommendations, 404, body);
        assert_eq!(e.message(), "no such session");
    }

    #[test]
    fn falls_back_to_default_message() {
        let e = ApiError::from_error_body(ApiOperation::Upload, 502, b"<html>Bad Gateway</html>");
        assert_eq!(e.message(), "Upload failed");

        let e = ApiError::from_error_body(ApiOperation::Recommendations, 500, br#"{"error": ""}"#);
        assert_eq!(e.message(), "Failed to fetch recommendations");

        let e = ApiError::from_error_body(ApiOperation::Chat, 400, br#"{"detail": "x"}"#);
        assert_eq!(e.message(), "Chat failed");
    }

    #[test]
    fn chat_request_omits_absent_fields() {
        let req = ChatRequest {
            message: "hi".into(),
            session_id: None,
            profile: None,
        };
        assert_eq!(serde_json::to_string(&req).unwrap(), r#"{"message":"hi"}"#);
    }

    #[test]
    fn upload_response_tolerates_partial_found() {
        let r: UploadResponse =
            serde_json::from_str(r#"{"found": {"location": "Kenya"}, "missing": ["Primary Commodity"]}"#)
                .unwrap();
        assert_eq!(r.found.entries(), vec![("location", "Kenya")]);
        assert_eq!(r.missing, vec!["Primary Commodity"]);
        assert!(r.s3_uri.is_none());
    }
}
