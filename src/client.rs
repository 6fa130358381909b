//! HTTP implementation of [`IndicatorApi`].
//!
//! | Call | Request |
//! |------|---------|
//! | chat | `POST {base}/chat`, JSON body |
//! | upload | `POST {base}/upload`, base64 of the file bytes as `application/octet-stream` |
//! | recommendations | `GET {base}/recommendations?session_id=...` |
//!
//! Any non-2xx reply becomes an [`ApiError`] carrying the body's `error`
//! field when present. Transport failures and undecodable bodies become an
//! [`ApiError`] with no status. Nothing is retried and no request timeout
//! is set: a slow reply is still a reply.

use async_trait::async_trait;
use base64::Engine;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use cba_core::api::{
    ApiError, ApiOperation, ChatRequest, ChatResponse, IndicatorApi, RecommendationsResponse,
    UploadFile, UploadResponse,
};
use cba_core::models::ProjectProfile;

use crate::config::Config;

/// Client for the recommendation service.
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Self::new(&config.api.base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn decode<T: DeserializeOwned>(
        op: ApiOperation,
        sent: Result<reqwest::Response, reqwest::Error>,
    ) -> Result<T, ApiError> {
        let response = sent.map_err(|e| ApiError::new(op, None, e.to_string()))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::new(op, Some(status.as_u16()), e.to_string()))?;

        if !status.is_success() {
            debug!(?op, status = status.as_u16(), "service returned an error");
            return Err(ApiError::from_error_body(op, status.as_u16(), &body));
        }
        serde_json::from_slice(&body).map_err(|e| {
            ApiError::new(
                op,
                Some(status.as_u16()),
                format!("{}: invalid response body: {}", op.default_message(), e),
            )
        })
    }
}

#[async_trait]
impl IndicatorApi for HttpApi {
    async fn chat(
        &self,
        message: &str,
        session_id: Option<&str>,
        profile: Option<&ProjectProfile>,
    ) -> Result<ChatResponse, ApiError> {
        let body = ChatRequest {
            message: message.to_string(),
            session_id: session_id.map(str::to_string),
            profile: profile.cloned(),
        };
        debug!(session = ?session_id, "POST /chat");
        let sent = self.client.post(self.endpoint("chat")).json(&body).send().await;
        let reply: ChatResponse = Self::decode(ApiOperation::Chat, sent).await?;
        debug!(session = %reply.session_id, "chat reply");
        Ok(reply)
    }

    async fn upload_file(&self, file: &UploadFile) -> Result<UploadResponse, ApiError> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(&file.bytes);
        info!(name = %file.name, bytes = file.bytes.len(), "uploading file");
        let sent = self
            .client
            .post(self.endpoint("upload"))
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(encoded)
            .send()
            .await;
        Self::decode(ApiOperation::Upload, sent).await
    }

    async fn get_recommendations(
        &self,
        session_id: &str,
    ) -> Result<RecommendationsResponse, ApiError> {
        debug!(session = %session_id, "GET /recommendations");
        let sent = self
            .client
            .get(self.endpoint("recommendations"))
            .query(&[("session_id", session_id)])
            .send()
            .await;
        Self::decode(ApiOperation::Recommendations, sent).await
    }
}
