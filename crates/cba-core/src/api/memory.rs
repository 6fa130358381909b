//! In-memory [`IndicatorApi`] for tests and embedding.
//!
//! Sessions map to fixed recommendation sets; chat replies come from a
//! queue (or a stock acknowledgement once it runs dry). Every call is
//! counted so callers can assert that a path never reached the service.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::models::{Indicator, ProjectProfile};

use super::{
    ApiError, ApiOperation, ChatRequest, ChatResponse, IndicatorApi, RecommendationsResponse,
    UploadFile, UploadResponse,
};

/// Scripted stand-in for the recommendation service.
#[derive(Default)]
pub struct InMemoryApi {
    sessions: Mutex<HashMap<String, Vec<Indicator>>>,
    replies: Mutex<VecDeque<Result<ChatResponse, ApiError>>>,
    upload: Mutex<Option<Result<UploadResponse, ApiError>>>,
    recommendation_error: Mutex<Option<ApiError>>,
    chat_log: Mutex<Vec<ChatRequest>>,
    chat_calls: AtomicUsize,
    upload_calls: AtomicUsize,
    recommendation_calls: AtomicUsize,
    minted: AtomicUsize,
}

impl InMemoryApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the recommendation set returned for `session_id`.
    pub fn with_session(self, session_id: &str, indicators: Vec<Indicator>) -> Self {
        self.sessions
            .lock()
            .unwrap()
            .insert(session_id.to_string(), indicators);
        self
    }

    /// Queue the next chat reply.
    pub fn with_reply(self, reply: Result<ChatResponse, ApiError>) -> Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn with_upload(self, result: Result<UploadResponse, ApiError>) -> Self {
        *self.upload.lock().unwrap() = Some(result);
        self
    }

    /// Make every recommendation fetch fail with `message`.
    pub fn failing_recommendations(self, message: &str) -> Self {
        *self.recommendation_error.lock().unwrap() = Some(ApiError::new(
            ApiOperation::Recommendations,
            Some(500),
            message,
        ));
        self
    }

    pub fn chat_calls(&self) -> usize {
        self.chat_calls.load(Ordering::SeqCst)
    }

    pub fn upload_calls(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
    }

    pub fn recommendation_calls(&self) -> usize {
        self.recommendation_calls.load(Ordering::SeqCst)
    }

    /// Every chat request received, oldest first.
    pub fn chat_log(&self) -> Vec<ChatRequest> {
        self.chat_log.lock().unwrap().clone()
    }
}

#[async_trait]
impl IndicatorApi for InMemoryApi {
    async fn chat(
        &self,
        message: &str,
        session_id: Option<&str>,
        profile: Option<&ProjectProfile>,
    ) -> Result<ChatResponse, ApiError> {
        self.chat_calls.fetch_add(1, Ordering::SeqCst);
        self.chat_log.lock().unwrap().push(ChatRequest {
            message: message.to_string(),
            session_id: session_id.map(str::to_string),
            profile: profile.cloned(),
        });

        if let Some(reply) = self.replies.lock().unwrap().pop_front() {
            return reply;
        }

        let session_id = match session_id {
            Some(s) => s.to_string(),
            None => format!("mem-{}", self.minted.fetch_add(1, Ordering::SeqCst) + 1),
        };
        Ok(ChatResponse {
            response: format!("Noted: {}", message),
            session_id,
            has_recommendations: None,
            profile: None,
        })
    }

    async fn upload_file(&self, _file: &UploadFile) -> Result<UploadResponse, ApiError> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        match self.upload.lock().unwrap().clone() {
            Some(result) => result,
            None => Err(ApiError::new(ApiOperation::Upload, Some(500), "Upload failed")),
        }
    }

    async fn get_recommendations(
        &self,
        session_id: &str,
    ) -> Result<RecommendationsResponse, ApiError> {
        self.recommendation_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.recommendation_error.lock().unwrap().clone() {
            return Err(err);
        }
        let indicators = self
            .sessions
            .lock()
            .unwrap()
            .get(session_id)
            .cloned()
            .unwrap_or_default();
        let message = if indicators.is_empty() {
            Some("No recommendations yet for this session".to_string())
        } else {
            None
        };
        Ok(RecommendationsResponse {
            indicators,
            session_id: Some(session_id.to_string()),
            message,
        })
    }
}
