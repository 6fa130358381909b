//! Upload page: document analysis intake.
//!
//! ```text
//!   NoFile ──select──▶ Analyzing ──ok──▶ Analyzed(found, missing)
//!                          │
//!                          └──err──▶ Failed(message)
//! ```
//!
//! Only PDF and Excel files are accepted. A rejected selection leaves the
//! state untouched and never reaches the service. `Analyzed` and `Failed`
//! accept a fresh selection.

use serde::Serialize;
use tracing::{debug, warn};

use crate::api::{ApiError, FoundFields, IndicatorApi, UploadFile, UploadResponse};
use crate::lifecycle::{Mount, Ticket};
use crate::route::Route;

pub const MIME_PDF: &str = "application/pdf";
pub const MIME_XLSX: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const MIME_XLS: &str = "application/vnd.ms-excel";

pub const ALLOWED_MIME_TYPES: [&str; 3] = [MIME_PDF, MIME_XLSX, MIME_XLS];

/// Message shown when analysis fails.
pub const ANALYSIS_FAILED: &str = "Failed to analyze file";

/// Why a selection was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadRejected {
    #[error("Please upload a PDF or Excel file")]
    UnsupportedType { mime_type: String },
    #[error("A file is already being analyzed")]
    Busy,
}

/// What the page shows about the chosen file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileSummary {
    pub name: String,
    pub size_bytes: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum UploadState {
    NoFile,
    Analyzing {
        file: FileSummary,
    },
    Analyzed {
        file: FileSummary,
        found: FoundFields,
        missing: Vec<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        s3_uri: Option<String>,
    },
    Failed {
        file: FileSummary,
        message: String,
    },
}

/// An accepted selection awaiting the service's analysis.
#[derive(Debug)]
pub struct PendingUpload {
    ticket: Ticket,
    pub file: UploadFile,
}

/// Whether `mime_type` is one of the accepted document types.
pub fn is_allowed_mime(mime_type: &str) -> bool {
    ALLOWED_MIME_TYPES.contains(&mime_type)
}

#[derive(Debug)]
pub struct UploadView {
    state: UploadState,
    mount: Mount,
}

impl Default for UploadView {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadView {
    pub fn new() -> Self {
        Self {
            state: UploadState::NoFile,
            mount: Mount::new(),
        }
    }

    pub fn state(&self) -> &UploadState {
        &self.state
    }

    pub fn is_analyzing(&self) -> bool {
        matches!(self.state, UploadState::Analyzing { .. })
    }

    /// Accept a file from the picker or a drop.
    pub fn select_file(&mut self, file: UploadFile) -> Result<PendingUpload, UploadRejected> {
        if !is_allowed_mime(&file.mime_type) {
            debug!(name = %file.name, mime = %file.mime_type, "rejected upload type");
            return Err(UploadRejected::UnsupportedType {
                mime_type: file.mime_type,
            });
        }
        if self.is_analyzing() {
            return Err(UploadRejected::Busy);
        }

        self.state = UploadState::Analyzing {
            file: FileSummary {
                name: file.name.clone(),
                size_bytes: file.bytes.len(),
            },
        };
        Ok(PendingUpload {
            ticket: self.mount.ticket(),
            file,
        })
    }

    /// Apply the analysis result. Returns `false` if the page was left meanwhile.
    pub fn finish(
        &mut self,
        pending: PendingUpload,
        result: Result<UploadResponse, ApiError>,
    ) -> bool {
        if !pending.ticket.is_current() {
            debug!("dropping upload result for unmounted page");
            return false;
        }
        let file = FileSummary {
            name: pending.file.name,
            size_bytes: pending.file.bytes.len(),
        };
        self.state = match result {
            Ok(resp) => UploadState::Analyzed {
                file,
                found: resp.found,
                missing: resp.missing,
                s3_uri: resp.s3_uri,
            },
            Err(e) => {
                warn!(error = %e, "upload failed");
                UploadState::Failed {
                    file,
                    message: ANALYSIS_FAILED.to_string(),
                }
            }
        };
        true
    }

    /// Where to go next once analysis succeeded.
    ///
    /// Nothing missing leads to Results; otherwise Chat, seeded with whatever
    /// was found (absent fields passed as empty parameters).
    pub fn continuation(&self) -> Option<Route> {
        match &self.state {
            UploadState::Analyzed { found, missing, .. } => {
                if missing.is_empty() {
                    Some(Route::results(None))
                } else {
                    Some(Route::chat_handoff(
                        found.location.as_deref(),
                        found.commodity.as_deref(),
                        found.budget.as_deref(),
                    ))
                }
            }
            _ => None,
        }
    }

    pub fn unmount(&self) {
        self.mount.invalidate();
    }
}

/// Select `file` and run the analysis to completion.
pub async fn analyze(
    view: &mut UploadView,
    api: &dyn IndicatorApi,
    file: UploadFile,
) -> Result<(), UploadRejected> {
    let pending = view.select_file(file)?;
    let result = api.upload_file(&pending.file).await;
    view.finish(pending, result);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::memory::InMemoryApi;

    fn pdf() -> UploadFile {
        UploadFile::new("plan.pdf", MIME_PDF, b"%PDF-1.7".to_vec())
    }

    fn kenya_response() -> UploadResponse {
        UploadResponse {
            found: FoundFields {
                location: Some("Kenya".into()),
                ..Default::default()
            },
            missing: vec!["commodity".into(), "budget".into()],
            s3_uri: None,
        }
    }

    #[tokio::test]
    async fn rejected_type_never_calls_api() {
        let api = InMemoryApi::new().with_upload(Ok(kenya_response()));
        let mut view = UploadView::new();
        let file = UploadFile::new("notes.txt", "text/plain", b"hi".to_vec());

        let err = analyze(&mut view, &api, file).await.unwrap_err();
        assert_eq!(err.to_string(), "Please upload a PDF or Excel file");
        assert_eq!(*view.state(), UploadState::NoFile);
        assert_eq!(api.upload_calls(), 0);
    }

    #[test]
    fn all_three_types_accepted() {
        for mime in ALLOWED_MIME_TYPES {
            let mut view = UploadView::new();
            let file = UploadFile::new("f", mime, vec![1, 2, 3]);
            assert!(view.select_file(file).is_ok());
            assert!(view.is_analyzing());
        }
    }

    #[test]
    fn second_selection_while_analyzing_is_busy() {
        let mut view = UploadView::new();
        let _pending = view.select_file(pdf()).unwrap();
        assert_eq!(view.select_file(pdf()).unwrap_err(), UploadRejected::Busy);
    }

    #[tokio::test]
    async fn missing_fields_continue_to_chat() {
        let api = InMemoryApi::new().with_upload(Ok(kenya_response()));
        let mut view = UploadView::new();
        analyze(&mut view, &api, pdf()).await.unwrap();

        let next = view.continuation().unwrap();
        assert_eq!(next.to_string(), "/chat?location=Kenya&commodity=&budget=");
        assert_eq!(api.upload_calls(), 1);
    }

    #[tokio::test]
    async fn nothing_missing_continues_to_results() {
        let resp = UploadResponse {
            found: FoundFields {
                location: Some("Brazil".into()),
                commodity: Some("Coffee".into()),
                budget: Some("$50,000".into()),
            },
            missing: vec![],
            s3_uri: Some("s3://bucket/uploads/x.pdf".into()),
        };
        let api = InMemoryApi::new().with_upload(Ok(resp));
        let mut view = UploadView::new();
        analyze(&mut view, &api, pdf()).await.unwrap();
        assert_eq!(view.continuation(), Some(Route::results(None)));
    }

    #[tokio::test]
    async fn failure_is_an_explicit_state() {
        let api = InMemoryApi::new();
        let mut view = UploadView::new();
        analyze(&mut view, &api, pdf()).await.unwrap();
        match view.state() {
            UploadState::Failed { message, .. } => assert_eq!(message, ANALYSIS_FAILED),
            other => panic!("expected failure, got {:?}", other),
        }
        assert!(view.continuation().is_none());

        // A new selection is allowed after failure.
        assert!(view.select_file(pdf()).is_ok());
    }

    #[test]
    fn stale_result_is_dropped() {
        let mut view = UploadView::new();
        let pending = view.select_file(pdf()).unwrap();
        view.unmount();
        assert!(!view.finish(pending, Ok(kenya_response())));
        assert!(view.is_analyzing());
    }
}
