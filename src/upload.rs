//! `cba upload <FILE>`: document analysis.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Serialize;

use cba_core::api::{IndicatorApi, UploadFile};
use cba_core::views::upload::{self, UploadState, UploadView, MIME_PDF, MIME_XLS, MIME_XLSX};

use crate::render::{self, OutputFormat};

/// MIME type for `path`, judged by extension the way a file picker reports it.
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("pdf") => MIME_PDF,
        Some("xlsx") => MIME_XLSX,
        Some("xls") => MIME_XLS,
        Some("txt") | Some("md") => "text/plain",
        Some("csv") => "text/csv",
        Some("doc") => "application/msword",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => "application/octet-stream",
    }
}

pub fn read_upload(path: &Path) -> Result<UploadFile> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(UploadFile::new(name, mime_for_path(path), bytes))
}

#[derive(Serialize)]
struct UploadOutput<'a> {
    upload: &'a UploadState,
    #[serde(skip_serializing_if = "Option::is_none")]
    next: Option<String>,
}

pub fn format_upload(view: &UploadView) -> String {
    let mut out = String::new();
    match view.state() {
        UploadState::NoFile => out.push_str("No file selected.\n"),
        UploadState::Analyzing { file } => {
            out.push_str(&format!("{} (analyzing...)\n", file.name));
        }
        UploadState::Failed { file, message } => {
            out.push_str(&format!("{}\n{}\n", file.name, message));
        }
        UploadState::Analyzed {
            file,
            found,
            missing,
            ..
        } => {
            out.push_str(&format!(
                "{} ({:.2} MB)\n\n",
                file.name,
                file.size_bytes as f64 / 1024.0 / 1024.0
            ));
            out.push_str("Information Found\n");
            let entries = found.entries();
            if entries.is_empty() {
                out.push_str("  (none)\n");
            }
            for (key, value) in entries {
                out.push_str(&format!("  {:<10} {}\n", format!("{}:", key), value));
            }

            if missing.is_empty() {
                out.push_str("\nAll Set! We have all the information needed.\n");
            } else {
                out.push_str("\nMissing Information\n");
                for item in missing {
                    out.push_str(&format!("  - {}\n", item));
                }
            }
            if let Some(next) = view.continuation() {
                let label = if missing.is_empty() {
                    "Get Recommendations"
                } else {
                    "Complete in Chat"
                };
                out.push_str(&format!("\n{}: {}\n", label, next));
            }
        }
    }
    out
}

/// CLI entry point for `cba upload`.
pub async fn run_upload(api: &dyn IndicatorApi, path: &Path, format: OutputFormat) -> Result<()> {
    let file = read_upload(path)?;
    let mut view = UploadView::new();
    if let Err(rejected) = upload::analyze(&mut view, api, file).await {
        bail!("{}", rejected);
    }

    match format {
        OutputFormat::Json => render::print_json(&UploadOutput {
            upload: view.state(),
            next: view.continuation().map(|r| r.to_string()),
        })?,
        OutputFormat::Text => print!("{}", format_upload(&view)),
    }

    if let UploadState::Failed { message, .. } = view.state() {
        bail!("{}", message);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cba_core::api::memory::InMemoryApi;
    use cba_core::api::{FoundFields, UploadResponse};

    #[test]
    fn mime_by_extension() {
        assert_eq!(mime_for_path(Path::new("plan.PDF")), MIME_PDF);
        assert_eq!(mime_for_path(Path::new("budget.xlsx")), MIME_XLSX);
        assert_eq!(mime_for_path(Path::new("old.xls")), MIME_XLS);
        assert_eq!(mime_for_path(Path::new("notes.txt")), "text/plain");
        assert_eq!(mime_for_path(Path::new("noext")), "application/octet-stream");
    }

    #[tokio::test]
    async fn text_lists_found_and_missing() {
        let api = InMemoryApi::new().with_upload(Ok(UploadResponse {
            found: FoundFields {
                location: Some("Kenya".into()),
                ..Default::default()
            },
            missing: vec!["Primary Commodity".into(), "Budget Range".into()],
            s3_uri: None,
        }));
        let mut view = UploadView::new();
        let file = UploadFile::new("plan.pdf", MIME_PDF, vec![0; 16]);
        upload::analyze(&mut view, &api, file).await.unwrap();

        let text = format_upload(&view);
        assert!(text.contains("location:  Kenya"));
        assert!(text.contains("  - Primary Commodity\n"));
        assert!(text.contains("Complete in Chat: /chat?location=Kenya&commodity=&budget="));
    }
}
