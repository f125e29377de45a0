use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Multipart field the upload service reads the file from.
pub const UPLOAD_FIELD_NAME: &str = "file_upload";

pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// A file chosen by the user, held until it is replaced.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    pub content: Bytes,
    pub mime_type: String,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, content: impl Into<Bytes>, mime_type: Option<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            mime_type: mime_type.unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string()),
        }
    }

    pub fn summary(&self) -> SelectedFileSummary {
        SelectedFileSummary {
            name: self.name.clone(),
            mime_type: self.mime_type.clone(),
            size: self.content.len(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SelectedFileSummary {
    pub name: String,
    pub mime_type: String,
    pub size: usize,
}

// Every response from the upload/analyze services is wrapped in `data`
#[derive(Deserialize, Debug, Clone)]
pub struct ApiEnvelope<T> {
    pub data: T,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct UploadResult {
    pub file_name: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct AnalysisResult {
    pub response_file_url: String,
}

/// Raw Markdown body of a report, exactly as served.
pub type ReportText = String;
