use crate::core::error::WorkflowError;
use crate::core::types::{
    AnalysisResult, ApiEnvelope, DEFAULT_MIME_TYPE, ReportText, SelectedFile, UPLOAD_FIELD_NAME,
    UploadResult,
};
use crate::utils::urls::join_segments;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use url::Url;

const APPLICATION_JSON: &str = "application/json";

/// Upload -> analyze -> fetch against the remote analysis services.
///
/// Each step issues exactly one request and the pipeline stops at the first
/// failure. Nothing is retried and nothing already done is rolled back.
#[derive(Clone)]
pub struct UploadWorkflow {
    http_client: Client,
    api_url: Url,
}

impl UploadWorkflow {
    pub fn new(http_client: Client, api_url: Url) -> Self {
        Self {
            http_client,
            api_url,
        }
    }

    pub fn upload_url(&self) -> Result<Url, WorkflowError> {
        Ok(join_segments(&self.api_url, &["file", "upload_file"])?)
    }

    pub fn analyze_url(&self, file_name: &str) -> Result<Url, WorkflowError> {
        Ok(join_segments(&self.api_url, &["ai", "analyze", file_name])?)
    }

    pub async fn run(&self, file: &SelectedFile) -> Result<ReportText, WorkflowError> {
        let uploaded = self.upload(file).await?;
        let analysis = self.analyze(&uploaded.file_name).await?;
        self.fetch_report(&analysis.response_file_url).await
    }

    pub async fn upload(&self, file: &SelectedFile) -> Result<UploadResult, WorkflowError> {
        let url = self.upload_url()?;
        tracing::info!(file = %file.name, bytes = file.content.len(), %url, "uploading file");

        let build_part = |mime: &str| {
            Part::bytes(file.content.to_vec())
                .file_name(file.name.clone())
                .mime_str(mime)
        };
        // the browser-reported type is passed through unchecked; a malformed
        // one must not stop the upload
        let part = match build_part(&file.mime_type) {
            Ok(part) => part,
            Err(e) => {
                tracing::warn!(mime = %file.mime_type, error = %e, "unparseable content type, sending as {}", DEFAULT_MIME_TYPE);
                build_part(DEFAULT_MIME_TYPE)?
            }
        };
        let form = Form::new().part(UPLOAD_FIELD_NAME, part);

        let response = self
            .http_client
            .post(url)
            .header(ACCEPT, APPLICATION_JSON)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(WorkflowError::UploadFailure { status });
        }

        let envelope: ApiEnvelope<UploadResult> = response.json().await?;
        tracing::debug!(file_name = %envelope.data.file_name, "upload accepted");
        Ok(envelope.data)
    }

    pub async fn analyze(&self, file_name: &str) -> Result<AnalysisResult, WorkflowError> {
        let url = self.analyze_url(file_name)?;
        tracing::info!(%file_name, %url, "requesting analysis");

        let response = self
            .http_client
            .post(url)
            .header(ACCEPT, APPLICATION_JSON)
            .header(CONTENT_TYPE, APPLICATION_JSON)
            .body("")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(WorkflowError::AnalysisFailure { status });
        }

        let envelope: ApiEnvelope<AnalysisResult> = response.json().await?;
        tracing::debug!(report_url = %envelope.data.response_file_url, "analysis finished");
        Ok(envelope.data)
    }

    /// GETs `report_url` and returns its body verbatim.
    pub async fn fetch_report(&self, report_url: &str) -> Result<ReportText, WorkflowError> {
        tracing::info!(%report_url, "fetching report");

        let response = self.http_client.get(report_url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(WorkflowError::FetchFailure { status });
        }

        let text = response.text().await?;
        tracing::debug!(bytes = text.len(), "report fetched");
        Ok(text)
    }
}

#[cfg(test)]
mod cfg_tests {
    use crate::core::error::WorkflowError;
    use crate::core::types::SelectedFile;
    use crate::core::workflow::UploadWorkflow;
    use crate::utils::urls::to_url;
    use reqwest::Client;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn workflow_for(server: &MockServer) -> UploadWorkflow {
        UploadWorkflow::new(Client::new(), to_url(&server.uri()).unwrap())
    }

    fn csv_file() -> SelectedFile {
        SelectedFile::new("abc.csv", b"id,value\n1,42\n".to_vec(), Some("text/csv".to_string()))
    }

    #[tokio::test]
    async fn test_full_run_returns_report_verbatim() {
        let server = MockServer::start().await;
        let report = "# Report\n\n* rows: 1\n\ttrailing whitespace   \n";

        Mock::given(method("POST"))
            .and(path("/file/upload_file"))
            .and(header("accept", "application/json"))
            .and(body_string_contains("name=\"file_upload\""))
            .and(body_string_contains("filename=\"abc.csv\""))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"data": {"file_name": "abc.csv"}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/ai/analyze/abc.csv"))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                json!({"data": {"response_file_url": format!("{}/reports/y.txt", server.uri())}}),
            ))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/reports/y.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string(report))
            .expect(1)
            .mount(&server)
            .await;

        let text = workflow_for(&server).run(&csv_file()).await.unwrap();
        assert_eq!(text, report);
    }

    #[tokio::test]
    async fn test_upload_failure_stops_pipeline() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/file/upload_file"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let err = workflow_for(&server).run(&csv_file()).await.unwrap_err();
        assert!(matches!(err, WorkflowError::UploadFailure { status } if status.as_u16() == 500));

        // nothing but the upload reached the server
        let received = server.received_requests().await.unwrap();
        assert_eq!(received.len(), 1);
    }

    #[tokio::test]
    async fn test_analysis_failure_skips_fetch() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/file/upload_file"))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(json!({"data": {"file_name": "abc.csv"}})),
            )
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/ai/analyze/abc.csv"))
            .respond_with(ResponseTemplate::new(422))
            .expect(1)
            .mount(&server)
            .await;

        let err = workflow_for(&server).run(&csv_file()).await.unwrap_err();
        assert_eq!(err.kind(), "analysis_failure");
        assert_eq!(server.received_requests().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_malformed_mime_type_still_uploads() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/file/upload_file"))
            .and(body_string_contains("filename=\"abc.csv\""))
            .and(body_string_contains("application/octet-stream"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"data": {"file_name": "abc.csv"}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let file = SelectedFile::new("abc.csv", b"a".to_vec(), Some("csv".to_string()));
        let uploaded = workflow_for(&server).upload(&file).await.unwrap();
        assert_eq!(uploaded.file_name, "abc.csv");
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_reported() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/missing.md"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = workflow_for(&server)
            .fetch_report(&format!("{}/missing.md", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::FetchFailure { status } if status.as_u16() == 404));
    }

    #[tokio::test]
    async fn test_missing_file_name_is_unexpected() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/file/upload_file"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {}})))
            .mount(&server)
            .await;

        let err = workflow_for(&server).run(&csv_file()).await.unwrap_err();
        assert!(matches!(err, WorkflowError::Unexpected(_)));
        assert_eq!(err.kind(), "unexpected");
    }
}
