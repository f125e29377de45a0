use crate::config::PortalMode;
use crate::core::types::{ReportText, SelectedFile, SelectedFileSummary};
use crate::core::workflow::UploadWorkflow;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::Instrument;
use url::Url;
use uuid::Uuid;

#[derive(Debug, Default)]
struct Report {
    text: ReportText,
    updated_at: Option<DateTime<Utc>>,
}

#[derive(Serialize, Debug, Clone)]
pub struct PortalStatus {
    pub status: &'static str,
    pub mode: PortalMode,
    pub selected_file: Option<SelectedFileSummary>,
    pub report_bytes: usize,
    pub report_updated_at: Option<DateTime<Utc>>,
    pub in_flight: usize,
}

/// Owns the page state: the current selection and the current report.
///
/// Workflow invocations are spawned as independent tasks and are never
/// serialized against each other, so the report slot holds whatever
/// finished last.
pub struct PortalController {
    workflow: UploadWorkflow,
    mode: PortalMode,
    report_url: Option<Url>,
    selected: RwLock<Option<SelectedFile>>,
    report: RwLock<Report>,
    presented: AtomicBool,
    in_flight: AtomicUsize,
}

impl PortalController {
    pub fn new(workflow: UploadWorkflow, mode: PortalMode, report_url: Option<Url>) -> Arc<Self> {
        Arc::new(Self {
            workflow,
            mode,
            report_url,
            selected: RwLock::new(None),
            report: RwLock::new(Report::default()),
            presented: AtomicBool::new(false),
            in_flight: AtomicUsize::new(0),
        })
    }

    pub fn mode(&self) -> PortalMode {
        self.mode
    }

    pub async fn select(&self, file: SelectedFile) {
        tracing::info!(file = %file.name, bytes = file.content.len(), "file selected");
        *self.selected.write().await = Some(file);
    }

    pub async fn selected(&self) -> Option<SelectedFileSummary> {
        self.selected.read().await.as_ref().map(SelectedFile::summary)
    }

    pub async fn report(&self) -> ReportText {
        self.report.read().await.text.clone()
    }

    pub async fn status(&self) -> PortalStatus {
        let report = self.report.read().await;
        PortalStatus {
            status: "running",
            mode: self.mode,
            selected_file: self.selected().await,
            report_bytes: report.text.len(),
            report_updated_at: report.updated_at,
            in_flight: self.in_flight.load(Ordering::SeqCst),
        }
    }

    async fn publish(&self, text: ReportText) {
        let mut report = self.report.write().await;
        report.text = text;
        report.updated_at = Some(Utc::now());
    }

    /// Spawns one upload -> analyze -> fetch run for the current selection.
    /// Returns `None` when nothing is selected.
    pub async fn start_upload(self: &Arc<Self>) -> Option<JoinHandle<()>> {
        let file = self.selected.read().await.clone()?;
        let invocation = Uuid::new_v4();
        let span = tracing::info_span!("upload_workflow", %invocation, file = %file.name);

        let controller = Arc::clone(self);
        controller.in_flight.fetch_add(1, Ordering::SeqCst);
        Some(tokio::spawn(
            async move {
                match controller.workflow.run(&file).await {
                    Ok(text) => {
                        tracing::info!(bytes = text.len(), "report published");
                        controller.publish(text).await;
                    }
                    Err(e) => {
                        tracing::error!(kind = e.kind(), error = %e, "upload workflow failed");
                    }
                }
                controller.in_flight.fetch_sub(1, Ordering::SeqCst);
            }
            .instrument(span),
        ))
    }

    /// First presentation of an auto-load page fetches the fixed report.
    /// Every later call, and every call in upload mode, returns `None`.
    pub fn present(self: &Arc<Self>) -> Option<JoinHandle<()>> {
        if self.mode != PortalMode::AutoLoad {
            return None;
        }
        let report_url = self.report_url.clone()?;
        if self.presented.swap(true, Ordering::SeqCst) {
            return None;
        }

        let invocation = Uuid::new_v4();
        let span = tracing::info_span!("load_existing", %invocation, %report_url);

        let controller = Arc::clone(self);
        controller.in_flight.fetch_add(1, Ordering::SeqCst);
        Some(tokio::spawn(
            async move {
                match controller.workflow.fetch_report(report_url.as_str()).await {
                    Ok(text) => {
                        tracing::info!(bytes = text.len(), "existing report loaded");
                        controller.publish(text).await;
                    }
                    Err(e) => {
                        tracing::error!(kind = e.kind(), error = %e, "loading existing report failed");
                    }
                }
                controller.in_flight.fetch_sub(1, Ordering::SeqCst);
            }
            .instrument(span),
        ))
    }
}
