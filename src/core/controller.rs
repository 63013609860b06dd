// src/core/controller.rs
//! Submission controller: one upload-and-analyze cycle per `submit` call

use anyhow::Result;
use serde_json::Value;
use std::path::Path;
use tokio::sync::watch;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::progress::{Phase, SettleGuard, Settlement, StatusPublisher, SubmissionStatus};
use super::service_client::AnalysisServiceClient;
use super::simulator::{simulated_envelope, SimulationPlan};
use crate::config::{AnalyzerConfig, SimulationConfig};
use crate::error::{FileSelectionError, SubmissionError};
use crate::types::{AnalysisEnvelope, JobText, JobTextMode, ResultSource, ResumeFile};

enum Transport {
    Service(AnalysisServiceClient),
    Simulated(SimulationConfig),
}

pub struct SubmissionController {
    transport: Transport,
    file: Option<ResumeFile>,
    job_text: JobText,
    status: StatusPublisher,
}

impl SubmissionController {
    /// Real transport when the config names an endpoint, simulated mode otherwise
    pub fn new(config: &AnalyzerConfig) -> Result<Self> {
        let transport = match config.endpoint() {
            Some(endpoint) => {
                info!("Analysis service endpoint: {}", endpoint);
                Transport::Service(AnalysisServiceClient::new(
                    endpoint,
                    config.request_timeout(),
                    config.upload_chunk_size,
                )?)
            }
            None => {
                info!("No analysis endpoint configured, using simulated mode");
                config.simulation.validate()?;
                Transport::Simulated(config.simulation.clone())
            }
        };

        Ok(Self {
            transport,
            file: None,
            job_text: JobText::default(),
            status: StatusPublisher::new(),
        })
    }

    pub fn is_simulated(&self) -> bool {
        matches!(self.transport, Transport::Simulated(_))
    }

    /// Replace the current selection
    pub fn select_file(&mut self, file: ResumeFile) {
        debug!("Selected resume: {} ({} bytes)", file.name(), file.len());
        self.file = Some(file);
    }

    /// Read and select a file; a rejected file also clears the previous selection
    pub async fn select_path(&mut self, path: &Path) -> Result<&ResumeFile, FileSelectionError> {
        match ResumeFile::from_path(path).await {
            Ok(file) => {
                debug!("Selected resume: {} ({} bytes)", file.name(), file.len());
                Ok(&*self.file.insert(file))
            }
            Err(e) => {
                warn!("Rejected resume {}: {}", path.display(), e);
                self.file = None;
                Err(e)
            }
        }
    }

    pub fn clear_file(&mut self) {
        self.file = None;
    }

    pub fn selected_file(&self) -> Option<&ResumeFile> {
        self.file.as_ref()
    }

    pub fn set_mode(&mut self, mode: JobTextMode) {
        self.job_text.mode = mode;
    }

    pub fn mode(&self) -> JobTextMode {
        self.job_text.mode
    }

    pub fn set_role(&mut self, role: impl Into<String>) {
        self.job_text.role = role.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.job_text.description = description.into();
    }

    pub fn set_job_text(&mut self, job_text: JobText) {
        self.job_text = job_text;
    }

    /// Text sent as the job field for the active mode
    pub fn job_payload(&self) -> &str {
        self.job_text.active()
    }

    pub fn subscribe(&self) -> watch::Receiver<SubmissionStatus> {
        self.status.subscribe()
    }

    pub fn status(&self) -> SubmissionStatus {
        self.status.current()
    }

    pub fn is_in_flight(&self) -> bool {
        self.status.current().in_flight
    }

    /// Run one submission. Progress and the in-flight flag are cleared when this returns.
    pub async fn submit(&mut self) -> Result<AnalysisEnvelope, SubmissionError> {
        let submission_id = Uuid::new_v4();
        let guard = SettleGuard::new(self.status.clone());

        let outcome = self.run(submission_id).await;

        match &outcome {
            Ok(envelope) => {
                info!(
                    "Submission {} settled with {:?} result",
                    submission_id,
                    envelope.source()
                );
                guard.settle(Settlement::Success);
            }
            Err(e) => {
                warn!("Submission {} failed [{}]: {}", submission_id, e.code(), e);
                guard.settle(Settlement::Failure);
            }
        }

        outcome
    }

    async fn run(&self, submission_id: Uuid) -> Result<AnalysisEnvelope, SubmissionError> {
        let file = self.file.as_ref().ok_or(SubmissionError::MissingFile)?;
        let job_text = self.job_text.active();

        match &self.transport {
            Transport::Simulated(simulation) => {
                self.status.enter(Phase::Simulating);
                debug!("Submission {} simulating analysis", submission_id);

                let plan = SimulationPlan::generate(simulation, &mut rand::thread_rng());
                plan.run(&self.status).await;

                Ok(simulated_envelope())
            }
            Transport::Service(client) => {
                self.status.enter(Phase::Transmitting);
                debug!(
                    "Submission {} transmitting {} ({:?} mode)",
                    submission_id,
                    file.name(),
                    self.job_text.mode
                );

                let body = client.transmit(file, job_text, &self.status).await?;

                self.status.enter(Phase::Parsing);
                let value: Value = serde_json::from_str(&body)
                    .map_err(|e| SubmissionError::InvalidResponseBody(e.to_string()))?;

                Ok(AnalysisEnvelope::normalize(value, ResultSource::Service))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pdf(name: &str) -> ResumeFile {
        ResumeFile::from_bytes(name, b"%PDF-1.4 resume".to_vec()).unwrap()
    }

    fn simulated() -> SubmissionController {
        let config = AnalyzerConfig::default().with_simulation(SimulationConfig::instant());
        SubmissionController::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_missing_file_fails_and_settles() {
        let mut controller = simulated();
        let err = controller.submit().await.unwrap_err();

        assert_eq!(err, SubmissionError::MissingFile);
        let status = controller.status();
        assert_eq!(status.phase, Phase::Settled(Settlement::Failure));
        assert!(!status.in_flight);
        assert_eq!(status.progress, None);
    }

    #[test]
    fn test_inverted_simulation_delays_are_rejected() {
        let config = AnalyzerConfig::default().with_simulation(SimulationConfig {
            step_delay_min_ms: 500,
            step_delay_max_ms: 100,
            ..SimulationConfig::default()
        });
        assert!(SubmissionController::new(&config).is_err());
    }

    #[tokio::test]
    async fn test_missing_file_with_endpoint_makes_no_request() {
        // Nothing listens on port 9; a dispatched request would fail as a network error.
        let config = AnalyzerConfig::default().with_endpoint("http://127.0.0.1:9");
        let mut controller = SubmissionController::new(&config).unwrap();
        assert!(!controller.is_simulated());

        let err = controller.submit().await.unwrap_err();
        assert_eq!(err, SubmissionError::MissingFile);
    }

    #[tokio::test]
    async fn test_simulated_success() {
        let mut controller = simulated();
        controller.select_file(pdf("cv.pdf"));

        let envelope = controller.submit().await.unwrap();
        assert!(envelope.is_simulated());
        assert_eq!(envelope.analysis()["overall_match_score"], 82);

        let status = controller.status();
        assert_eq!(status.phase, Phase::Settled(Settlement::Success));
        assert!(!controller.is_in_flight());
        assert_eq!(status.progress, None);
    }

    #[tokio::test]
    async fn test_can_resubmit_after_failure() {
        let mut controller = simulated();
        assert!(controller.submit().await.is_err());

        controller.select_file(pdf("cv.pdf"));
        assert!(controller.submit().await.is_ok());
    }

    #[tokio::test]
    async fn test_dropped_submission_clears_in_flight() {
        let config = AnalyzerConfig::default();
        let mut controller = SubmissionController::new(&config).unwrap();
        controller.select_file(pdf("cv.pdf"));

        {
            let submit = controller.submit();
            tokio::pin!(submit);
            let polled = futures::poll!(submit.as_mut());
            assert!(polled.is_pending());
        }

        let status = controller.status();
        assert_eq!(status.phase, Phase::Idle);
        assert!(!status.in_flight);
    }

    #[test]
    fn test_mode_selects_payload() {
        let mut controller = simulated();
        controller.set_role("Frontend Engineer");
        controller.set_description("Full description of the role");
        assert_eq!(controller.mode(), JobTextMode::Role);
        assert_eq!(controller.job_payload(), "Frontend Engineer");

        controller.set_mode(JobTextMode::Description);
        assert_eq!(controller.job_payload(), "Full description of the role");
    }

    #[tokio::test]
    async fn test_rejected_path_clears_selection() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("cv.pdf");
        let bad = dir.path().join("notes.txt");
        std::fs::write(&good, b"%PDF-1.7").unwrap();
        std::fs::write(&bad, b"plain text").unwrap();

        let mut controller = simulated();
        controller.select_path(&good).await.unwrap();
        assert_eq!(controller.selected_file().map(|f| f.name()), Some("cv.pdf"));

        let err = controller.select_path(&bad).await.unwrap_err();
        assert!(matches!(err, FileSelectionError::NotPdf { .. }));
        assert!(controller.selected_file().is_none());
    }

    #[test]
    fn test_replacing_selection() {
        let mut controller = simulated();
        controller.select_file(pdf("first.pdf"));
        controller.select_file(pdf("second.pdf"));
        assert_eq!(controller.selected_file().map(|f| f.name()), Some("second.pdf"));

        controller.clear_file();
        assert!(controller.selected_file().is_none());
    }
}
