// src/core/service_client.rs
//! HTTP client for the resume analysis service

use anyhow::{Context, Result};
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Url};
use serde::Deserialize;
use std::time::Duration;
use tracing::{error, info, trace};

use super::progress::{counted_chunks, StatusPublisher};
use crate::error::SubmissionError;
use crate::types::{ResumeFile, PDF_CONTENT_TYPE};

const ANALYZE_JOB_ENDPOINT: &str = "/analyze-job";
const RESUME_FIELD: &str = "resume_file";
const JOB_DESCRIPTION_FIELD: &str = "job_description";

pub struct AnalysisServiceClient {
    client: reqwest::Client,
    base_url: String,
    chunk_size: usize,
}

/// Error body shape returned by the analysis service
#[derive(Debug, Deserialize)]
struct ServiceErrorBody {
    error: Option<String>,
}

impl AnalysisServiceClient {
    pub fn new(base_url: &str, timeout: Duration, chunk_size: usize) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            chunk_size: chunk_size.max(1),
        })
    }

    pub fn analyze_url(&self) -> String {
        format!("{}{}", self.base_url, ANALYZE_JOB_ENDPOINT)
    }

    /// POST the resume and job text; returns the raw body of a 2xx response
    pub async fn transmit(
        &self,
        file: &ResumeFile,
        job_text: &str,
        publisher: &StatusPublisher,
    ) -> Result<String, SubmissionError> {
        let url = self.analyze_url();
        let url = Url::parse(&url)
            .map_err(|e| SubmissionError::CouldNotStart(format!("invalid endpoint {}: {}", url, e)))?;
        let form = self.build_form(file, job_text, publisher)?;

        info!(
            "Calling analysis service: {} ({}, {} bytes)",
            url,
            file.name(),
            file.len()
        );

        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(classify_send_error)?;

        let status = response.status();
        trace!("Response status: {}", status);

        if status.is_success() {
            response.text().await.map_err(|e| {
                SubmissionError::NetworkError(format!("Failed to read response body: {}", e))
            })
        } else {
            let error_text = response.text().await.unwrap_or_default();
            error!("Analysis service error response {}: {}", status, error_text);

            Err(SubmissionError::UploadRejected {
                status: status.as_u16(),
                message: service_error_message(&error_text),
            })
        }
    }

    fn build_form(
        &self,
        file: &ResumeFile,
        job_text: &str,
        publisher: &StatusPublisher,
    ) -> Result<Form, SubmissionError> {
        let body = Body::wrap_stream(counted_chunks(
            file.content(),
            self.chunk_size,
            publisher.clone(),
        ));

        let part = Part::stream_with_length(body, file.len() as u64)
            .file_name(file.name().to_string())
            .mime_str(PDF_CONTENT_TYPE)
            .map_err(|e| {
                SubmissionError::CouldNotStart(format!("Failed to create multipart: {}", e))
            })?;

        Ok(Form::new()
            .part(RESUME_FIELD, part)
            .text(JOB_DESCRIPTION_FIELD, job_text.to_string()))
    }
}

fn classify_send_error(err: reqwest::Error) -> SubmissionError {
    if err.is_builder() {
        SubmissionError::CouldNotStart(err.to_string())
    } else {
        SubmissionError::NetworkError(err.to_string())
    }
}

/// Extract `error` from a `{"error": "..."}` body, if that is what the service sent
pub fn service_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ServiceErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
}
