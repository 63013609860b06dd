// src/lib.rs
//! Client for the resume analysis service: uploads a resume PDF with a job
//! role or description, tracks upload progress and normalizes the result.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod report;
pub mod types;
pub mod utils;

pub use config::{AnalyzerConfig, SimulationConfig};
pub use crate::core::{Phase, Settlement, SubmissionController, SubmissionStatus};
pub use error::{FileSelectionError, SubmissionError};
pub use types::{AnalysisEnvelope, AnalysisReport, JobText, JobTextMode, ResultSource, ResumeFile};
