// src/core/mod.rs
//! Submission flow: status tracking, transports and the controller

pub mod controller;
pub mod progress;
pub mod service_client;
pub mod simulator;

pub use controller::SubmissionController;
pub use progress::{Phase, Settlement, StatusPublisher, SubmissionStatus};
pub use service_client::AnalysisServiceClient;
pub use simulator::{simulated_envelope, simulated_payload, SimulationPlan};
