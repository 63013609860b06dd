// src/types/mod.rs
pub mod analysis;
pub mod envelope;
pub mod submission;

pub use analysis::{AnalysisDocument, AnalysisReport, KeywordAlignment, MatchCategory};
pub use envelope::{AnalysisEnvelope, ResultSource, ANALYSIS_KEY};
pub use submission::{JobText, JobTextMode, ResumeFile, PDF_CONTENT_TYPE};
