// src/types/submission.rs
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::FileSelectionError;
use crate::utils::looks_like_pdf;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// A resume PDF held in memory between selection and submission
#[derive(Debug, Clone)]
pub struct ResumeFile {
    name: String,
    content: Bytes,
}

impl ResumeFile {
    /// Validate and wrap in-memory content, e.g. from a drag-and-drop event
    pub fn from_bytes(
        name: impl Into<String>,
        content: impl Into<Bytes>,
    ) -> Result<Self, FileSelectionError> {
        let name = name.into();
        let content = content.into();

        if content.is_empty() {
            return Err(FileSelectionError::Empty { name });
        }

        if !looks_like_pdf(&name, &content) {
            return Err(FileSelectionError::NotPdf { name });
        }

        Ok(Self { name, content })
    }

    /// Read and validate a file from disk
    pub async fn from_path(path: &Path) -> Result<Self, FileSelectionError> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("resume.pdf")
            .to_string();

        let content = tokio::fs::read(path)
            .await
            .map_err(|source| FileSelectionError::Unreadable {
                name: name.clone(),
                source,
            })?;

        Self::from_bytes(name, content)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Cheap clone of the underlying buffer
    pub fn content(&self) -> Bytes {
        self.content.clone()
    }
}

/// Which of the two job inputs is active. Only the active one is sent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobTextMode {
    #[default]
    Role,
    Description,
}

impl JobTextMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Role => Self::Description,
            Self::Description => Self::Role,
        }
    }
}

/// Short role title and full job description, with an exclusive mode toggle
#[derive(Debug, Clone, Default)]
pub struct JobText {
    pub mode: JobTextMode,
    pub role: String,
    pub description: String,
}

impl JobText {
    pub fn role(role: impl Into<String>) -> Self {
        Self {
            mode: JobTextMode::Role,
            role: role.into(),
            description: String::new(),
        }
    }

    pub fn description(description: impl Into<String>) -> Self {
        Self {
            mode: JobTextMode::Description,
            role: String::new(),
            description: description.into(),
        }
    }

    /// Value transmitted as the `job_description` field
    pub fn active(&self) -> &str {
        match self.mode {
            JobTextMode::Role => &self.role,
            JobTextMode::Description => &self.description,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_pdf() {
        let err = ResumeFile::from_bytes("cv.docx", b"PK\x03\x04".to_vec()).unwrap_err();
        assert!(matches!(err, FileSelectionError::NotPdf { .. }));
    }

    #[test]
    fn test_rejects_empty() {
        let err = ResumeFile::from_bytes("cv.pdf", Vec::new()).unwrap_err();
        assert!(matches!(err, FileSelectionError::Empty { .. }));
    }

    #[test]
    fn test_accepts_pdf_by_magic_without_extension() {
        let file = ResumeFile::from_bytes("upload", b"%PDF-1.4 body".to_vec()).unwrap();
        assert_eq!(file.name(), "upload");
        assert_eq!(file.len(), 13);
    }

    #[tokio::test]
    async fn test_from_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Jane.pdf");
        std::fs::write(&path, b"%PDF-1.7 test").unwrap();

        let file = ResumeFile::from_path(&path).await.unwrap();
        assert_eq!(file.name(), "Jane.pdf");
        assert_eq!(&file.content()[..], b"%PDF-1.7 test");
    }

    #[tokio::test]
    async fn test_from_path_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ResumeFile::from_path(&dir.path().join("gone.pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, FileSelectionError::Unreadable { .. }));
    }

    #[test]
    fn test_active_text_follows_mode() {
        let mut text = JobText {
            mode: JobTextMode::Role,
            role: "Frontend Engineer".into(),
            description: "We are hiring a frontend engineer to...".into(),
        };
        assert_eq!(text.active(), "Frontend Engineer");

        text.mode = text.mode.toggled();
        assert_eq!(text.active(), "We are hiring a frontend engineer to...");
    }

    #[test]
    fn test_empty_active_text_is_allowed() {
        let text = JobText::description("");
        assert_eq!(text.active(), "");
    }
}
