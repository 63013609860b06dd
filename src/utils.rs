// src/utils.rs
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

const PDF_MAGIC: &[u8] = b"%PDF-";

/// Get file extension in lowercase
pub fn get_file_extension(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// True when the name carries a .pdf extension or the content starts with the PDF header
pub fn looks_like_pdf(filename: &str, content: &[u8]) -> bool {
    get_file_extension(filename).as_deref() == Some("pdf") || content.starts_with(PDF_MAGIC)
}

/// Normalize a file stem for use in generated file names
pub fn normalize_file_stem(name: &str) -> String {
    let stem = Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("resume");

    stem.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Build the path a saved analysis is written to
pub fn analysis_output_path(base: &Path, resume_name: &str) -> PathBuf {
    base.join(format!(
        "analysis_{}_{}.json",
        normalize_file_stem(resume_name),
        chrono::Utc::now().format("%Y%m%d_%H%M%S")
    ))
}

/// Write file content, creating the parent directory first
pub async fn write_file_content(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    tokio::fs::write(path, content)
        .await
        .with_context(|| format!("Failed to write file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_file_extension() {
        assert_eq!(get_file_extension("resume.pdf"), Some("pdf".to_string()));
        assert_eq!(get_file_extension("Resume.PDF"), Some("pdf".to_string()));
        assert_eq!(get_file_extension("noext"), None);
    }

    #[test]
    fn test_looks_like_pdf() {
        assert!(looks_like_pdf("cv.pdf", b"anything"));
        assert!(looks_like_pdf("download", b"%PDF-1.7\n..."));
        assert!(!looks_like_pdf("cv.docx", b"PK\x03\x04"));
    }

    #[test]
    fn test_normalize_file_stem() {
        assert_eq!(normalize_file_stem("John Doe CV.pdf"), "john_doe_cv");
        assert_eq!(normalize_file_stem("jean-paul_2024.pdf"), "jean-paul_2024");
        assert_eq!(normalize_file_stem(""), "resume");
    }

    #[test]
    fn test_analysis_output_path() {
        let path = analysis_output_path(Path::new("/tmp/out"), "Jane Doe.pdf");
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("analysis_jane_doe_"));
        assert!(name.ends_with(".json"));
        assert_eq!(path.parent(), Some(Path::new("/tmp/out")));
    }

    #[tokio::test]
    async fn test_write_file_content_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.json");
        write_file_content(&path, "{}").await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
    }
}
