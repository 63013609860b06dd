// src/report.rs
//! Plain-text rendering of analysis results and upload progress

use std::fmt::Write;
use tracing::warn;

use crate::types::{AnalysisEnvelope, AnalysisReport};

const MAX_KEYWORDS: usize = 12;
const PROGRESS_WIDTH: usize = 30;

/// Render an envelope for the terminal. Falls back to pretty JSON when the
/// document does not fit the typed view.
pub fn render_envelope(envelope: &AnalysisEnvelope) -> String {
    let mut out = String::new();

    if envelope.is_simulated() {
        out.push_str("(simulated result: no analysis service configured)\n\n");
    }

    match envelope.report() {
        Ok(report) => out.push_str(&render_report(&report)),
        Err(e) => {
            warn!("Analysis document did not match the report view: {}", e);
            out.push_str(
                &serde_json::to_string_pretty(envelope.as_value())
                    .unwrap_or_else(|_| envelope.as_value().to_string()),
            );
            out.push('\n');
        }
    }

    out
}

pub fn render_report(report: &AnalysisReport) -> String {
    let mut out = String::new();

    match report.score() {
        Some(score) => {
            let _ = writeln!(
                out,
                "Overall match: {}% - {}",
                score,
                report.category().label()
            );
        }
        None => out.push_str("Overall match: no score available\n"),
    }

    if !report.local_subscores.is_empty() {
        let subscores: Vec<String> = report
            .local_subscores
            .iter()
            .map(|(name, value)| format!("{} {}", name, value.round()))
            .collect();
        let _ = writeln!(out, "Subscores: {}", subscores.join(", "));
    }

    if let Some(words) = report.resume_word_count {
        let _ = writeln!(out, "Resume length: {} words", words);
    }

    keyword_line(&mut out, "Matched keywords", report.matched_keywords());
    keyword_line(&mut out, "Missing keywords", report.missing_keywords());

    section(&mut out, "Strengths", report.strengths());
    section(&mut out, "Gaps", report.gaps());
    section(
        &mut out,
        "Suggested rewrites",
        report.analysis.achievement_rewrites.iter(),
    );
    section(
        &mut out,
        "Formatting issues",
        report.analysis.formatting_issues.iter(),
    );
    section(&mut out, "Grammar issues", report.analysis.grammar_issues.iter());

    if let Some(recommendation) = report.recommendation() {
        let _ = write!(out, "\nRecommendation:\n  {}\n", recommendation);
    }

    out
}

fn keyword_line(out: &mut String, title: &str, keywords: &[String]) {
    if keywords.is_empty() {
        return;
    }
    let shown: Vec<&str> = keywords
        .iter()
        .take(MAX_KEYWORDS)
        .map(String::as_str)
        .collect();
    let _ = write!(out, "{}: {}", title, shown.join(", "));
    if keywords.len() > MAX_KEYWORDS {
        let _ = write!(out, " (+{} more)", keywords.len() - MAX_KEYWORDS);
    }
    out.push('\n');
}

fn section<'a>(out: &mut String, title: &str, items: impl Iterator<Item = &'a String>) {
    let mut items = items.peekable();
    if items.peek().is_none() {
        return;
    }
    let _ = writeln!(out, "\n{}:", title);
    for item in items {
        let _ = writeln!(out, "  - {}", item);
    }
}

/// One-line progress bar, e.g. `[#########.....] 60%`
pub fn render_progress(percent: u8) -> String {
    let percent = percent.min(100) as usize;
    let filled = percent * PROGRESS_WIDTH / 100;
    format!(
        "Processing… [{}{}] {}%",
        "#".repeat(filled),
        ".".repeat(PROGRESS_WIDTH - filled),
        percent
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::simulator::simulated_envelope;
    use crate::types::ResultSource;
    use serde_json::json;

    #[test]
    fn test_render_simulated_envelope() {
        let text = render_envelope(&simulated_envelope());

        assert!(text.starts_with("(simulated result"));
        assert!(text.contains("Overall match: 82% - High"));
        assert!(text.contains("Subscores: keywords 76, relevance 81"));
        assert!(text.contains("Matched keywords: React, Next.js, Tailwind"));
        assert!(text.contains("Missing keywords: Docker"));
        assert!(text.contains("Strengths:\n  - Component architecture\n  - Responsive UI"));
        assert!(text.contains("Grammar issues:\n  - Minor tense mix"));
        assert!(text.contains("Lead with measurable outcomes"));
    }

    #[test]
    fn test_render_caps_keywords() {
        let skills: Vec<String> = (0..15).map(|i| format!("skill{}", i)).collect();
        let envelope = AnalysisEnvelope::normalize(
            json!({ "overall_match_score": 30, "extracted_key_skills": skills }),
            ResultSource::Service,
        );
        let text = render_envelope(&envelope);

        assert!(text.contains("Overall match: 30% - Low"));
        assert!(text.contains("skill11 (+3 more)"));
        assert!(!text.contains("skill12"));
        assert!(!text.contains("simulated"));
    }

    #[test]
    fn test_render_falls_back_to_json() {
        let envelope = AnalysisEnvelope::normalize(
            json!({ "skill_gaps": 5 }),
            ResultSource::Service,
        );
        let text = render_envelope(&envelope);
        assert!(text.contains("\"skill_gaps\": 5"));
    }

    #[test]
    fn test_render_without_score() {
        let envelope = AnalysisEnvelope::normalize(json!({}), ResultSource::Service);
        assert!(render_envelope(&envelope).contains("no score available"));
    }

    #[test]
    fn test_render_progress() {
        assert_eq!(
            render_progress(0),
            format!("Processing… [{}] 0%", ".".repeat(30))
        );
        assert_eq!(
            render_progress(50),
            format!("Processing… [{}{}] 50%", "#".repeat(15), ".".repeat(15))
        );
        assert!(render_progress(200).ends_with("] 100%"));
    }
}
