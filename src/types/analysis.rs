// src/types/analysis.rs
//! Lenient typed view over the analysis document, used for display only

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::envelope::ANALYSIS_KEY;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordAlignment {
    #[serde(default, deserialize_with = "nullable")]
    pub matched: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub missing: Vec<String>,
}

/// Every field is optional: services have shipped two document shapes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisDocument {
    #[serde(default)]
    pub overall_match_score: Option<f64>,
    #[serde(default)]
    pub keyword_alignment: Option<KeywordAlignment>,
    #[serde(default, deserialize_with = "nullable")]
    pub skill_strengths: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub skill_gaps: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub achievement_rewrites: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub formatting_issues: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub grammar_issues: Vec<String>,
    #[serde(default)]
    pub final_recommendation: Option<String>,

    // older document shape
    #[serde(default, deserialize_with = "nullable")]
    pub key_strengths: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub areas_for_improvement: Vec<String>,
    #[serde(default)]
    pub actionable_feedback: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub extracted_key_skills: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub missing_key_skills: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisReport {
    pub analysis: AnalysisDocument,
    pub local_subscores: BTreeMap<String, f64>,
    pub resume_word_count: Option<u64>,
}

impl AnalysisReport {
    /// Build from a normalized envelope body
    pub fn from_envelope(body: &Value) -> Result<Self, serde_json::Error> {
        let analysis = match body.get(ANALYSIS_KEY) {
            Some(doc) if doc.is_object() => AnalysisDocument::deserialize(doc)?,
            _ => AnalysisDocument::default(),
        };

        let local_subscores = match body.get("subscores_computed_locally") {
            Some(v) if !v.is_null() => BTreeMap::<String, f64>::deserialize(v)?,
            _ => BTreeMap::new(),
        };

        let resume_word_count = body.get("resume_word_count").and_then(Value::as_u64);

        Ok(Self {
            analysis,
            local_subscores,
            resume_word_count,
        })
    }

    /// Score rounded to a whole percentage, clamped to 0..=100
    pub fn score(&self) -> Option<u8> {
        self.analysis
            .overall_match_score
            .filter(|s| s.is_finite())
            .map(|s| s.round().clamp(0.0, 100.0) as u8)
    }

    pub fn category(&self) -> MatchCategory {
        MatchCategory::from_score(self.score())
    }

    pub fn matched_keywords(&self) -> &[String] {
        match &self.analysis.keyword_alignment {
            Some(k) if !k.matched.is_empty() => &k.matched,
            _ => &self.analysis.extracted_key_skills,
        }
    }

    pub fn missing_keywords(&self) -> &[String] {
        match &self.analysis.keyword_alignment {
            Some(k) if !k.missing.is_empty() => &k.missing,
            _ => &self.analysis.missing_key_skills,
        }
    }

    pub fn strengths(&self) -> impl Iterator<Item = &String> {
        self.analysis
            .skill_strengths
            .iter()
            .chain(self.analysis.key_strengths.iter())
    }

    pub fn gaps(&self) -> impl Iterator<Item = &String> {
        self.analysis
            .skill_gaps
            .iter()
            .chain(self.analysis.areas_for_improvement.iter())
    }

    pub fn recommendation(&self) -> Option<&str> {
        self.analysis
            .final_recommendation
            .as_deref()
            .or(self.analysis.actionable_feedback.as_deref())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchCategory {
    High,
    Medium,
    Low,
    Unknown,
}

impl MatchCategory {
    pub fn from_score(score: Option<u8>) -> Self {
        match score {
            None => Self::Unknown,
            Some(s) if s >= 75 => Self::High,
            Some(s) if s >= 50 => Self::Medium,
            Some(_) => Self::Low,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
            Self::Unknown => "N/A",
        }
    }
}

fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
