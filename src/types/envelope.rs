// src/types/envelope.rs
//! Uniform `{ gemini_analysis: ... }` wrapper handed to callers

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use super::analysis::AnalysisReport;

pub const ANALYSIS_KEY: &str = "gemini_analysis";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultSource {
    Service,
    Simulated,
}

/// Normalized analysis result. The inner document is not schema-checked.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisEnvelope {
    body: Value,
    source: ResultSource,
}

impl AnalysisEnvelope {
    /// Wrap `body` under the analysis key unless it already carries it
    pub fn normalize(body: Value, source: ResultSource) -> Self {
        let body = if has_analysis(&body) {
            body
        } else {
            let mut wrapper = Map::new();
            wrapper.insert(ANALYSIS_KEY.to_string(), body);
            Value::Object(wrapper)
        };

        Self { body, source }
    }

    pub fn source(&self) -> ResultSource {
        self.source
    }

    pub fn is_simulated(&self) -> bool {
        self.source == ResultSource::Simulated
    }

    /// The nested analysis document
    pub fn analysis(&self) -> &Value {
        &self.body[ANALYSIS_KEY]
    }

    pub fn as_value(&self) -> &Value {
        &self.body
    }

    pub fn into_value(self) -> Value {
        self.body
    }

    /// Lenient typed view for display
    pub fn report(&self) -> Result<AnalysisReport, serde_json::Error> {
        AnalysisReport::from_envelope(&self.body)
    }
}

impl Serialize for AnalysisEnvelope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.body.serialize(serializer)
    }
}

/// The key counts only when its value is truthy; `null`, `false`, `0` and `""` are absent
fn has_analysis(body: &Value) -> bool {
    match body.get(ANALYSIS_KEY) {
        None | Some(Value::Null) | Some(Value::Bool(false)) => false,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}
