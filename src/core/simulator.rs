// src/core/simulator.rs
//! Offline stand-in for the analysis service

use rand::Rng;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

use super::progress::StatusPublisher;
use crate::config::SimulationConfig;
use crate::types::{AnalysisEnvelope, ResultSource};

const FIRST_PERCENT: u8 = 5;
const CEILING_PERCENT: u8 = 88;
const MIN_STEP: u8 = 4;
const MAX_STEP: u8 = 9;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressStep {
    pub delay: Duration,
    pub percent: u8,
}

/// Synthetic progress sequence followed by a settle pause
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationPlan {
    pub steps: Vec<ProgressStep>,
    pub settle_pause: Duration,
}

impl SimulationPlan {
    /// Steps start at 5, climb irregularly while staying at or below 88, then jump to 100
    pub fn generate<R: Rng>(config: &SimulationConfig, rng: &mut R) -> Self {
        let mut steps = Vec::new();
        let mut percent = FIRST_PERCENT;
        loop {
            let delay_ms = rng.gen_range(config.step_delay_min_ms..=config.step_delay_max_ms);
            steps.push(ProgressStep {
                delay: Duration::from_millis(delay_ms),
                percent,
            });
            let next = percent + rng.gen_range(MIN_STEP..=MAX_STEP);
            if next > CEILING_PERCENT {
                break;
            }
            percent = next;
        }

        steps.push(ProgressStep {
            delay: Duration::ZERO,
            percent: 100,
        });

        Self {
            steps,
            settle_pause: Duration::from_millis(config.settle_pause_ms),
        }
    }

    /// Play the plan against the status channel
    pub async fn run(&self, publisher: &StatusPublisher) {
        for step in &self.steps {
            if !step.delay.is_zero() {
                tokio::time::sleep(step.delay).await;
            }
            publisher.advance(step.percent);
            debug!("Simulated progress: {}%", step.percent);
        }

        if !self.settle_pause.is_zero() {
            tokio::time::sleep(self.settle_pause).await;
        }
    }
}

/// Fixed example result returned in simulated mode
pub fn simulated_payload() -> Value {
    json!({
        "gemini_analysis": {
            "overall_match_score": 82,
            "keyword_alignment": {
                "matched": ["React", "Next.js", "Tailwind"],
                "missing": ["Docker"]
            },
            "skill_strengths": ["Component architecture", "Responsive UI"],
            "skill_gaps": ["Testing"],
            "achievement_rewrites": ["Reduced bundle size by 25% — updated"],
            "formatting_issues": ["Inconsistent bullet styles"],
            "grammar_issues": ["Minor tense mix"],
            "final_recommendation": "Lead with measurable outcomes and add a short summary."
        },
        "subscores_computed_locally": { "relevance": 81, "keywords": 76 }
    })
}

pub fn simulated_envelope() -> AnalysisEnvelope {
    AnalysisEnvelope::normalize(simulated_payload(), ResultSource::Simulated)
}
