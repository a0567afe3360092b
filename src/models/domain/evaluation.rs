use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The only `gaps` text allowed once the curved score reaches
/// [`MASTERY_THRESHOLD`].
pub const NAILED_IT_GAPS: &str = "None! You nailed it.";

pub const MASTERY_THRESHOLD: f64 = 90.0;

/// Grading returned by the model. `score` is kept exactly as the model wrote
/// it (85, 85.5 or "85"); use [`numeric_score`](Self::numeric_score) to read it.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct EvaluationResult {
    pub score: Value,
    pub strengths: String,
    pub gaps: String,
    pub refined_version: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EvaluationResult {
    pub fn new(
        score: impl Into<Value>,
        strengths: impl Into<String>,
        gaps: impl Into<String>,
        refined_version: impl Into<String>,
    ) -> Self {
        Self {
            score: score.into(),
            strengths: strengths.into(),
            gaps: gaps.into(),
            refined_version: refined_version.into(),
            extra: Map::new(),
        }
    }

    /// The score as a number. Models sometimes answer "85" or "85%" instead
    /// of 85.
    pub fn numeric_score(&self) -> Option<f64> {
        match &self.score {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().trim_end_matches('%').trim().parse().ok(),
            _ => None,
        }
    }

    /// The score for display, without JSON quoting.
    pub fn score_text(&self) -> String {
        match &self.score {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    /// Ways the grading output departs from the rubric. Reported, never
    /// corrected.
    pub fn policy_violations(&self) -> Vec<String> {
        let mut violations = Vec::new();

        let Some(score) = self.numeric_score() else {
            violations.push(format!("score {} is not a number", self.score));
            return violations;
        };

        if !(0.0..=100.0).contains(&score) {
            violations.push(format!("score {} outside 0-100", score));
        }
        if score >= MASTERY_THRESHOLD && self.gaps != NAILED_IT_GAPS {
            violations.push(format!(
                "score {} requires gaps \"{}\", got \"{}\"",
                score, NAILED_IT_GAPS, self.gaps
            ));
        }

        violations
    }
}
