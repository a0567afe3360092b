use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored level when the request did not carry one.
pub const DEFAULT_DOK_LEVEL: u8 = 1;

/// Row appended to `student_progress` after a graded answer.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ProgressRecord {
    pub username: String,
    pub question: String,
    pub dok_level: u8,
    pub score: f64,
    pub earned_points: f64,
    pub recorded_at: DateTime<Utc>,
}

/// Points a question is worth by DOK level. Any other level, or none at all,
/// counts as 5.
pub fn points_possible(dok_level: Option<u8>) -> u32 {
    match dok_level {
        Some(1) => 1,
        Some(2) => 3,
        _ => 5,
    }
}

pub fn earned_points(dok_level: Option<u8>, score: f64) -> f64 {
    f64::from(points_possible(dok_level)) * (score / 100.0)
}

impl ProgressRecord {
    /// A missing level is stored as [`DEFAULT_DOK_LEVEL`] but weighted as an
    /// unknown level.
    pub fn new(username: &str, question: &str, dok_level: Option<u8>, score: f64) -> Self {
        ProgressRecord {
            username: username.to_string(),
            question: question.to_string(),
            dok_level: dok_level.unwrap_or(DEFAULT_DOK_LEVEL),
            score,
            earned_points: earned_points(dok_level, score),
            recorded_at: Utc::now(),
        }
    }
}
