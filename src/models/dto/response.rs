use serde::Serialize;

use crate::models::domain::{EvaluationResult, QuestionSet};

/// Successful body of `POST /api/chat`. Serialized without a wrapper so the
/// generate reply is `{"questions": [...]}` and the evaluate reply is the
/// grading object itself.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ChatResponse {
    Questions(QuestionSet),
    Evaluation(EvaluationResult),
}
