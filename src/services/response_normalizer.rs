use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{EvaluationResult, QuestionSet},
        dto::{request::ChatMode, response::ChatResponse},
    },
};

static LEADING_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\A\s*```(?:json)?[ \t]*\r?\n?").expect("LEADING_FENCE is a valid regex pattern")
});

static TRAILING_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\r?\n?[ \t]*```\s*\z").expect("TRAILING_FENCE is a valid regex pattern")
});

const EVALUATION_KEYS: [&str; 4] = ["score", "strengths", "gaps", "refined_version"];

/// Drops a surrounding code fence (optionally tagged `json`) and trims.
pub fn strip_code_fence(raw: &str) -> String {
    let without_leading = LEADING_FENCE.replace(raw, "");
    let without_trailing = TRAILING_FENCE.replace(&without_leading, "");
    without_trailing.trim().to_string()
}

/// Parses raw model text into JSON after removing any fence.
pub fn parse_json(raw: &str) -> AppResult<Value> {
    let cleaned = strip_code_fence(raw);
    serde_json::from_str(&cleaned)
        .map_err(|e| AppError::MalformedResponse(format!("model output is not JSON: {}", e)))
}

pub fn normalize_question_set(raw: &str) -> AppResult<QuestionSet> {
    let value = parse_json(raw)?;
    let object = value
        .as_object()
        .ok_or_else(|| AppError::MalformedResponse("expected a JSON object".to_string()))?;

    match object.get("questions") {
        Some(Value::Array(_)) => {}
        Some(_) => {
            return Err(AppError::MalformedResponse(
                "'questions' is not an array".to_string(),
            ))
        }
        None => return Err(AppError::MalformedResponse("missing key 'questions'".to_string())),
    }

    let set: QuestionSet = into_typed(value)?;
    for violation in set.policy_violations() {
        log::warn!("Question set departs from the generation contract: {}", violation);
    }
    Ok(set)
}

pub fn normalize_evaluation(raw: &str) -> AppResult<EvaluationResult> {
    let value = parse_json(raw)?;
    let object = value
        .as_object()
        .ok_or_else(|| AppError::MalformedResponse("expected a JSON object".to_string()))?;

    let missing: Vec<&str> = EVALUATION_KEYS
        .iter()
        .copied()
        .filter(|key| !object.contains_key(*key))
        .collect();
    if !missing.is_empty() {
        return Err(AppError::MalformedResponse(format!(
            "missing keys {}",
            missing.join(", ")
        )));
    }

    let result: EvaluationResult = into_typed(value)?;
    for violation in result.policy_violations() {
        log::warn!("Evaluation departs from the grading rubric: {}", violation);
    }
    Ok(result)
}

pub fn normalize(mode: ChatMode, raw: &str) -> AppResult<ChatResponse> {
    match mode {
        ChatMode::Generate => normalize_question_set(raw).map(ChatResponse::Questions),
        ChatMode::Evaluate => normalize_evaluation(raw).map(ChatResponse::Evaluation),
    }
}

fn into_typed<T: DeserializeOwned>(value: Value) -> AppResult<T> {
    serde_json::from_value(value)
        .map_err(|e| AppError::MalformedResponse(format!("unexpected shape: {}", e)))
}
