use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Serialize;

use crate::{
    constants::prompts::{ANSWER_EVALUATION_PROMPT, QUESTION_GENERATION_PROMPT},
    errors::AppResult,
    models::{
        domain::evaluation::NAILED_IT_GAPS,
        dto::request::{ChatCommand, ChatRequest, EvaluationRequest, GenerationRequest},
    },
};

pub const JSON_MIME_TYPE: &str = "application/json";

static PLACEHOLDER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{([a-z_]+)\}").expect("PLACEHOLDER_REGEX is a valid regex pattern")
});

/// Sampling settings sent alongside a prompt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationParams {
    pub temperature: f32,
    pub top_k: Option<u32>,
    pub top_p: Option<f32>,
    pub response_mime_type: &'static str,
}

impl GenerationParams {
    /// Wide sampling so repeated generations over one text differ.
    pub fn question_generation() -> Self {
        Self {
            temperature: 1.2,
            top_k: Some(64),
            top_p: Some(0.95),
            response_mime_type: JSON_MIME_TYPE,
        }
    }

    /// Narrow sampling so grading stays stable.
    pub fn answer_evaluation() -> Self {
        Self {
            temperature: 0.4,
            top_k: None,
            top_p: None,
            response_mime_type: JSON_MIME_TYPE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub text: String,
    pub params: GenerationParams,
}

/// A validated command together with the prompt built from it.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedPrompt {
    pub command: ChatCommand,
    pub prompt: Prompt,
}

/// Checks mode and required fields, then builds the prompt.
pub fn prepare(request: ChatRequest) -> AppResult<PreparedPrompt> {
    let command = ChatCommand::try_from(request)?;
    let prompt = build_prompt(&command);
    Ok(PreparedPrompt { command, prompt })
}

pub fn build_prompt(command: &ChatCommand) -> Prompt {
    match command {
        ChatCommand::Generate(request) => generation_prompt(request),
        ChatCommand::Evaluate(request) => evaluation_prompt(request),
    }
}

fn generation_prompt(request: &GenerationRequest) -> Prompt {
    let values = HashMap::from([("mentor_text", request.mentor_text.clone())]);

    Prompt {
        text: fill_template(QUESTION_GENERATION_PROMPT, &values),
        params: GenerationParams::question_generation(),
    }
}

fn evaluation_prompt(request: &EvaluationRequest) -> Prompt {
    let focus_points = if request.focus_points.is_empty() {
        "None specified".to_string()
    } else {
        request.focus_points.join(", ")
    };
    let dok_level = request
        .dok_level
        .map(|level| level.to_string())
        .unwrap_or_else(|| "Not specified".to_string());

    let values = HashMap::from([
        ("mentor_text", request.mentor_text.clone()),
        ("question", request.question.clone()),
        ("model_answer", request.model_answer.clone()),
        ("focus_points", focus_points),
        ("user_response", request.user_response.clone()),
        ("dok_level", dok_level),
        ("nailed_it", NAILED_IT_GAPS.to_string()),
    ]);

    Prompt {
        text: fill_template(ANSWER_EVALUATION_PROMPT, &values),
        params: GenerationParams::answer_evaluation(),
    }
}

// Single pass, so braces inside substituted user text are never expanded.
fn fill_template(template: &str, values: &HashMap<&str, String>) -> String {
    PLACEHOLDER_REGEX
        .replace_all(template, |caps: &Captures| match values.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}
