use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::errors::{AppError, AppResult};

/// Body of `POST /api/chat`. `mode` selects which of the other fields matter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mentor_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dok_level: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus_points: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatMode {
    Generate,
    Evaluate,
}

impl ChatMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatMode::Generate => "generate",
            ChatMode::Evaluate => "evaluate",
        }
    }
}

impl std::str::FromStr for ChatMode {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "generate" => Ok(ChatMode::Generate),
            "evaluate" => Ok(ChatMode::Evaluate),
            other => Err(AppError::InvalidMode(format!(
                "'{}' is not one of generate, evaluate",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct GenerationRequest {
    #[validate(length(min = 1))]
    pub mentor_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct EvaluationRequest {
    #[validate(length(min = 1))]
    pub mentor_text: String,

    #[validate(length(min = 1))]
    pub question: String,

    #[validate(length(min = 1))]
    pub model_answer: String,

    #[validate(length(min = 1))]
    pub user_response: String,

    pub dok_level: Option<u8>,
    pub focus_points: Vec<String>,
    pub username: Option<String>,
}

/// A request whose mode and required fields have been checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    Generate(GenerationRequest),
    Evaluate(EvaluationRequest),
}

impl ChatCommand {
    pub fn mode(&self) -> ChatMode {
        match self {
            ChatCommand::Generate(_) => ChatMode::Generate,
            ChatCommand::Evaluate(_) => ChatMode::Evaluate,
        }
    }
}

impl TryFrom<ChatRequest> for ChatCommand {
    type Error = AppError;

    fn try_from(request: ChatRequest) -> AppResult<Self> {
        let mode: ChatMode = request
            .mode
            .as_deref()
            .ok_or_else(|| AppError::InvalidMode("mode is missing".to_string()))?
            .parse()?;

        match mode {
            ChatMode::Generate => {
                let command = GenerationRequest {
                    mentor_text: blank_to_empty(request.mentor_text),
                };
                command.validate()?;
                Ok(ChatCommand::Generate(command))
            }
            ChatMode::Evaluate => {
                let command = EvaluationRequest {
                    mentor_text: blank_to_empty(request.mentor_text),
                    question: blank_to_empty(request.question),
                    model_answer: blank_to_empty(request.model_answer),
                    user_response: blank_to_empty(request.user_response),
                    dok_level: request.dok_level,
                    focus_points: request.focus_points.unwrap_or_default(),
                    username: request.username.filter(|u| !u.trim().is_empty()),
                };
                command.validate()?;
                Ok(ChatCommand::Evaluate(command))
            }
        }
    }
}

impl ChatRequest {
    pub fn generate(mentor_text: impl Into<String>) -> Self {
        ChatRequest {
            mode: Some(ChatMode::Generate.as_str().to_string()),
            mentor_text: Some(mentor_text.into()),
            ..Default::default()
        }
    }

    pub fn evaluate(request: EvaluationRequest) -> Self {
        ChatRequest {
            mode: Some(ChatMode::Evaluate.as_str().to_string()),
            mentor_text: Some(request.mentor_text),
            question: Some(request.question),
            model_answer: Some(request.model_answer),
            user_response: Some(request.user_response),
            dok_level: request.dok_level,
            focus_points: Some(request.focus_points),
            username: request.username,
        }
    }
}

// Whitespace-only text counts as missing but is otherwise kept verbatim.
fn blank_to_empty(value: Option<String>) -> String {
    value.filter(|v| !v.trim().is_empty()).unwrap_or_default()
}
