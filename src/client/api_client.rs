use serde::de::DeserializeOwned;

use crate::{
    client::{ClientError, ClientResult},
    errors::ErrorResponse,
    models::{
        domain::{EvaluationResult, QuestionSet},
        dto::request::{ChatRequest, EvaluationRequest},
    },
};

/// HTTP client for `POST /api/chat`. One attempt per call.
#[derive(Clone)]
pub struct ChatApiClient {
    http: reqwest::Client,
    endpoint: String,
}

impl ChatApiClient {
    pub fn new(server_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: format!("{}/api/chat", server_url.trim_end_matches('/')),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn generate(&self, mentor_text: &str) -> ClientResult<QuestionSet> {
        let set: QuestionSet = self.post(&ChatRequest::generate(mentor_text)).await?;
        if set.questions.is_empty() {
            return Err(ClientError::EmptyQuestionSet);
        }
        Ok(set)
    }

    pub async fn evaluate(&self, request: EvaluationRequest) -> ClientResult<EvaluationResult> {
        self.post(&ChatRequest::evaluate(request)).await
    }

    async fn post<T: DeserializeOwned>(&self, body: &ChatRequest) -> ClientResult<T> {
        let response = self.http.post(&self.endpoint).json(body).send().await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let (error, details) = match serde_json::from_str::<ErrorResponse>(&text) {
                Ok(body) => (body.error, body.details),
                Err(_) => (text, None),
            };
            return Err(ClientError::Service {
                status: status.as_u16(),
                error,
                details,
            });
        }

        Ok(serde_json::from_str(&text)?)
    }
}
