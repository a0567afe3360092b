use std::sync::Arc;

use crate::{
    errors::AppResult,
    models::dto::{
        request::{ChatCommand, ChatRequest},
        response::ChatResponse,
    },
    services::{
        llm_client::LlmClient, progress_service::ProgressService, prompt_builder,
        response_normalizer,
    },
};

/// Runs one `/api/chat` call: build the prompt, call the model, normalize,
/// then hand graded answers to the progress hook.
pub struct ChatService {
    llm: Arc<dyn LlmClient>,
    progress: Option<Arc<ProgressService>>,
}

impl ChatService {
    pub fn new(llm: Arc<dyn LlmClient>, progress: Option<Arc<ProgressService>>) -> Self {
        Self { llm, progress }
    }

    pub async fn handle(&self, request: ChatRequest) -> AppResult<ChatResponse> {
        let prepared = prompt_builder::prepare(request)?;
        let mode = prepared.command.mode();
        log::info!("Handling {} request", mode.as_str());

        let raw = self
            .llm
            .generate(&prepared.prompt.text, &prepared.prompt.params)
            .await?;

        let response = response_normalizer::normalize(mode, &raw)?;

        if let (ChatCommand::Evaluate(request), ChatResponse::Evaluation(result)) =
            (&prepared.command, &response)
        {
            match &self.progress {
                Some(progress) => {
                    // Detached; the outcome is only logged.
                    let _ = progress.record(request, result);
                }
                None if request.username.is_some() => {
                    log::debug!("Persistence disabled; progress not saved");
                }
                None => {}
            }
        }

        Ok(response)
    }

    pub fn llm_configured(&self) -> bool {
        self.llm.is_configured()
    }

    pub fn progress(&self) -> Option<&Arc<ProgressService>> {
        self.progress.as_ref()
    }
}
