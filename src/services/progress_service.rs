use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::{
    models::{
        domain::{EvaluationResult, ProgressRecord},
        dto::request::EvaluationRequest,
    },
    repositories::ProgressRepository,
};

/// Best-effort recording of graded answers.
///
/// Each evaluation gets at most one insert attempt, made on a detached task.
/// A failed insert is logged and never reaches the HTTP response.
pub struct ProgressService {
    repository: Arc<dyn ProgressRepository>,
}

impl ProgressService {
    pub fn new(repository: Arc<dyn ProgressRepository>) -> Self {
        Self { repository }
    }

    /// Builds the record for a graded answer, or `None` when no username was
    /// supplied or the score is not a number.
    pub fn record_for(
        request: &EvaluationRequest,
        result: &EvaluationResult,
    ) -> Option<ProgressRecord> {
        let username = request.username.as_deref()?;
        let Some(score) = result.numeric_score() else {
            log::warn!("Progress not saved for {}: score {} is not a number", username, result.score);
            return None;
        };
        Some(ProgressRecord::new(
            username,
            &request.question,
            request.dok_level,
            score,
        ))
    }

    /// Spawns the insert. The handle resolves to whether the write succeeded;
    /// callers on the request path drop it.
    pub fn record(
        &self,
        request: &EvaluationRequest,
        result: &EvaluationResult,
    ) -> Option<JoinHandle<bool>> {
        let record = Self::record_for(request, result)?;
        let repository = Arc::clone(&self.repository);

        Some(tokio::spawn(async move {
            let username = record.username.clone();
            match repository.insert(record).await {
                Ok(()) => {
                    log::info!("Saved progress for {}", username);
                    true
                }
                Err(e) => {
                    log::error!("Progress save failed for {}: {}", username, e);
                    false
                }
            }
        }))
    }

    pub async fn health_check(&self) -> bool {
        self.repository.health_check().await.is_ok()
    }
}
