use crate::{
    client::{ClientError, ClientResult},
    models::{
        domain::{EvaluationResult, Question, QuestionSet},
        dto::request::EvaluationRequest,
    },
};

/// Quiz state for one learner.
///
/// The mentor text is locked when a generation starts and stays fixed until
/// the next generation, so answers are always graded against the text the
/// questions came from. `loading` is advisory: nothing stops a caller from
/// issuing a second request while it is set.
#[derive(Debug, Clone, Default)]
pub struct QuizSession {
    questions: Vec<Question>,
    current_index: usize,
    locked_mentor_text: Option<String>,
    loading: bool,
    last_feedback: Option<EvaluationResult>,
}

impl QuizSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Locks `mentor_text` for the coming question set. The previous answer
    /// key stays until [`apply_question_set`](Self::apply_question_set)
    /// replaces it.
    pub fn begin_generation(&mut self, mentor_text: &str) -> ClientResult<&str> {
        if mentor_text.trim().is_empty() {
            return Err(ClientError::EmptyMentorText);
        }
        self.locked_mentor_text = Some(mentor_text.to_string());
        self.loading = true;
        Ok(self.locked_mentor_text.as_deref().unwrap_or_default())
    }

    pub fn apply_question_set(&mut self, set: QuestionSet) -> ClientResult<()> {
        self.loading = false;
        if set.questions.is_empty() {
            return Err(ClientError::EmptyQuestionSet);
        }
        self.questions = set.questions;
        self.current_index = 0;
        self.last_feedback = None;
        Ok(())
    }

    /// Builds the grading request for the question on screen.
    pub fn evaluation_request(
        &mut self,
        user_response: &str,
        username: Option<&str>,
    ) -> ClientResult<EvaluationRequest> {
        if user_response.trim().is_empty() {
            return Err(ClientError::EmptyAnswer);
        }
        let question = self.current_question().ok_or(ClientError::NoActiveQuestion)?;
        let mentor_text = self
            .locked_mentor_text
            .clone()
            .ok_or(ClientError::NoActiveQuestion)?;

        let request = EvaluationRequest {
            mentor_text,
            question: question.question.clone(),
            model_answer: question.model_answer.clone(),
            user_response: user_response.to_string(),
            // 0 marks a level the model left unreadable.
            dok_level: Some(question.dok_level).filter(|level| *level != 0),
            focus_points: question.focus_points.clone(),
            username: username.map(str::to_string),
        };
        self.loading = true;
        Ok(request)
    }

    pub fn record_feedback(&mut self, result: EvaluationResult) {
        self.loading = false;
        self.last_feedback = Some(result);
    }

    /// Clears the loading flag after a failed request.
    pub fn finish_loading(&mut self) {
        self.loading = false;
    }

    /// Moves to the next question. Returns `false` on the last one.
    pub fn next_question(&mut self) -> bool {
        if self.current_index + 1 < self.questions.len() {
            self.current_index += 1;
            self.last_feedback = None;
            true
        } else {
            false
        }
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn locked_mentor_text(&self) -> Option<&str> {
        self.locked_mentor_text.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn last_feedback(&self) -> Option<&EvaluationResult> {
        self.last_feedback.as_ref()
    }
}
