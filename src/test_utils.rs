#[cfg(test)]
pub mod fixtures {
    use crate::models::{
        domain::{
            evaluation::NAILED_IT_GAPS, EvaluationResult, Question, QuestionSet,
        },
        dto::request::EvaluationRequest,
    };

    /// Builds a set with one question per entry of `levels`.
    pub fn question_set_with_levels(levels: &[u8]) -> QuestionSet {
        QuestionSet::new(
            levels
                .iter()
                .enumerate()
                .map(|(i, level)| Question {
                    question: format!("Question {} about the cat?", i + 1),
                    dok_level: *level,
                    focus_points: vec!["cat".to_string()],
                    model_answer: format!("Answer {}.", i + 1),
                    extra: Default::default(),
                })
                .collect(),
        )
    }

    /// Ten questions split 3/3/4.
    pub fn sample_question_set() -> QuestionSet {
        question_set_with_levels(&[1, 1, 1, 2, 2, 2, 3, 3, 3, 3])
    }

    pub fn sample_question_set_json() -> String {
        serde_json::to_string_pretty(&sample_question_set()).expect("fixture should serialize")
    }

    /// Grading that follows the rubric: the sentinel gaps text at 90 and up.
    pub fn sample_evaluation(score: i64) -> EvaluationResult {
        let gaps = if score >= 90 {
            NAILED_IT_GAPS
        } else {
            "Mention where the cat sat."
        };
        EvaluationResult::new(score, "You spotted who sat.", gaps, "The cat sat on the mat.")
    }

    pub fn sample_evaluation_json(score: i64) -> String {
        serde_json::to_string(&sample_evaluation(score)).expect("fixture should serialize")
    }

    pub fn evaluation_request(user_response: &str) -> EvaluationRequest {
        EvaluationRequest {
            mentor_text: "The cat sat.".to_string(),
            question: "Who sat?".to_string(),
            model_answer: "The cat sat.".to_string(),
            user_response: user_response.to_string(),
            dok_level: Some(1),
            focus_points: vec!["cat".to_string(), "sitting".to_string()],
            username: Some("maya".to_string()),
        }
    }
}

#[cfg(test)]
pub mod test_helpers {
    use actix_web::http::StatusCode;

    /// Asserts that a status code represents an error (4xx or 5xx)
    pub fn assert_error_status(status: StatusCode) {
        assert!(
            status.is_client_error() || status.is_server_error(),
            "Expected error status, got: {}",
            status
        );
    }

    /// Asserts that a status code represents success (2xx)
    pub fn assert_success_status(status: StatusCode) {
        assert!(
            status.is_success(),
            "Expected success status, got: {}",
            status
        );
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::test_helpers::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_fixtures_question_set_is_well_formed() {
        let set = sample_question_set();
        assert_eq!(set.questions.len(), 10);
        assert_eq!(set.dok_distribution(), [3, 3, 4]);
    }

    #[test]
    fn test_fixtures_evaluation_follows_rubric() {
        assert!(sample_evaluation(95).policy_violations().is_empty());
        assert!(sample_evaluation(45).policy_violations().is_empty());
    }

    #[test]
    fn test_status_helpers() {
        assert_success_status(StatusCode::OK);
        assert_error_status(StatusCode::METHOD_NOT_ALLOWED);
    }
}
