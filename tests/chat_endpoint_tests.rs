use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use actix_web::{http::StatusCode, test, web, App};
use async_trait::async_trait;
use serde_json::json;
use tokio::sync::mpsc;

use reading_quiz::{
    app_state::AppState,
    config::Config,
    errors::{AppError, AppResult},
    handlers,
    middleware::{RequestIdMiddleware, REQUEST_ID_HEADER},
    models::domain::{evaluation::NAILED_IT_GAPS, ProgressRecord},
    repositories::ProgressRepository,
    services::{
        chat_service::ChatService,
        llm_client::{GeminiClient, LlmClient},
        progress_service::ProgressService,
        prompt_builder::GenerationParams,
    },
};

/// Replies with a fixed text and remembers every prompt it was given.
struct ScriptedLlm {
    reply: String,
    prompts: Mutex<Vec<(String, f32)>>,
}

impl ScriptedLlm {
    fn new(reply: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.into(),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<(String, f32)> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn generate(&self, prompt: &str, params: &GenerationParams) -> AppResult<String> {
        self.prompts
            .lock()
            .unwrap()
            .push((prompt.to_string(), params.temperature));
        Ok(self.reply.clone())
    }

    fn is_configured(&self) -> bool {
        true
    }
}

/// Forwards every insert attempt to a channel, then succeeds or fails.
struct ChannelProgressRepository {
    sender: mpsc::UnboundedSender<ProgressRecord>,
    fail: bool,
}

#[async_trait]
impl ProgressRepository for ChannelProgressRepository {
    async fn insert(&self, record: ProgressRecord) -> AppResult<()> {
        let _ = self.sender.send(record);
        if self.fail {
            Err(AppError::PersistenceFailure("datastore unreachable".to_string()))
        } else {
            Ok(())
        }
    }

    async fn health_check(&self) -> AppResult<()> {
        Ok(())
    }
}

fn test_config() -> Config {
    Config {
        gemini_api_key: None,
        gemini_model: "gemini-2.5-flash".to_string(),
        gemini_base_url: "http://127.0.0.1:9".to_string(),
        llm_timeout_secs: None,
        mongo_conn_string: None,
        mongo_username: None,
        mongo_password: None,
        mongo_db_name: "reading-quiz-test".to_string(),
        progress_collection: "student_progress".to_string(),
        web_server_host: "127.0.0.1".to_string(),
        web_server_port: 0,
        allowed_origin: None,
        max_body_bytes: 64 * 1024,
    }
}

fn question_set_reply() -> String {
    let levels = [1, 1, 1, 2, 2, 2, 3, 3, 3, 3];
    let questions: Vec<_> = levels
        .iter()
        .enumerate()
        .map(|(i, level)| {
            json!({
                "question": format!("What does sentence {} say about the cat?", i + 1),
                "dok_level": level,
                "focus_points": ["cat", "sat"],
                "model_answer": "The cat sat."
            })
        })
        .collect();
    format!("```json\n{}\n```", json!({ "questions": questions }))
}

fn evaluate_body(user_response: &str, username: Option<&str>) -> serde_json::Value {
    let mut body = json!({
        "mode": "evaluate",
        "mentorText": "The cat sat.",
        "question": "Who sat?",
        "modelAnswer": "The cat sat.",
        "userResponse": user_response,
        "dokLevel": 3,
        "focusPoints": ["cat"]
    });
    if let Some(name) = username {
        body["username"] = json!(name);
    }
    body
}

macro_rules! init_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .wrap(RequestIdMiddleware)
                .configure(handlers::configure),
        )
        .await
    };
}

#[actix_web::test]
async fn generate_returns_ten_questions_with_valid_levels() {
    let llm = ScriptedLlm::new(question_set_reply());
    let state = AppState::from_parts(ChatService::new(llm.clone(), None), test_config());
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/chat")
        .set_payload(r#"{"mentorText":"The cat sat.","mode":"generate"}"#)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key(REQUEST_ID_HEADER));
    let json: serde_json::Value = test::read_body_json(resp).await;
    let questions = json["questions"].as_array().expect("questions array");
    assert_eq!(questions.len(), 10);
    for question in questions {
        let level = question["dok_level"].as_u64().expect("numeric dok_level");
        assert!((1..=3).contains(&level));
    }

    let calls = llm.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].0.contains("The cat sat."));
    assert_eq!(calls[0].1, 1.2);
}

#[actix_web::test]
async fn mastery_score_comes_back_with_sentinel_gaps() {
    let reply = json!({
        "score": 92,
        "strengths": "You named the cat.",
        "gaps": NAILED_IT_GAPS,
        "refined_version": "The cat is the one that sat."
    })
    .to_string();
    let llm = ScriptedLlm::new(reply);
    let state = AppState::from_parts(ChatService::new(llm.clone(), None), test_config());
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/chat")
        .set_json(evaluate_body("It was the cat", None))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let json: serde_json::Value = test::read_body_json(resp).await;
    assert!(json["score"].as_i64().unwrap() >= 90);
    assert_eq!(json["gaps"], NAILED_IT_GAPS);
    assert_eq!(llm.calls()[0].1, 0.4);
}

#[actix_web::test]
async fn missing_api_key_fails_every_request() {
    let config = test_config();
    let llm = Arc::new(GeminiClient::from_config(&config).unwrap());
    let state = AppState::from_parts(ChatService::new(llm, None), config);
    let app = init_app!(state);

    for body in [
        json!({"mode": "generate", "mentorText": "The cat sat."}),
        evaluate_body("I don't know", Some("maya")),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/chat")
            .set_json(body)
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(json["error"], "AI failed to process the request.");
        assert!(json["details"].as_str().unwrap().contains("GEMINI_API_KEY"));
    }
}

#[actix_web::test]
async fn persistence_failure_does_not_change_the_response() {
    let reply = json!({
        "score": 0,
        "strengths": "Thanks for trying.",
        "gaps": "Say who sat.",
        "refined_version": "The cat sat."
    })
    .to_string();
    let (sender, mut receiver) = mpsc::unbounded_channel();
    let repository = Arc::new(ChannelProgressRepository { sender, fail: true });
    let progress = Arc::new(ProgressService::new(repository));
    let state = AppState::from_parts(
        ChatService::new(ScriptedLlm::new(reply), Some(progress)),
        test_config(),
    );
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/chat")
        .set_json(evaluate_body("I don't know", Some("maya")))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let json: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(json["score"], 0);
    for key in ["strengths", "gaps", "refined_version"] {
        assert!(json[key].is_string(), "missing {}", key);
    }

    let attempted = tokio::time::timeout(Duration::from_secs(2), receiver.recv())
        .await
        .expect("insert should be attempted")
        .expect("channel open");
    assert_eq!(attempted.username, "maya");
    assert_eq!(attempted.earned_points, 0.0);
}

#[actix_web::test]
async fn successful_evaluation_is_recorded_with_dok_weighting() {
    let reply = json!({
        "score": 80,
        "strengths": "Good.",
        "gaps": "Add where it sat.",
        "refined_version": "The cat sat down."
    })
    .to_string();
    let (sender, mut receiver) = mpsc::unbounded_channel();
    let repository = Arc::new(ChannelProgressRepository { sender, fail: false });
    let progress = Arc::new(ProgressService::new(repository));
    let state = AppState::from_parts(
        ChatService::new(ScriptedLlm::new(reply), Some(progress)),
        test_config(),
    );
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/chat")
        .set_json(evaluate_body("The cat", Some("maya")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let record = tokio::time::timeout(Duration::from_secs(2), receiver.recv())
        .await
        .expect("insert should be attempted")
        .expect("channel open");
    assert_eq!(record.question, "Who sat?");
    assert_eq!(record.dok_level, 3);
    assert_eq!(record.score, 80.0);
    assert!((record.earned_points - 4.0).abs() < 1e-9);
}

#[actix_web::test]
async fn anonymous_evaluation_is_not_recorded() {
    let reply = json!({
        "score": 50,
        "strengths": "Okay.",
        "gaps": "More detail.",
        "refined_version": "The cat sat."
    })
    .to_string();
    let (sender, mut receiver) = mpsc::unbounded_channel();
    let repository = Arc::new(ChannelProgressRepository { sender, fail: false });
    let progress = Arc::new(ProgressService::new(repository));
    let state = AppState::from_parts(
        ChatService::new(ScriptedLlm::new(reply), Some(progress)),
        test_config(),
    );
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/chat")
        .set_json(evaluate_body("A cat", None))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let attempt = tokio::time::timeout(Duration::from_millis(200), receiver.recv()).await;
    assert!(attempt.is_err(), "no insert expected without a username");
}

#[actix_web::test]
async fn get_is_rejected_before_any_model_call() {
    let llm = ScriptedLlm::new(question_set_reply());
    let state = AppState::from_parts(ChatService::new(llm.clone(), None), test_config());
    let app = init_app!(state);

    let req = test::TestRequest::get().uri("/api/chat").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert!(llm.calls().is_empty());
}

#[actix_web::test]
async fn missing_required_fields_are_reported() {
    let llm = ScriptedLlm::new("{}");
    let state = AppState::from_parts(ChatService::new(llm.clone(), None), test_config());
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/chat")
        .set_json(json!({"mode": "evaluate", "mentorText": "The cat sat.", "question": "Who sat?"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json: serde_json::Value = test::read_body_json(resp).await;
    let details = json["details"].as_str().unwrap();
    assert!(details.contains("modelAnswer"));
    assert!(details.contains("userResponse"));
    assert!(!details.contains("model_answer"));
    assert!(llm.calls().is_empty());
}

#[actix_web::test]
async fn model_prose_instead_of_json_is_a_service_error() {
    let llm = ScriptedLlm::new("I'm sorry, I can't help with that.");
    let state = AppState::from_parts(ChatService::new(llm, None), test_config());
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/chat")
        .set_json(json!({"mode": "generate", "mentorText": "The cat sat."}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json: serde_json::Value = test::read_body_json(resp).await;
    assert!(json["details"].as_str().unwrap().contains("Malformed model response"));
}
