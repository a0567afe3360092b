use std::env;

use secrecy::SecretString;

#[derive(Clone, Debug)]
pub struct Config {
    pub gemini_api_key: Option<SecretString>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub llm_timeout_secs: Option<u64>,
    pub mongo_conn_string: Option<String>,
    pub mongo_username: Option<String>,
    pub mongo_password: Option<SecretString>,
    pub mongo_db_name: String,
    pub progress_collection: String,
    pub web_server_host: String,
    pub web_server_port: u16,
    pub allowed_origin: Option<String>,
    pub max_body_bytes: usize,
}

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
/// Larger `/api/chat` bodies fail like any other bad body.
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

impl Config {
    pub fn from_env() -> Self {
        Self {
            gemini_api_key: non_empty_var("GEMINI_API_KEY").map(SecretString::from),
            gemini_model: env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string()),
            gemini_base_url: env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_BASE_URL.to_string()),
            llm_timeout_secs: env::var("LLM_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok()),
            mongo_conn_string: non_empty_var("MONGO_CONN_STRING"),
            mongo_username: non_empty_var("MONGO_USERNAME"),
            mongo_password: non_empty_var("MONGO_PASSWORD").map(SecretString::from),
            mongo_db_name: env::var("MONGO_DB_NAME")
                .unwrap_or_else(|_| "reading-quiz".to_string()),
            progress_collection: env::var("PROGRESS_COLLECTION")
                .unwrap_or_else(|_| "student_progress".to_string()),
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "127.0.0.1".to_string()),
            web_server_port: env::var("WEB_SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            allowed_origin: non_empty_var("ALLOWED_ORIGIN"),
            max_body_bytes: env::var("MAX_BODY_BYTES")
                .ok()
                .and_then(|b| b.parse().ok())
                .unwrap_or(DEFAULT_MAX_BODY_BYTES),
        }
    }

    pub fn persistence_enabled(&self) -> bool {
        self.mongo_conn_string.is_some()
    }

    /// Logs what is missing. Nothing here is fatal at startup: a missing key
    /// fails each chat request instead, and a missing datastore disables
    /// persistence.
    pub fn warn_on_missing(&self) {
        if self.gemini_api_key.is_none() {
            log::warn!("GEMINI_API_KEY is not set; every /api/chat request will fail");
        }
        if !self.persistence_enabled() {
            log::warn!("MONGO_CONN_STRING is not set; progress persistence is disabled");
        }
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            gemini_api_key: Some(SecretString::from("test-gemini-key".to_string())),
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gemini_base_url: "http://127.0.0.1:9".to_string(),
            llm_timeout_secs: None,
            mongo_conn_string: None,
            mongo_username: None,
            mongo_password: None,
            mongo_db_name: "reading-quiz-test".to_string(),
            progress_collection: "student_progress".to_string(),
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            allowed_origin: None,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
