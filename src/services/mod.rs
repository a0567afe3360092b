pub mod chat_service;
pub mod http_helpers;
pub mod llm_client;
pub mod progress_service;
pub mod prompt_builder;
pub mod response_normalizer;
