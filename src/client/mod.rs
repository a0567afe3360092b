//! Learner-facing side of the quiz: session state, the `/api/chat` client,
//! and the remembered username.

pub mod api_client;
pub mod session;
pub mod username_store;

pub use api_client::ChatApiClient;
pub use session::QuizSession;
pub use username_store::UsernameStore;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Please paste some text first!")]
    EmptyMentorText,

    #[error("Please enter a name to continue!")]
    EmptyUsername,

    #[error("Please write an answer first!")]
    EmptyAnswer,

    #[error("No question is loaded")]
    NoActiveQuestion,

    #[error("The server returned no questions")]
    EmptyQuestionSet,

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server error ({status}): {error} {}", .details.as_deref().unwrap_or_default())]
    Service {
        status: u16,
        error: String,
        details: Option<String>,
    },

    #[error("Could not read server reply: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Could not access username file: {0}")]
    Storage(#[from] std::io::Error),
}

pub type ClientResult<T> = Result<T, ClientError>;
