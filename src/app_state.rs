use std::sync::Arc;

use crate::{
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{MongoProgressRepository, ProgressRepository},
    services::{
        chat_service::ChatService, llm_client::GeminiClient, progress_service::ProgressService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ChatService>,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let llm = Arc::new(GeminiClient::from_config(&config)?);

        // A datastore that cannot even be configured disables persistence
        // instead of stopping the server.
        let progress = match Database::connect_lazy(&config).await {
            Ok(Some(db)) => {
                let repository: Arc<dyn ProgressRepository> =
                    Arc::new(MongoProgressRepository::new(db, &config.progress_collection));
                Some(Arc::new(ProgressService::new(repository)))
            }
            Ok(None) => None,
            Err(e) => {
                log::error!("Progress datastore disabled: {}", e);
                None
            }
        };

        let chat_service = Arc::new(ChatService::new(llm, progress));

        Ok(Self {
            chat_service,
            config: Arc::new(config),
        })
    }

    pub fn from_parts(chat_service: ChatService, config: Config) -> Self {
        Self {
            chat_service: Arc::new(chat_service),
            config: Arc::new(config),
        }
    }
}
