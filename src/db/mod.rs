use mongodb::{
    bson::doc,
    options::{ClientOptions, Credential},
    Client, Collection,
};
use secrecy::ExposeSecret;

use crate::{
    config::Config,
    errors::{AppError, AppResult},
};

#[derive(Clone)]
pub struct Database {
    client: Client,
    db_name: String,
}

impl Database {
    /// Builds a client without contacting the server. A bad host or
    /// credential only shows up when the first operation runs.
    pub async fn connect_lazy(config: &Config) -> AppResult<Option<Self>> {
        let Some(conn_string) = config.mongo_conn_string.as_deref() else {
            return Ok(None);
        };

        let mut client_options = ClientOptions::parse(conn_string).await?;

        if let Some(username) = &config.mongo_username {
            let password = config
                .mongo_password
                .as_ref()
                .map(|p| p.expose_secret().to_string());
            client_options.credential = Some(
                Credential::builder()
                    .username(username.clone())
                    .password(password)
                    .build(),
            );
        }
        client_options.app_name = Some(env!("CARGO_PKG_NAME").to_string());

        let client = Client::with_options(client_options)?;
        log::info!("Progress datastore configured for database {}", config.mongo_db_name);

        Ok(Some(Self {
            client,
            db_name: config.mongo_db_name.clone(),
        }))
    }

    pub fn get_collection<T>(&self, collection_name: &str) -> Collection<T>
    where
        T: Send + Sync,
    {
        self.client
            .database(&self.db_name)
            .collection(collection_name)
    }

    pub async fn health_check(&self) -> AppResult<()> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| AppError::PersistenceFailure(format!("ping failed: {}", e)))?;
        Ok(())
    }

    pub fn db_name(&self) -> &str {
        &self.db_name
    }
}
