//! SeaORM storage implementation.
//!
//! A single storage layer supporting SQLite, PostgreSQL and MySQL,
//! selected by the connection URL scheme.

mod essays;
mod evaluations;
mod users;

use crate::config::AppConfig;
use crate::errors::{EssaySystemError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM-backed storage
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        Migrator::up(&db, None)
            .await
            .map_err(|e| EssaySystemError::database_operation(format!("Migration failed: {e}")))?;

        info!("SeaORM storage initialized, database: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite specific connection (WAL + pragma tuning)
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| {
                EssaySystemError::database_config(format!("Failed to parse SQLite URL: {e}"))
            })?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("mmap_size", "536870912")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| {
                EssaySystemError::database_connection(format!("SQLite connection failed: {e}"))
            })?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// Generic connection (PostgreSQL, MySQL)
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt).await.map_err(|e| {
            EssaySystemError::database_connection(format!("Failed to connect to database: {e}"))
        })
    }

    /// Infer the database flavour from the URL and normalize it
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(EssaySystemError::database_config(format!(
                "Cannot infer database type from URL: {url}. Supported: sqlite://, postgres://, mysql://, or a .db/.sqlite file path"
            )))
        }
    }
}

// Storage trait implementation
use crate::models::{
    essays::{
        entities::{Essay, EssayStatus},
        requests::{CreateEssayRequest, EssayListQuery},
        responses::EssayListResponse,
    },
    evaluations::entities::{CreateEvaluationData, Evaluation},
    users::{
        entities::User,
        requests::{CreateUserRequest, UpdateProfileRequest},
    },
};
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // Users
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.get_user_by_username_impl(username).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>> {
        self.get_user_by_username_or_email_impl(identifier).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn update_user_profile(
        &self,
        id: i64,
        update: UpdateProfileRequest,
    ) -> Result<Option<User>> {
        self.update_user_profile_impl(id, update).await
    }

    // Essays
    async fn create_essay(&self, user_id: i64, essay: CreateEssayRequest) -> Result<Essay> {
        self.create_essay_impl(user_id, essay).await
    }

    async fn get_essay_by_id(&self, essay_id: i64, user_id: i64) -> Result<Option<Essay>> {
        self.get_essay_by_id_impl(essay_id, user_id).await
    }

    async fn list_essays_with_pagination(
        &self,
        user_id: i64,
        query: EssayListQuery,
    ) -> Result<EssayListResponse> {
        self.list_essays_with_pagination_impl(user_id, query).await
    }

    async fn set_essay_transcription(
        &self,
        essay_id: i64,
        user_id: i64,
        raw_transcription: &str,
        transcription: &str,
    ) -> Result<bool> {
        self.set_essay_transcription_impl(essay_id, user_id, raw_transcription, transcription)
            .await
    }

    async fn set_essay_status(
        &self,
        essay_id: i64,
        user_id: i64,
        status: EssayStatus,
    ) -> Result<bool> {
        self.set_essay_status_impl(essay_id, user_id, status).await
    }

    async fn delete_essay(&self, essay_id: i64, user_id: i64) -> Result<bool> {
        self.delete_essay_impl(essay_id, user_id).await
    }

    // Evaluations
    async fn create_evaluation(&self, data: CreateEvaluationData) -> Result<Evaluation> {
        self.create_evaluation_impl(data).await
    }

    async fn get_evaluation_by_essay_id(&self, essay_id: i64) -> Result<Option<Evaluation>> {
        self.get_evaluation_by_essay_id_impl(essay_id).await
    }

    async fn delete_evaluation_by_essay_id(&self, essay_id: i64) -> Result<bool> {
        self.delete_evaluation_by_essay_id_impl(essay_id).await
    }
}
