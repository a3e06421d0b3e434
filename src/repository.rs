use crate::models::User;
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

/// UserRepository Trait
///
/// The persistence contract used by the login flow. Handlers depend on the
/// trait object, so tests swap in an in-memory implementation.
///
/// **Send + Sync + async_trait** are required to share `Arc<dyn UserRepository>`
/// across Axum's task boundaries.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Looks up an account by its normalized (trimmed, lowercase) email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error>;

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, sqlx::Error>;
}

/// RepositoryState
///
/// The concrete type used to share the user store across the application state.
pub type RepositoryState = Arc<dyn UserRepository>;

/// PostgresRepository
///
/// `UserRepository` backed by the CRM's Postgres database. Accounts live in
/// `users` and reference `roles` by id.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_USER: &str = r#"
    SELECT u.id, u.email, r.name AS role_name, u.password_hash
    FROM users u
    JOIN roles r ON r.id = u.role_id
"#;

#[async_trait]
impl UserRepository for PostgresRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("{SELECT_USER} WHERE lower(u.email) = $1 AND u.is_active = true");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, sqlx::Error> {
        let query = format!("{SELECT_USER} WHERE u.id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }
}
