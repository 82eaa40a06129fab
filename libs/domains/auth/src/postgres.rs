//! PostgreSQL implementation of [`UserRepository`] using SeaORM.
//!
//! Expects the `users` table to already exist (migrations are run elsewhere):
//!
//! ```sql
//! CREATE TABLE users (
//!     id            UUID PRIMARY KEY,
//!     username      TEXT NOT NULL UNIQUE,
//!     email         TEXT NOT NULL UNIQUE,
//!     password_hash TEXT NOT NULL,
//!     created_at    TIMESTAMPTZ NOT NULL DEFAULT now(),
//!     updated_at    TIMESTAMPTZ NOT NULL DEFAULT now()
//! );
//! ```
//!
//! The unique constraints are what actually guarantee uniqueness; violations
//! are reported as `UsernameTaken` / `EmailTaken`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{DbBackend, DbErr, FromQueryResult, Statement, Value};
use uuid::Uuid;

use crate::error::{AuthError, AuthResult};
use crate::models::User;
use crate::repository::UserRepository;

const SELECT_BY_USERNAME: &str = "SELECT id, username, email, password_hash, created_at, updated_at FROM users WHERE username = $1";

const SELECT_BY_EMAIL: &str = "SELECT id, username, email, password_hash, created_at, updated_at FROM users WHERE email = lower($1)";

const INSERT_USER: &str = r#"
    INSERT INTO users (id, username, email, password_hash, created_at, updated_at)
    VALUES ($1, $2, $3, $4, $5, $6)
    RETURNING id, username, email, password_hash, created_at, updated_at
"#;

#[derive(Clone)]
pub struct PostgresUserRepository {
    db: sea_orm::DatabaseConnection,
}

impl PostgresUserRepository {
    pub fn new(db: sea_orm::DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_one(&self, sql: &str, value: Value) -> AuthResult<User> {
        let stmt = Statement::from_sql_and_values(DbBackend::Postgres, sql, [value]);

        UserRow::find_by_statement(stmt)
            .one(&self.db)
            .await
            .map_err(|e| AuthError::Storage(format!("Database error: {}", e)))?
            .map(User::from)
            .ok_or(AuthError::NotFound)
    }
}

/// Helper struct for deserializing user rows from the database
#[derive(Debug, FromQueryResult)]
struct UserRow {
    id: Uuid,
    username: String,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Map an insert failure, recognising unique-constraint violations by the
/// constraint named in the message (`users_username_key`, `users_email_key`).
/// Violations of any other constraint, such as the primary key, are storage
/// errors.
fn map_insert_error(err: DbErr) -> AuthError {
    let message = err.to_string();
    let unique_violation =
        message.contains("duplicate key") || message.contains("unique constraint");

    if unique_violation && message.contains("users_username_key") {
        AuthError::UsernameTaken
    } else if unique_violation && message.contains("users_email_key") {
        AuthError::EmailTaken
    } else {
        AuthError::Storage(format!("Database error: {}", message))
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn get_by_username(&self, username: &str) -> AuthResult<User> {
        self.find_one(SELECT_BY_USERNAME, username.into()).await
    }

    async fn get_by_email(&self, email: &str) -> AuthResult<User> {
        self.find_one(SELECT_BY_EMAIL, email.into()).await
    }

    async fn create(&self, user: User) -> AuthResult<User> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            INSERT_USER,
            [
                user.id.into(),
                user.username.clone().into(),
                user.email.clone().into(),
                user.password_hash.clone().into(),
                user.created_at.into(),
                user.updated_at.into(),
            ],
        );

        let row = UserRow::find_by_statement(stmt)
            .one(&self.db)
            .await
            .map_err(map_insert_error)?
            .ok_or_else(|| AuthError::Storage("Failed to create user".to_string()))?;

        tracing::info!(user_id = %row.id, "Created user");
        Ok(row.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, Transaction};
    use std::collections::BTreeMap;

    fn row(user: &User) -> BTreeMap<&'static str, Value> {
        BTreeMap::from([
            ("id", user.id.into()),
            ("username", user.username.clone().into()),
            ("email", user.email.clone().into()),
            ("password_hash", user.password_hash.clone().into()),
            ("created_at", user.created_at.into()),
            ("updated_at", user.updated_at.into()),
        ])
    }

    fn bob() -> User {
        User::new(
            "bob".to_string(),
            "bob@example.com".to_string(),
            "$argon2id$v=19$m=1024,t=1,p=1$c2FsdA$aGFzaA".to_string(),
        )
    }

    #[tokio::test]
    async fn test_get_by_username() {
        let user = bob();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row(&user)]])
            .into_connection();
        let repo = PostgresUserRepository::new(db);

        let found = repo.get_by_username("bob").await.unwrap();
        assert_eq!(found, user);

        assert_eq!(
            repo.db.into_transaction_log(),
            [Transaction::from_sql_and_values(
                DatabaseBackend::Postgres,
                SELECT_BY_USERNAME,
                ["bob".into()],
            )]
        );
    }

    #[tokio::test]
    async fn test_get_by_email() {
        let user = bob();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row(&user)]])
            .into_connection();
        let repo = PostgresUserRepository::new(db);

        let found = repo.get_by_email("bob@example.com").await.unwrap();
        assert_eq!(found.id, user.id);
        assert_eq!(found.password_hash, user.password_hash);
    }

    #[tokio::test]
    async fn test_missing_row_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<BTreeMap<&str, Value>>::new()])
            .append_query_results([Vec::<BTreeMap<&str, Value>>::new()])
            .into_connection();
        let repo = PostgresUserRepository::new(db);

        assert!(matches!(repo.get_by_username("nobody").await, Err(AuthError::NotFound)));
        assert!(matches!(
            repo.get_by_email("nobody@example.com").await,
            Err(AuthError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_query_error_is_storage_error() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("connection closed".to_string())])
            .into_connection();
        let repo = PostgresUserRepository::new(db);

        let err = repo.get_by_email("bob@example.com").await.unwrap_err();
        assert!(matches!(err, AuthError::Storage(ref msg) if msg.contains("connection closed")));
    }

    #[tokio::test]
    async fn test_create_returns_stored_row() {
        let user = bob();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row(&user)]])
            .into_connection();
        let repo = PostgresUserRepository::new(db);

        let created = repo.create(user.clone()).await.unwrap();
        assert_eq!(created, user);
    }

    #[tokio::test]
    async fn test_create_unique_violations() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([
                DbErr::Custom(
                    r#"duplicate key value violates unique constraint "users_username_key""#
                        .to_string(),
                ),
                DbErr::Custom(
                    r#"duplicate key value violates unique constraint "users_email_key""#
                        .to_string(),
                ),
                DbErr::Custom(
                    r#"duplicate key value violates unique constraint "users_pkey""#.to_string(),
                ),
                DbErr::Custom(
                    r#"duplicate key value violates unique constraint "users_nickname_key""#
                        .to_string(),
                ),
                DbErr::Custom("disk full".to_string()),
            ])
            .into_connection();
        let repo = PostgresUserRepository::new(db);

        assert!(matches!(repo.create(bob()).await, Err(AuthError::UsernameTaken)));
        assert!(matches!(repo.create(bob()).await, Err(AuthError::EmailTaken)));
        assert!(matches!(
            repo.create(bob()).await,
            Err(AuthError::Storage(ref msg)) if msg.contains("users_pkey")
        ));
        assert!(matches!(repo.create(bob()).await, Err(AuthError::Storage(_))));
        assert!(matches!(repo.create(bob()).await, Err(AuthError::Storage(_))));
    }
}
