//! User Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{User, UserCreate};
use crate::utils::time::now_millis;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find user by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let user: Option<User> = self.base.db().select(thing).await?;
        Ok(user)
    }

    /// Find user by email
    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let email_owned = email.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM user WHERE email = $email LIMIT 1")
            .bind(("email", email_owned))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    /// Create a new user
    ///
    /// Duplicate emails are rejected both here and by the unique index, so
    /// a concurrent registration race still ends in a single row.
    pub async fn create(&self, data: UserCreate) -> RepoResult<User> {
        if self.find_by_email(&data.email).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Email '{}' already registered",
                data.email
            )));
        }

        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE user SET
                    email = $email,
                    password_hash = $password_hash,
                    first_name = $first_name,
                    last_name = $last_name,
                    phone = $phone,
                    role = $role,
                    loyalty_points = 0,
                    created_at = $created_at
                RETURN AFTER"#,
            )
            .bind(("email", data.email))
            .bind(("password_hash", data.password_hash))
            .bind(("first_name", data.first_name))
            .bind(("last_name", data.last_name))
            .bind(("phone", data.phone))
            .bind(("role", data.role))
            .bind(("created_at", now_millis()))
            .await?;

        let created: Option<User> = result.take(0).map_err(|e| {
            // Unique index violation surfaces here on a lost race
            let msg = e.to_string();
            if msg.contains("user_email") {
                RepoError::Duplicate("Email already registered".to_string())
            } else {
                RepoError::Database(msg)
            }
        })?;
        created.ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }

    /// Total number of accounts (seed gate)
    pub async fn count(&self) -> RepoResult<i64> {
        #[derive(serde::Deserialize)]
        struct CountRow {
            count: i64,
        }
        let mut result = self
            .base
            .db()
            .query("SELECT count() AS count FROM user GROUP ALL")
            .await?;
        let rows: Vec<CountRow> = result.take(0)?;
        Ok(rows.first().map(|r| r.count).unwrap_or(0))
    }
}
