//! User repository

use sqlx::{PgPool, Row};

use crate::models::User;

/// User repository for lookups consumed by the pipeline
pub struct UserRepository;

impl UserRepository {
    /// Get user by ID
    pub async fn get_by_id(pool: &PgPool, user_id: i64) -> Result<Option<User>, sqlx::Error> {
        let row = sqlx::query(
            r#"SELECT user_id, name, email, phone
               FROM users WHERE user_id = $1"#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(row.map(|r| User {
            user_id: r.get("user_id"),
            name: r.get("name"),
            email: r.get("email"),
            phone: r.get("phone"),
        }))
    }

    /// Check that a user record exists
    pub async fn exists(pool: &PgPool, user_id: i64) -> Result<bool, sqlx::Error> {
        let row = sqlx::query(r#"SELECT 1 AS one FROM users WHERE user_id = $1"#)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;
        Ok(row.is_some())
    }
}
