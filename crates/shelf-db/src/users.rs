//! User repository
//!
//! Database operations for users.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use shelf_models::User;
use sqlx::{FromRow, PgPool};

use crate::repository::{RepositoryError, RepositoryResult};

/// Columns guarded by unique indexes
const UNIQUE_FIELDS: &[&str] = &["email", "username"];

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<User>>;

    /// Apply the set fields of `dto`; `None` leaves a column unchanged and
    /// `Some(None)` clears a nullable one
    async fn update(&self, id: &str, dto: UpdateUserDto) -> RepositoryResult<User>;
}

/// DTO for updating a user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateUserDto {
    pub email: Option<String>,
    pub username: Option<String>,
    pub first_name: Option<Option<String>>,
    pub last_name: Option<Option<String>>,
    pub profile_picture: Option<String>,
}

/// User database row
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: String,
    pub email: String,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_picture: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            email: row.email,
            username: row.username,
            first_name: row.first_name,
            last_name: row.last_name,
            profile_picture: row.profile_picture,
            created_at: row.created_at.and_utc(),
            updated_at: row.updated_at.and_utc(),
        }
    }
}

/// User repository implementation
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, username, "firstName" AS first_name, "lastName" AS last_name,
                   "profilePicture" AS profile_picture,
                   "createdAt" AS created_at, "updatedAt" AS updated_at
            FROM "User"
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    async fn update(&self, id: &str, dto: UpdateUserDto) -> RepositoryResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE "User" SET
                email = COALESCE($1, email),
                username = COALESCE($2, username),
                "firstName" = CASE WHEN $3 THEN $4 ELSE "firstName" END,
                "lastName" = CASE WHEN $5 THEN $6 ELSE "lastName" END,
                "profilePicture" = COALESCE($7, "profilePicture"),
                "updatedAt" = NOW()
            WHERE id = $8
            RETURNING id, email, username, "firstName" AS first_name, "lastName" AS last_name,
                      "profilePicture" AS profile_picture,
                      "createdAt" AS created_at, "updatedAt" AS updated_at
            "#,
        )
        .bind(&dto.email)
        .bind(&dto.username)
        .bind(dto.first_name.is_some())
        .bind(dto.first_name.as_ref().and_then(Option::as_deref))
        .bind(dto.last_name.is_some())
        .bind(dto.last_name.as_ref().and_then(Option::as_deref))
        .bind(&dto.profile_picture)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_write(e, UNIQUE_FIELDS))?
        .ok_or_else(|| RepositoryError::NotFound(id.to_string()))?;

        Ok(row.into())
    }
}
