/**
 * User Model and Credential Store
 *
 * This module defines the user record and the `UserStore` trait the auth
 * handlers consume, with two implementations:
 *
 * - `MemoryUserStore` - process-local map, used when no database is
 *   configured and in tests
 * - `PgUserStore` - PostgreSQL via sqlx (`users` table, see `migrations/`)
 *
 * Emails are unique and stored lower-cased.
 */

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::backend::error::StoreError;
use crate::shared::{Role, UserResponse};

/// Message returned when an email is already taken
pub const DUPLICATE_EMAIL_MESSAGE: &str = "User already registered.";

/// User record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Unique user ID (UUID)
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Email address, lower-cased
    pub email: String,
    /// Hashed password (bcrypt)
    pub password_hash: String,
    /// Account role
    pub role: Role,
    /// Avatar URL
    pub avatar: Option<String>,
    /// Created at timestamp
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Public representation without the password hash
    pub fn to_response(&self) -> UserResponse {
        UserResponse {
            id: self.id.to_string(),
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
            avatar: self.avatar.clone(),
        }
    }
}

/// Data required to create a user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub avatar: Option<String>,
}

/// Lower-case and trim an email for storage and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Credential store consumed by the auth handlers
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Look a user up by email (case-insensitive)
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Create a user
    ///
    /// # Errors
    ///
    /// `StoreError::Conflict` if the email is already registered.
    async fn create(&self, user: NewUser) -> Result<User, StoreError>;

    /// Change a user's role, returning the updated user or `None` if no
    /// user has this email
    async fn set_role(&self, email: &str, role: Role) -> Result<Option<User>, StoreError>;
}

/// In-memory user store keyed by normalized email
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<String, User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(&normalize_email(email)).cloned())
    }

    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        let email = normalize_email(&user.email);
        let mut users = self.users.write().await;

        if users.contains_key(&email) {
            return Err(StoreError::Conflict(DUPLICATE_EMAIL_MESSAGE.to_string()));
        }

        let created = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: email.clone(),
            password_hash: user.password_hash,
            role: user.role,
            avatar: user.avatar,
            created_at: Utc::now(),
        };
        users.insert(email, created.clone());
        Ok(created)
    }

    async fn set_role(&self, email: &str, role: Role) -> Result<Option<User>, StoreError> {
        let mut users = self.users.write().await;
        Ok(users.get_mut(&normalize_email(email)).map(|user| {
            user.role = role;
            user.clone()
        }))
    }
}

/// Row shape of the `users` table
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    role: String,
    avatar: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = row
            .role
            .parse::<Role>()
            .map_err(|e| StoreError::Database(sqlx::Error::Decode(Box::new(e))))?;

        Ok(User {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            role,
            avatar: row.avatar,
            created_at: row.created_at,
        })
    }
}

const USER_COLUMNS: &str = "id, name, email, password_hash, role, avatar, created_at";

/// PostgreSQL user store
#[derive(Debug, Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(normalize_email(email))
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (id, name, email, password_hash, role, avatar, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&user.name)
        .bind(normalize_email(&user.email))
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(&user.avatar)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            let duplicate = matches!(&e, sqlx::Error::Database(db) if db.is_unique_violation());
            if duplicate {
                StoreError::Conflict(DUPLICATE_EMAIL_MESSAGE.to_string())
            } else {
                StoreError::Database(e)
            }
        })?;

        User::try_from(row)
    }

    async fn set_role(&self, email: &str, role: Role) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "UPDATE users SET role = $1 WHERE email = $2 RETURNING {USER_COLUMNS}"
        ))
        .bind(role.as_str())
        .bind(normalize_email(email))
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }
}

/// Hash a password with bcrypt
pub fn hash_password(password: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(password, cost)
}

/// Check a password against a bcrypt hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    bcrypt::verify(password, hash)
}
