/*
 * Responsibility
 * - users テーブルの読み書き (register / login / credential 発行時の role 参照)
 * - role はここからだけ読む。request body の role は信用しない
 * - 新規ユーザーの role は常に DB の既定値 (user)
 */
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repos::error::{RepoError, RepoResult};
use crate::services::auth::{Role, SubjectId};

#[derive(Clone)]
pub struct UserRecord {
    pub id: SubjectId,
    pub user_name: String,
    pub email: String,
    pub role: Role,
    pub password_hash: String,
}

impl std::fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserRecord")
            .field("id", &self.id)
            .field("user_name", &self.user_name)
            .field("email", &self.email)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

/// Registration input. There is no role field: new users are always `Role::User`.
#[derive(Clone)]
pub struct NewUser {
    pub user_name: String,
    pub email: String,
    pub password_hash: String,
}

#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find(&self, id: SubjectId) -> RepoResult<Option<UserRecord>>;

    // `email` is expected already normalized (trimmed, lowercase).
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<UserRecord>>;

    // Err(RepoError::Conflict) when the email is taken.
    async fn create(&self, new: NewUser) -> RepoResult<UserRecord>;
}

#[derive(Debug, FromRow)]
struct UserRow {
    #[sqlx(rename = "userId")]
    id: Uuid,
    #[sqlx(rename = "userName")]
    user_name: String,
    email: String,
    role: String,
    #[sqlx(rename = "passwordHash")]
    password_hash: String,
}

impl TryFrom<UserRow> for UserRecord {
    type Error = RepoError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = row
            .role
            .parse::<Role>()
            .map_err(|e| RepoError::Corrupt(e.to_string()))?;

        Ok(UserRecord {
            id: SubjectId::new(row.id),
            user_name: row.user_name,
            email: row.email,
            role,
            password_hash: row.password_hash,
        })
    }
}

#[derive(Clone, Debug)]
pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn find(&self, id: SubjectId) -> RepoResult<Option<UserRecord>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT "userId", "userName", email, role, "passwordHash"
            FROM users
            WHERE "userId" = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRecord::try_from).transpose()
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<UserRecord>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT "userId", "userName", email, role, "passwordHash"
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRecord::try_from).transpose()
    }

    async fn create(&self, new: NewUser) -> RepoResult<UserRecord> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users ("userName", email, "passwordHash")
            VALUES ($1, $2, $3)
            RETURNING "userId", "userName", email, role, "passwordHash"
            "#,
        )
        .bind(&new.user_name)
        .bind(&new.email)
        .bind(&new.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => RepoError::Conflict("email"),
            other => RepoError::Db(other),
        })?;

        row.try_into()
    }
}
