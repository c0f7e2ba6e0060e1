/*
 * Responsibility
 * - posts / comments / tasks を 1 つの documents テーブルに保存する (kind で区別)
 * - body は JSONB。スキーマは DTO 側が持つ
 * - ownerId は INSERT 時にだけ書く。変更するメソッドは用意しない
 */
use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repos::error::{RepoError, RepoResult};
use crate::services::auth::SubjectId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Post,
    Comment,
    Task,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Post => "post",
            ResourceKind::Comment => "comment",
            ResourceKind::Task => "task",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = RepoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "post" => Ok(ResourceKind::Post),
            "comment" => Ok(ResourceKind::Comment),
            "task" => Ok(ResourceKind::Task),
            other => Err(RepoError::Corrupt(format!("unknown document kind {other:?}"))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Document {
    pub id: i64,
    pub kind: ResourceKind,
    // None once the owning user row is deleted (ON DELETE SET NULL); the row is then immutable through the API.
    pub owner_id: Option<SubjectId>,
    pub parent_id: Option<i64>,
    pub body: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewDocument {
    pub kind: ResourceKind,
    pub owner_id: SubjectId,
    pub parent_id: Option<i64>,
    pub body: Value,
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn insert(&self, new: NewDocument) -> RepoResult<Document>;

    async fn get(&self, kind: ResourceKind, id: i64) -> RepoResult<Option<Document>>;

    // Newest first. `parent_id` narrows to children of one document (comments of a post).
    async fn list(
        &self,
        kind: ResourceKind,
        parent_id: Option<i64>,
        limit: i64,
        offset: i64,
    ) -> RepoResult<Vec<Document>>;

    // Replace the body only. Owner and parent never change.
    async fn replace_body(
        &self,
        kind: ResourceKind,
        id: i64,
        body: Value,
    ) -> RepoResult<Option<Document>>;

    // Deleting a document also deletes its children.
    async fn delete(&self, kind: ResourceKind, id: i64) -> RepoResult<bool>;

    /// Add `member` to the string array `body[field]`, or remove it if present, in one step.
    ///
    /// Returns `(is_member_now, array_len)`, or None when the document does not exist.
    async fn toggle_member(
        &self,
        kind: ResourceKind,
        id: i64,
        field: &'static str,
        member: &str,
    ) -> RepoResult<Option<(bool, usize)>>;
}

#[derive(Debug, FromRow)]
struct DocumentRow {
    #[sqlx(rename = "documentId")]
    id: i64,
    kind: String,
    #[sqlx(rename = "ownerId")]
    owner_id: Option<Uuid>,
    #[sqlx(rename = "parentId")]
    parent_id: Option<i64>,
    body: Value,
    #[sqlx(rename = "createdAt")]
    created_at: DateTime<Utc>,
    #[sqlx(rename = "updatedAt")]
    updated_at: DateTime<Utc>,
}

impl TryFrom<DocumentRow> for Document {
    type Error = RepoError;

    fn try_from(row: DocumentRow) -> Result<Self, Self::Error> {
        Ok(Document {
            id: row.id,
            kind: row.kind.parse()?,
            owner_id: row.owner_id.map(SubjectId::new),
            parent_id: row.parent_id,
            body: row.body,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Clone, Debug)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn insert(&self, new: NewDocument) -> RepoResult<Document> {
        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
            INSERT INTO documents (kind, "ownerId", "parentId", body)
            VALUES ($1, $2, $3, $4)
            RETURNING
                "documentId", kind, "ownerId", "parentId", body, "createdAt", "updatedAt"
            "#,
        )
        .bind(new.kind.as_str())
        .bind(new.owner_id.as_uuid())
        .bind(new.parent_id)
        .bind(new.body)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn get(&self, kind: ResourceKind, id: i64) -> RepoResult<Option<Document>> {
        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT
                "documentId", kind, "ownerId", "parentId", body, "createdAt", "updatedAt"
            FROM documents
            WHERE "documentId" = $1 AND kind = $2
            "#,
        )
        .bind(id)
        .bind(kind.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Document::try_from).transpose()
    }

    async fn list(
        &self,
        kind: ResourceKind,
        parent_id: Option<i64>,
        limit: i64,
        offset: i64,
    ) -> RepoResult<Vec<Document>> {
        let rows = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT
                "documentId", kind, "ownerId", "parentId", body, "createdAt", "updatedAt"
            FROM documents
            WHERE kind = $1
                AND ($2::BIGINT IS NULL OR "parentId" = $2)
            ORDER BY "documentId" DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(kind.as_str())
        .bind(parent_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Document::try_from).collect()
    }

    async fn replace_body(
        &self,
        kind: ResourceKind,
        id: i64,
        body: Value,
    ) -> RepoResult<Option<Document>> {
        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
            UPDATE documents
            SET body = $3
            WHERE "documentId" = $1 AND kind = $2
            RETURNING
                "documentId", kind, "ownerId", "parentId", body, "createdAt", "updatedAt"
            "#,
        )
        .bind(id)
        .bind(kind.as_str())
        .bind(body)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Document::try_from).transpose()
    }

    async fn delete(&self, kind: ResourceKind, id: i64) -> RepoResult<bool> {
        // children go with the parent via ON DELETE CASCADE
        let result = sqlx::query(
            r#"
            DELETE FROM documents
            WHERE "documentId" = $1 AND kind = $2
            "#,
        )
        .bind(id)
        .bind(kind.as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn toggle_member(
        &self,
        kind: ResourceKind,
        id: i64,
        field: &'static str,
        member: &str,
    ) -> RepoResult<Option<(bool, usize)>> {
        // single UPDATE: the row lock serializes concurrent toggles
        let row = sqlx::query_as::<_, (bool, i32)>(
            r#"
            UPDATE documents
            SET body = jsonb_set(
                body,
                ARRAY[$3::text],
                CASE
                    WHEN COALESCE(body -> $3::text, '[]'::jsonb) ? $4::text
                        THEN (body -> $3::text) - $4::text
                    ELSE COALESCE(body -> $3::text, '[]'::jsonb) || to_jsonb($4::text)
                END,
                true
            )
            WHERE "documentId" = $1 AND kind = $2
            RETURNING
                (body -> $3::text) ? $4::text,
                jsonb_array_length(body -> $3::text)
            "#,
        )
        .bind(id)
        .bind(kind.as_str())
        .bind(field)
        .bind(member)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(is_member, len)| (is_member, len.max(0) as usize)))
    }
}
