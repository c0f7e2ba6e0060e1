//! In-process stores used when no DATABASE_URL is configured, and by tests.
use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::repos::document_repo::{Document, DocumentStore, NewDocument, ResourceKind};
use crate::repos::error::{RepoError, RepoResult};
use crate::repos::user_repo::{NewUser, UserDirectory, UserRecord};
use crate::services::auth::{Role, SubjectId};

#[derive(Debug, Default)]
struct Documents {
    next_id: i64,
    rows: BTreeMap<i64, Document>,
}

#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    inner: RwLock<Documents>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn insert(&self, new: NewDocument) -> RepoResult<Document> {
        let mut inner = self.inner.write().await;
        inner.next_id += 1;

        let now = Utc::now();
        let doc = Document {
            id: inner.next_id,
            kind: new.kind,
            owner_id: Some(new.owner_id),
            parent_id: new.parent_id,
            body: new.body,
            created_at: now,
            updated_at: now,
        };
        inner.rows.insert(doc.id, doc.clone());

        Ok(doc)
    }

    async fn get(&self, kind: ResourceKind, id: i64) -> RepoResult<Option<Document>> {
        let inner = self.inner.read().await;
        Ok(inner.rows.get(&id).filter(|d| d.kind == kind).cloned())
    }

    async fn list(
        &self,
        kind: ResourceKind,
        parent_id: Option<i64>,
        limit: i64,
        offset: i64,
    ) -> RepoResult<Vec<Document>> {
        let inner = self.inner.read().await;
        Ok(inner
            .rows
            .values()
            .rev()
            .filter(|d| d.kind == kind)
            .filter(|d| parent_id.is_none() || d.parent_id == parent_id)
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn replace_body(
        &self,
        kind: ResourceKind,
        id: i64,
        body: Value,
    ) -> RepoResult<Option<Document>> {
        let mut inner = self.inner.write().await;
        let Some(doc) = inner.rows.get_mut(&id).filter(|d| d.kind == kind) else {
            return Ok(None);
        };
        doc.body = body;
        doc.updated_at = Utc::now();

        Ok(Some(doc.clone()))
    }

    async fn delete(&self, kind: ResourceKind, id: i64) -> RepoResult<bool> {
        let mut inner = self.inner.write().await;
        if !inner.rows.get(&id).is_some_and(|d| d.kind == kind) {
            return Ok(false);
        }
        inner.rows.remove(&id);
        inner.rows.retain(|_, d| d.parent_id != Some(id));

        Ok(true)
    }

    async fn toggle_member(
        &self,
        kind: ResourceKind,
        id: i64,
        field: &'static str,
        member: &str,
    ) -> RepoResult<Option<(bool, usize)>> {
        let mut inner = self.inner.write().await;
        let Some(doc) = inner.rows.get_mut(&id).filter(|d| d.kind == kind) else {
            return Ok(None);
        };
        let Value::Object(body) = &mut doc.body else {
            return Err(RepoError::Corrupt(format!("{kind} {id} body is not an object")));
        };

        let entry = body
            .entry(field)
            .or_insert_with(|| Value::Array(Vec::new()));
        let Value::Array(members) = entry else {
            return Err(RepoError::Corrupt(format!("{kind} {id} {field} is not an array")));
        };

        let is_member = match members.iter().position(|m| m.as_str() == Some(member)) {
            Some(pos) => {
                members.remove(pos);
                false
            }
            None => {
                members.push(Value::String(member.to_string()));
                true
            }
        };
        let len = members.len();
        doc.updated_at = Utc::now();

        Ok(Some((is_member, len)))
    }
}

#[derive(Debug, Default)]
pub struct MemoryUserDirectory {
    users: RwLock<HashMap<SubjectId, UserRecord>>,
}

impl MemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a user as-is, role included. Seeding only; the API goes through `create`.
    pub async fn upsert(&self, user: UserRecord) {
        self.users.write().await.insert(user.id, user);
    }
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn find(&self, id: SubjectId) -> RepoResult<Option<UserRecord>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<UserRecord>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn create(&self, new: NewUser) -> RepoResult<UserRecord> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == new.email) {
            return Err(RepoError::Conflict("email"));
        }

        let user = UserRecord {
            id: SubjectId::new(Uuid::new_v4()),
            user_name: new.user_name,
            email: new.email,
            role: Role::User,
            password_hash: new.password_hash,
        };
        users.insert(user.id, user.clone());

        Ok(user)
    }
}
