/**
 * Responsibility
 * - repo が上位に伝える意味の定義
 */
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("db error")]
    Db(#[from] sqlx::Error),
    // A stored row could not be mapped back into a domain value.
    #[error("corrupt row: {0}")]
    Corrupt(String),
    // Unique key already taken (the field name).
    #[error("{0} already exists")]
    Conflict(&'static str),
}

pub type RepoResult<T> = Result<T, RepoError>;
