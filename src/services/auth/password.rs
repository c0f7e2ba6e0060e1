//! bcrypt password hashing for register / login.
//!
//! bcrypt is CPU bound, so hashing and verification run on the blocking pool.
use thiserror::Error;

use crate::error::AppError;

pub const MIN_PASSWORD_BYTES: usize = 8;
// bcrypt only reads the first 72 bytes
pub const MAX_PASSWORD_BYTES: usize = 72;

// bcrypt work factor range
pub const MIN_COST: u32 = 4;
pub const MAX_COST: u32 = 31;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("password must be between {MIN_PASSWORD_BYTES} and {MAX_PASSWORD_BYTES} bytes")]
    Length,
    #[error("bcrypt cost {0} is out of range")]
    Cost(u32),
    #[error("bcrypt failure: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),
    #[error("password task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl From<PasswordError> for AppError {
    fn from(e: PasswordError) -> Self {
        match e {
            PasswordError::Length => AppError::bad_request("WEAK_PASSWORD", e.to_string()),
            other => {
                tracing::error!(error = %other, "password hashing failed");
                AppError::Internal
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Result<Self, PasswordError> {
        if !(MIN_COST..=MAX_COST).contains(&cost) {
            return Err(PasswordError::Cost(cost));
        }
        Ok(Self { cost })
    }

    pub fn check_policy(password: &str) -> Result<(), PasswordError> {
        if !(MIN_PASSWORD_BYTES..=MAX_PASSWORD_BYTES).contains(&password.len()) {
            return Err(PasswordError::Length);
        }
        Ok(())
    }

    pub async fn hash(&self, password: &str) -> Result<String, PasswordError> {
        Self::check_policy(password)?;

        let password = password.to_owned();
        let cost = self.cost;
        Ok(tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??)
    }

    /// `Ok(false)` for a wrong password. Passwords the policy could never have
    /// accepted are rejected without touching bcrypt.
    pub async fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        if Self::check_policy(password).is_err() {
            return Ok(false);
        }

        let password = password.to_owned();
        let hash = hash.to_owned();
        Ok(tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await??)
    }
}
