/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::repos::{DocumentStore, UserDirectory};
use crate::services::{
    auth::{AuthService, PasswordHasher},
    id_codec::IdCodec,
};

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub documents: Arc<dyn DocumentStore>,
    pub users: Arc<dyn UserDirectory>,
    pub id_codec: IdCodec,
    pub passwords: PasswordHasher,
}

impl AppState {
    pub fn new(
        auth: Arc<AuthService>,
        documents: Arc<dyn DocumentStore>,
        users: Arc<dyn UserDirectory>,
        id_codec: IdCodec,
        passwords: PasswordHasher,
    ) -> Self {
        Self {
            auth,
            documents,
            users,
            id_codec,
            passwords,
        }
    }
}
