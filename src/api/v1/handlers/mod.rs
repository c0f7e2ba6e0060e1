pub mod auth;
pub mod comments;
mod guard;
pub mod health;
pub mod posts;
pub mod tasks;
