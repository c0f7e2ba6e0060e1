pub mod access_jwt;
pub mod factory;
pub mod identity;
pub mod jwt;
pub mod ownership;
pub mod password;
pub mod revocation;
pub mod service;
pub mod token_issuer;

pub use access_jwt::{CredentialVerifier, TokenError};
pub use factory::{build_auth_service, build_revocation_store};
pub use identity::{IdentityClaim, Role, SubjectId};
pub use jwt::SigningSecret;
pub use ownership::{Decision, authorize};
pub use password::{PasswordError, PasswordHasher};
pub use service::AuthService;
pub use token_issuer::{CredentialIssuer, IssuedCredential};
