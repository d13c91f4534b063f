//! Authentication collaborator.
//!
//! The site only needs to know whether someone is signed in (to gate
//! event creation). `MemoryAuth` checks configured accounts and keeps
//! session tokens in memory.

use std::collections::HashMap;
use std::future::Future;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::{ShowcaseError, ShowcaseResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub identity: Identity,
}

/// A configured account. `password_hash` is an Argon2 PHC string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub email: String,
    pub password_hash: String,
}

pub trait AuthProvider: Send + Sync {
    fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = ShowcaseResult<Session>> + Send;

    fn current_user(&self, token: &str) -> impl Future<Output = Option<Identity>> + Send;

    fn sign_out(&self, token: &str) -> impl Future<Output = ()> + Send;
}

pub struct MemoryAuth {
    accounts: HashMap<String, String>,
    sessions: RwLock<HashMap<String, Identity>>,
}

impl MemoryAuth {
    pub fn new(accounts: &[Account]) -> Self {
        MemoryAuth {
            accounts: accounts
                .iter()
                .map(|a| (normalize_email(&a.email), a.password_hash.clone()))
                .collect(),
            sessions: RwLock::new(HashMap::new()),
        }
    }
}

impl AuthProvider for MemoryAuth {
    async fn sign_in(&self, email: &str, password: &str) -> ShowcaseResult<Session> {
        let email = normalize_email(email);
        let hash = self
            .accounts
            .get(&email)
            .ok_or(ShowcaseError::InvalidCredentials)?;
        verify_password(password, hash)?;

        let session = Session {
            token: uuid::Uuid::new_v4().to_string(),
            identity: Identity { email },
        };
        self.sessions
            .write()
            .await
            .insert(session.token.clone(), session.identity.clone());

        tracing::info!(email = %session.identity.email, "Signed in");
        Ok(session)
    }

    async fn current_user(&self, token: &str) -> Option<Identity> {
        self.sessions.read().await.get(token).cloned()
    }

    async fn sign_out(&self, token: &str) {
        if let Some(identity) = self.sessions.write().await.remove(token) {
            tracing::info!(email = %identity.email, "Signed out");
        }
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Hash a password using Argon2id.
pub fn hash_password(password: &str) -> ShowcaseResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| ShowcaseError::PasswordHash)
}

fn verify_password(password: &str, hash: &str) -> ShowcaseResult<()> {
    let parsed = PasswordHash::new(hash).map_err(|_| ShowcaseError::InvalidCredentials)?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| ShowcaseError::InvalidCredentials)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth() -> MemoryAuth {
        MemoryAuth::new(&[Account {
            email: "Admin@Example.com".to_string(),
            password_hash: hash_password("correct horse").unwrap(),
        }])
    }

    #[tokio::test]
    async fn test_sign_in_and_out() {
        let auth = auth();

        let session = auth.sign_in(" admin@example.com ", "correct horse").await.unwrap();
        assert_eq!(session.identity.email, "admin@example.com");
        assert_eq!(auth.current_user(&session.token).await, Some(session.identity.clone()));

        auth.sign_out(&session.token).await;
        assert_eq!(auth.current_user(&session.token).await, None);
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_account() {
        let auth = auth();

        let wrong = auth.sign_in("admin@example.com", "battery staple").await;
        assert!(matches!(wrong, Err(ShowcaseError::InvalidCredentials)));

        let unknown = auth.sign_in("nobody@example.com", "correct horse").await;
        assert!(matches!(unknown, Err(ShowcaseError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_malformed_hash_is_invalid_credentials() {
        let auth = MemoryAuth::new(&[Account {
            email: "a@example.com".to_string(),
            password_hash: "plaintext".to_string(),
        }]);

        let result = auth.sign_in("a@example.com", "plaintext").await;
        assert!(matches!(result, Err(ShowcaseError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_unknown_token() {
        assert_eq!(auth().current_user("missing").await, None);
    }
}
