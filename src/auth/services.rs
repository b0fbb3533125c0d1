use std::{sync::Arc, time::Duration};

use axum::extract::FromRef;
use tracing::{info, warn};

use super::{
    errors::AuthError,
    jwt::JwtKeys,
    password::{hash_password, verify_password},
    repo_types::User,
};
use crate::{
    state::AppState,
    store::{StoreError, UserStore},
};

/// What a caller presented to prove who they are.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    Password { username: String, password: String },
    Token(String),
}

/// Registers users, checks credentials and issues tokens.
#[derive(Clone)]
pub struct CredentialVerifier {
    users: Arc<dyn UserStore>,
    keys: JwtKeys,
}

impl FromRef<AppState> for CredentialVerifier {
    fn from_ref(state: &AppState) -> Self {
        state.verifier.clone()
    }
}

impl CredentialVerifier {
    pub fn new(users: Arc<dyn UserStore>, keys: JwtKeys) -> Self {
        Self { users, keys }
    }

    /// Usernames are stored trimmed; [`authenticate`](Self::authenticate) trims the same way.
    pub async fn register(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AuthError::MissingField("username"));
        }
        if password.is_empty() {
            return Err(AuthError::MissingField("password"));
        }

        if self.users.find_user_by_username(username).await?.is_some() {
            warn!(%username, "username already registered");
            return Err(AuthError::DuplicateUsername(username.to_string()));
        }

        let hash = hash_password(password)?;
        let user = match self.users.create_user(username, &hash).await {
            Ok(user) => user,
            // Lost a race with a concurrent registration of the same name.
            Err(StoreError::Duplicate) => {
                return Err(AuthError::DuplicateUsername(username.to_string()))
            }
            Err(e) => return Err(e.into()),
        };

        info!(user_id = user.id, username = %user.username, "user registered");
        Ok(user)
    }

    pub async fn authenticate(&self, credential: &Credential) -> Result<User, AuthError> {
        match credential {
            Credential::Token(token) => {
                let claims = self.keys.verify(token).inspect_err(|e| {
                    warn!(error = %e, "token rejected");
                })?;
                self.users
                    .find_user_by_id(claims.sub)
                    .await?
                    .ok_or_else(|| {
                        warn!(user_id = claims.sub, "token for unknown user");
                        AuthError::UnknownUser
                    })
            }
            Credential::Password { username, password } => {
                let username = username.trim();
                let user = self
                    .users
                    .find_user_by_username(username)
                    .await?
                    .ok_or_else(|| {
                        warn!(%username, "login unknown username");
                        AuthError::UnknownUser
                    })?;
                if !verify_password(password, &user.password_hash)? {
                    warn!(user_id = user.id, "login invalid password");
                    return Err(AuthError::BadPassword);
                }
                Ok(user)
            }
        }
    }

    /// Token with the configured default lifetime.
    pub fn issue_token(&self, user: &User) -> Result<String, AuthError> {
        self.issue_token_with_ttl(user, self.keys.ttl)
    }

    pub fn issue_token_with_ttl(&self, user: &User, ttl: Duration) -> Result<String, AuthError> {
        self.keys.sign(user.id, ttl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::JwtConfig, store::MemoryStore};
    use time::{Duration as TimeDuration, OffsetDateTime};

    fn keys() -> JwtKeys {
        JwtKeys::from(&JwtConfig {
            secret: "test-secret".into(),
            issuer: "test-issuer".into(),
            audience: "test-aud".into(),
            ttl_seconds: 900,
        })
    }

    fn verifier() -> CredentialVerifier {
        CredentialVerifier::new(Arc::new(MemoryStore::new()), keys())
    }

    fn password(username: &str, password: &str) -> Credential {
        Credential::Password {
            username: username.into(),
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn register_stores_hash_not_plaintext() {
        let v = verifier();
        let user = v.register("alice", "s3cret").await.expect("register");
        assert_eq!(user.username, "alice");
        assert_ne!(user.password_hash, "s3cret");
        assert!(verify_password("s3cret", &user.password_hash).unwrap());
    }

    #[tokio::test]
    async fn register_rejects_missing_fields() {
        let v = verifier();
        assert!(matches!(
            v.register("", "pw").await,
            Err(AuthError::MissingField("username"))
        ));
        assert!(matches!(
            v.register("alice", "").await,
            Err(AuthError::MissingField("password"))
        ));
    }

    #[tokio::test]
    async fn register_rejects_duplicate_username() {
        let v = verifier();
        v.register("alice", "one").await.unwrap();
        assert!(matches!(
            v.register("alice", "two").await,
            Err(AuthError::DuplicateUsername(name)) if name == "alice"
        ));
    }

    #[tokio::test]
    async fn password_authentication() {
        let v = verifier();
        let alice = v.register("alice", "pw").await.unwrap();

        let user = v.authenticate(&password("alice", "pw")).await.unwrap();
        assert_eq!(user.id, alice.id);
        assert!(matches!(
            v.authenticate(&password("alice", "nope")).await,
            Err(AuthError::BadPassword)
        ));
        assert!(matches!(
            v.authenticate(&password("bob", "pw")).await,
            Err(AuthError::UnknownUser)
        ));
    }

    #[tokio::test]
    async fn usernames_are_trimmed_on_register_and_login() {
        let v = verifier();
        let alice = v.register(" alice ", "pw").await.unwrap();
        assert_eq!(alice.username, "alice");
        assert_eq!(v.authenticate(&password(" alice", "pw")).await.unwrap().id, alice.id);
        assert_eq!(v.authenticate(&password("alice", "pw")).await.unwrap().id, alice.id);
        assert!(matches!(
            v.register("alice\t", "other").await,
            Err(AuthError::DuplicateUsername(name)) if name == "alice"
        ));
        assert!(matches!(
            v.register("   ", "pw").await,
            Err(AuthError::MissingField("username"))
        ));
    }

    #[tokio::test]
    async fn issued_token_resolves_to_same_user() {
        let v = verifier();
        let alice = v.register("alice", "pw").await.unwrap();
        let token = v.issue_token(&alice).unwrap();
        let user = v.authenticate(&Credential::Token(token)).await.unwrap();
        assert_eq!(user.id, alice.id);
        assert_eq!(user.username, "alice");
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        let v = verifier();
        let alice = v.register("alice", "pw").await.unwrap();
        let issued = OffsetDateTime::now_utc() - TimeDuration::seconds(901);
        let token = keys()
            .sign_at(alice.id, issued, Duration::from_secs(900))
            .unwrap();
        assert!(matches!(
            v.authenticate(&Credential::Token(token)).await,
            Err(AuthError::ExpiredToken)
        ));
    }

    #[tokio::test]
    async fn zero_ttl_token_expires() {
        let v = verifier();
        let alice = v.register("alice", "pw").await.unwrap();
        let token = v.issue_token_with_ttl(&alice, Duration::ZERO).unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(1100)).await;
        assert!(matches!(
            v.authenticate(&Credential::Token(token)).await,
            Err(AuthError::ExpiredToken)
        ));
    }

    #[tokio::test]
    async fn oversized_ttl_fails_instead_of_minting_a_dead_token() {
        let v = verifier();
        let alice = v.register("alice", "pw").await.unwrap();
        assert!(matches!(
            v.issue_token_with_ttl(&alice, Duration::MAX),
            Err(AuthError::Crypto(_))
        ));
    }

    #[tokio::test]
    async fn token_for_missing_user_is_unknown_user() {
        let v = verifier();
        let ghost = User {
            id: 42,
            username: "ghost".into(),
            password_hash: String::new(),
            created_at: OffsetDateTime::now_utc(),
        };
        let token = v.issue_token(&ghost).unwrap();
        assert!(matches!(
            v.authenticate(&Credential::Token(token)).await,
            Err(AuthError::UnknownUser)
        ));
    }

    #[tokio::test]
    async fn garbage_token_is_invalid() {
        let v = verifier();
        assert!(matches!(
            v.authenticate(&Credential::Token("abc.def.ghi".into())).await,
            Err(AuthError::InvalidToken)
        ));
    }
}
