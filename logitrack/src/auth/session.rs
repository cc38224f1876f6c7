use super::error::AuthError;
use super::models::User;
use chrono::{DateTime, Utc};
use moka::future::Cache;
use rand::Rng;
use std::time::Duration;

/// Session token type - 64 hex characters
pub type SessionToken = String;

#[derive(Debug, Clone)]
pub struct Session {
    pub token: SessionToken,
    pub user: User,
    pub expires_at: DateTime<Utc>,
    /// First `X-Forwarded-For` hop seen at login
    pub client_ip: Option<String>,
}

impl Session {
    fn new(token: SessionToken, user: User, ttl: Duration, client_ip: Option<String>) -> Self {
        let now = Utc::now();
        let ttl = chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX);
        Self {
            token,
            user,
            expires_at: now.checked_add_signed(ttl).unwrap_or(DateTime::<Utc>::MAX_UTC),
            client_ip,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// Generate a random session token from 32 bytes of the thread rng
pub fn generate_session_token() -> SessionToken {
    let mut rng = rand::rng();
    (0..32)
        .map(|_| format!("{:02x}", rng.random::<u8>()))
        .collect()
}

/// In-memory login sessions; entries expire `ttl` after login
pub struct SessionStore {
    sessions: Cache<SessionToken, Session>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration, max_sessions: Option<u64>) -> Self {
        let mut builder = Cache::builder().time_to_live(ttl);
        if let Some(capacity) = max_sessions {
            builder = builder.max_capacity(capacity);
        }
        Self {
            sessions: builder.build(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn create_session(&self, user: User, client_ip: Option<String>) -> Session {
        let token = generate_session_token();
        let session = Session::new(token.clone(), user, self.ttl, client_ip);
        self.sessions.insert(token, session.clone()).await;
        session
    }

    /// Resolve a token to its user
    pub async fn validate(&self, token: &str) -> Result<User, AuthError> {
        let session = self
            .sessions
            .get(token)
            .await
            .ok_or(AuthError::InvalidSession)?;

        if session.is_expired() {
            self.sessions.invalidate(token).await;
            return Err(AuthError::InvalidSession);
        }
        Ok(session.user)
    }

    /// Returns whether a live session was removed
    pub async fn invalidate(&self, token: &str) -> bool {
        self.sessions.remove(token).await.is_some()
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("active", &self.sessions.entry_count())
            .field("ttl", &self.ttl)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User::new("samir", "samir@example.com", "hash".into(), vec![])
    }

    #[test]
    fn test_generate_session_token() {
        let a = generate_session_token();
        let b = generate_session_token();
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let store = SessionStore::new(Duration::from_secs(60), None);
        let session = store
            .create_session(user(), Some("127.0.0.1".into()))
            .await;
        assert!(!session.is_expired());
        assert_eq!(session.client_ip.as_deref(), Some("127.0.0.1"));
        assert!(session.expires_at > Utc::now());

        let resolved = store.validate(&session.token).await.unwrap();
        assert_eq!(resolved.username, "samir");

        assert!(store.invalidate(&session.token).await);
        assert!(!store.invalidate(&session.token).await);
        assert!(matches!(
            store.validate(&session.token).await,
            Err(AuthError::InvalidSession)
        ));
    }

    #[tokio::test]
    async fn test_session_expires() {
        let store = SessionStore::new(Duration::from_millis(50), None);
        let session = store.create_session(user(), None).await;

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert!(store.validate(&session.token).await.is_err());
    }

    #[tokio::test]
    async fn test_unknown_token_is_rejected() {
        let store = SessionStore::new(Duration::from_secs(60), None);
        assert!(matches!(
            store.validate("deadbeef").await,
            Err(AuthError::InvalidSession)
        ));
    }
}
