//! Server-side sessions keyed by an opaque random token.
//!
//! The client only ever holds the raw token (in the session cookie). Stores
//! are keyed by its SHA-256 digest so a leaked store dump cannot be replayed
//! as cookies. A session record carries nothing but the user id; the full
//! user is loaded from the database when a handler needs it.

use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;

use crate::error::AppResult;

const KEY_PREFIX: &str = "session:";

/// What the server remembers about a logged-in browser
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: i32,
    pub created_at: DateTime<Utc>,
}

/// Key/value backend for session records
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn insert(&self, key: &str, session: &Session, ttl_seconds: u64) -> AppResult<()>;
    async fn get(&self, key: &str) -> AppResult<Option<Session>>;
    async fn remove(&self, key: &str) -> AppResult<()>;
}

/// Session lifecycle on top of a [`SessionStore`]
#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    ttl_seconds: u64,
}

impl SessionManager {
    pub fn new(store: Arc<dyn SessionStore>, ttl_seconds: u64) -> Self {
        Self { store, ttl_seconds }
    }

    /// Start a session for `user_id` and return the token to hand to the client
    pub async fn create(&self, user_id: i32) -> AppResult<String> {
        let token = generate_token();
        let session = Session {
            user_id,
            created_at: Utc::now(),
        };
        self.store
            .insert(&store_key(&token), &session, self.ttl_seconds)
            .await?;
        tracing::debug!(user_id, "Session created");
        Ok(token)
    }

    pub async fn lookup(&self, token: &str) -> AppResult<Option<Session>> {
        if token.is_empty() {
            return Ok(None);
        }
        self.store.get(&store_key(token)).await
    }

    pub async fn destroy(&self, token: &str) -> AppResult<()> {
        self.store.remove(&store_key(token)).await
    }
}

/// 32 random bytes, hex encoded
pub fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

fn store_key(token: &str) -> String {
    format!("{}{}", KEY_PREFIX, hex::encode(Sha256::digest(token.as_bytes())))
}

/// Process-local store. Sessions do not survive a restart and are not shared
/// between instances.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, (Session, Instant)>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.sessions
            .read()
            .await
            .values()
            .filter(|(_, expires)| *expires > now)
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn insert(&self, key: &str, session: &Session, ttl_seconds: u64) -> AppResult<()> {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, (_, expires)| *expires > now);
        sessions.insert(
            key.to_string(),
            (session.clone(), now + Duration::from_secs(ttl_seconds)),
        );
        Ok(())
    }

    async fn get(&self, key: &str) -> AppResult<Option<Session>> {
        let sessions = self.sessions.read().await;
        Ok(sessions
            .get(key)
            .filter(|(_, expires)| *expires > Instant::now())
            .map(|(session, _)| session.clone()))
    }

    async fn remove(&self, key: &str) -> AppResult<()> {
        self.sessions.write().await.remove(key);
        Ok(())
    }
}
