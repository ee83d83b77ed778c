//! Auth session seam.
//!
//! The persistence client never talks to an identity provider directly; it
//! asks a [`TokenProvider`] for a bearer token on every call. [`Session`]
//! bundles a provider with a subscriber list so interested layers can react
//! to sign-in state changes without any process-global state.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use log::debug;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("User is not signed in.")]
    NotSignedIn,
}

/// Source of bearer credentials for persistence calls.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn bearer_token(&self) -> Result<String, AuthError>;
}

/// Fixed-token provider for tests and non-interactive tooling.
pub struct StaticTokenProvider {
    token: Option<String>,
}

impl StaticTokenProvider {
    pub fn signed_in(token: impl Into<String>) -> Self {
        Self { token: Some(token.into()) }
    }

    pub fn signed_out() -> Self {
        Self { token: None }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn bearer_token(&self) -> Result<String, AuthError> {
        self.token.clone().ok_or(AuthError::NotSignedIn)
    }
}

/// Sign-in state transitions surfaced to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn,
    SignedOut,
    /// The API rejected our credentials; the token is no longer good.
    Expired,
}

type Listener = Box<dyn Fn(SessionEvent) + Send + Sync>;

/// Explicit session object passed by reference to service call sites.
#[derive(Clone)]
pub struct Session {
    provider: Arc<dyn TokenProvider>,
    listeners: Arc<Mutex<Vec<Listener>>>,
}

impl Session {
    pub fn new(provider: Arc<dyn TokenProvider>) -> Self {
        Self { provider, listeners: Arc::new(Mutex::new(Vec::new())) }
    }

    pub async fn bearer_token(&self) -> Result<String, AuthError> {
        self.provider.bearer_token().await
    }

    /// Register a listener for session events. Listeners live as long as
    /// the session; there is no unsubscribe.
    pub fn subscribe(&self, listener: impl Fn(SessionEvent) + Send + Sync + 'static) {
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.push(Box::new(listener));
        }
    }

    pub fn emit(&self, event: SessionEvent) {
        debug!("session event: {:?}", event);
        if let Ok(listeners) = self.listeners.lock() {
            for listener in listeners.iter() {
                listener(event);
            }
        }
    }
}
