//! Client for the guest persistence service.
//!
//! The API is a small CRUD surface: list/create/delete guests per event,
//! plus event metadata for the public page. [`GuestService`] is the trait
//! seam the editor and lookup flows are written against;
//! [`HttpGuestService`] is the production implementation.

use async_trait::async_trait;
use log::{debug, error};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::guest::{Event, Guest, GuestDraft};
use crate::session::{AuthError, Session, SessionEvent};

/// Which plan limit a rejected batch create ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    GuestsPerEvent,
    GuestsTotal,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("User is not signed in.")]
    NotSignedIn,
    #[error("Session expired")]
    Unauthorized,
    #[error("Guest limit reached")]
    LimitExceeded(LimitKind),
    #[error("API error ({status}): {body}")]
    Http { status: u16, body: String },
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::NotSignedIn => ApiError::NotSignedIn,
        }
    }
}

impl ApiError {
    /// Friendly text for showing the failure to an organizer.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::NotSignedIn => "User is not signed in.".to_string(),
            ApiError::Unauthorized => {
                "Your session has expired. Please sign in again.".to_string()
            }
            ApiError::LimitExceeded(LimitKind::GuestsPerEvent) => {
                "This event already has the maximum number of guests allowed for your plan. \
                 Please upgrade your plan to add more guests."
                    .to_string()
            }
            ApiError::LimitExceeded(LimitKind::GuestsTotal) => {
                "You've reached the total guest limit across all events. \
                 Try deleting unused events or upgrade your plan."
                    .to_string()
            }
            ApiError::Http { body, .. } => {
                // Prefer the API's own message when the body is structured.
                serde_json::from_str::<ApiErrorBody>(body)
                    .ok()
                    .map(|parsed| parsed.message)
                    .filter(|message| !message.is_empty())
                    .unwrap_or_else(|| {
                        "Something went wrong while saving your guest list.".to_string()
                    })
            }
            ApiError::Transport(_) => {
                "Network error. Please check your connection and try again.".to_string()
            }
        }
    }
}

/// CRUD boundary for one event's guest roster.
#[async_trait]
pub trait GuestService: Send + Sync {
    /// Event metadata; `None` when the event does not exist.
    async fn get_event(&self, event_id: &str) -> Result<Option<Event>, ApiError>;

    async fn list_guests(&self, event_id: &str) -> Result<Vec<Guest>, ApiError>;

    /// One-shot batch create. The response carries the server-assigned rows.
    async fn create_guests(
        &self,
        event_id: &str,
        drafts: Vec<GuestDraft>,
    ) -> Result<Vec<Guest>, ApiError>;

    async fn delete_guest(&self, event_id: &str, guest_id: &str) -> Result<(), ApiError>;
}

#[derive(Deserialize)]
struct GuestsEnvelope {
    #[serde(default)]
    guests: Vec<Guest>,
}

#[derive(Serialize)]
struct CreateGuestBody<'a> {
    #[serde(rename = "eventId")]
    event_id: &'a str,
    #[serde(rename = "guestName")]
    full_name: &'a str,
    #[serde(rename = "table")]
    table_label: &'a str,
}

#[derive(Serialize)]
struct DeleteGuestBody<'a> {
    #[serde(rename = "eventId")]
    event_id: &'a str,
    #[serde(rename = "guestId")]
    guest_id: &'a str,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

fn decode_error(status: u16, body: &str) -> ApiError {
    if let Ok(parsed) = serde_json::from_str::<ApiErrorBody>(body) {
        match parsed.code.as_str() {
            "GUESTS_PER_EVENT_LIMIT" => {
                return ApiError::LimitExceeded(LimitKind::GuestsPerEvent);
            }
            "GUESTS_TOTAL_LIMIT" => return ApiError::LimitExceeded(LimitKind::GuestsTotal),
            "Unauthorized" => return ApiError::Unauthorized,
            _ => {}
        }
    }
    if status == StatusCode::UNAUTHORIZED.as_u16() {
        return ApiError::Unauthorized;
    }
    ApiError::Http { status, body: body.to_string() }
}

/// reqwest-backed implementation of [`GuestService`].
pub struct HttpGuestService {
    client: Client,
    base_url: String,
    session: Session,
}

impl HttpGuestService {
    /// `base_url` must be an absolute http(s) URL; a trailing slash is
    /// stripped so endpoint paths can be appended uniformly.
    pub fn new(base_url: &str, session: Session) -> Result<Self, ApiError> {
        let parsed = Url::parse(base_url).map_err(|e| ApiError::Http {
            status: 0,
            body: format!("invalid API base URL {:?}: {}", base_url, e),
        })?;
        Ok(Self {
            client: Client::new(),
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
            session,
        })
    }

    /// Build from the loaded config. The base URL must be configured,
    /// either in the config file or via the environment override.
    pub fn from_config(config: &crate::config::Config, session: Session) -> anyhow::Result<Self> {
        use anyhow::Context;

        let base = config.api_base().context("API base URL is not configured")?;
        let mut service = Self::new(&base, session)?;
        if let Some(secs) = config.api.timeout_seconds {
            service.client = Client::builder()
                .timeout(std::time::Duration::from_secs(secs))
                .build()
                .context("Failed to build HTTP client")?;
        }
        Ok(service)
    }

    async fn bearer(&self) -> Result<String, ApiError> {
        Ok(self.session.bearer_token().await?)
    }

    /// Shared non-2xx handling: decode the body into a typed error and let
    /// the session know when our credentials were rejected.
    async fn check(&self, response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        error!("guest API returned {}: {}", status, body);
        let err = decode_error(status.as_u16(), &body);
        if matches!(err, ApiError::Unauthorized) {
            self.session.emit(SessionEvent::Expired);
        }
        Err(err)
    }
}

#[async_trait]
impl GuestService for HttpGuestService {
    async fn get_event(&self, event_id: &str) -> Result<Option<Event>, ApiError> {
        let token = self.bearer().await?;
        debug!("fetching event {}", event_id);
        let response = self
            .client
            .get(format!("{}/events/{}", self.base_url, event_id))
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = self.check(response).await?;
        Ok(Some(response.json::<Event>().await?))
    }

    async fn list_guests(&self, event_id: &str) -> Result<Vec<Guest>, ApiError> {
        let token = self.bearer().await?;
        debug!("fetching guests for event {}", event_id);
        let response = self
            .client
            .get(format!("{}/guests", self.base_url))
            .query(&[("eventId", event_id)])
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await?;
        let response = self.check(response).await?;
        Ok(response.json::<GuestsEnvelope>().await?.guests)
    }

    async fn create_guests(
        &self,
        event_id: &str,
        drafts: Vec<GuestDraft>,
    ) -> Result<Vec<Guest>, ApiError> {
        let token = self.bearer().await?;
        debug!("creating {} guests for event {}", drafts.len(), event_id);
        let body: Vec<CreateGuestBody> = drafts
            .iter()
            .map(|draft| CreateGuestBody {
                event_id,
                full_name: &draft.full_name,
                table_label: &draft.table_label,
            })
            .collect();
        let response = self
            .client
            .post(format!("{}/guests", self.base_url))
            .header("Authorization", format!("Bearer {}", token))
            .json(&body)
            .send()
            .await?;
        let response = self.check(response).await?;
        Ok(response.json::<GuestsEnvelope>().await?.guests)
    }

    async fn delete_guest(&self, event_id: &str, guest_id: &str) -> Result<(), ApiError> {
        let token = self.bearer().await?;
        debug!("deleting guest {} from event {}", guest_id, event_id);
        let response = self
            .client
            .delete(format!("{}/guests", self.base_url))
            .header("Authorization", format!("Bearer {}", token))
            .json(&DeleteGuestBody { event_id, guest_id })
            .send()
            .await?;
        self.check(response).await?;
        Ok(())
    }
}
