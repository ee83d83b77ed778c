//! Read-only attendee flow for the public lookup page.
//!
//! The page loads event metadata and the roster together, then resolves
//! whatever the visitor types against the snapshot. Nothing here writes.

use log::debug;

use crate::guest::{Event, Guest};
use crate::matcher::{self, LookupError};
use crate::service::{ApiError, GuestService};

/// Everything the public page needs, with the roster pre-sorted the way
/// the suggestion list displays it.
#[derive(Debug, Clone, PartialEq)]
pub struct PublicPage {
    pub event: Event,
    pub guests: Vec<Guest>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PageState {
    Ready(PublicPage),
    /// The event id in the link does not exist (or was deleted).
    NotFound,
}

/// Fetch event and roster concurrently and assemble the page snapshot.
pub async fn load_public_page(
    service: &dyn GuestService,
    event_id: &str,
) -> Result<PageState, ApiError> {
    let (event, mut guests) =
        tokio::try_join!(service.get_event(event_id), service.list_guests(event_id))?;

    let Some(event) = event else {
        debug!("event {} not found", event_id);
        return Ok(PageState::NotFound);
    };

    guests.sort_by_cached_key(|guest| matcher::normalize(&guest.full_name));
    Ok(PageState::Ready(PublicPage { event, guests }))
}

/// Where a resolved guest is seated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableAssignment {
    pub guest_name: String,
    pub table_label: String,
}

/// Resolve a typed name to a table assignment.
pub fn find_table(guests: &[Guest], query: &str) -> Result<TableAssignment, LookupError> {
    let guest = matcher::resolve(guests, query)?;
    Ok(TableAssignment {
        guest_name: guest.full_name.clone(),
        table_label: guest.table_label.trim().to_string(),
    })
}
