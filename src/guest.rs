use serde::{Deserialize, Serialize};

/// A guest as the persistence service knows it. `id` is always a
/// server-assigned identifier; unsaved rows live in [`GuestRow`] instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guest {
    #[serde(rename = "guestId")]
    pub id: String,
    #[serde(rename = "guestName", default)]
    pub full_name: String,
    #[serde(rename = "table", default)]
    pub table_label: String,
}

/// Payload for a guest that has not been created on the server yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuestDraft {
    #[serde(rename = "guestName")]
    pub full_name: String,
    #[serde(rename = "table")]
    pub table_label: String,
}

/// Event metadata shown above the public lookup form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "eventId")]
    pub id: String,
    #[serde(rename = "eventTitle", default)]
    pub title: String,
    #[serde(rename = "eventDate", default)]
    pub date: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    pub location: Option<String>,
}

/// Identity of one roster row. Placeholder ids are minted from a
/// session-scoped counter and never leave the client; server ids are
/// whatever the persistence service assigned.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RowKey {
    Local(u64),
    Server(String),
}

impl std::fmt::Display for RowKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RowKey::Local(n) => write!(f, "local:{}", n),
            RowKey::Server(id) => write!(f, "{}", id),
        }
    }
}

/// One row of the editable roster.
///
/// Rows move `Blank` -> `Edited` -> `Persisted`; a persisted row only ever
/// leaves the roster through a remote delete. Each variant carries just the
/// fields that are meaningful in that state.
#[derive(Debug, Clone, PartialEq)]
pub enum GuestRow {
    /// Freshly added, nothing typed yet.
    Blank { local_id: u64 },
    /// Unsaved row the organizer has typed or pasted into.
    Edited { local_id: u64, full_name: String, table_label: String },
    /// Confirmed by the persistence service.
    Persisted(Guest),
}

impl GuestRow {
    pub fn key(&self) -> RowKey {
        match self {
            GuestRow::Blank { local_id } | GuestRow::Edited { local_id, .. } => {
                RowKey::Local(*local_id)
            }
            GuestRow::Persisted(guest) => RowKey::Server(guest.id.clone()),
        }
    }

    pub fn full_name(&self) -> &str {
        match self {
            GuestRow::Blank { .. } => "",
            GuestRow::Edited { full_name, .. } => full_name,
            GuestRow::Persisted(guest) => &guest.full_name,
        }
    }

    pub fn table_label(&self) -> &str {
        match self {
            GuestRow::Blank { .. } => "",
            GuestRow::Edited { table_label, .. } => table_label,
            GuestRow::Persisted(guest) => &guest.table_label,
        }
    }

    /// True until the server has confirmed this row.
    pub fn is_new(&self) -> bool {
        !matches!(self, GuestRow::Persisted(_))
    }

    /// Whether either field holds non-whitespace text.
    pub fn has_content(&self) -> bool {
        !self.full_name().trim().is_empty() || !self.table_label().trim().is_empty()
    }

    /// Submission payload for an unsaved row, if it carries any content.
    pub(crate) fn as_draft(&self) -> Option<GuestDraft> {
        match self {
            GuestRow::Edited { full_name, table_label, .. } if self.has_content() => {
                Some(GuestDraft {
                    full_name: full_name.clone(),
                    table_label: table_label.clone(),
                })
            }
            _ => None,
        }
    }
}
