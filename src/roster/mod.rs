//! Editable guest roster for the organizer grid.
//!
//! [`RosterEditor`] owns the local row collection and mediates between UI
//! actions (add, type, paste, delete, save) and the persistence service.
//! The server is the system of record: save and delete responses overwrite
//! local state, and a roster fetch that lands late is discarded rather than
//! allowed to clobber unsaved rows.

use log::{debug, info};
use thiserror::Error;

use crate::guest::{Guest, GuestDraft, GuestRow, RowKey};
use crate::matcher::normalize;
use crate::ops::{OpState, SeedTicket};
use crate::service::{ApiError, GuestService};

mod paste;
pub use paste::parse_paste;


/// Which cell of a row an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Table,
}

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("No new guests to save")]
    NothingToSave,
    #[error("Saved guests cannot be edited")]
    RowNotEditable,
    #[error("Another save or delete is still running")]
    Busy,
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// What became of a remote roster snapshot handed to
/// [`RosterEditor::seed_from_remote`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Applied,
    /// A newer fetch was started after this one; its result wins.
    StaleFetch,
    /// Unsaved rows with content exist; applying would discard them.
    UnsavedEdits,
    /// A save or delete is mid-flight.
    SaveInFlight,
}

pub struct RosterEditor {
    event_id: String,
    rows: Vec<GuestRow>,
    next_local_id: u64,
    /// Single-flight state for save/delete; `Pending` disables both.
    persist_op: OpState<(), String>,
    /// Epoch for seed tickets; bumped by `begin_seed` and by successful
    /// persistence ops so fetches started against the old state die stale.
    seed_epoch: u64,
}

impl RosterEditor {
    /// Starts with a single blank row, the same shape the grid shows
    /// before the roster has loaded.
    pub fn new(event_id: impl Into<String>) -> Self {
        let mut editor = Self {
            event_id: event_id.into(),
            rows: Vec::new(),
            next_local_id: 0,
            persist_op: OpState::Idle,
            seed_epoch: 0,
        };
        let id = editor.fresh_local_id();
        editor.rows.push(GuestRow::Blank { local_id: id });
        editor
    }

    pub fn event_id(&self) -> &str {
        &self.event_id
    }

    pub fn rows(&self) -> &[GuestRow] {
        &self.rows
    }

    /// True while a save or remote delete is in flight; UI controls for
    /// add/delete/save should be disabled.
    pub fn is_saving(&self) -> bool {
        self.persist_op.is_pending()
    }

    /// User-facing message from the most recent failed operation.
    pub fn last_error(&self) -> Option<&str> {
        self.persist_op.failure().map(String::as_str)
    }

    fn fresh_local_id(&mut self) -> u64 {
        let id = self.next_local_id;
        self.next_local_id += 1;
        id
    }

    /// Any unsaved row that carries content. These are what a stale seed
    /// must not clobber and what `save_all` submits.
    fn has_unsaved_content(&self) -> bool {
        self.rows.iter().any(|row| row.is_new() && row.has_content())
    }

    /// Claim a ticket for a roster fetch about to start. Issuing a new
    /// ticket supersedes every earlier one.
    pub fn begin_seed(&mut self) -> SeedTicket {
        self.seed_epoch += 1;
        SeedTicket(self.seed_epoch)
    }

    /// Replace local state with a remote snapshot, unless the snapshot is
    /// no longer safe to apply. An empty remote roster seeds a single
    /// blank row. Idempotent: re-applying the same snapshot (with no
    /// intervening edits) yields the same roster contents.
    pub fn seed_from_remote(&mut self, ticket: SeedTicket, remote: Vec<Guest>) -> SeedOutcome {
        if ticket.0 != self.seed_epoch {
            info!("discarding roster snapshot from superseded fetch");
            return SeedOutcome::StaleFetch;
        }
        if self.is_saving() {
            info!("discarding roster snapshot: save in flight");
            return SeedOutcome::SaveInFlight;
        }
        if self.has_unsaved_content() {
            info!("discarding roster snapshot: unsaved local edits");
            return SeedOutcome::UnsavedEdits;
        }

        if remote.is_empty() {
            let id = self.fresh_local_id();
            self.rows = vec![GuestRow::Blank { local_id: id }];
        } else {
            self.rows = remote.into_iter().map(GuestRow::Persisted).collect();
        }
        self.persist_op = OpState::Idle;
        SeedOutcome::Applied
    }

    /// Fetch the roster and seed it in one step.
    pub async fn refresh(
        &mut self,
        service: &dyn GuestService,
    ) -> Result<SeedOutcome, RosterError> {
        let ticket = self.begin_seed();
        let remote = service.list_guests(&self.event_id).await?;
        Ok(self.seed_from_remote(ticket, remote))
    }

    /// Append an empty row and return its key.
    pub fn add_blank_row(&mut self) -> RowKey {
        let id = self.fresh_local_id();
        self.rows.push(GuestRow::Blank { local_id: id });
        RowKey::Local(id)
    }

    /// Update one cell of an unsaved row. Persisted rows are read-only
    /// through this editor; editing one reports `RowNotEditable` without
    /// touching state, and callers wanting the quiet behavior simply
    /// ignore the error.
    pub fn edit_cell(
        &mut self,
        key: &RowKey,
        field: Field,
        value: &str,
    ) -> Result<(), RosterError> {
        let Some(row) = self.rows.iter_mut().find(|row| row.key() == *key) else {
            debug!("edit for unknown row {}", key);
            return Ok(());
        };
        match row {
            GuestRow::Persisted(_) => {
                debug!("ignoring edit to persisted row {}", key);
                Err(RosterError::RowNotEditable)
            }
            GuestRow::Blank { local_id } => {
                let local_id = *local_id;
                let (full_name, table_label) = match field {
                    Field::Name => (value.to_string(), String::new()),
                    Field::Table => (String::new(), value.to_string()),
                };
                *row = GuestRow::Edited { local_id, full_name, table_label };
                Ok(())
            }
            GuestRow::Edited { full_name, table_label, .. } => {
                match field {
                    Field::Name => *full_name = value.to_string(),
                    Field::Table => *table_label = value.to_string(),
                }
                Ok(())
            }
        }
    }

    /// Append rows parsed from spreadsheet-style text, one `name<TAB>table`
    /// record per line. Purely additive; existing rows are untouched.
    /// Returns how many rows were added.
    pub fn import_paste(&mut self, raw_text: &str) -> usize {
        let records = parse_paste(raw_text);
        let count = records.len();
        for record in records {
            let local_id = self.fresh_local_id();
            self.rows.push(GuestRow::Edited {
                local_id,
                full_name: record.full_name,
                table_label: record.table_label,
            });
        }
        if count > 0 {
            debug!("pasted {} guest rows", count);
            // New content supersedes whatever the last failure was about.
            self.persist_op = OpState::Idle;
        }
        count
    }

    /// Remove a row. Unsaved rows are dropped locally with no network
    /// call; persisted rows are deleted remotely first and only removed
    /// once the service confirms.
    pub async fn delete_row(
        &mut self,
        service: &dyn GuestService,
        key: &RowKey,
    ) -> Result<(), RosterError> {
        if self.is_saving() {
            return Err(RosterError::Busy);
        }
        let Some(pos) = self.rows.iter().position(|row| row.key() == *key) else {
            debug!("delete for unknown row {}", key);
            return Ok(());
        };

        let guest_id = match &self.rows[pos] {
            GuestRow::Persisted(guest) => guest.id.clone(),
            _ => {
                // Unsaved rows are dropped locally, no network call.
                self.rows.remove(pos);
                return Ok(());
            }
        };

        self.persist_op = OpState::Pending;
        match service.delete_guest(&self.event_id, &guest_id).await {
            Ok(()) => {
                self.rows.remove(pos);
                self.persist_op = OpState::Succeeded(());
                // In-flight fetches predate this delete; let them die stale.
                self.seed_epoch += 1;
                info!("deleted guest {} from event {}", guest_id, self.event_id);
                Ok(())
            }
            Err(err) => {
                self.persist_op = OpState::Failed(err.user_message());
                Err(err.into())
            }
        }
    }

    /// Send every unsaved row with content to the batch-create endpoint.
    ///
    /// All-or-nothing on the client: a failure leaves the roster exactly as
    /// it was. On success the submitted rows are replaced by the
    /// server-returned ones (server ids, `is_new` cleared), persisted rows
    /// survive unmodified, and pristine blank placeholders are dropped.
    /// Returns the number of rows the server confirmed.
    pub async fn save_all(&mut self, service: &dyn GuestService) -> Result<usize, RosterError> {
        if self.is_saving() {
            return Err(RosterError::Busy);
        }

        let drafts: Vec<GuestDraft> =
            self.rows.iter().filter_map(|row| row.as_draft()).collect();
        if drafts.is_empty() {
            self.persist_op = OpState::Failed("No new guests to save".to_string());
            return Err(RosterError::NothingToSave);
        }

        self.persist_op = OpState::Pending;
        match service.create_guests(&self.event_id, drafts).await {
            Ok(saved) => {
                let count = saved.len();
                let mut kept: Vec<GuestRow> =
                    self.rows.iter().filter(|row| !row.is_new()).cloned().collect();
                kept.extend(saved.into_iter().map(GuestRow::Persisted));
                self.rows = kept;
                self.persist_op = OpState::Succeeded(());
                self.seed_epoch += 1;
                info!("saved {} guests to event {}", count, self.event_id);
                Ok(count)
            }
            Err(err) => {
                self.persist_op = OpState::Failed(err.user_message());
                Err(err.into())
            }
        }
    }

    /// Display-side projection: rows whose name or table contains the
    /// normalized term. An empty term returns everything. Never mutates;
    /// save and delete always target rows by key, not by filtered
    /// position.
    pub fn filter(&self, term: &str) -> Vec<&GuestRow> {
        let needle = normalize(term);
        if needle.is_empty() {
            return self.rows.iter().collect();
        }
        self.rows
            .iter()
            .filter(|row| {
                normalize(row.full_name()).contains(&needle)
                    || normalize(row.table_label()).contains(&needle)
            })
            .collect()
    }

    /// Header count: persisted rows plus unsaved rows that carry content.
    pub fn total_guest_count(&self) -> usize {
        self.rows.iter().filter(|row| !row.is_new() || row.has_content()).count()
    }
}
