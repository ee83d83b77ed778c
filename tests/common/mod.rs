#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tablefind::guest::{Event, Guest, GuestDraft};
use tablefind::service::{ApiError, GuestService};

pub fn guest(id: &str, name: &str, table: &str) -> Guest {
    Guest { id: id.to_string(), full_name: name.to_string(), table_label: table.to_string() }
}

pub fn event(id: &str, title: &str) -> Event {
    Event { id: id.to_string(), title: title.to_string(), date: None, location: None }
}

/// In-memory stand-in for the guest API. Counts every call and can be
/// scripted to fail, so tests can assert both state and traffic.
#[derive(Default)]
pub struct MockGuestService {
    event: Mutex<Option<Event>>,
    guests: Mutex<Vec<Guest>>,
    next_id: AtomicUsize,
    pub list_calls: AtomicUsize,
    pub create_calls: AtomicUsize,
    pub delete_calls: AtomicUsize,
    fail_list: Mutex<VecDeque<ApiError>>,
    fail_create: Mutex<VecDeque<ApiError>>,
    fail_delete: Mutex<VecDeque<ApiError>>,
}

impl MockGuestService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_event(event: Event) -> Self {
        let mock = Self::default();
        *mock.event.lock().unwrap() = Some(event);
        mock
    }

    pub fn seed_guests(&self, guests: Vec<Guest>) {
        *self.guests.lock().unwrap() = guests;
    }

    pub fn stored_guests(&self) -> Vec<Guest> {
        self.guests.lock().unwrap().clone()
    }

    pub fn fail_next_list(&self, err: ApiError) {
        self.fail_list.lock().unwrap().push_back(err);
    }

    pub fn fail_next_create(&self, err: ApiError) {
        self.fail_create.lock().unwrap().push_back(err);
    }

    pub fn fail_next_delete(&self, err: ApiError) {
        self.fail_delete.lock().unwrap().push_back(err);
    }

    pub fn create_call_count(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn delete_call_count(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GuestService for MockGuestService {
    async fn get_event(&self, _event_id: &str) -> Result<Option<Event>, ApiError> {
        Ok(self.event.lock().unwrap().clone())
    }

    async fn list_guests(&self, _event_id: &str) -> Result<Vec<Guest>, ApiError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.fail_list.lock().unwrap().pop_front() {
            return Err(err);
        }
        Ok(self.guests.lock().unwrap().clone())
    }

    async fn create_guests(
        &self,
        _event_id: &str,
        drafts: Vec<GuestDraft>,
    ) -> Result<Vec<Guest>, ApiError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.fail_create.lock().unwrap().pop_front() {
            return Err(err);
        }
        let created: Vec<Guest> = drafts
            .into_iter()
            .map(|draft| Guest {
                id: format!("srv-{}", self.next_id.fetch_add(1, Ordering::SeqCst)),
                full_name: draft.full_name,
                table_label: draft.table_label,
            })
            .collect();
        self.guests.lock().unwrap().extend(created.clone());
        Ok(created)
    }

    async fn delete_guest(&self, _event_id: &str, guest_id: &str) -> Result<(), ApiError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.fail_delete.lock().unwrap().pop_front() {
            return Err(err);
        }
        self.guests.lock().unwrap().retain(|guest| guest.id != guest_id);
        Ok(())
    }
}
