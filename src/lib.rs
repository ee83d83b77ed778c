pub mod config;
pub mod guest;
pub mod lookup;
pub mod matcher;
pub mod ops;
pub mod roster;
pub mod service;
pub mod session;

pub fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Debug)
        .format_timestamp(None)
        .format_target(false)
        .init();
}

// Re-export commonly used types
pub use config::Config;
pub use guest::{Event, Guest, GuestDraft, GuestRow, RowKey};
pub use lookup::{PageState, PublicPage, TableAssignment};
pub use matcher::{LookupError, MatchResult};
pub use roster::{Field, RosterEditor, RosterError, SeedOutcome};
pub use service::{ApiError, GuestService, HttpGuestService, LimitKind};
pub use session::{AuthError, Session, SessionEvent, StaticTokenProvider, TokenProvider};
