//! Guest persistence boundary.
//
// Everything that reads or writes the guest list goes through `GuestStore`,
// so the import workflow and the command handlers can run against the
// in-memory store in tests and the JSON-backed store in the binary.

use crate::guest::{Guest, NewGuest};
use async_trait::async_trait;

mod json;
mod memory;

pub use json::JsonGuestStore;
pub use memory::InMemoryGuestStore;

/// Custom error type for guest store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Guest '{0}' not found")]
    NotFound(String),
    #[error("Guest store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to read guest data: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Guest file exceeds limits: {0}")]
    LimitExceeded(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[async_trait]
pub trait GuestStore: std::fmt::Debug + Send + Sync {
    /// All guests, in insertion order
    async fn list(&self) -> StoreResult<Vec<Guest>>;

    async fn add(&self, guest: NewGuest) -> StoreResult<Guest>;

    /// Replace the stored guest carrying the same id
    async fn update(&self, guest: Guest) -> StoreResult<Guest>;

    async fn delete(&self, id: &str) -> StoreResult<()>;

    /// Insert every guest in order and return them with their new ids
    async fn batch_add(&self, guests: Vec<NewGuest>) -> StoreResult<Vec<Guest>>;
}

// Shared list mutations so both stores apply identical semantics.

fn replace_guest(guests: &mut [Guest], guest: Guest) -> StoreResult<Guest> {
    match guests.iter_mut().find(|g| g.id == guest.id) {
        Some(slot) => {
            *slot = guest.clone();
            Ok(guest)
        }
        None => Err(StoreError::NotFound(guest.id)),
    }
}

fn remove_guest(guests: &mut Vec<Guest>, id: &str) -> StoreResult<()> {
    let initial_len = guests.len();
    guests.retain(|g| g.id != id);
    if guests.len() == initial_len {
        return Err(StoreError::NotFound(id.to_string()));
    }
    Ok(())
}

fn assign_ids(guests: Vec<NewGuest>) -> Vec<Guest> {
    guests.into_iter().map(|g| g.with_id(crate::guest::generate_guest_id())).collect()
}
