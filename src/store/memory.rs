use super::{assign_ids, remove_guest, replace_guest, GuestStore, StoreResult};
use crate::guest::{generate_guest_id, Guest, NewGuest};
use async_trait::async_trait;
use log::debug;
use tokio::sync::RwLock;

/// Process-local guest store. Nothing survives the process.
#[derive(Debug, Default)]
pub struct InMemoryGuestStore {
    guests: RwLock<Vec<Guest>>,
}

impl InMemoryGuestStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing guest list
    pub fn with_guests(guests: Vec<Guest>) -> Self {
        Self { guests: RwLock::new(guests) }
    }
}

#[async_trait]
impl GuestStore for InMemoryGuestStore {
    async fn list(&self) -> StoreResult<Vec<Guest>> {
        Ok(self.guests.read().await.clone())
    }

    async fn add(&self, guest: NewGuest) -> StoreResult<Guest> {
        let guest = guest.with_id(generate_guest_id());
        debug!("Adding guest {} ({})", guest.name, guest.id);
        self.guests.write().await.push(guest.clone());
        Ok(guest)
    }

    async fn update(&self, guest: Guest) -> StoreResult<Guest> {
        let mut guests = self.guests.write().await;
        replace_guest(&mut guests, guest)
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        let mut guests = self.guests.write().await;
        remove_guest(&mut guests, id)
    }

    async fn batch_add(&self, guests: Vec<NewGuest>) -> StoreResult<Vec<Guest>> {
        let added = assign_ids(guests);
        debug!("Batch adding {} guests", added.len());
        self.guests.write().await.extend(added.iter().cloned());
        Ok(added)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guest::GuestStatus;
    use crate::store::StoreError;

    #[tokio::test]
    async fn test_add_assigns_unique_ids() {
        let store = InMemoryGuestStore::new();
        let a = store.add(NewGuest::named("Ann")).await.unwrap();
        let b = store.add(NewGuest::named("Ann")).await.unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(store.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_update_replaces_matching_guest() {
        let store = InMemoryGuestStore::new();
        let mut guest = store.add(NewGuest::named("Carol Smith")).await.unwrap();
        guest.status = GuestStatus::Attending;
        store.update(guest.clone()).await.unwrap();

        let guests = store.list().await.unwrap();
        assert_eq!(guests, vec![guest]);
    }

    #[tokio::test]
    async fn test_update_unknown_guest_fails() {
        let store = InMemoryGuestStore::new();
        let ghost = NewGuest::named("Nobody").with_id("g_missing".into());
        let err = store.update(ghost).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(id) if id == "g_missing"));
    }

    #[tokio::test]
    async fn test_delete_removes_guest_once() {
        let store = InMemoryGuestStore::new();
        let guest = store.add(NewGuest::named("Mike Johnson")).await.unwrap();
        store.delete(&guest.id).await.unwrap();
        assert!(store.list().await.unwrap().is_empty());
        assert!(matches!(store.delete(&guest.id).await, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_batch_add_preserves_order_after_existing() {
        let seed = NewGuest::named("Existing").with_id("g1".into());
        let store = InMemoryGuestStore::with_guests(vec![seed]);
        let added = store
            .batch_add(vec![NewGuest::named("First"), NewGuest::named("Second")])
            .await
            .unwrap();

        assert_eq!(added.len(), 2);
        let names: Vec<String> = store.list().await.unwrap().into_iter().map(|g| g.name).collect();
        assert_eq!(names, vec!["Existing", "First", "Second"]);
    }
}
