use super::{assign_ids, remove_guest, replace_guest, GuestStore, StoreError, StoreResult};
use crate::guest::{generate_guest_id, Guest, NewGuest};
use async_trait::async_trait;
use log::{debug, info};
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

const STATE_DIR: &str = ".guestlist";
const GUESTS_FILE: &str = "guests.json";
const GUESTS_TMP_FILE: &str = "guests.json.tmp";
// Maximum allowed size for the guest file (10MB)
const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;
const MAX_GUESTS: usize = 10_000;

/// Guest store persisted as a JSON array in `<state_dir>/guests.json`
#[derive(Debug)]
pub struct JsonGuestStore {
    state_dir: PathBuf,
    // Serializes read-modify-write cycles on the file
    lock: Mutex<()>,
}

impl JsonGuestStore {
    /// Open the store in `~/.guestlist`
    pub fn new() -> StoreResult<Self> {
        let home_dir = dirs::home_dir().ok_or_else(|| {
            StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not find home directory",
            ))
        })?;
        Self::open(home_dir.join(STATE_DIR))
    }

    pub fn open(state_dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let state_dir = state_dir.into();
        std::fs::create_dir_all(&state_dir)?;
        info!("Using guest store at {}", state_dir.display());
        Ok(Self { state_dir, lock: Mutex::new(()) })
    }

    pub fn path(&self) -> PathBuf {
        self.state_dir.join(GUESTS_FILE)
    }

    fn load(&self) -> StoreResult<Vec<Guest>> {
        let path = self.path();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let metadata = std::fs::metadata(&path)?;
        if metadata.len() > MAX_FILE_SIZE {
            return Err(StoreError::LimitExceeded(format!(
                "{} is larger than {} bytes",
                path.display(),
                MAX_FILE_SIZE
            )));
        }

        let reader = BufReader::new(File::open(&path)?);
        let json_value: serde_json::Value = serde_json::from_reader(reader)?;

        if let Some(array) = json_value.as_array() {
            if array.len() > MAX_GUESTS {
                return Err(StoreError::LimitExceeded(format!(
                    "too many guests in file (maximum {})",
                    MAX_GUESTS
                )));
            }
        }

        let guests: Vec<Guest> = serde_json::from_value(json_value)?;
        debug!("Loaded {} guests from {}", guests.len(), path.display());
        Ok(guests)
    }

    fn save(&self, guests: &[Guest]) -> StoreResult<()> {
        if guests.len() > MAX_GUESTS {
            return Err(StoreError::LimitExceeded(format!(
                "cannot store more than {} guests",
                MAX_GUESTS
            )));
        }

        // Write the full list beside the file, then swap it in
        let tmp_path = self.state_dir.join(GUESTS_TMP_FILE);
        let file = OpenOptions::new().write(true).create(true).truncate(true).open(&tmp_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, guests)?;
        writer.flush()?;
        drop(writer);

        std::fs::rename(&tmp_path, self.path())?;
        Ok(())
    }

    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }
}

#[async_trait]
impl GuestStore for JsonGuestStore {
    async fn list(&self) -> StoreResult<Vec<Guest>> {
        let _guard = self.lock.lock().await;
        self.load()
    }

    async fn add(&self, guest: NewGuest) -> StoreResult<Guest> {
        let _guard = self.lock.lock().await;
        let mut guests = self.load()?;
        let guest = guest.with_id(generate_guest_id());
        guests.push(guest.clone());
        self.save(&guests)?;
        info!("Guest added: {} ({})", guest.name, guest.id);
        Ok(guest)
    }

    async fn update(&self, guest: Guest) -> StoreResult<Guest> {
        let _guard = self.lock.lock().await;
        let mut guests = self.load()?;
        let updated = replace_guest(&mut guests, guest)?;
        self.save(&guests)?;
        info!("Guest updated: {}", updated.id);
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        let _guard = self.lock.lock().await;
        let mut guests = self.load()?;
        remove_guest(&mut guests, id)?;
        self.save(&guests)?;
        info!("Guest deleted: {}", id);
        Ok(())
    }

    async fn batch_add(&self, new_guests: Vec<NewGuest>) -> StoreResult<Vec<Guest>> {
        let _guard = self.lock.lock().await;
        let mut guests = self.load()?;
        let added = assign_ids(new_guests);
        guests.extend(added.iter().cloned());
        // Single write; a failed batch leaves the file untouched
        self.save(&guests)?;
        info!("Batch added {} guests", added.len());
        Ok(added)
    }
}
