//! CSV guest import.
//!
//! Guest lists arrive as hand-exported spreadsheets, so the accepted format is
//! deliberately loose: columns may appear in any order, header names ignore
//! case and whitespace, and only `Name` is required. Rows without a name are
//! skipped and bad numeric cells fall back to defaults instead of failing the
//! whole file.
//!
//! The dialect is plain comma splitting. Quoted fields and escaped commas are
//! not supported.
//!
//! ```text
//! Name,Contact,PartySize,Category,Notes
//! Jane Doe,jane@example.com,2,Bride's Family,Allergic to nuts
//! ```

use crate::guest::{Guest, GuestStatus, MealPreference, NewGuest, IMPORTED_CATEGORY};
use crate::store::{GuestStore, StoreError};
use csv::StringRecord;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

/// Column headers understood by the importer, as shown to users
pub const ACCEPTED_COLUMNS: [&str; 5] = ["Name", "Contact", "PartySize", "Category", "Notes"];

/// Default upper bound for an imported file (5MB)
pub const DEFAULT_MAX_IMPORT_BYTES: u64 = 5 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("CSV must contain a 'Name' column. Accepted columns are: {}.", ACCEPTED_COLUMNS.join(", "))]
    MissingNameColumn,
    #[error("No valid guest data found in the CSV. Please check the file format.")]
    NoValidRows,
    #[error("{} is {size} bytes, which exceeds the import limit of {limit} bytes", .path.display())]
    FileTooLarge { path: PathBuf, size: u64, limit: u64 },
    #[error("Failed to read {}: {source}", .path.display())]
    Io { path: PathBuf, source: std::io::Error },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Positions of the recognized columns in the header row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnMap {
    name: usize,
    contact: Option<usize>,
    party_size: Option<usize>,
    category: Option<usize>,
    notes: Option<usize>,
}

impl ColumnMap {
    fn from_header(header: &StringRecord) -> Result<Self, ImportError> {
        let keys: Vec<String> = header.iter().map(canonical_header).collect();
        let find = |key: &str| keys.iter().position(|k| k == key);

        let name = find("name").ok_or(ImportError::MissingNameColumn)?;
        let columns = ColumnMap {
            name,
            contact: find("contact"),
            party_size: find("partysize"),
            category: find("category"),
            notes: find("notes"),
        };
        debug!("Guest CSV columns: {:?}", columns);
        Ok(columns)
    }
}

/// `" Party Size "` -> `"partysize"`
fn canonical_header(raw: &str) -> String {
    raw.trim().to_lowercase().chars().filter(|c| !c.is_whitespace()).collect()
}

fn cell(record: &StringRecord, index: Option<usize>) -> Option<&str> {
    index.and_then(|i| record.get(i)).map(str::trim).filter(|value| !value.is_empty())
}

/// Read the leading base-10 digits of a party size cell.
///
/// `"3"`, `"+3"` and `"3 people"` give 3; empty, non-numeric, zero, negative
/// or overflowing values give `None`.
fn parse_party_size(value: &str) -> Option<u32> {
    let value = value.strip_prefix('+').unwrap_or(value);
    let end = value.find(|c: char| !c.is_ascii_digit()).unwrap_or(value.len());
    value[..end].parse::<u32>().ok().filter(|n| *n > 0)
}

fn build_guest(record: &StringRecord, columns: &ColumnMap, line: usize) -> Option<NewGuest> {
    let name = cell(record, Some(columns.name))?;

    let party_size = match cell(record, columns.party_size) {
        Some(raw) => parse_party_size(raw).unwrap_or_else(|| {
            debug!("Line {}: party size '{}' is not a positive number, using 1", line, raw);
            1
        }),
        None => 1,
    };

    Some(NewGuest {
        name: name.to_string(),
        status: GuestStatus::Pending,
        party_size,
        contact: cell(record, columns.contact).unwrap_or_default().to_string(),
        meal_preference: MealPreference::NotSpecified,
        category: cell(record, columns.category).unwrap_or(IMPORTED_CATEGORY).to_string(),
        notes: cell(record, columns.notes).unwrap_or_default().to_string(),
    })
}

/// Parse CSV text into guests ready for insertion.
///
/// Returns an empty list when there is nothing beyond a header. Fails only
/// when the header has no `Name` column; every other problem is handled per
/// row. Output order follows the file.
pub fn parse_guest_csv(csv_text: &str) -> Result<Vec<NewGuest>, ImportError> {
    let text = csv_text.trim();
    if text.lines().nth(1).is_none() {
        return Ok(Vec::new());
    }

    // `\n` terminates records; a `\r` left over from CRLF is trimmed per cell.
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_reader(text.as_bytes());

    let mut records = reader.records();
    let header = match records.next() {
        Some(Ok(header)) => header,
        Some(Err(e)) => {
            warn!("Could not read CSV header: {}", e);
            return Err(ImportError::MissingNameColumn);
        }
        None => return Ok(Vec::new()),
    };
    let columns = ColumnMap::from_header(&header)?;

    let mut guests = Vec::new();
    for (offset, record) in records.enumerate() {
        let line = offset + 2;
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                warn!("Skipping unreadable CSV line {}: {}", line, e);
                continue;
            }
        };
        match build_guest(&record, &columns, line) {
            Some(guest) => guests.push(guest),
            None => debug!("Skipping CSV line {}: no name", line),
        }
    }

    Ok(guests)
}

/// Read an import file as text, refusing anything over `max_bytes`
pub fn read_guest_file(path: &Path, max_bytes: u64) -> Result<String, ImportError> {
    let io_error = |source| ImportError::Io { path: path.to_path_buf(), source };

    let size = std::fs::metadata(path).map_err(io_error)?.len();
    if size > max_bytes {
        return Err(ImportError::FileTooLarge { path: path.to_path_buf(), size, limit: max_bytes });
    }
    std::fs::read_to_string(path).map_err(io_error)
}

/// Result of a successful import
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    /// Guests created by this import, in file order
    pub imported: Vec<Guest>,
    /// The store's full guest list after the import
    pub guests: Vec<Guest>,
}

/// Parse `csv_text`, insert the guests as one batch and reload the list.
///
/// A file that parses to zero guests is reported as [`ImportError::NoValidRows`]
/// and leaves the store untouched.
pub async fn import_guests(
    store: &dyn GuestStore,
    csv_text: &str,
) -> Result<ImportOutcome, ImportError> {
    let new_guests = parse_guest_csv(csv_text)?;
    if new_guests.is_empty() {
        return Err(ImportError::NoValidRows);
    }

    info!("Importing {} guests", new_guests.len());
    let imported = store.batch_add(new_guests).await?;
    let guests = store.list().await?;
    Ok(ImportOutcome { imported, guests })
}
