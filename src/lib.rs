pub mod app;
pub mod cli;
pub mod command_processor;
pub mod config;
pub mod guest;
pub mod import;
pub mod store;

// Re-export commonly used types
pub use app::init_logger;
pub use config::Config;
pub use guest::{Guest, GuestStatus, GuestSummary, MealPreference, NewGuest};
pub use import::{import_guests, parse_guest_csv, read_guest_file, ImportError, ImportOutcome};
pub use store::{GuestStore, InMemoryGuestStore, JsonGuestStore, StoreError};
