//! Guest command handler
//!
//! Handles guest list commands: list, add, update, remove, import and summary.
//
// # Examples
//
// ```
// let handler = GuestHandler::new(store, max_import_bytes);
// let args = CommandArgs::new("guest".to_string(), vec!["import".to_string(), ...], ...);
// handler.execute(args).await?;
// ```

use super::{CommandArgs, CommandHandler};
use crate::guest::{Guest, GuestStatus, GuestSummary, MealPreference, NewGuest};
use crate::import::{import_guests, read_guest_file};
use crate::store::GuestStore;
use anyhow::{anyhow, bail, Result};
use log::info;
use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::sync::Arc;

#[derive(Debug)]
pub struct GuestHandler {
    store: Arc<dyn GuestStore>,
    max_import_bytes: u64,
}

/// Field changes requested through `--flag value` pairs
#[derive(Debug, Default, PartialEq)]
struct GuestEdits {
    name: Option<String>,
    status: Option<GuestStatus>,
    party_size: Option<u32>,
    contact: Option<String>,
    meal_preference: Option<MealPreference>,
    category: Option<String>,
    notes: Option<String>,
}

impl GuestEdits {
    fn from_args(args: &CommandArgs) -> Result<Self> {
        let party_size = match args.flag("party-size") {
            Some(raw) => {
                let size: u32 = raw
                    .trim()
                    .parse()
                    .map_err(|_| anyhow!("Party size must be a whole number, got '{}'", raw))?;
                if size == 0 {
                    bail!("Party size must be at least 1");
                }
                Some(size)
            }
            None => None,
        };

        let name = match args.flag("name").map(str::trim) {
            Some("") => bail!("Guest name cannot be empty"),
            other => other.map(String::from),
        };

        Ok(Self {
            name,
            status: args.flag("status").map(str::parse::<GuestStatus>).transpose().map_err(|e: String| anyhow!(e))?,
            party_size,
            contact: args.flag("contact").map(|s| s.trim().to_string()),
            meal_preference: args
                .flag("meal")
                .map(str::parse::<MealPreference>)
                .transpose()
                .map_err(|e: String| anyhow!(e))?,
            category: args.flag("category").map(|s| s.trim().to_string()),
            notes: args.flag("notes").map(|s| s.trim().to_string()),
        })
    }

    fn apply(self, guest: &mut NewGuest) {
        if let Some(name) = self.name {
            guest.name = name;
        }
        if let Some(status) = self.status {
            guest.status = status;
        }
        if let Some(size) = self.party_size {
            guest.party_size = size;
        }
        if let Some(contact) = self.contact {
            guest.contact = contact;
        }
        if let Some(meal) = self.meal_preference {
            guest.meal_preference = meal;
        }
        if let Some(category) = self.category {
            guest.category = category;
        }
        if let Some(notes) = self.notes {
            guest.notes = notes;
        }
    }
}

impl GuestHandler {
    pub fn new(store: Arc<dyn GuestStore>, max_import_bytes: u64) -> Self {
        Self { store, max_import_bytes }
    }

    async fn list(&self, args: &CommandArgs) -> Result<()> {
        let status: Option<GuestStatus> =
            args.flag("status").map(str::parse::<GuestStatus>).transpose().map_err(|e: String| anyhow!(e))?;
        let category = args.flag("category").map(str::trim);

        let guests: Vec<Guest> = self
            .store
            .list()
            .await?
            .into_iter()
            .filter(|g| status.map_or(true, |s| g.status == s))
            .filter(|g| category.map_or(true, |c| g.category.eq_ignore_ascii_case(c)))
            .collect();

        print!("{}", format_guest_table(&guests));
        Ok(())
    }

    async fn add(&self, args: &CommandArgs) -> Result<()> {
        let name = args
            .args
            .get(1)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| anyhow!("Usage: guest add <name> [--party-size N] [--contact C] [--category C] [--notes N] [--status S] [--meal M]"))?;

        let mut guest = NewGuest::named(name);
        GuestEdits::from_args(args)?.apply(&mut guest);
        let guest = self.store.add(guest).await?;
        println!("Guest added: {} ({})", guest.name, guest.id);
        Ok(())
    }

    async fn update(&self, args: &CommandArgs) -> Result<()> {
        let id = args
            .args
            .get(1)
            .ok_or_else(|| anyhow!("Usage: guest update <id> [--name N] [--party-size N] [...]"))?;
        let edits = GuestEdits::from_args(args)?;
        if edits == GuestEdits::default() {
            bail!("Nothing to update. Pass at least one of --name, --party-size, --contact, --category, --notes, --status, --meal");
        }

        let existing = self
            .store
            .list()
            .await?
            .into_iter()
            .find(|g| &g.id == id)
            .ok_or_else(|| anyhow!("Guest '{}' not found", id))?;

        let (id, mut fields) = existing.split();
        edits.apply(&mut fields);
        let guest = self.store.update(fields.with_id(id)).await?;
        println!("Guest updated: {} ({})", guest.name, guest.id);
        Ok(())
    }

    async fn remove(&self, args: &CommandArgs) -> Result<()> {
        let id = args.args.get(1).ok_or_else(|| anyhow!("Usage: guest remove <id>"))?;
        self.store.delete(id).await?;
        println!("Guest '{}' removed", id);
        Ok(())
    }

    async fn import(&self, args: &CommandArgs) -> Result<()> {
        let path = args.args.get(1).ok_or_else(|| anyhow!("Usage: guest import <file.csv>"))?;
        println!("Importing guests from CSV...");

        let text = read_guest_file(Path::new(path), self.max_import_bytes)?;
        let outcome = import_guests(self.store.as_ref(), &text).await?;

        info!("Imported {} guests from {}", outcome.imported.len(), path);
        println!("{} guests imported successfully!", outcome.imported.len());
        print!("{}", format_guest_table(&outcome.guests));
        Ok(())
    }

    async fn summary(&self) -> Result<()> {
        let guests = self.store.list().await?;
        print!("{}", format_summary(&GuestSummary::from_guests(&guests)));
        Ok(())
    }
}

impl CommandHandler for GuestHandler {
    fn execute(&self, args: CommandArgs) -> Pin<Box<dyn Future<Output = Result<()>> + '_>> {
        Box::pin(async move {
            match args.args.first().map(|s| s.as_str()) {
                Some("list") | Some("ls") | None => self.list(&args).await,
                Some("add") | Some("create") => self.add(&args).await,
                Some("update") | Some("edit") => self.update(&args).await,
                Some("remove") | Some("delete") => self.remove(&args).await,
                Some("import") => self.import(&args).await,
                Some("summary") | Some("stats") => self.summary().await,
                Some(other) => {
                    println!(
                        "Unknown guest command '{}'. Available commands: list, add, update, remove, import, summary",
                        other
                    );
                    Ok(())
                }
            }
        })
    }

    fn can_handle(&self, command: &str) -> bool {
        command == "guest" || command == "guests"
    }
}

/// Render guests as an aligned text table
pub fn format_guest_table(guests: &[Guest]) -> String {
    if guests.is_empty() {
        return "No guests yet. Add one with 'guest add' or import a CSV.\n".to_string();
    }

    let width = |cells: Vec<&str>, header: &str| {
        cells.iter().map(|c| c.chars().count()).max().unwrap_or(0).max(header.len())
    };
    let id_w = width(guests.iter().map(|g| g.id.as_str()).collect(), "ID");
    let name_w = width(guests.iter().map(|g| g.name.as_str()).collect(), "Name");
    let cat_w = width(guests.iter().map(|g| g.category.as_str()).collect(), "Category");

    let mut out = format!(
        "{:<id_w$}  {:<name_w$}  {:<9}  {:>5}  {:<cat_w$}  {}\n",
        "ID", "Name", "Status", "Party", "Category", "Meal"
    );
    for g in guests {
        out.push_str(&format!(
            "{:<id_w$}  {:<name_w$}  {:<9}  {:>5}  {:<cat_w$}  {}\n",
            g.id,
            g.name,
            g.status.to_string(),
            g.party_size,
            g.category,
            g.meal_preference
        ));
    }
    out
}

pub fn format_summary(summary: &GuestSummary) -> String {
    format!(
        "Parties:             {}\n\
         Attending:           {} ({} people)\n\
         Declined:            {}\n\
         Pending RSVPs:       {}\n",
        summary.total_parties,
        summary.attending_parties,
        summary.attending_headcount,
        summary.declined_parties,
        summary.pending_parties
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::ImportError;
    use crate::store::InMemoryGuestStore;
    use std::collections::HashMap;

    fn command(args: &[&str], flags: &[(&str, &str)]) -> CommandArgs {
        CommandArgs::new(
            "guest".to_string(),
            args.iter().map(|s| s.to_string()).collect(),
            flags.iter().map(|(k, v)| (k.to_string(), Some(v.to_string()))).collect::<HashMap<_, _>>(),
        )
    }

    fn handler() -> (Arc<InMemoryGuestStore>, GuestHandler) {
        let store = Arc::new(InMemoryGuestStore::new());
        let handler = GuestHandler::new(store.clone(), 1024 * 1024);
        (store, handler)
    }

    #[tokio::test]
    async fn test_add_with_fields() -> Result<()> {
        let (store, handler) = handler();
        handler
            .execute(command(
                &["add", "Jessica Bloom & Guest"],
                &[("party-size", "2"), ("meal", "vegetarian"), ("category", "Bride's Friend")],
            ))
            .await?;

        let guests = store.list().await?;
        assert_eq!(guests.len(), 1);
        assert_eq!(guests[0].party_size, 2);
        assert_eq!(guests[0].meal_preference, MealPreference::Vegetarian);
        assert_eq!(guests[0].category, "Bride's Friend");
        assert_eq!(guests[0].status, GuestStatus::Pending);
        Ok(())
    }

    #[tokio::test]
    async fn test_add_rejects_zero_party_size() {
        let (store, handler) = handler();
        let result = handler.execute(command(&["add", "Ann"], &[("party-size", "0")])).await;
        assert!(result.is_err());
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_changes_only_given_fields() -> Result<()> {
        let (store, handler) = handler();
        let guest = store
            .add(NewGuest { party_size: 2, notes: "Hotel block?".into(), ..NewGuest::named("Carol Smith") })
            .await?;

        handler
            .execute(command(&["update", guest.id.as_str()], &[("status", "Attending")]))
            .await?;

        let updated = &store.list().await?[0];
        assert_eq!(updated.status, GuestStatus::Attending);
        assert_eq!(updated.party_size, 2);
        assert_eq!(updated.notes, "Hotel block?");
        Ok(())
    }

    #[tokio::test]
    async fn test_update_unknown_guest_fails() {
        let (_, handler) = handler();
        let result = handler
            .execute(command(&["update", "g_missing"], &[("status", "Declined")]))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_update_requires_a_change() {
        let (store, handler) = handler();
        let guest = store.add(NewGuest::named("Ann")).await.unwrap();
        assert!(handler.execute(command(&["update", guest.id.as_str()], &[])).await.is_err());
    }

    #[tokio::test]
    async fn test_remove() -> Result<()> {
        let (store, handler) = handler();
        let guest = store.add(NewGuest::named("Mike Johnson")).await?;
        handler.execute(command(&["remove", guest.id.as_str()], &[])).await?;
        assert!(store.list().await?.is_empty());
        assert!(handler.execute(command(&["remove", guest.id.as_str()], &[])).await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_import_from_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("guests.csv");
        std::fs::write(&path, "Name,Party Size\nAnn,2\n,4\nBob,x\n")?;

        let (store, handler) = handler();
        handler.execute(command(&["import", path.to_str().unwrap()], &[])).await?;

        let guests = store.list().await?;
        assert_eq!(guests.len(), 2);
        assert_eq!(guests[0].category, "Imported");
        assert_eq!(guests[1].party_size, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_import_header_only_is_an_error() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("empty.csv");
        std::fs::write(&path, "Name,Contact\n")?;

        let (store, handler) = handler();
        let err = handler
            .execute(command(&["import", path.to_str().unwrap()], &[]))
            .await
            .unwrap_err();
        assert!(matches!(err.downcast_ref::<ImportError>(), Some(ImportError::NoValidRows)));
        assert!(store.list().await?.is_empty());
        Ok(())
    }

    #[test]
    fn test_guest_table_lists_every_guest() {
        let guests = vec![
            NewGuest { category: "Work Colleague".into(), ..NewGuest::named("Charles Green") }
                .with_id("g5".into()),
            NewGuest::named("Ann").with_id("g6".into()),
        ];
        let table = format_guest_table(&guests);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("ID"));
        assert!(lines[1].contains("Charles Green"));
        assert!(lines[1].contains("Not Specified"));
        assert!(lines[2].contains("Pending"));
    }

    #[test]
    fn test_empty_table_message() {
        assert!(format_guest_table(&[]).starts_with("No guests yet"));
    }
}
