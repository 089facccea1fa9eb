use anyhow::Result;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;

use crate::store::GuestStore;

pub mod config_handler;
pub mod exit_handler;
pub mod guest_handler;
pub mod help_handler;
pub mod version_handler;

/// Command line arguments structure
#[derive(Debug, Clone)]
pub struct CommandArgs {
    pub command: String,
    pub args: Vec<String>,
    pub flags: HashMap<String, Option<String>>,
}

impl CommandArgs {
    pub fn new(command: String, args: Vec<String>, flags: HashMap<String, Option<String>>) -> Self {
        Self { command, args, flags }
    }

    /// Value of a `--flag value` pair, if present
    pub fn flag(&self, name: &str) -> Option<&str> {
        self.flags.get(name).and_then(|v| v.as_deref())
    }
}

/// Standardized input preprocessing function
pub fn preprocess_input(input: &str) -> String {
    input.trim().to_lowercase()
}

pub trait CommandHandler: Debug + Send + Sync {
    fn execute(&self, args: CommandArgs) -> Pin<Box<dyn Future<Output = Result<()>> + '_>>;
    fn can_handle(&self, command: &str) -> bool;
}

#[derive(Debug)]
pub struct CommandProcessor {
    handlers: Vec<Box<dyn CommandHandler>>,
}

impl CommandProcessor {
    /// `config_path` overrides the platform config location; `None` uses the default
    pub fn new(
        store: Arc<dyn GuestStore>,
        max_import_bytes: u64,
        config_path: Option<PathBuf>,
    ) -> Self {
        let handlers: Vec<Box<dyn CommandHandler>> = vec![
            Box::new(guest_handler::GuestHandler::new(store, max_import_bytes)),
            Box::new(config_handler::ConfigHandler::new(config_path)),
            Box::new(version_handler::VersionHandler),
            Box::new(help_handler::HelpHandler),
            Box::new(exit_handler::ExitHandler),
        ];
        Self { handlers }
    }

    pub async fn execute(&self, args: CommandArgs) -> Result<()> {
        debug!("Attempting to execute command: {}", args.command);
        debug!("Parsed arguments: {:?}", args.args);
        debug!("Parsed flags: {:?}", args.flags);
        let command_name = args.command.clone();
        for handler in &self.handlers {
            if handler.can_handle(&command_name) {
                info!("Executing command '{}' with arguments: {:?}", command_name, args.args);
                match handler.execute(args).await {
                    Ok(()) => {
                        debug!("Command '{}' executed successfully", command_name);
                        return Ok(());
                    }
                    Err(e) => {
                        log::error!("Failed to execute command '{}': {:?}", command_name, e);
                        return Err(e);
                    }
                }
            }
        }
        warn!("Unrecognized command: {}", command_name);
        println!("Unrecognized command. Type 'help' for a list of available commands.");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guest::NewGuest;
    use crate::store::InMemoryGuestStore;

    fn args(command: &str, args: &[&str]) -> CommandArgs {
        CommandArgs::new(
            command.to_string(),
            args.iter().map(|s| s.to_string()).collect(),
            HashMap::new(),
        )
    }

    #[tokio::test]
    async fn test_dispatches_to_guest_handler() -> Result<()> {
        let store = Arc::new(InMemoryGuestStore::new());
        let processor = CommandProcessor::new(store.clone(), 1024, None);

        processor.execute(args("guest", &["add", "Charles Green"])).await?;

        let guests = store.list().await?;
        assert_eq!(guests.len(), 1);
        assert_eq!(guests[0].name, "Charles Green");
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_command_is_not_an_error() -> Result<()> {
        let store = Arc::new(InMemoryGuestStore::with_guests(vec![
            NewGuest::named("Ann").with_id("g1".into()),
        ]));
        let processor = CommandProcessor::new(store, 1024, None);
        processor.execute(args("calendar", &["list"])).await
    }

    #[tokio::test]
    async fn test_help_and_version_dispatch() -> Result<()> {
        let processor = CommandProcessor::new(Arc::new(InMemoryGuestStore::new()), 1024, None);
        processor.execute(args("help", &[])).await?;
        processor.execute(args("version", &[])).await
    }

    #[test]
    fn test_flag_lookup() {
        let mut flags = HashMap::new();
        flags.insert("party-size".to_string(), Some("3".to_string()));
        flags.insert("verbose".to_string(), None);
        let args = CommandArgs::new("guest".into(), vec![], flags);
        assert_eq!(args.flag("party-size"), Some("3"));
        assert_eq!(args.flag("verbose"), None);
        assert_eq!(args.flag("missing"), None);
    }

    #[test]
    fn test_preprocess_input() {
        assert_eq!(preprocess_input("  EXIT "), "exit");
    }
}
