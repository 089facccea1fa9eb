//! Config command handler
//!
//! Handles config-related commands such as set, get, and show.
//
// # Examples
//
// ```
// let handler = ConfigHandler::new(None);
// let args = CommandArgs::new("config".to_string(), vec!["set".to_string(), ...], ...);
// handler.execute(args).await?;
// ```

use crate::command_processor::{CommandArgs, CommandHandler};
use crate::config::{Config, CONFIG_KEYS};
use anyhow::{anyhow, Result};
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

#[derive(Debug, Default)]
pub struct ConfigHandler {
    config_path: Option<PathBuf>,
}

impl ConfigHandler {
    pub fn new(config_path: Option<PathBuf>) -> Self {
        Self { config_path }
    }

    fn load(&self) -> Result<Config> {
        match &self.config_path {
            Some(path) => Config::load_from(path),
            None => Config::load(),
        }
    }

    fn save(&self, config: &Config) -> Result<()> {
        match &self.config_path {
            Some(path) => config.save_to(path),
            None => config.save(),
        }
    }

    fn show(&self, key: Option<&str>) -> Result<()> {
        let config = self.load()?;
        match key {
            None | Some("all") => {
                for key in CONFIG_KEYS {
                    println!("{} = {}", key, config.get(key)?);
                }
            }
            Some(key) => println!("{} = {}", key, config.get(key)?),
        }
        Ok(())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut config = self.load()?;
        config.set(key, value)?;
        self.save(&config)?;
        println!("Set {} = {}", key, config.get(key)?);
        Ok(())
    }
}

impl CommandHandler for ConfigHandler {
    fn execute(&self, args: CommandArgs) -> Pin<Box<dyn Future<Output = Result<()>> + '_>> {
        Box::pin(async move {
            match args.args.first().map(|s| s.as_str()) {
                Some("set") => {
                    let (key, value) = match (args.args.get(1), args.args.get(2)) {
                        (Some(key), Some(value)) => (key, value),
                        _ => return Err(anyhow!("Usage: config set <key> <value>")),
                    };
                    self.set(key, value)
                }
                Some("get") | Some("show") | Some("list") | None => {
                    self.show(args.args.get(1).map(|s| s.as_str()))
                }
                _ => {
                    println!("Unknown config command. Available commands: set, get, show");
                    Ok(())
                }
            }
        })
    }
    fn can_handle(&self, command: &str) -> bool {
        command == "config"
    }
}
