use crate::cli::{convert_to_command_args, Cli};
use crate::command_processor::{preprocess_input, CommandArgs, CommandProcessor};
use crate::config::Config;
use crate::store::{GuestStore, JsonGuestStore};
use anyhow::{anyhow, Context, Result};
use clap::Parser as ClapParser;
use rustyline::DefaultEditor;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

/// Commands answered at the prompt without going through clap
const PROMPT_COMMANDS: &[&str] = &["help", "version", "exit", "quit"];

pub struct Application {
    command_processor: CommandProcessor,
}

impl Application {
    /// Build the application around the JSON guest store named by `config`
    pub fn new(config: &Config) -> Result<Self> {
        let store = match config.state_dir() {
            Some(dir) => JsonGuestStore::open(dir),
            None => JsonGuestStore::new(),
        }
        .context("Failed to open guest store")?;
        Ok(Self::with_store(Arc::new(store), config, None))
    }

    pub fn with_store(
        store: Arc<dyn GuestStore>,
        config: &Config,
        config_path: Option<PathBuf>,
    ) -> Self {
        Self {
            command_processor: CommandProcessor::new(
                store,
                config.max_import_bytes(),
                config_path,
            ),
        }
    }

    pub async fn execute(&self, args: CommandArgs) -> Result<()> {
        self.command_processor.execute(args).await
    }

    pub async fn run(&self) -> Result<()> {
        log::info!("Starting Guestlist Terminal");

        let mut rl = DefaultEditor::new()?;

        println!("Welcome to Guestlist! Type 'help' for commands.");
        let prompt = "guestlist> ";

        loop {
            match rl.readline(prompt) {
                Ok(line) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    let _ = rl.add_history_entry(line.as_str());
                    if let Err(err) = self.process_input(&line).await {
                        println!("Error: {:#}", err);
                        log::debug!("Failed to process command: {:?}", err);
                    }
                }
                Err(rustyline::error::ReadlineError::Interrupted) => {
                    println!("CTRL-C");
                    break;
                }
                Err(rustyline::error::ReadlineError::Eof) => {
                    println!("CTRL-D");
                    break;
                }
                Err(err) => {
                    println!("Error: {:?}", err);
                    break;
                }
            }
        }

        Ok(())
    }

    async fn process_input(&self, input: &str) -> Result<()> {
        let preprocessed = preprocess_input(input);
        let bare = strip_program_name(&preprocessed);

        if PROMPT_COMMANDS.contains(&bare) {
            log::debug!("Prompt command detected: {}", bare);
            let args = CommandArgs::new(bare.to_string(), vec![], HashMap::new());
            return self.command_processor.execute(args).await;
        }

        self.process_command(input).await
    }

    /// Parse a prompt line with the same clap definitions as the binary and run it
    pub async fn process_command(&self, input: &str) -> Result<()> {
        log::info!("Processing command: {}", input);

        let command_args = match parse_command_string(input)? {
            Some(args) => args,
            None => return Ok(()),
        };
        self.command_processor.execute(command_args).await
    }
}

/// Drop a leading `guestlist` token, leaving words like `guestlistexit` alone
fn strip_program_name(input: &str) -> &str {
    match input.split_once(char::is_whitespace) {
        Some(("guestlist", rest)) => rest.trim(),
        None if input == "guestlist" => "",
        _ => input,
    }
}

/// Tokenize a prompt line and parse it with clap.
///
/// Returns `Ok(None)` when clap already printed something (help, version, a
/// usage error) or the line names no subcommand.
pub fn parse_command_string(input: &str) -> Result<Option<CommandArgs>> {
    let mut tokens =
        shell_words::split(input).map_err(|e| anyhow!("Failed to parse command: {}", e))?;

    if tokens.is_empty() {
        return Err(anyhow!("Empty command"));
    }
    if !tokens[0].eq_ignore_ascii_case("guestlist") {
        tokens.insert(0, "guestlist".to_string());
    }

    let cli = match Cli::try_parse_from(&tokens) {
        Ok(cli) => cli,
        Err(e) => {
            e.print()?;
            return Ok(None);
        }
    };

    match convert_to_command_args(&cli) {
        Some(args) => Ok(Some(args)),
        None => {
            println!("Type 'help' for a list of available commands.");
            Ok(None)
        }
    }
}

pub fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            use std::io::Write;
            writeln!(
                buf,
                "{} [{}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guest::GuestStatus;
    use crate::store::InMemoryGuestStore;

    #[test]
    fn test_parse_prompt_line_without_program_name() -> Result<()> {
        let args = parse_command_string("guest add \"Aunt Carol\" --party-size 2")?
            .ok_or_else(|| anyhow!("expected a command"))?;
        assert_eq!(args.command, "guest");
        assert_eq!(args.args, vec!["add", "Aunt Carol"]);
        Ok(())
    }

    #[test]
    fn test_parse_prompt_line_with_program_name() -> Result<()> {
        let args = parse_command_string("guestlist guest summary")?
            .ok_or_else(|| anyhow!("expected a command"))?;
        assert_eq!(args.args, vec!["summary"]);
        Ok(())
    }

    #[test]
    fn test_program_name_is_stripped_only_as_a_word() {
        assert_eq!(strip_program_name("guestlist exit"), "exit");
        assert_eq!(strip_program_name("guestlist   version"), "version");
        assert_eq!(strip_program_name("guestlist"), "");
        assert_eq!(strip_program_name("guestlistexit"), "guestlistexit");
        assert_eq!(strip_program_name("help"), "help");
    }

    #[test]
    fn test_unbalanced_quotes_are_an_error() {
        assert!(parse_command_string("guest add \"Aunt Carol").is_err());
    }

    #[test]
    fn test_unknown_subcommand_is_reported_not_failed() -> Result<()> {
        assert!(parse_command_string("calendar list")?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_prompt_round_trip() -> Result<()> {
        let store = Arc::new(InMemoryGuestStore::new());
        let app = Application::with_store(store.clone(), &Config::default(), None);

        app.process_input("guest add \"Mike Johnson\" --status declined").await?;

        let guests = store.list().await?;
        assert_eq!(guests.len(), 1);
        assert_eq!(guests[0].status, GuestStatus::Declined);
        Ok(())
    }
}
