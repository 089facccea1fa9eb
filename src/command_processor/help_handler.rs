//! Help command handler
//!
//! Handles help-related commands.

use super::{CommandArgs, CommandHandler};
use anyhow::Result;
use std::future::Future;
use std::pin::Pin;

#[derive(Debug)]
pub struct HelpHandler;

impl CommandHandler for HelpHandler {
    fn execute(&self, _args: CommandArgs) -> Pin<Box<dyn Future<Output = Result<()>> + '_>> {
        Box::pin(async move {
            print_help();
            Ok(())
        })
    }
    fn can_handle(&self, command: &str) -> bool {
        command == "help" || command == "--help" || command == "-h"
    }
}

fn print_help() {
    println!("Guestlist - manage a wedding guest list from the terminal");
    println!();
    println!("USAGE:");
    println!("  guestlist [COMMAND] [SUBCOMMAND] [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("  guest     List, add, update, remove and import guests");
    println!("  config    Manage configuration");
    println!("  help      Show this help message");
    println!("  version   Show version information");
    println!("  exit      Exit the application");
    println!();
    println!("For more information on a specific command, run:");
    println!("  guestlist [COMMAND] --help");
    println!();
    println!("CSV IMPORT:");
    println!("  The first line must be a header. Only Name is required; Contact, PartySize,");
    println!("  Category and Notes are optional and may appear in any order.");
    println!();
    println!("EXAMPLES:");
    println!("  guestlist guest import guests.csv");
    println!("  guestlist guest add \"The Davis Family\" --party-size 4 --category \"Groom's Family\"");
    println!("  guestlist guest update g_1a2b --status Attending --meal Fish");
    println!("  guestlist guest list --status Pending");
    println!("  guestlist config set import.max_file_size_kb 1024");
}
