use clap::{Args, Parser, Subcommand};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::command_processor::CommandArgs;

/// Guestlist - terminal wedding guest list manager
#[derive(Debug, Parser)]
#[command(name = "guestlist")]
#[command(about = "Manage a wedding guest list and import guests from CSV", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute (if not specified, enters interactive terminal mode)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Manage guests
    #[command(alias = "guests")]
    Guest {
        #[command(subcommand)]
        action: GuestActions,
    },

    /// View or modify configuration
    Config {
        #[command(subcommand)]
        action: ConfigActions,
    },
}

/// Optional guest fields shared by `add` and `update`
#[derive(Debug, Default, Args)]
pub struct GuestFieldArgs {
    /// Number of people in the party
    #[arg(long)]
    pub party_size: Option<u32>,

    /// Email or phone
    #[arg(long)]
    pub contact: Option<String>,

    /// Grouping such as "Bride's Family"
    #[arg(long)]
    pub category: Option<String>,

    /// Free-form notes
    #[arg(long)]
    pub notes: Option<String>,

    /// RSVP status: Attending, Declined or Pending
    #[arg(long)]
    pub status: Option<String>,

    /// Meal preference: "Not Specified", Chicken, Fish or Vegetarian
    #[arg(long)]
    pub meal: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum GuestActions {
    /// List guests
    #[command(alias = "ls")]
    List {
        /// Only show guests with this RSVP status
        #[arg(long)]
        status: Option<String>,

        /// Only show guests in this category
        #[arg(long)]
        category: Option<String>,
    },

    /// Add a guest
    #[command(alias = "create")]
    Add {
        /// Guest or party name
        #[arg(required = true)]
        name: String,

        #[command(flatten)]
        fields: GuestFieldArgs,
    },

    /// Update an existing guest
    #[command(alias = "edit")]
    Update {
        /// Guest ID
        #[arg(required = true)]
        id: String,

        /// New name
        #[arg(long)]
        name: Option<String>,

        #[command(flatten)]
        fields: GuestFieldArgs,
    },

    /// Remove a guest
    #[command(alias = "delete")]
    Remove {
        /// Guest ID
        #[arg(required = true)]
        id: String,
    },

    /// Import guests from a CSV file (columns: Name, Contact, PartySize, Category, Notes)
    Import {
        /// Path to the CSV file
        #[arg(required = true)]
        file: PathBuf,
    },

    /// Show RSVP totals
    #[command(alias = "stats")]
    Summary,
}

#[derive(Debug, Subcommand)]
pub enum ConfigActions {
    /// Show configuration
    #[command(aliases = ["list", "get"])]
    Show {
        /// Key to show (use "all" for all settings)
        key: Option<String>,
    },

    /// Set configuration value
    Set {
        /// Configuration key
        #[arg(required = true)]
        key: String,

        /// Configuration value
        #[arg(required = true)]
        value: String,
    },
}

fn insert_field_flags(fields: &GuestFieldArgs, flags: &mut HashMap<String, Option<String>>) {
    if let Some(size) = fields.party_size {
        flags.insert("party-size".to_string(), Some(size.to_string()));
    }
    let text_flags = [
        ("contact", &fields.contact),
        ("category", &fields.category),
        ("notes", &fields.notes),
        ("status", &fields.status),
        ("meal", &fields.meal),
    ];
    for (flag, value) in text_flags {
        if let Some(value) = value {
            flags.insert(flag.to_string(), Some(value.clone()));
        }
    }
}

/// Convert a Clap command to a CommandArgs representation
pub fn convert_to_command_args(cli: &Cli) -> Option<CommandArgs> {
    // If no command specified, return None to handle terminal mode
    let command = cli.command.as_ref()?;

    let mut args = Vec::new();
    let mut flags = HashMap::new();

    let command_str = match command {
        Commands::Guest { action } => {
            match action {
                GuestActions::List { status, category } => {
                    args.push("list".to_string());
                    if let Some(status) = status {
                        flags.insert("status".to_string(), Some(status.clone()));
                    }
                    if let Some(category) = category {
                        flags.insert("category".to_string(), Some(category.clone()));
                    }
                }
                GuestActions::Add { name, fields } => {
                    args.push("add".to_string());
                    args.push(name.clone());
                    insert_field_flags(fields, &mut flags);
                }
                GuestActions::Update { id, name, fields } => {
                    args.push("update".to_string());
                    args.push(id.clone());
                    if let Some(name) = name {
                        flags.insert("name".to_string(), Some(name.clone()));
                    }
                    insert_field_flags(fields, &mut flags);
                }
                GuestActions::Remove { id } => {
                    args.push("remove".to_string());
                    args.push(id.clone());
                }
                GuestActions::Import { file } => {
                    args.push("import".to_string());
                    args.push(file.to_string_lossy().to_string());
                }
                GuestActions::Summary => {
                    args.push("summary".to_string());
                }
            }
            "guest"
        }
        Commands::Config { action } => {
            match action {
                ConfigActions::Show { key } => {
                    args.push("show".to_string());
                    if let Some(key_name) = key {
                        args.push(key_name.clone());
                    }
                }
                ConfigActions::Set { key, value } => {
                    args.push("set".to_string());
                    args.push(key.clone());
                    args.push(value.clone());
                }
            }
            "config"
        }
    };

    Some(CommandArgs::new(command_str.to_string(), args, flags))
}
