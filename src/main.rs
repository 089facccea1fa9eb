use anyhow::Result;
use clap::Parser;
use guestlist::app::Application;
use guestlist::cli::{convert_to_command_args, Cli};
use guestlist::Config;
use log::info;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    guestlist::init_logger();

    let config = Config::load()?;
    let app = Application::new(&config)?;

    match convert_to_command_args(&cli) {
        Some(args) => {
            info!("Running command '{}'", args.command);
            app.execute(args).await
        }
        None => app.run().await,
    }
}
