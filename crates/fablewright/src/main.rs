//! Fablewright CLI binary.
//!
//! This binary provides command-line access to Fablewright's functionality:
//! - Generate a complete illustrated book as JSON
//! - Preview the narrative prompt or the scene plan without network access
//! - Inspect which providers are configured and usable

use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, generate_book, list_providers, load_config, plan_scenes, print_prompt};

    // API keys and RUST_LOG may come from a local .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    fablewright::telemetry::init_console_telemetry(cli.verbose)?;

    match cli.command {
        Commands::Generate(args) => {
            let config = load_config(cli.config.as_deref())?;
            generate_book(args, &config).await?;
        }

        Commands::Prompt(args) => {
            print_prompt(&args);
        }

        Commands::Plan(args) => {
            plan_scenes(&args)?;
        }

        Commands::Providers { format } => {
            let config = load_config(cli.config.as_deref())?;
            list_providers(&config, format)?;
        }
    }

    Ok(())
}
