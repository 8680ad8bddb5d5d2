pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "shopmind",
    about = "Shopmind operator CLI",
    long_about = "Operate the Shopmind catalog assistant: migrations, demo fixtures, and \
                  terminal access to chat and search.",
    after_help = "Examples:\n  shopmind migrate\n  shopmind seed\n  shopmind chat --message \"under $30 sports\"\n  shopmind search --query \"over $50 electronics\" --user alice"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(about = "Load the deterministic demo catalog, reviews, and interaction history")]
    Seed,
    #[command(about = "Ask the assistant one question and print its reply")]
    Chat {
        #[arg(long, help = "The question to ask")]
        message: String,
    },
    #[command(about = "Run a deterministic catalog search and list the ranked results")]
    Search {
        #[arg(long, help = "Search query, e.g. \"under $30 sports\"")]
        query: String,
        #[arg(long, help = "Record the search in this user's history")]
        user: Option<String>,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Migrate => commands::migrate::run(),
        Command::Seed => commands::seed::run(),
        Command::Chat { message } => commands::chat::run(&message),
        Command::Search { query, user } => commands::search::run(&query, user.as_deref()),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
