use clap::Parser;
use clap::Subcommand;
use commands::delete::Delete;
use commands::wait::Wait;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "refsweep")]
#[command(about = "Clean up branches left behind by GitHub integration tests", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Delete branches through the GitHub GraphQL API
    Delete(Delete),
    /// Wait for GitHub to catch up with recent changes
    Wait(Wait),
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Cli::parse();

    let result = match args.command {
        Commands::Delete(delete) => delete.execute().await,
        Commands::Wait(wait) => wait.execute().await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
