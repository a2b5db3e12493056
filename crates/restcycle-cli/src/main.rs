use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "restcycle", version, about = "Work/rest cycle reminder client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll the backend and nag until rest starts
    Watch(commands::watch::WatchArgs),
    /// Print the current backend state for a user
    Status(commands::status::StatusArgs),
    /// Start the rest cycle (acknowledges the reminder)
    Rest(commands::rest::RestArgs),
    /// Suppress the current alert without leaving the nag loop
    Dismiss(commands::dismiss::DismissArgs),
    /// Print the zone catalog
    Zones,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Watch(args) => commands::watch::run(args),
        Commands::Status(args) => commands::status::run(args),
        Commands::Rest(args) => commands::rest::run(args),
        Commands::Dismiss(args) => commands::dismiss::run(args),
        Commands::Zones => commands::zones::run(),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
