use clap::{Parser, Subcommand};

mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "riskwizard", version, about = "Fulfillment risk assessment wizard")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Take the assessment in the terminal
    Run(commands::run::RunArgs),
    /// Serve static assets, the config endpoint and health check
    Serve(commands::serve::ServeArgs),
    /// Score a saved answer sheet
    Score(commands::score::ScoreArgs),
    /// Show the question catalog
    Catalog(commands::catalog::CatalogArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    logging::init();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run(args) => commands::run::run(args),
        Commands::Serve(args) => commands::serve::run(args),
        Commands::Score(args) => commands::score::run(args),
        Commands::Catalog(args) => commands::catalog::run(args),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
