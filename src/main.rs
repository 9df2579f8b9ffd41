use clap::Parser;
use jobwatch::cli::{Cli, Commands};
use jobwatch::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(&cli.config).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
        eprintln!("Using default configuration");
        toml::from_str(include_str!("../config.toml.example")).expect("Invalid default config")
    });

    // Initialize telemetry
    jobwatch::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Watch(args) => {
            args.execute(&config).await?;
        }
        Commands::Status(args) => {
            args.execute(&config).await?;
        }
        Commands::Jobs(args) => {
            args.execute(&config).await?;
        }
        Commands::Show(args) => {
            args.execute(&config).await?;
        }
    }

    Ok(())
}
