//! # Facewise CLI
//!
//! Command-line front end for face support pressure analyses stored in
//! `.tbm` project files.
//!
//! ```text
//! face_cli new drive.tbm --engineer "J. Doe"
//! face_cli validate drive.tbm
//! face_cli run drive.tbm --section "km 1+200" --json
//! ```

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Face support pressure analysis for slurry and EPB shield tunnels
#[derive(Parser)]
#[command(name = "face_cli")]
#[command(author = "Facewise Contributors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "TBM face support pressure calculator", long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn")]
    log_level: Level,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze the cross sections of a project
    Run(commands::run::RunArgs),
    /// Write a new project with a sample cross section
    New(commands::new::NewArgs),
    /// Check a project file without running the analysis
    Validate(commands::validate::ValidateArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Run(args) => commands::run::execute(args),
        Commands::New(args) => commands::new::execute(args),
        Commands::Validate(args) => commands::validate::execute(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parsing() {
        let args = ["face_cli", "--log-level", "DEBUG", "validate", "a.tbm"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.log_level, Level::DEBUG);

        let cli = Cli::try_parse_from(["face_cli", "validate", "a.tbm"]).unwrap();
        assert_eq!(cli.log_level, Level::WARN);

        assert!(Cli::try_parse_from(["face_cli", "-l", "loud", "validate", "a.tbm"]).is_err());
    }
}
