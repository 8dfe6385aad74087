mod commands;
mod engine;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "groundwork")]
#[command(about = "Bootstrap and tear down deployment-platform infrastructure", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Tear down everything provisioned for the environment
    Destroy {
        /// Destroy flags: --skip-if-missing, --no-confirm/-n
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Print the version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Destroy { args } => commands::destroy::handle(&args).await?,
        Commands::Version => println!("groundwork {}", env!("CARGO_PKG_VERSION")),
    }

    Ok(())
}
