use clap::{Parser, Subcommand};
use intergames_leaderboard::api::{run_api_server, ApiConfig};
use intergames_leaderboard::cli;
use intergames_leaderboard::config::LeaderboardConfig;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "leaderboard")]
#[command(about = "Rank competition results per category and publish the leaderboard.")]
#[command(long_about = "Leaderboard - ranked tables from a results workbook

Reads one sheet per category, drops empty and grand-total rows, sorts by
'Total Geral' (invalid totals last), numbers the positions and keeps the
first columns of each sheet.

COMMANDS:
  show    - Print ranked tables in the terminal
  check   - Load every category and report layout warnings
  export  - Write ranked tables to Excel (.xlsx)
  watch   - Re-print tables whenever the workbook changes
  serve   - Start the web dashboard

CONFIGURATION:
  Settings are read from --config, else ./leaderboard.yaml, else defaults
  (8 categories, header on row 4, 'Equipe/Atleta' and 'Total Geral').

EXAMPLES:
  leaderboard show --source results.xlsx
  leaderboard show -c \"RX FEM\"
  leaderboard export -o ranked.xlsx
  leaderboard serve --port 3000 --watch")]
#[command(version)]
struct Cli {
    /// Configuration file (YAML)
    #[arg(long, global = true, env = "LEADERBOARD_CONFIG")]
    config: Option<PathBuf>,

    /// Results workbook, overriding the configured source
    #[arg(short, long, global = true, env = "LEADERBOARD_SOURCE")]
    source: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print ranked tables in the terminal
    Show {
        /// Only this category (sheet name, exact match)
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Load every category and report layout warnings
    Check,

    /// Write ranked tables to an Excel workbook
    Export {
        /// Output .xlsx file
        #[arg(short, long)]
        output: PathBuf,

        /// Show verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Re-print ranked tables whenever the workbook changes
    Watch {
        /// Only this category (sheet name, exact match)
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Start the web dashboard
    Serve {
        /// Host address to bind to (use 0.0.0.0 for all interfaces)
        #[arg(short = 'H', long, default_value = "127.0.0.1", env = "LEADERBOARD_HOST")]
        host: String,

        /// Port to listen on
        #[arg(short, long, default_value = "8080", env = "LEADERBOARD_PORT")]
        port: u16,

        /// Reload the leaderboard when the workbook changes
        #[arg(short, long)]
        watch: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = LeaderboardConfig::resolve(cli.config.as_deref(), cli.source)?;

    // The server installs its own subscriber
    if !matches!(cli.command, Commands::Serve { .. }) {
        init_terminal_logging();
    }

    match cli.command {
        Commands::Show { category } => cli::show(&config, category)?,
        Commands::Check => cli::check(&config)?,
        Commands::Export { output, verbose } => cli::export(&config, output, verbose)?,
        Commands::Watch { category } => cli::watch(&config, category)?,
        Commands::Serve { host, port, watch } => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(run_api_server(ApiConfig {
                host,
                port,
                leaderboard: config,
                watch,
            }))?;
        }
    }
    Ok(())
}

/// Terminal output already reports warnings; logs are opt-in via RUST_LOG
fn init_terminal_logging() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "intergames_leaderboard=error".into()),
        )
        .init();
}
