use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "nbt")]
#[command(about = "Institutional net-buy trend tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute layered config hash + print canonical JSON
    ConfigHash {
        /// Paths in merge order (base -> site -> local ...)
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Trading-calendar queries
    Calendar {
        #[command(subcommand)]
        cmd: CalendarCmd,
    },

    /// Build the top-N presence trend over the trailing window and print it as JSON
    Trend {
        /// Layered config paths in merge order
        #[arg(long = "config", required = true, num_args = 1..)]
        config_paths: Vec<String>,

        /// Local wall-clock override, YYYY-MM-DDTHH:MM:SS (defaults to now in calendar.timezone)
        #[arg(long)]
        now: Option<String>,

        /// Load days one at a time instead of on the worker pool
        #[arg(long, default_value_t = false)]
        sequential: bool,
    },
}

#[derive(Subcommand)]
enum CalendarCmd {
    /// Print the trading day a report run now would be "as of"
    EffectiveDate {
        #[arg(long = "config", required = true, num_args = 1..)]
        config_paths: Vec<String>,

        #[arg(long)]
        now: Option<String>,
    },

    /// Print the trailing trading-day window, oldest first
    Window {
        #[arg(long = "config", required = true, num_args = 1..)]
        config_paths: Vec<String>,

        #[arg(long)]
        now: Option<String>,

        /// Window length (defaults to trend.window_days)
        #[arg(long)]
        days: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    init_tracing();

    let cli = Cli::parse();

    match cli.cmd {
        Commands::ConfigHash { paths } => {
            let loaded = nbt_config::load_layered_yaml(&paths)?;
            println!("config_hash={}", loaded.config_hash);
            println!("{}", loaded.canonical_json);
        }

        Commands::Calendar { cmd } => match cmd {
            CalendarCmd::EffectiveDate { config_paths, now } => {
                commands::calendar::effective_date(&config_paths, now.as_deref())?;
            }
            CalendarCmd::Window {
                config_paths,
                now,
                days,
            } => {
                commands::calendar::window(&config_paths, now.as_deref(), days)?;
            }
        },

        Commands::Trend {
            config_paths,
            now,
            sequential,
        } => {
            commands::trend::run(&config_paths, now.as_deref(), sequential).await?;
        }
    }

    Ok(())
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}
