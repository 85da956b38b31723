use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "massage2go-cli", version, about = "Massage2GO CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse services, therapists and the other mock tables
    Catalog {
        #[command(subcommand)]
        action: commands::catalog::CatalogAction,
    },
    /// Sign in, sign up and sign out
    Auth {
        #[command(subcommand)]
        action: commands::auth::AuthAction,
    },
    /// Drive a booking through its stages
    Book {
        #[command(subcommand)]
        action: commands::book::BookAction,
    },
    /// Follow a therapist who is already en route to a sample booking
    Track(commands::track::TrackArgs),
    /// Scan for and control gate devices
    Device {
        #[command(subcommand)]
        action: commands::device::DeviceAction,
    },
    /// Price breakdowns and rental totals
    Price {
        #[command(subcommand)]
        action: commands::price::PriceAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_env("MASSAGE2GO_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    // Logs go to stderr so stdout stays parseable JSON.
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Catalog { action } => commands::catalog::run(action),
        Commands::Auth { action } => commands::auth::run(action),
        Commands::Book { action } => commands::book::run(action),
        Commands::Track(args) => commands::track::run(args),
        Commands::Device { action } => commands::device::run(action),
        Commands::Price { action } => commands::price::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "massage2go-cli", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
