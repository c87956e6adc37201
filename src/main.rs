use anyhow::Result;
use clap::{Parser, Subcommand};
use cochera::OutputFormat;
use cochera::commands;
use cochera::config::{self, TokenSource};
use cochera::credentials::KeyringStore;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cochera")]
#[command(about = "Parking garage back-office: stay times and fees")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Quote a stay offline from its entry moment
    Quote {
        #[arg(long, help = "Entry date (YYYY-MM-DD)")]
        fecha: String,
        #[arg(long, help = "Entry time (HH:MM:SS)")]
        hora: String,
        #[arg(long, help = "Grace minutes before a partial hour is billed")]
        tolerance: Option<u32>,
        #[arg(long, default_value = "0", help = "Hourly rate of the vehicle type")]
        rate: Decimal,
        #[arg(long, help = "Compute as of this local time (YYYY-MM-DDTHH:MM:SS)")]
        now: Option<String>,
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// List open entries with elapsed time and amount due
    Ingresos {
        #[arg(long, help = "Company ID (defaults to api.company_id)")]
        company: Option<u32>,
        #[arg(long, help = "Compute as of this local time (YYYY-MM-DDTHH:MM:SS)")]
        now: Option<String>,
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// List recorded exits with their stay duration
    Salidas {
        #[arg(long, help = "Company ID (defaults to api.company_id)")]
        company: Option<u32>,
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Inspect or change configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    List,
    Set { key: String, value: String },
    Get { key: String },
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn report_token_source(source: &TokenSource) {
    match source {
        TokenSource::Migrated => info!("Migrated API token to the keyring"),
        TokenSource::MigrationFailed(reason) => {
            warn!("Keeping API token in config file: {}", reason)
        }
        TokenSource::KeyringUnavailable(reason) => {
            warn!("Could not read API token from keyring: {}", reason)
        }
        TokenSource::Keyring | TokenSource::File | TokenSource::Missing => {
            debug!(?source, "API token source")
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // load() does not log; its token outcome is reported once tracing is up.
    let loaded = config::load();
    let level = loaded
        .as_ref()
        .map(|(c, _)| c.logging.level.clone())
        .unwrap_or_else(|_| "warn".to_string());
    init_tracing(&level);

    let config = match loaded {
        Ok((config, token_source)) => {
            report_token_source(&token_source);
            config
        }
        Err(e) => {
            // The quote command works without any configuration.
            if !matches!(cli.command, Commands::Quote { .. }) {
                warn!("No usable config ({:#}). Run 'cochera config set ...'", e);
            }
            config::Config::default()
        }
    };

    match &cli.command {
        Commands::Quote {
            fecha,
            hora,
            tolerance,
            rate,
            now,
            format,
        } => {
            let now = commands::resolve_now(now.as_deref())?;
            commands::quote::quote(fecha, hora, *tolerance, *rate, &now, *format)?;
        }
        Commands::Ingresos {
            company,
            now,
            format,
        } => {
            let now = commands::resolve_now(now.as_deref())?;
            commands::ingresos::list(&config, *company, &now, *format)?;
        }
        Commands::Salidas { company, format } => {
            commands::salidas::list(&config, *company, *format)?;
        }
        Commands::Config { action } => match action {
            ConfigAction::List => commands::config::list(&config)?,
            ConfigAction::Set { key, value } => {
                commands::config::set(
                    &config::config_path()?,
                    key,
                    value,
                    &KeyringStore::default(),
                )?
            }
            ConfigAction::Get { key } => commands::config::get(key, &config)?,
        },
    }

    Ok(())
}
