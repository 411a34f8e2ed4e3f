mod commands;
mod config;
mod logging;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use autoshop_core::{
    CarSearch, Entity, Error as CoreError, MechanicSearch, SearchCriteria, ServiceRecordSearch,
    redact_connection_string,
};
use config::AppConfig;
use logging::init_logging;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] CoreError),
    /// Operator-facing failure message followed by the underlying reason.
    #[error("{message} {source}")]
    Failed {
        message: String,
        #[source]
        source: CoreError,
    },
    #[error("{0}")]
    NotFound(String),
    #[error("No updates provided.")]
    NoUpdates,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("output error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub fn failed(message: impl Into<String>, source: CoreError) -> Self {
        CliError::Failed {
            message: message.into(),
            source,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "autoshop", version, about = "Cars, owners, mechanics and service records")]
struct Cli {
    /// Database connection string; overrides DATABASE_URL and the config file.
    #[arg(long, global = true, value_name = "CONNECTION_STRING")]
    conn: Option<String>,
    /// Config file (defaults to ./autoshop.toml when present).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate and insert one row.
    Create {
        entity: Entity,
        /// `column=value` pairs; an empty value or `null` stores NULL.
        #[arg(value_name = "COLUMN=VALUE", required = true)]
        assignments: Vec<String>,
    },
    /// Print up to 100 rows.
    List { entity: Entity },
    /// Print one row by primary key.
    Show { entity: Entity, id: i64 },
    /// Change the given columns of one row.
    Update {
        entity: Entity,
        id: i64,
        #[arg(value_name = "COLUMN=VALUE")]
        assignments: Vec<String>,
    },
    /// Delete one row by primary key.
    Delete { entity: Entity, id: i64 },
    /// Insert random rows in a single transaction.
    Generate { entity: Entity, count: u64 },
    /// Search with optional filters.
    #[command(subcommand)]
    Search(SearchCommand),
    /// Print the catalog's view of an entity's columns.
    Describe { entity: Entity },
}

#[derive(Subcommand, Debug)]
enum SearchCommand {
    Car(CarSearchArgs),
    Mechanic(MechanicSearchArgs),
    ServiceRecord(ServiceRecordSearchArgs),
}

#[derive(Args, Debug)]
struct CarSearchArgs {
    #[arg(long)]
    make: Option<String>,
    #[arg(long)]
    year_from: Option<i64>,
    #[arg(long)]
    year_to: Option<i64>,
}

#[derive(Args, Debug)]
struct MechanicSearchArgs {
    #[arg(long)]
    specialty: Option<String>,
    /// SQL `LIKE` pattern, e.g. `%John%`.
    #[arg(long)]
    name_pattern: Option<String>,
}

#[derive(Args, Debug)]
struct ServiceRecordSearchArgs {
    /// YYYY-MM-DD
    #[arg(long)]
    date_from: Option<NaiveDate>,
    /// YYYY-MM-DD
    #[arg(long)]
    date_to: Option<NaiveDate>,
    #[arg(long)]
    servicetype: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::Core(CoreError::Validation(errors))) => {
            for error in errors {
                eprintln!("{error}");
            }
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = AppConfig::load(cli.config.as_deref())?.with_conn(cli.conn);
    init_logging(&config.log)?;

    let conn = config.require_database_url()?;
    let connection = redact_connection_string(conn);
    tracing::info!(
        event = "connecting",
        connection = %connection.redacted,
        max_connections = config.max_connections
    );

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect(conn)
        .await?;

    let session = commands::Session::new(pool);
    let mut out = std::io::stdout().lock();

    let outcome = match cli.command {
        Command::Create {
            entity,
            assignments,
        } => session.create(&mut out, entity, &assignments).await,
        Command::List { entity } => session.list(&mut out, entity).await,
        Command::Show { entity, id } => session.show(&mut out, entity, id).await,
        Command::Update {
            entity,
            id,
            assignments,
        } => session.update(&mut out, entity, id, &assignments).await,
        Command::Delete { entity, id } => session.delete(&mut out, entity, id).await,
        Command::Generate { entity, count } => session.generate(&mut out, entity, count).await,
        Command::Search(search) => {
            let criteria: SearchCriteria = match search {
                SearchCommand::Car(args) => CarSearch {
                    make: args.make,
                    year_from: args.year_from,
                    year_to: args.year_to,
                }
                .into(),
                SearchCommand::Mechanic(args) => MechanicSearch {
                    specialty: args.specialty,
                    name_pattern: args.name_pattern,
                }
                .into(),
                SearchCommand::ServiceRecord(args) => ServiceRecordSearch {
                    date_from: args.date_from,
                    date_to: args.date_to,
                    servicetype: args.servicetype,
                }
                .into(),
            };
            session.search(&mut out, &criteria).await
        }
        Command::Describe { entity } => session.describe(&mut out, entity).await,
    };

    session.close().await;
    outcome
}
