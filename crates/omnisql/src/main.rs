//! omnisql CLI
//!
//! Renders DDL for any supported dialect and runs SQL against SQLite.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use omnisql::prelude::*;

/// Database-agnostic SQL statement builder.
#[derive(Parser)]
#[command(name = "omnisql")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Connection profile (JSON). Overrides --database and --dialect.
    #[arg(short, long, env = "OMNISQL_PROFILE")]
    profile: Option<PathBuf>,

    /// Database URL.
    #[arg(short, long, env = "DATABASE_URL", default_value = "sqlite:db.sqlite3")]
    database: String,

    /// SQL dialect to render for.
    #[arg(long, default_value = "sqlite")]
    dialect: DialectKind,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print CREATE TABLE for a JSON list of column specs.
    CreateTable {
        /// Table name.
        #[arg(short, long)]
        name: String,

        /// JSON file holding an array of column specs.
        #[arg(short, long)]
        columns: PathBuf,

        /// Primary key column.
        #[arg(long)]
        primary_key: Option<String>,

        /// Only create the table if it does not exist.
        #[arg(long)]
        if_not_exists: bool,

        /// Create a temporary table.
        #[arg(long)]
        temporary: bool,

        /// Run the statement instead of printing it.
        #[arg(long)]
        execute: bool,
    },

    /// Print CREATE DATABASE.
    CreateDatabase {
        /// Database name.
        name: String,

        /// Collation, optionally prefixed with its character set.
        #[arg(long)]
        collate: Option<String>,

        /// Only create the database if it does not exist.
        #[arg(long)]
        if_not_exists: bool,
    },

    /// Print DROP TABLE.
    DropTable {
        /// Table name.
        name: String,

        /// Ignore a missing table.
        #[arg(long)]
        if_exists: bool,

        /// Run the statement instead of printing it.
        #[arg(long)]
        execute: bool,
    },

    /// Run SQL and print the result as JSON.
    Exec {
        /// Statement text.
        sql: String,

        /// Value bound to the next placeholder (repeatable).
        #[arg(long = "param")]
        params: Vec<String>,

        /// Key rows by this column.
        #[arg(long)]
        index: Option<String>,
    },

    /// Show client and server versions.
    Info,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let profile = match &cli.profile {
        Some(path) => ConnectionProfile::from_json_file(path)?,
        None => ConnectionProfile::new(cli.dialect, cli.database.clone()),
    };
    let query = Query::from_profile(&profile, Arc::new(profile.sqlite_driver()));

    match cli.command {
        Commands::CreateTable {
            name,
            columns,
            primary_key,
            if_not_exists,
            temporary,
            execute,
        } => {
            let json = std::fs::read_to_string(&columns)?;
            let specs: Vec<ColumnSpec> = serde_json::from_str(&json)?;
            let mut create = query.create().table(&name).columns(specs);
            if let Some(pk) = primary_key {
                create = create.primary_key(&pk);
            }
            if if_not_exists {
                create = create.if_not_exists();
            }
            if temporary {
                create = create.temporary();
            }
            let sql = create.sql()?;
            emit(&query, &profile, &sql, execute).await?;
        }

        Commands::CreateDatabase {
            name,
            collate,
            if_not_exists,
        } => {
            let mut create = query.create().database(&name);
            if let Some(collation) = collate {
                create = create.collate(&collation);
            }
            if if_not_exists {
                create = create.if_not_exists();
            }
            println!("{}", create.sql()?);
        }

        Commands::DropTable {
            name,
            if_exists,
            execute,
        } => {
            let mut stmt = query.drop_object().table(&name);
            if if_exists {
                stmt = stmt.if_exists();
            }
            let sql = stmt.sql()?;
            emit(&query, &profile, &sql, execute).await?;
        }

        Commands::Exec { sql, params, index } => {
            require_sqlite(&profile)?;
            query.connect().await?;
            let params: Vec<SqlValue> = params.into_iter().map(SqlValue::Text).collect();
            let options = FetchOptions {
                index,
                ..FetchOptions::default()
            };
            let outcome = if params.is_empty() {
                query.raw(&sql, &options).await?
            } else {
                query.driver().prepared(&sql, &params, &options).await?
            };
            println!("{}", serde_json::to_string_pretty(&outcome)?);
            query.disconnect().await;
        }

        Commands::Info => {
            info!("Client: {}", query.driver().client_info());
            require_sqlite(&profile)?;
            query.connect().await?;
            info!("Server: {}", query.driver().server_info().await?);
            query.disconnect().await;
        }
    }

    Ok(())
}

/// Prints `sql`, or runs it when `execute` is set.
async fn emit(
    query: &Query,
    profile: &ConnectionProfile,
    sql: &str,
    execute: bool,
) -> anyhow::Result<()> {
    if !execute {
        println!("{sql}");
        return Ok(());
    }
    require_sqlite(profile)?;
    query.connect().await?;
    let outcome = query.raw(sql, &FetchOptions::default()).await?;
    info!("Executed ({} rows affected)", outcome.count());
    query.disconnect().await;
    Ok(())
}

fn require_sqlite(profile: &ConnectionProfile) -> anyhow::Result<()> {
    if profile.dialect != DialectKind::Sqlite {
        anyhow::bail!(
            "only SQLite connections can be executed, profile dialect is {}",
            profile.dialect
        );
    }
    Ok(())
}
