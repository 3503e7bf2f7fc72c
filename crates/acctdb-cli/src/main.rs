//! acctdb CLI - database bootstrap and maintenance for the accounting engine.

use std::path::PathBuf;
use std::process::ExitCode;

use acctdb::{
    bootstrap, executor, AcctError, Config, EntityMetadata, SchemaGenerator, TableRegistry,
};
use clap::{Parser, Subcommand};
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "acctdb")]
#[command(about = "Database bootstrap and maintenance for the accounting engine")]
#[command(version)]
struct Cli {
    /// Path to YAML configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Path to declarative entity metadata
    #[arg(short, long, default_value = "entities.yaml")]
    entities: PathBuf,

    /// Log format: text or json
    #[arg(long, default_value = "text")]
    log_format: String,

    /// Log verbosity: debug, info, warn, error
    #[arg(long, default_value = "info")]
    verbosity: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the schema, tables, and foreign keys in the database
    Init,
    /// Print the bootstrap DDL without executing it
    Ddl,
    /// Verify database connectivity
    HealthCheck,
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.format_detailed());
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run() -> Result<(), AcctError> {
    let cli = Cli::parse();

    setup_logging(&cli.verbosity, &cli.log_format)
        .map_err(AcctError::Schema)?;

    let config = Config::load(&cli.config)?;
    info!("Loaded configuration from {:?}", cli.config);

    let registry = load_registry(&cli.entities)?;
    let generator = SchemaGenerator::new(&registry, &config.database.schema)?;

    match cli.command {
        Commands::Init => {
            let pool = executor::connect(&config.database).await?;
            bootstrap::initialize(&pool, &generator).await?;
            println!(
                "Initialized schema {} with {} tables",
                config.database.schema,
                registry.len()
            );
        }
        Commands::Ddl => {
            println!("{}", generator.create_schema_statement());
            for statement in generator.create_table_statements() {
                println!("{}", statement);
            }
            for statement in generator.alter_table_statements()? {
                println!("{}", statement);
            }
        }
        Commands::HealthCheck => {
            let pool = executor::connect(&config.database).await?;
            executor::health_check(&pool).await?;
            println!("Database connection OK");
        }
    }

    Ok(())
}

fn load_registry(path: &PathBuf) -> Result<TableRegistry, AcctError> {
    let entities = EntityMetadata::load_all(path)?;
    let mut builder = TableRegistry::builder();
    for meta in &entities {
        builder.register_metadata(meta)?;
    }
    let registry = builder.build();
    info!(entities = registry.len(), "entity metadata loaded");
    Ok(registry)
}

fn setup_logging(verbosity: &str, format: &str) -> Result<(), String> {
    let level = match verbosity.to_lowercase().as_str() {
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false);

    if format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    Ok(())
}
