//! Collection migration CLI
//!
//! Runs the batch migrations over a JSON content document.
//!
//! Usage:
//!     collection-migrate topics --registry registry.json --content content.json
//!     collection-migrate topics --registry registry.json --content content.json --dry-run
//!     collection-migrate folderish --content content.json --report report.json
//!
//! The run report is printed to stdout as JSON; logs go to stderr
//! (`RUST_LOG` overrides the default filter).

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use collection_core::{
    migrate_to_folderish_collections, migrate_topics, ContentStore, FileContentStore,
    MigrationConfig, MigrationError, MigrationReport, OperationCatalog, RegistryLoader,
    SystemClock,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "collection-migrate")]
#[command(about = "Migrate Topics to Collections")]
#[command(version)]
struct Args {
    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replace every Topic with a Collection
    Topics {
        /// Querystring registry manifest (JSON)
        #[arg(long)]
        registry: PathBuf,

        /// Content document (JSON)
        #[arg(long)]
        content: PathBuf,

        /// Installed operation implementations (JSON, default: the stock parser)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Migration configuration (JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Migrate without writing the content document back
        #[arg(long)]
        dry_run: bool,

        /// Also write the report to this file
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Make every leaf Collection folderish
    Folderish {
        /// Content document (JSON)
        #[arg(long)]
        content: PathBuf,

        /// Migrate without writing the content document back
        #[arg(long)]
        dry_run: bool,

        /// Also write the report to this file
        #[arg(long)]
        report: Option<PathBuf>,
    },
}

fn main() {
    let args = Args::parse();

    let default_filter = if args.verbose {
        "collection_core=debug"
    } else {
        "collection_core=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run(args.command) {
        tracing::error!("{}", e);
        match serde_json::to_string_pretty(&e.to_error_response()) {
            Ok(json) => println!("{}", json),
            Err(_) => eprintln!("Error: {}", e),
        }
        std::process::exit(1);
    }
}

fn run(command: Command) -> Result<(), MigrationError> {
    match command {
        Command::Topics {
            registry,
            content,
            catalog,
            config,
            dry_run,
            report,
        } => {
            let loader = RegistryLoader::new();
            let catalog = match catalog {
                Some(path) => loader.load_catalog_from_file(path)?,
                None => OperationCatalog::standard(),
            };
            let registry = loader.load_registry(registry, &catalog)?;
            let config = match config {
                Some(path) => MigrationConfig::load_from_file(path)?,
                None => MigrationConfig::default(),
            };

            let store = FileContentStore::open(content)?;
            let result = migrate_topics(&store, &registry, &config, &SystemClock::new())?;
            finish(&store, &result, dry_run, report.as_deref())
        }
        Command::Folderish {
            content,
            dry_run,
            report,
        } => {
            let store = FileContentStore::open(content)?;
            let result = migrate_to_folderish_collections(&store)?;
            finish(&store, &result, dry_run, report.as_deref())
        }
    }
}

fn finish(
    store: &FileContentStore,
    report: &MigrationReport,
    dry_run: bool,
    report_path: Option<&Path>,
) -> Result<(), MigrationError> {
    if dry_run {
        tracing::info!("Dry run, {} left unchanged", store.path().display());
    } else {
        store.flush()?;
        tracing::info!("Wrote {}", store.path().display());
    }

    let json = serde_json::to_string_pretty(report)?;
    if let Some(path) = report_path {
        std::fs::write(path, &json)?;
    }
    println!("{}", json);
    Ok(())
}
