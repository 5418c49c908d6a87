//! Operator CLI for calorie tracker databases.
//!
//! # Responsibility
//! - Create/migrate, seed and inspect one SQLite database file.
//! - Keep output deterministic for quick local sanity checks.

use anyhow::{Context, Result};
use calorie_core::db::migrations::latest_version;
use calorie_core::{
    core_version, default_log_level, init_logging, seed_sample_data, DbConfig, IngredientRepository,
    MealIngredientRepository, MealRepository, Store, UserRepository,
};
use clap::{Parser, Subcommand};
use log::info;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "calorie_cli")]
#[command(version, about = "Calorie tracker database tool", long_about = None)]
struct Cli {
    /// SQLite database file
    #[arg(long, env = "CALORIE_DB", default_value = "calorie_tracker.sqlite3")]
    db: PathBuf,

    /// Directory for rolling log files; logging is off when unset
    #[arg(long, env = "CALORIE_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, env = "CALORIE_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the database or migrate it to the latest schema
    Init,
    /// Insert the sample users, ingredients and meals
    Seed {
        /// Delete the database file before seeding
        #[arg(long)]
        reset: bool,
    },
    /// Print schema version and row counts
    Status,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = &cli.log_dir {
        let log_dir = absolute(log_dir)?;
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, &log_dir.to_string_lossy())
            .with_context(|| format!("failed to initialize logging in {}", log_dir.display()))?;
    }

    match cli.command {
        Command::Init => {
            let store = open_store(&cli.db)?;
            println!(
                "initialized {} schema_version={}",
                cli.db.display(),
                store.schema_version()?
            );
            store.close()?;
        }
        Command::Seed { reset } => {
            if reset && cli.db.is_file() {
                info!("event=seed_reset module=cli status=start");
                std::fs::remove_file(&cli.db)
                    .with_context(|| format!("failed to delete {}", cli.db.display()))?;
            }

            let mut store = open_store(&cli.db)?;
            let summary = {
                let uow = store.begin()?;
                let summary = seed_sample_data(&uow).context("seeding failed; nothing written")?;
                uow.commit()?;
                summary
            };
            println!(
                "seeded users={} ingredients={} meals={} meal_ingredients={}",
                summary.users, summary.ingredients, summary.meals, summary.meal_ingredients
            );
            store.close()?;
        }
        Command::Status => {
            let store = open_store(&cli.db)?;
            println!("calorie_core version={}", core_version());
            println!(
                "schema_version={} latest_supported={}",
                store.schema_version()?,
                latest_version()
            );
            println!("users={}", store.users().count_users()?);
            println!("meals={}", store.meals().count_meals()?);
            println!("ingredients={}", store.ingredients().count_ingredients()?);
            println!(
                "meal_ingredients={}",
                store.meal_ingredients().count_meal_ingredients()?
            );
            store.close()?;
        }
    }

    Ok(())
}

fn open_store(path: &Path) -> Result<Store> {
    Store::open(&DbConfig::file(path))
        .with_context(|| format!("failed to open database {}", path.display()))
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("failed to resolve working directory")?;
    Ok(cwd.join(path))
}
