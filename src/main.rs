//! Factorio Building Rate Calculator
//!
//! A building rate and count calculator for Factorio.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rusqlite::Connection;
use tracing_subscriber::EnvFilter;

use factorio_calculator::rational::Rational;
use factorio_calculator::{catalog, db, display, extract};

#[derive(Parser)]
#[command(name = "factorio-calculator")]
#[command(about = "Building rate calculator for Factorio")]
struct Cli {
    /// Path to the SQLite database
    #[arg(short, long, default_value = "factorio_data.db")]
    database: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract building and recipe data from a prototype source tree
    Extract {
        /// Path to the game's prototype directory
        source_dir: PathBuf,

        /// Clear existing data before extraction
        #[arg(long)]
        clear: bool,
    },

    /// Show the effective crafts-per-second rate for a recipe
    Rate {
        /// Recipe name (e.g., "iron-gear-wheel", "rocket-part")
        recipe: String,

        /// Building key to use instead of the default assignment
        #[arg(short, long)]
        building: Option<String>,
    },

    /// Number of buildings needed to hit a target rate
    Count {
        /// Recipe name
        recipe: String,

        /// Target rate in crafts per second; accepts "2", "1/2", or "0.5"
        #[arg(short, long, default_value = "1")]
        rate: String,

        /// Building key to use instead of the default assignment
        #[arg(short, long)]
        building: Option<String>,
    },

    /// List all buildings in the catalog
    ListBuildings,

    /// List all recipes in the database
    ListRecipes,

    /// Show details for a specific building
    Building {
        /// Building key
        key: String,
    },

    /// Initialize empty database with schema
    Init,

    /// Load sample data for testing (without a game-data source)
    LoadSample,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let conn = Connection::open(&cli.database)?;
    db::init_schema(&conn)?;

    match cli.command {
        Commands::Extract { source_dir, clear } => {
            if clear {
                println!("Clearing existing data...");
                db::clear_defs(&conn)?;
            }

            let stats = extract::extract_to_database(&conn, &source_dir)?;
            println!("\n{}", stats);
        }

        Commands::Rate { recipe, building } => {
            let mut spec = catalog::load_spec(&conn)?;
            if let Some(key) = building {
                spec.set_building(&recipe, &key)?;
            }
            let recipe = spec.recipe(&recipe)?;
            let building = spec.building_for(recipe)?;
            let rate = building.recipe_rate(&spec, recipe)?;
            println!(
                "{} in {}: {} / s ({} per second)",
                recipe.name,
                building.name,
                rate,
                rate.to_decimal(6)
            );
        }

        Commands::Count {
            recipe,
            rate,
            building,
        } => {
            let target: Rational = rate
                .parse()
                .with_context(|| format!("invalid target rate '{}'", rate))?;
            let mut spec = catalog::load_spec(&conn)?;
            if let Some(key) = building {
                spec.set_building(&recipe, &key)?;
            }
            let recipe = spec.recipe(&recipe)?;
            let building = spec.building_for(recipe)?;
            let count = building.count(&spec, recipe, &target)?;
            println!(
                "{} @ {} / s needs {} x {} ({})",
                recipe.name,
                target,
                count.to_decimal(3),
                building.name,
                count
            );
        }

        Commands::ListBuildings => {
            let buildings = catalog::get_buildings(&conn)?;
            if buildings.is_empty() {
                println!("No buildings in database. Run 'extract' or 'load-sample' first.");
            } else {
                println!(
                    "{:<26} {:>8} {:>6} {:>10}",
                    "Building", "Speed", "Slots", "Power"
                );
                println!("{}", "-".repeat(54));
                for b in buildings {
                    let (power, suffix) = display::power_repr(&b.power);
                    println!(
                        "{:<26} {:>8} {:>6} {:>8} {}",
                        b.key,
                        b.rate_speed().to_decimal(2),
                        b.module_slots,
                        power.to_decimal(0),
                        suffix
                    );
                }
            }
        }

        Commands::ListRecipes => {
            let recipes = db::recipe_defs(&conn)?;
            if recipes.is_empty() {
                println!("No recipes in database. Run 'extract' or 'load-sample' first.");
            } else {
                println!("Recipes:");
                for r in recipes {
                    println!("  {} ({})", r.name, r.category);
                }
            }
        }

        Commands::Building { key } => {
            let spec = catalog::load_spec(&conn)?;
            if let Some(b) = spec.building(&key) {
                println!("{}", display::tooltip(b));
                let (drain, suffix) = display::power_repr(&b.drain());
                println!("Drain: {} {}", drain.to_decimal(0), suffix);
                println!("Beaconable: {}", if b.can_beacon() { "yes" } else { "no" });
                if let Some(fuel) = &b.fuel {
                    println!("Fuel: {}", fuel);
                }
            } else {
                println!("Building '{}' not found", key);
            }
        }

        Commands::Init => {
            println!("Database initialized at: {}", cli.database.display());
        }

        Commands::LoadSample => {
            db::load_sample_data(&conn)?;
            println!("Sample data loaded successfully!");
        }
    }

    Ok(())
}
