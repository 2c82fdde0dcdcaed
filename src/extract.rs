//! Game-data extraction for Factorio building and recipe definitions
//!
//! Walks a Factorio prototype source tree (`data/base/prototypes/...`)
//! and regex-parses the Lua definition blocks for crafting machines,
//! furnaces, mining drills, rocket silos, recipes, and resources.
//! Parsing is best-effort: blocks that lack a name are skipped, missing
//! numeric fields default to zero.

use std::fs;
use std::path::Path;

use anyhow::Result;
use regex::Regex;
use rusqlite::Connection;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::db;
use crate::models::{BuildingDef, RecipeDef};

const MACHINE_PROTOS: [&str; 4] = [
    "assembling-machine",
    "furnace",
    "mining-drill",
    "rocket-silo",
];

/// "assembling-machine-1" -> "Assembling machine 1"
fn display_name(key: &str) -> String {
    let mut name = key.replace('-', " ");
    if let Some(first) = name.get(..1) {
        let upper = first.to_uppercase();
        name.replace_range(..1, &upper);
    }
    name
}

/// Parse an energy figure like `"150kW"` or `"4MW"` into watts.
fn parse_energy(block: &str) -> Result<f64> {
    let energy_re = Regex::new(r#"energy_usage\s*=\s*"?([\d.]+)\s*([kM]?W)"#)?;
    let Some(cap) = energy_re.captures(block) else {
        return Ok(0.0);
    };
    let value: f64 = cap[1].parse().unwrap_or(0.0);
    let factor = match &cap[2] {
        "kW" => 1e3,
        "MW" => 1e6,
        _ => 1.0,
    };
    Ok(value * factor)
}

fn parse_fuel(block: &str) -> Result<Option<String>> {
    let fuel_re = Regex::new(r#"fuel_categor(?:y|ies)\s*=\s*\{?\s*"([\w-]+)""#)?;
    if let Some(cap) = fuel_re.captures(block) {
        return Ok(Some(cap[1].to_string()));
    }
    let burner_re = Regex::new(r#"type\s*=\s*"burner""#)?;
    if burner_re.is_match(block) {
        // Burner energy sources default to the chemical fuel category.
        return Ok(Some("chemical".to_string()));
    }
    Ok(None)
}

fn parse_categories(block: &str, field: &str) -> Result<Vec<String>> {
    let list_re = Regex::new(&format!(r"{field}\s*=\s*\{{([^}}]*)\}}"))?;
    let Some(cap) = list_re.captures(block) else {
        return Ok(Vec::new());
    };
    let item_re = Regex::new(r#""([\w-]+)""#)?;
    Ok(item_re
        .captures_iter(&cap[1])
        .map(|c| c[1].to_string())
        .collect())
}

/// Parse one machine prototype block into a definition record
fn parse_machine_block(proto: &str, block: &str) -> Result<Option<BuildingDef>> {
    let name_re = Regex::new(r#"name\s*=\s*"([\w-]+)""#)?;
    let Some(key) = name_re.captures(block).map(|c| c[1].to_string()) else {
        return Ok(None);
    };

    let speed_field = if proto == "mining-drill" {
        "mining_speed"
    } else {
        "crafting_speed"
    };
    let speed_re = Regex::new(&format!(r"{speed_field}\s*=\s*([\d.]+)"))?;
    let speed = speed_re
        .captures(block)
        .and_then(|c| c[1].parse::<f64>().ok())
        .unwrap_or(0.0);

    let slots_re = Regex::new(r"module_slots\s*=\s*(\d+)")?;
    let module_slots = slots_re
        .captures(block)
        .and_then(|c| c[1].parse::<u32>().ok())
        .unwrap_or(0);

    let categories = if proto == "mining-drill" {
        parse_categories(block, "resource_categories")?
    } else {
        parse_categories(block, "crafting_categories")?
    };

    Ok(Some(BuildingDef {
        proto: proto.to_string(),
        key: key.clone(),
        name: display_name(&key),
        icon_col: 0,
        icon_row: 0,
        categories,
        speed,
        module_slots,
        energy_usage: parse_energy(block)?,
        fuel: parse_fuel(block)?,
    }))
}

/// Parse a recipe prototype block
fn parse_recipe_block(block: &str) -> Result<Option<RecipeDef>> {
    let name_re = Regex::new(r#"name\s*=\s*"([\w-]+)""#)?;
    let Some(name) = name_re.captures(block).map(|c| c[1].to_string()) else {
        return Ok(None);
    };

    let category_re = Regex::new(r#"category\s*=\s*"([\w-]+)""#)?;
    let category = category_re
        .captures(block)
        .map(|c| c[1].to_string())
        .unwrap_or_else(|| "crafting".to_string());

    // energy_required defaults to half a second in the game data.
    let time_re = Regex::new(r"energy_required\s*=\s*([\d.]+)")?;
    let time = time_re
        .captures(block)
        .and_then(|c| c[1].parse::<f64>().ok())
        .unwrap_or(0.5);

    let mut products: Vec<(String, f64)> = Vec::new();
    if let Some(pos) = block.find("results") {
        // results = {{name = "x", amount = 2}, ...}
        let pair_re = Regex::new(r#"name\s*=\s*"([\w-]+)"[^{}]*amount\s*=\s*([\d.]+)"#)?;
        for cap in pair_re.captures_iter(&block[pos..]) {
            products.push((cap[1].to_string(), cap[2].parse().unwrap_or(0.0)));
        }
    }
    if products.is_empty() {
        // result = "x" with an optional result_count
        let result_re = Regex::new(r#"result\s*=\s*"([\w-]+)""#)?;
        let count_re = Regex::new(r"result_count\s*=\s*([\d.]+)")?;
        if let Some(cap) = result_re.captures(block) {
            let count = count_re
                .captures(block)
                .and_then(|c| c[1].parse::<f64>().ok())
                .unwrap_or(1.0);
            products.push((cap[1].to_string(), count));
        }
    }
    if products.is_empty() {
        products.push((name.clone(), 1.0));
    }

    Ok(Some(RecipeDef {
        name,
        category,
        time,
        mining_time: 0.0,
        products,
    }))
}

/// Parse a resource prototype block into a mining recipe
fn parse_resource_block(block: &str) -> Result<Option<RecipeDef>> {
    let name_re = Regex::new(r#"name\s*=\s*"([\w-]+)""#)?;
    let Some(name) = name_re.captures(block).map(|c| c[1].to_string()) else {
        return Ok(None);
    };

    let time_re = Regex::new(r"mining_time\s*=\s*([\d.]+)")?;
    let mining_time = time_re
        .captures(block)
        .and_then(|c| c[1].parse::<f64>().ok())
        .unwrap_or(1.0);

    let result_re = Regex::new(r#"result\s*=\s*"([\w-]+)""#)?;
    let item = result_re
        .captures(block)
        .map(|c| c[1].to_string())
        .unwrap_or(name);

    Ok(Some(RecipeDef {
        name: item.clone(),
        category: "mining-basic-solid".to_string(),
        time: 0.0,
        mining_time,
        products: vec![(item, 1.0)],
    }))
}

/// Split file content at prototype `type = "..."` markers and parse each
/// block; returns (buildings, recipes) inserted.
fn extract_file(conn: &Connection, content: &str) -> Result<(usize, usize)> {
    let proto_re = Regex::new(
        r#"type\s*=\s*"(assembling-machine|furnace|mining-drill|rocket-silo|recipe|resource)""#,
    )?;
    let marks: Vec<(usize, String)> = proto_re
        .captures_iter(content)
        .map(|c| (c.get(0).map_or(0, |m| m.start()), c[1].to_string()))
        .collect();

    let mut buildings = 0;
    let mut recipes = 0;
    for (i, (start, proto)) in marks.iter().enumerate() {
        let end = marks.get(i + 1).map_or(content.len(), |(s, _)| *s);
        let block = &content[*start..end];
        match proto.as_str() {
            "recipe" => {
                if let Some(def) = parse_recipe_block(block)? {
                    db::upsert_recipe_def(conn, &def)?;
                    recipes += 1;
                }
            }
            "resource" => {
                if let Some(def) = parse_resource_block(block)? {
                    db::upsert_recipe_def(conn, &def)?;
                    recipes += 1;
                }
            }
            machine if MACHINE_PROTOS.contains(&machine) => {
                if let Some(def) = parse_machine_block(machine, block)? {
                    debug!(proto = machine, key = %def.key, "parsed building definition");
                    db::upsert_building_def(conn, &def)?;
                    buildings += 1;
                }
            }
            _ => {}
        }
    }
    Ok((buildings, recipes))
}

/// Extract all definitions from a prototype source tree and populate the
/// database
pub fn extract_to_database(conn: &Connection, source_dir: &Path) -> Result<ExtractStats> {
    let mut stats = ExtractStats::default();

    println!(
        "Scanning {} for prototype definitions...",
        source_dir.display()
    );
    for entry in WalkDir::new(source_dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path.extension().map_or(false, |ext| ext == "lua") {
            continue;
        }
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "unreadable prototype file");
                stats.errors += 1;
                continue;
            }
        };
        match extract_file(conn, &content) {
            Ok((0, 0)) => stats.skipped += 1,
            Ok((buildings, recipes)) => {
                stats.buildings += buildings;
                stats.recipes += recipes;
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to parse prototype file");
                stats.errors += 1;
            }
        }
    }

    Ok(stats)
}

#[derive(Debug, Default)]
pub struct ExtractStats {
    pub buildings: usize,
    pub recipes: usize,
    pub skipped: usize,
    pub errors: usize,
}

impl std::fmt::Display for ExtractStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Extracted {} buildings, {} recipes. Skipped files: {}, Errors: {}",
            self.buildings, self.recipes, self.skipped, self.errors
        )
    }
}
