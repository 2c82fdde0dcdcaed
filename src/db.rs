//! Database schema and operations
//!
//! Stores the raw game-data definition records the catalog loader
//! consumes: building definitions keyed by prototype group and key, plus
//! recipe definitions with their products.

use anyhow::Result;
use rusqlite::{Connection, OptionalExtension};

use crate::models::{BuildingDef, RecipeDef};

/// Initialize the database schema
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- Building definitions, keyed by prototype group + key
        CREATE TABLE IF NOT EXISTS building_defs (
            proto TEXT NOT NULL,
            key TEXT NOT NULL,
            name TEXT NOT NULL,
            icon_col INTEGER NOT NULL DEFAULT 0,
            icon_row INTEGER NOT NULL DEFAULT 0,
            speed REAL NOT NULL DEFAULT 0,
            module_slots INTEGER NOT NULL DEFAULT 0,
            energy_usage REAL NOT NULL DEFAULT 0,
            fuel_category TEXT,
            PRIMARY KEY (proto, key)
        );

        -- Recipe categories a building can process
        CREATE TABLE IF NOT EXISTS building_def_categories (
            proto TEXT NOT NULL,
            key TEXT NOT NULL,
            category TEXT NOT NULL,
            PRIMARY KEY (proto, key, category)
        );

        -- Recipe definitions
        CREATE TABLE IF NOT EXISTS recipe_defs (
            name TEXT PRIMARY KEY,
            category TEXT NOT NULL,
            time REAL NOT NULL DEFAULT 0,
            mining_time REAL NOT NULL DEFAULT 0
        );

        -- Recipe products (item yields per craft)
        CREATE TABLE IF NOT EXISTS recipe_products (
            recipe TEXT NOT NULL,
            item TEXT NOT NULL,
            amount REAL NOT NULL,
            PRIMARY KEY (recipe, item)
        );

        CREATE INDEX IF NOT EXISTS idx_building_defs_proto ON building_defs(proto);
        CREATE INDEX IF NOT EXISTS idx_recipe_products_recipe ON recipe_products(recipe);
        "#,
    )?;
    Ok(())
}

/// Insert or replace a building definition, categories included
pub fn upsert_building_def(conn: &Connection, def: &BuildingDef) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO building_defs
         (proto, key, name, icon_col, icon_row, speed, module_slots, energy_usage, fuel_category)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        (
            &def.proto,
            &def.key,
            &def.name,
            def.icon_col,
            def.icon_row,
            def.speed,
            def.module_slots,
            def.energy_usage,
            &def.fuel,
        ),
    )?;
    conn.execute(
        "DELETE FROM building_def_categories WHERE proto = ?1 AND key = ?2",
        (&def.proto, &def.key),
    )?;
    for category in &def.categories {
        conn.execute(
            "INSERT OR REPLACE INTO building_def_categories (proto, key, category)
             VALUES (?1, ?2, ?3)",
            (&def.proto, &def.key, category),
        )?;
    }
    Ok(())
}

/// Insert or replace a recipe definition, products included
pub fn upsert_recipe_def(conn: &Connection, def: &RecipeDef) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO recipe_defs (name, category, time, mining_time)
         VALUES (?1, ?2, ?3, ?4)",
        (&def.name, &def.category, def.time, def.mining_time),
    )?;
    conn.execute("DELETE FROM recipe_products WHERE recipe = ?1", [&def.name])?;
    for (item, amount) in &def.products {
        conn.execute(
            "INSERT OR REPLACE INTO recipe_products (recipe, item, amount)
             VALUES (?1, ?2, ?3)",
            (&def.name, item, amount),
        )?;
    }
    Ok(())
}

/// Clear all extracted data (for re-extraction)
pub fn clear_defs(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        DELETE FROM recipe_products;
        DELETE FROM recipe_defs;
        DELETE FROM building_def_categories;
        DELETE FROM building_defs;
        "#,
    )?;
    Ok(())
}

fn def_categories(conn: &Connection, proto: &str, key: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT category FROM building_def_categories
         WHERE proto = ?1 AND key = ?2 ORDER BY category",
    )?;
    let rows = stmt.query_map([proto, key], |row| row.get(0))?;
    let mut categories = Vec::new();
    for row in rows {
        categories.push(row?);
    }
    Ok(categories)
}

/// All building definitions in a prototype group, ordered by key
pub fn building_defs(conn: &Connection, proto: &str) -> Result<Vec<BuildingDef>> {
    let mut stmt = conn.prepare(
        "SELECT proto, key, name, icon_col, icon_row, speed, module_slots, energy_usage, fuel_category
         FROM building_defs WHERE proto = ?1 ORDER BY key",
    )?;
    let rows = stmt.query_map([proto], |row| {
        Ok(BuildingDef {
            proto: row.get(0)?,
            key: row.get(1)?,
            name: row.get(2)?,
            icon_col: row.get(3)?,
            icon_row: row.get(4)?,
            categories: Vec::new(),
            speed: row.get(5)?,
            module_slots: row.get(6)?,
            energy_usage: row.get(7)?,
            fuel: row.get(8)?,
        })
    })?;

    let mut defs = Vec::new();
    for row in rows {
        defs.push(row?);
    }
    for def in &mut defs {
        def.categories = def_categories(conn, &def.proto, &def.key)?;
    }
    Ok(defs)
}

/// A single building definition, if present
pub fn building_def(conn: &Connection, proto: &str, key: &str) -> Result<Option<BuildingDef>> {
    let def = conn
        .query_row(
            "SELECT proto, key, name, icon_col, icon_row, speed, module_slots, energy_usage, fuel_category
             FROM building_defs WHERE proto = ?1 AND key = ?2",
            [proto, key],
            |row| {
                Ok(BuildingDef {
                    proto: row.get(0)?,
                    key: row.get(1)?,
                    name: row.get(2)?,
                    icon_col: row.get(3)?,
                    icon_row: row.get(4)?,
                    categories: Vec::new(),
                    speed: row.get(5)?,
                    module_slots: row.get(6)?,
                    energy_usage: row.get(7)?,
                    fuel: row.get(8)?,
                })
            },
        )
        .optional()?;
    match def {
        Some(mut def) => {
            def.categories = def_categories(conn, proto, key)?;
            Ok(Some(def))
        }
        None => Ok(None),
    }
}

/// All recipe definitions, ordered by name
pub fn recipe_defs(conn: &Connection) -> Result<Vec<RecipeDef>> {
    let mut stmt =
        conn.prepare("SELECT name, category, time, mining_time FROM recipe_defs ORDER BY name")?;
    let rows = stmt.query_map([], |row| {
        Ok(RecipeDef {
            name: row.get(0)?,
            category: row.get(1)?,
            time: row.get(2)?,
            mining_time: row.get(3)?,
            products: Vec::new(),
        })
    })?;

    let mut defs = Vec::new();
    for row in rows {
        defs.push(row?);
    }
    for def in &mut defs {
        let mut stmt = conn
            .prepare("SELECT item, amount FROM recipe_products WHERE recipe = ?1 ORDER BY item")?;
        let rows = stmt.query_map([&def.name], |row| Ok((row.get(0)?, row.get(1)?)))?;
        for row in rows {
            def.products.push(row?);
        }
    }
    Ok(defs)
}

/// Load a small, self-consistent Factorio data set for testing without a
/// game-data source. Covers every building kind, the silo pair, and the
/// pumpjack exclusion.
pub fn load_sample_data(conn: &Connection) -> Result<()> {
    clear_defs(conn)?;

    let crafting = || {
        vec![
            "crafting".to_string(),
            "basic-crafting".to_string(),
            "advanced-crafting".to_string(),
        ]
    };
    let defs = [
        BuildingDef {
            proto: "assembling-machine".to_string(),
            key: "assembling-machine-1".to_string(),
            name: "Assembling machine 1".to_string(),
            icon_col: 2,
            icon_row: 1,
            categories: crafting(),
            speed: 0.5,
            module_slots: 0,
            energy_usage: 75_000.0,
            fuel: None,
        },
        BuildingDef {
            proto: "assembling-machine".to_string(),
            key: "assembling-machine-2".to_string(),
            name: "Assembling machine 2".to_string(),
            icon_col: 3,
            icon_row: 1,
            categories: crafting(),
            speed: 0.75,
            module_slots: 2,
            energy_usage: 150_000.0,
            fuel: None,
        },
        BuildingDef {
            proto: "assembling-machine".to_string(),
            key: "assembling-machine-3".to_string(),
            name: "Assembling machine 3".to_string(),
            icon_col: 4,
            icon_row: 1,
            categories: crafting(),
            speed: 1.25,
            module_slots: 4,
            energy_usage: 375_000.0,
            fuel: None,
        },
        BuildingDef {
            proto: "furnace".to_string(),
            key: "stone-furnace".to_string(),
            name: "Stone furnace".to_string(),
            icon_col: 1,
            icon_row: 2,
            categories: vec!["smelting".to_string()],
            speed: 1.0,
            module_slots: 0,
            energy_usage: 90_000.0,
            fuel: Some("chemical".to_string()),
        },
        BuildingDef {
            proto: "furnace".to_string(),
            key: "steel-furnace".to_string(),
            name: "Steel furnace".to_string(),
            icon_col: 2,
            icon_row: 2,
            categories: vec!["smelting".to_string()],
            speed: 2.0,
            module_slots: 0,
            energy_usage: 90_000.0,
            fuel: Some("chemical".to_string()),
        },
        BuildingDef {
            proto: "furnace".to_string(),
            key: "electric-furnace".to_string(),
            name: "Electric furnace".to_string(),
            icon_col: 3,
            icon_row: 2,
            categories: vec!["smelting".to_string()],
            speed: 2.0,
            module_slots: 2,
            energy_usage: 180_000.0,
            fuel: None,
        },
        BuildingDef {
            proto: "mining-drill".to_string(),
            key: "burner-mining-drill".to_string(),
            name: "Burner mining drill".to_string(),
            icon_col: 1,
            icon_row: 3,
            categories: vec!["basic-solid".to_string()],
            speed: 0.25,
            module_slots: 0,
            energy_usage: 150_000.0,
            fuel: Some("chemical".to_string()),
        },
        BuildingDef {
            proto: "mining-drill".to_string(),
            key: "electric-mining-drill".to_string(),
            name: "Electric mining drill".to_string(),
            icon_col: 2,
            icon_row: 3,
            categories: vec!["basic-solid".to_string()],
            speed: 0.5,
            module_slots: 3,
            energy_usage: 90_000.0,
            fuel: None,
        },
        // Present in the data, excluded by the catalog loader.
        BuildingDef {
            proto: "mining-drill".to_string(),
            key: "pumpjack".to_string(),
            name: "Pumpjack".to_string(),
            icon_col: 3,
            icon_row: 3,
            categories: vec!["basic-fluid".to_string()],
            speed: 1.0,
            module_slots: 2,
            energy_usage: 90_000.0,
            fuel: None,
        },
        BuildingDef {
            proto: "rocket-silo".to_string(),
            key: "rocket-silo".to_string(),
            name: "Rocket silo".to_string(),
            icon_col: 1,
            icon_row: 4,
            categories: vec!["rocket-building".to_string()],
            speed: 1.0,
            module_slots: 4,
            energy_usage: 4_000_000.0,
            fuel: None,
        },
        BuildingDef {
            proto: "offshore-pump".to_string(),
            key: "offshore-pump".to_string(),
            name: "Offshore pump".to_string(),
            icon_col: 2,
            icon_row: 4,
            categories: Vec::new(),
            speed: 0.0,
            module_slots: 0,
            energy_usage: 0.0,
            fuel: None,
        },
        BuildingDef {
            proto: "reactor".to_string(),
            key: "nuclear-reactor".to_string(),
            name: "Nuclear reactor".to_string(),
            icon_col: 3,
            icon_row: 4,
            categories: Vec::new(),
            speed: 0.0,
            module_slots: 0,
            energy_usage: 0.0,
            fuel: None,
        },
        BuildingDef {
            proto: "boiler".to_string(),
            key: "boiler".to_string(),
            name: "Boiler".to_string(),
            icon_col: 4,
            icon_row: 4,
            categories: Vec::new(),
            speed: 0.0,
            module_slots: 0,
            energy_usage: 0.0,
            fuel: None,
        },
    ];
    for def in &defs {
        upsert_building_def(conn, def)?;
    }

    let recipes = [
        RecipeDef {
            name: "iron-gear-wheel".to_string(),
            category: "crafting".to_string(),
            time: 0.5,
            mining_time: 0.0,
            products: vec![("iron-gear-wheel".to_string(), 1.0)],
        },
        RecipeDef {
            name: "iron-plate".to_string(),
            category: "smelting".to_string(),
            time: 3.2,
            mining_time: 0.0,
            products: vec![("iron-plate".to_string(), 1.0)],
        },
        RecipeDef {
            name: "iron-ore".to_string(),
            category: "mining-basic-solid".to_string(),
            time: 0.0,
            mining_time: 1.0,
            products: vec![("iron-ore".to_string(), 1.0)],
        },
        RecipeDef {
            name: "rocket-part".to_string(),
            category: "rocket-building".to_string(),
            time: 3.0,
            mining_time: 0.0,
            products: vec![("rocket-part".to_string(), 1.0)],
        },
        RecipeDef {
            name: "space-science-pack".to_string(),
            category: "rocket-launch".to_string(),
            time: 40.33,
            mining_time: 0.0,
            products: vec![("space-science-pack".to_string(), 1000.0)],
        },
    ];
    for recipe in &recipes {
        upsert_recipe_def(conn, recipe)?;
    }

    Ok(())
}
