//! Catalog loader: from stored definition records to the ordered
//! building catalog
//!
//! Special-cased synthetic entries come first (offshore pump, nuclear
//! reactor, boiler, and the launch role of the rocket silo), then the
//! generic loops over crafters, silos, and mining drills. Floating-point
//! columns are converted to exact rationals here, once.

use anyhow::Result;
use rusqlite::Connection;
use tracing::warn;

use crate::building::{Building, BuildingKind, TooltipStyle};
use crate::consts;
use crate::db;
use crate::factoryspec::FactorySpec;
use crate::models::{BuildingDef, Item, Recipe, RecipeDef};
use crate::rational::Rational;

/// Name and icon coordinates for a synthetic entry, from the stored
/// record when present.
fn synthetic_meta(
    conn: &Connection,
    proto: &str,
    key: &str,
    fallback_name: &str,
) -> Result<(String, u32, u32)> {
    match db::building_def(conn, proto, key)? {
        Some(def) => Ok((def.name, def.icon_col, def.icon_row)),
        None => {
            warn!(proto, key, "no stored definition for synthetic entry");
            Ok((fallback_name.to_string(), 0, 0))
        }
    }
}

fn crafter_from_def(def: &BuildingDef) -> Building {
    Building::new(
        def.key.clone(),
        def.name.clone(),
        def.icon_col,
        def.icon_row,
        def.categories.clone(),
        Rational::from_float_approximate(def.speed),
        def.module_slots,
        Rational::from_float_approximate(def.energy_usage),
        def.fuel.clone(),
    )
}

/// Build the ordered building catalog.
pub fn get_buildings(conn: &Connection) -> Result<Vec<Building>> {
    let mut buildings = Vec::new();

    let (name, col, row) = synthetic_meta(conn, "offshore-pump", "offshore-pump", "Offshore pump")?;
    buildings.push(
        Building::new(
            "offshore-pump",
            name,
            col,
            row,
            vec!["water".to_string()],
            Rational::one(),
            0,
            Rational::zero(),
            None,
        )
        .with_tooltip(TooltipStyle::NameOnly),
    );

    let (name, col, row) = synthetic_meta(conn, "reactor", "nuclear-reactor", "Nuclear reactor")?;
    buildings.push(
        Building::new(
            "nuclear-reactor",
            name,
            col,
            row,
            vec!["nuclear".to_string()],
            Rational::one(),
            0,
            Rational::zero(),
            None,
        )
        .with_tooltip(TooltipStyle::NameOnly),
    );

    let (name, col, row) = synthetic_meta(conn, "boiler", "boiler", "Boiler")?;
    buildings.push(
        Building::new(
            "boiler",
            name,
            col,
            row,
            vec!["boiler".to_string()],
            Rational::one(),
            0,
            // Not derivable from the data dump.
            consts::boiler_energy(),
            Some("chemical".to_string()),
        )
        .with_tooltip(TooltipStyle::NameOnly),
    );

    let (name, col, row) = synthetic_meta(conn, "rocket-silo", "rocket-silo", "Rocket silo")?;
    buildings.push(
        Building::new(
            "rocket-silo",
            name,
            col,
            row,
            vec!["rocket-launch".to_string()],
            Rational::one(),
            0,
            Rational::zero(),
            None,
        )
        .with_kind(BuildingKind::RocketLaunch)
        .with_tooltip(TooltipStyle::NameOnly),
    );

    for proto in ["assembling-machine", "furnace"] {
        for def in db::building_defs(conn, proto)? {
            buildings.push(crafter_from_def(&def));
        }
    }

    // Every silo record again, as the part-producing role with its real
    // speed, slots, and energy figures.
    for def in db::building_defs(conn, "rocket-silo")? {
        buildings.push(crafter_from_def(&def).with_kind(BuildingKind::RocketSilo));
    }

    for def in db::building_defs(conn, "mining-drill")? {
        // Pumpjack rates are fluid-specific; not covered by the generic
        // miner model.
        if def.key == consts::PUMPJACK {
            continue;
        }
        buildings.push(Building::miner(
            def.key.clone(),
            def.name.clone(),
            def.icon_col,
            def.icon_row,
            vec!["mining-basic-solid".to_string()],
            Rational::from_float_approximate(def.speed),
            def.module_slots,
            Rational::from_float_approximate(def.energy_usage),
            def.fuel.clone(),
        ));
    }

    Ok(buildings)
}

fn recipe_from_def(def: &RecipeDef) -> Recipe {
    Recipe {
        name: def.name.clone(),
        category: def.category.clone(),
        time: Rational::from_float_approximate(def.time),
        mining_time: Rational::from_float_approximate(def.mining_time),
        products: def
            .products
            .iter()
            .map(|(key, amount)| (key.clone(), Rational::from_float_approximate(*amount)))
            .collect(),
    }
}

/// Build a complete factory spec from the database: catalog, recipes,
/// items, and default recipe-to-building assignments.
pub fn load_spec(conn: &Connection) -> Result<FactorySpec> {
    let buildings = get_buildings(conn)?;
    let mut spec = FactorySpec::new(buildings);
    for def in db::recipe_defs(conn)? {
        for (key, _) in &def.products {
            spec.add_item(Item {
                key: key.clone(),
                name: key.clone(),
            });
        }
        spec.add_recipe(recipe_from_def(&def));
    }
    spec.assign_defaults();
    Ok(spec)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        db::init_schema(&conn).unwrap();
        db::load_sample_data(&conn).unwrap();
        conn
    }

    #[test]
    fn synthetic_entries_lead_the_catalog() {
        let buildings = get_buildings(&sample_conn()).unwrap();
        let keys: Vec<&str> = buildings.iter().take(4).map(|b| b.key.as_str()).collect();
        assert_eq!(
            keys,
            ["offshore-pump", "nuclear-reactor", "boiler", "rocket-silo"]
        );
        assert!(
            buildings
                .iter()
                .take(4)
                .all(|b| b.tooltip == TooltipStyle::NameOnly)
        );

        let boiler = &buildings[2];
        assert_eq!(boiler.power, consts::boiler_energy());
        assert_eq!(boiler.fuel.as_deref(), Some("chemical"));
    }

    #[test]
    fn pumpjack_is_excluded_from_generic_miners() {
        let buildings = get_buildings(&sample_conn()).unwrap();
        assert!(buildings.iter().all(|b| b.key != consts::PUMPJACK));
        let miners: Vec<&Building> = buildings
            .iter()
            .filter(|b| matches!(b.kind, BuildingKind::Miner { .. }))
            .collect();
        assert_eq!(miners.len(), 2);
    }

    #[test]
    fn silo_records_yield_one_of_each_role() {
        let buildings = get_buildings(&sample_conn()).unwrap();
        let silos = buildings
            .iter()
            .filter(|b| b.kind == BuildingKind::RocketSilo)
            .count();
        let launchers = buildings
            .iter()
            .filter(|b| b.kind == BuildingKind::RocketLaunch)
            .count();
        assert_eq!((silos, launchers), (1, 1));
    }

    #[test]
    fn float_columns_become_exact_rationals() {
        let buildings = get_buildings(&sample_conn()).unwrap();
        let am3 = buildings
            .iter()
            .find(|b| b.key == "assembling-machine-3")
            .unwrap();
        assert_eq!(am3.speed, Rational::from_fraction(5, 4));
        assert_eq!(am3.power, Rational::from_integer(375_000));
    }

    #[test]
    fn load_spec_assigns_defaults() {
        let spec = load_spec(&sample_conn()).unwrap();
        let gear = spec.recipe("iron-gear-wheel").unwrap();
        assert_eq!(
            spec.building_for(gear).unwrap().key,
            "assembling-machine-3"
        );
        // Equal-speed furnaces tie-break on module slots.
        let plate = spec.recipe("iron-plate").unwrap();
        assert_eq!(spec.building_for(plate).unwrap().key, "electric-furnace");
        let ore = spec.recipe("iron-ore").unwrap();
        assert_eq!(
            spec.building_for(ore).unwrap().key,
            "electric-mining-drill"
        );
    }
}
