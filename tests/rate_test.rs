//! End-to-end tests: sample data -> catalog -> factory spec -> exact
//! rate and count queries.

use rusqlite::Connection;

use factorio_calculator::rational::Rational;
use factorio_calculator::{CalcError, FactorySpec, ModuleSpec, catalog, db, launch_rate};

fn sample_spec() -> FactorySpec {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    db::load_sample_data(&conn).unwrap();
    catalog::load_spec(&conn).unwrap()
}

#[test]
fn crafter_rates_are_exact() {
    let spec = sample_spec();
    // Gear: time 1/2, assembling machine 3 at speed 5/4.
    let gear = spec.recipe("iron-gear-wheel").unwrap();
    let building = spec.building_for(gear).unwrap();
    assert_eq!(building.key, "assembling-machine-3");
    let rate = building.recipe_rate(&spec, gear).unwrap();
    assert_eq!(rate, Rational::from_fraction(5, 2));

    let count = building
        .count(&spec, gear, &Rational::from_integer(10))
        .unwrap();
    assert_eq!(count, Rational::from_integer(4));
    assert_eq!(count.mul(&rate), Rational::from_integer(10));
}

#[test]
fn smelting_uses_the_tie_broken_default() {
    let spec = sample_spec();
    // Steel and electric furnace share speed 2; the slotted one wins.
    let plate = spec.recipe("iron-plate").unwrap();
    let building = spec.building_for(plate).unwrap();
    assert_eq!(building.key, "electric-furnace");
    // time 16/5, speed 2 => rate 5/8.
    let rate = building.recipe_rate(&spec, plate).unwrap();
    assert_eq!(rate, Rational::from_fraction(5, 8));
}

#[test]
fn explicit_building_override() {
    let mut spec = sample_spec();
    spec.set_building("iron-gear-wheel", "assembling-machine-1")
        .unwrap();
    let gear = spec.recipe("iron-gear-wheel").unwrap();
    let building = spec.building_for(gear).unwrap();
    // time 1/2, speed 1/2 => rate 1.
    let rate = building.recipe_rate(&spec, gear).unwrap();
    assert_eq!(rate, Rational::one());
}

#[test]
fn mining_rate_is_module_invariant() {
    let mut spec = sample_spec();
    let ore = spec.recipe("iron-ore").unwrap();
    let drill = spec.building_for(ore).unwrap();
    assert_eq!(drill.key, "electric-mining-drill");
    let bare = drill.recipe_rate(&spec, ore).unwrap();
    assert_eq!(bare, Rational::from_fraction(1, 2));

    spec.set_module_spec(
        "iron-ore",
        ModuleSpec {
            speed_bonus: Rational::one(),
        },
    );
    let ore = spec.recipe("iron-ore").unwrap();
    let drill = spec.building_for(ore).unwrap();
    assert_eq!(drill.recipe_rate(&spec, ore).unwrap(), bare);
}

#[test]
fn launch_pair_rates_from_sample_data() {
    let spec = sample_spec();
    // Silo speed 1, part time 3 => base rate 1/3; 100 crafts per launch;
    // cycle = 300 + 2434/60 = 10217/30 seconds.
    let total = Rational::from_fraction(10217, 30);
    let rates = launch_rate(&spec).unwrap();
    assert_eq!(rates.part, Rational::from_fraction(3000, 10217));
    assert_eq!(rates.launch, Rational::from_fraction(30, 10217));
    assert_eq!(rates.launch.mul(&total), Rational::one());

    let part = spec.recipe("rocket-part").unwrap();
    let silo = spec.building_for(part).unwrap();
    assert_eq!(silo.recipe_rate(&spec, part).unwrap(), rates.part);

    let science = spec.recipe("space-science-pack").unwrap();
    let launcher = spec.building_for(science).unwrap();
    assert_eq!(launcher.recipe_rate(&spec, science).unwrap(), rates.launch);

    // One launch per second would need 10217/30 silos.
    let count = launcher.count(&spec, science, &Rational::one()).unwrap();
    assert_eq!(count, Rational::from_fraction(10217, 30));
}

#[test]
fn missing_recipe_is_not_found() {
    let spec = sample_spec();
    assert!(matches!(
        spec.recipe("fish-popsicle"),
        Err(CalcError::NotFound { .. })
    ));
}

#[test]
fn drain_estimates() {
    let spec = sample_spec();
    let am3 = spec.building("assembling-machine-3").unwrap();
    assert_eq!(am3.drain(), Rational::from_integer(12_500));
    let drill = spec.building("electric-mining-drill").unwrap();
    assert_eq!(drill.drain(), Rational::zero());
}
