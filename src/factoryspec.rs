//! The factory specification: the context rate queries run against
//!
//! Holds the recipe and item tables, the building catalog, and the two
//! per-recipe assignments the rate formulas consult: which building a
//! recipe runs in, and which module configuration (if any) is installed.
//! Everything is populated up front; queries never mutate it.

use std::collections::HashMap;

use crate::building::Building;
use crate::error::CalcError;
use crate::models::{Item, ModuleSpec, Recipe};

#[derive(Debug, Clone, Default)]
pub struct FactorySpec {
    pub recipes: HashMap<String, Recipe>,
    pub items: HashMap<String, Item>,
    buildings: Vec<Building>,
    /// Recipe name -> index into `buildings`.
    assignments: HashMap<String, usize>,
    module_specs: HashMap<String, ModuleSpec>,
}

impl FactorySpec {
    pub fn new(buildings: Vec<Building>) -> FactorySpec {
        FactorySpec {
            recipes: HashMap::new(),
            items: HashMap::new(),
            buildings,
            assignments: HashMap::new(),
            module_specs: HashMap::new(),
        }
    }

    pub fn add_recipe(&mut self, recipe: Recipe) {
        self.recipes.insert(recipe.name.clone(), recipe);
    }

    pub fn add_item(&mut self, item: Item) {
        self.items.entry(item.key.clone()).or_insert(item);
    }

    /// The catalog, in loader order.
    pub fn buildings(&self) -> &[Building] {
        &self.buildings
    }

    /// Look up a building by key. Where several catalog entries share a
    /// key (the two silo roles), the first wins.
    pub fn building(&self, key: &str) -> Option<&Building> {
        self.buildings.iter().find(|b| b.key == key)
    }

    pub fn recipe(&self, name: &str) -> Result<&Recipe, CalcError> {
        self.recipes
            .get(name)
            .ok_or_else(|| CalcError::not_found("recipe", name))
    }

    pub fn item(&self, key: &str) -> Result<&Item, CalcError> {
        self.items
            .get(key)
            .ok_or_else(|| CalcError::not_found("item", key))
    }

    /// The building assigned to `recipe`. Absent assignments are a
    /// catalog-construction-order violation, surfaced as `NotFound`.
    pub fn building_for(&self, recipe: &Recipe) -> Result<&Building, CalcError> {
        self.assignments
            .get(&recipe.name)
            .map(|&i| &self.buildings[i])
            .ok_or_else(|| CalcError::not_found("building for recipe", &recipe.name))
    }

    /// Assign `building_key` to `recipe_name`, replacing any default.
    pub fn set_building(&mut self, recipe_name: &str, building_key: &str) -> Result<(), CalcError> {
        if !self.recipes.contains_key(recipe_name) {
            return Err(CalcError::not_found("recipe", recipe_name));
        }
        let idx = self
            .buildings
            .iter()
            .position(|b| b.key == building_key)
            .ok_or_else(|| CalcError::not_found("building", building_key))?;
        self.assignments.insert(recipe_name.to_string(), idx);
        Ok(())
    }

    pub fn set_module_spec(&mut self, recipe_name: &str, modules: ModuleSpec) {
        self.module_specs.insert(recipe_name.to_string(), modules);
    }

    /// Module configuration for `recipe`; `None` means the identity
    /// speed effect.
    pub fn module_spec(&self, recipe: &Recipe) -> Option<&ModuleSpec> {
        self.module_specs.get(&recipe.name)
    }

    /// Bind every recipe to the fastest capable building in the catalog,
    /// per the `less` ordering. Recipes with no capable building stay
    /// unassigned.
    pub fn assign_defaults(&mut self) {
        for (name, recipe) in &self.recipes {
            let mut best: Option<usize> = None;
            for (i, building) in self.buildings.iter().enumerate() {
                if !building.categories.contains(&recipe.category) {
                    continue;
                }
                let better = match best {
                    Some(j) => self.buildings[j].less(building),
                    None => true,
                };
                if better {
                    best = Some(i);
                }
            }
            if let Some(i) = best {
                self.assignments.insert(name.clone(), i);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rational::Rational;

    fn furnace(key: &str, speed: i64, module_slots: u32) -> Building {
        Building::new(
            key,
            key,
            0,
            0,
            vec!["smelting".to_string()],
            Rational::from_integer(speed),
            module_slots,
            Rational::from_integer(90_000),
            None,
        )
    }

    fn plate_recipe() -> Recipe {
        Recipe {
            name: "iron-plate".to_string(),
            category: "smelting".to_string(),
            time: Rational::from_fraction(16, 5),
            mining_time: Rational::zero(),
            products: vec![("iron-plate".to_string(), Rational::one())],
        }
    }

    #[test]
    fn defaults_pick_the_fastest_building() {
        let mut spec = FactorySpec::new(vec![
            furnace("stone-furnace", 1, 0),
            furnace("steel-furnace", 2, 0),
            furnace("electric-furnace", 2, 2),
        ]);
        spec.add_recipe(plate_recipe());
        spec.assign_defaults();
        let recipe = spec.recipe("iron-plate").unwrap();
        // Speed ties break on module slots.
        assert_eq!(spec.building_for(recipe).unwrap().key, "electric-furnace");
    }

    #[test]
    fn explicit_assignment_overrides_default() {
        let mut spec = FactorySpec::new(vec![
            furnace("stone-furnace", 1, 0),
            furnace("electric-furnace", 2, 2),
        ]);
        spec.add_recipe(plate_recipe());
        spec.assign_defaults();
        spec.set_building("iron-plate", "stone-furnace").unwrap();
        let recipe = spec.recipe("iron-plate").unwrap();
        assert_eq!(spec.building_for(recipe).unwrap().key, "stone-furnace");
    }

    #[test]
    fn missing_lookups_are_not_found() {
        let mut spec = FactorySpec::new(vec![furnace("stone-furnace", 1, 0)]);
        assert!(matches!(
            spec.recipe("iron-plate"),
            Err(CalcError::NotFound { .. })
        ));
        spec.add_recipe(plate_recipe());
        let recipe = spec.recipe("iron-plate").unwrap().clone();
        assert!(matches!(
            spec.building_for(&recipe),
            Err(CalcError::NotFound { .. })
        ));
        assert!(matches!(
            spec.set_building("iron-plate", "no-such-building"),
            Err(CalcError::NotFound { .. })
        ));
        assert!(matches!(
            spec.set_building("no-such-recipe", "stone-furnace"),
            Err(CalcError::NotFound { .. })
        ));
    }
}
