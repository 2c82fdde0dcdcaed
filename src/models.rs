//! Data models for Factorio recipes, items, and raw definition records

use crate::rational::Rational;

/// A craftable or minable item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub key: String,
    pub name: String,
}

/// A recipe as consumed by the rate computations. `time` is seconds per
/// craft; `mining_time` applies to extraction recipes and is zero
/// otherwise. Products map item keys to the exact yield per craft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    pub name: String,
    pub category: String,
    pub time: Rational,
    pub mining_time: Rational,
    pub products: Vec<(String, Rational)>,
}

impl Recipe {
    /// Yield of `item` per craft; zero when the recipe does not produce it.
    pub fn gives(&self, item: &Item) -> Rational {
        self.products
            .iter()
            .find(|(key, _)| key == &item.key)
            .map(|(_, amount)| amount.clone())
            .unwrap_or_else(Rational::zero)
    }
}

/// Module configuration assigned to a recipe. The speed bonus is additive;
/// the resulting effect is the multiplicative factor applied to the rate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleSpec {
    pub speed_bonus: Rational,
}

impl ModuleSpec {
    pub fn speed_effect(&self) -> Rational {
        Rational::one().add(&self.speed_bonus)
    }
}

/// Raw building definition record as stored in the game-data database.
/// `speed` holds crafting speed for crafters and mining speed for drills;
/// conversion to exact rationals happens once, in the catalog loader.
#[derive(Debug, Clone, Default)]
pub struct BuildingDef {
    pub proto: String,
    pub key: String,
    pub name: String,
    pub icon_col: u32,
    pub icon_row: u32,
    pub categories: Vec<String>,
    pub speed: f64,
    pub module_slots: u32,
    pub energy_usage: f64,
    pub fuel: Option<String>,
}

/// Raw recipe definition record.
#[derive(Debug, Clone, Default)]
pub struct RecipeDef {
    pub name: String,
    pub category: String,
    pub time: f64,
    pub mining_time: f64,
    pub products: Vec<(String, f64)>,
}
