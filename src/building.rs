//! Building variants and their rate formulas
//!
//! The heart of the calculator: a closed set of building kinds with
//! materially different rate formulas. Crafters use the plain
//! time/speed/module formula, miners divide mining speed by mining time,
//! and the two rocket-silo roles share the joint launch-rate derivation
//! in [`launch_rate`].

use std::collections::HashSet;

use crate::consts;
use crate::error::CalcError;
use crate::factoryspec::FactorySpec;
use crate::models::Recipe;
use crate::rational::Rational;

/// The rate formula a building uses. Exhaustively matched everywhere so
/// adding a kind is a compile-time event, not a runtime surprise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildingKind {
    /// Ordinary crafting machine or furnace.
    Crafter,
    /// Mining drill. `speed` on the building itself is zero; the rate
    /// comes from `mining_speed` and the recipe's mining time.
    Miner { mining_speed: Rational },
    /// The rocket-part-producing role of the silo.
    RocketSilo,
    /// The launch role of the silo.
    RocketLaunch,
}

/// How the renderer should present a building. Synthetic catalog entries
/// (offshore pump, reactor, boiler, launch) show the name only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TooltipStyle {
    Full,
    NameOnly,
}

/// An immutable building, constructed once by the catalog loader.
#[derive(Debug, Clone)]
pub struct Building {
    pub key: String,
    pub name: String,
    pub icon_col: u32,
    pub icon_row: u32,
    /// Recipe categories this building can process.
    pub categories: HashSet<String>,
    /// Crafting-speed multiplier. Zero for miners.
    pub speed: Rational,
    pub module_slots: u32,
    /// Nominal energy draw in watts.
    pub power: Rational,
    /// Fuel category for burner buildings; `None` means electric.
    pub fuel: Option<String>,
    pub kind: BuildingKind,
    pub tooltip: TooltipStyle,
}

impl Building {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        key: impl Into<String>,
        name: impl Into<String>,
        icon_col: u32,
        icon_row: u32,
        categories: Vec<String>,
        speed: Rational,
        module_slots: u32,
        power: Rational,
        fuel: Option<String>,
    ) -> Building {
        Building {
            key: key.into(),
            name: name.into(),
            icon_col,
            icon_row,
            categories: categories.into_iter().collect(),
            speed,
            module_slots,
            power,
            fuel,
            kind: BuildingKind::Crafter,
            tooltip: TooltipStyle::Full,
        }
    }

    /// A mining drill. Its crafting speed is forced to zero; the mining
    /// speed drives the rate instead.
    #[allow(clippy::too_many_arguments)]
    pub fn miner(
        key: impl Into<String>,
        name: impl Into<String>,
        icon_col: u32,
        icon_row: u32,
        categories: Vec<String>,
        mining_speed: Rational,
        module_slots: u32,
        power: Rational,
        fuel: Option<String>,
    ) -> Building {
        Building {
            key: key.into(),
            name: name.into(),
            icon_col,
            icon_row,
            categories: categories.into_iter().collect(),
            speed: Rational::zero(),
            module_slots,
            power,
            fuel,
            kind: BuildingKind::Miner { mining_speed },
            tooltip: TooltipStyle::Full,
        }
    }

    pub fn with_kind(mut self, kind: BuildingKind) -> Building {
        self.kind = kind;
        self
    }

    pub fn with_tooltip(mut self, tooltip: TooltipStyle) -> Building {
        self.tooltip = tooltip;
        self
    }

    /// The speed figure that determines this building's rate: mining
    /// speed for miners, crafting speed otherwise.
    pub fn rate_speed(&self) -> &Rational {
        match &self.kind {
            BuildingKind::Miner { mining_speed } => mining_speed,
            _ => &self.speed,
        }
    }

    /// Strict weak ordering over buildings: rate-determining speed first,
    /// module slots as the tie-break.
    pub fn less(&self, other: &Building) -> bool {
        let a = self.rate_speed();
        let b = other.rate_speed();
        if a != b {
            return a.less(b);
        }
        self.module_slots < other.module_slots
    }

    /// Whether beacon-delivered module effects can apply to this building.
    pub fn can_beacon(&self) -> bool {
        self.module_slots > 0
    }

    /// Idle/average power draw estimate. Miners are not modeled as having
    /// a partial idle draw.
    pub fn drain(&self) -> Rational {
        match self.kind {
            BuildingKind::Miner { .. } => Rational::zero(),
            _ => self.power.mul(&consts::drain_factor()),
        }
    }

    /// The ordinary crafting rate: `(1 / recipe.time) * speed * effect`,
    /// where the module speed effect defaults to the identity.
    ///
    /// This is the formula the launch-rate derivation applies to the part
    /// factory directly, so the silo's own kind dispatch is never
    /// re-entered.
    pub fn base_recipe_rate(
        &self,
        spec: &FactorySpec,
        recipe: &Recipe,
    ) -> Result<Rational, CalcError> {
        let effect = match spec.module_spec(recipe) {
            Some(modules) => modules.speed_effect(),
            None => Rational::one(),
        };
        Ok(recipe.time.reciprocate()?.mul(&self.speed).mul(&effect))
    }

    /// Effective crafts (or launches) per second for `recipe` in the
    /// given context. Side-effect free; mutates neither argument.
    pub fn recipe_rate(&self, spec: &FactorySpec, recipe: &Recipe) -> Result<Rational, CalcError> {
        match &self.kind {
            BuildingKind::Crafter => self.base_recipe_rate(spec, recipe),
            // XXX: module speed effects are intentionally not applied to
            // miners; preserve the asymmetry.
            BuildingKind::Miner { mining_speed } => mining_speed.div(&recipe.mining_time),
            // Both silo roles ignore the recipe argument: the rate is
            // fixed by the silo-to-part-recipe binding in the spec.
            BuildingKind::RocketSilo => Ok(launch_rate(spec)?.part),
            BuildingKind::RocketLaunch => Ok(launch_rate(spec)?.launch),
        }
    }

    /// Number of buildings needed to hit `target` crafts per second.
    pub fn count(
        &self,
        spec: &FactorySpec,
        recipe: &Recipe,
        target: &Rational,
    ) -> Result<Rational, CalcError> {
        target.div(&self.recipe_rate(spec, recipe)?)
    }
}

/// The jointly derived rates of the launch pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRate {
    /// Rocket parts per second.
    pub part: Rational,
    /// Launches per second.
    pub launch: Rational,
}

/// Solve the production-and-timing relationship for the rocket silo: a
/// launch requires accumulating a fixed number of rocket parts at the
/// part factory's base rate, then waiting out the launch sequence.
///
/// Requires the part recipe, part item, and a recipe-to-building binding
/// to be present in the spec; fails with `NotFound` otherwise.
pub fn launch_rate(spec: &FactorySpec) -> Result<LaunchRate, CalcError> {
    let part_recipe = spec.recipe(consts::ROCKET_PART)?;
    let part_factory = spec.building_for(part_recipe)?;
    let part_item = spec.item(consts::ROCKET_PART)?;
    let gives = part_recipe.gives(part_item);
    // The rate at which the assigned silo makes rocket parts.
    let base = part_factory.base_recipe_rate(spec, part_recipe)?;
    // Crafts of the part recipe per launch.
    let per_launch = consts::rocket_parts_per_launch().div(&gives)?;
    // Full cycle: accumulate the parts, then the launch sequence.
    let time = per_launch.div(&base)?.add(&consts::rocket_launch_duration());
    Ok(LaunchRate {
        part: per_launch.div(&time)?,
        launch: time.reciprocate()?,
    })
}
