//! Factorio Building Rate Calculator
//!
//! Computes effective per-second production rates of Factorio buildings
//! and the building counts needed to hit target throughputs, under exact
//! rational arithmetic end-to-end. The rate model is a closed set of
//! building kinds: crafting machines, mining drills, and the two roles
//! of the rocket silo, whose rate comes from jointly solving the
//! part-production and launch-timing relationship.

pub mod building;
pub mod catalog;
pub mod consts;
pub mod db;
pub mod display;
pub mod error;
pub mod extract;
pub mod factoryspec;
pub mod models;
pub mod rational;

pub use building::{Building, BuildingKind, LaunchRate, TooltipStyle, launch_rate};
pub use error::CalcError;
pub use factoryspec::FactorySpec;
pub use models::{Item, ModuleSpec, Recipe};
pub use rational::Rational;
