//! Plain-text rendering of building attributes
//!
//! The tooltip layout is picked by the building's `TooltipStyle` tag:
//! synthetic catalog entries show only their name, everything else gets
//! the full attribute listing.

use crate::building::{Building, BuildingKind, TooltipStyle};
use crate::rational::Rational;

/// Scale a wattage for display: `(value, suffix)` in W, kW, or MW.
pub fn power_repr(power: &Rational) -> (Rational, &'static str) {
    let kilo = Rational::from_integer(1_000);
    let mega = Rational::from_integer(1_000_000);
    if power.less(&kilo) {
        (power.clone(), "W")
    } else if power.less(&mega) {
        (power.mul(&Rational::from_fraction(1, 1_000)), "kW")
    } else {
        (power.mul(&Rational::from_fraction(1, 1_000_000)), "MW")
    }
}

/// Render a building's tooltip text.
pub fn tooltip(building: &Building) -> String {
    match building.tooltip {
        TooltipStyle::NameOnly => building.name.clone(),
        TooltipStyle::Full => {
            let (power, suffix) = power_repr(&building.power);
            let mut out = String::new();
            out.push_str(&building.name);
            out.push('\n');
            out.push_str(&format!(
                "Energy consumption: {} {}\n",
                power.to_decimal(0),
                suffix
            ));
            match &building.kind {
                BuildingKind::Miner { mining_speed } => {
                    out.push_str(&format!("Mining speed: {}\n", mining_speed.to_decimal(3)));
                }
                _ => {
                    out.push_str(&format!(
                        "Crafting speed: {}\n",
                        building.speed.to_decimal(3)
                    ));
                }
            }
            out.push_str(&format!("Module slots: {}", building.module_slots));
            out
        }
    }
}
