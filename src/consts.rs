//! Fixed design constants used by the rate model and the catalog loader.

use crate::rational::Rational;

/// Recipe and item key for the rocket silo's intermediate product.
pub const ROCKET_PART: &str = "rocket-part";

/// Mining drill excluded from the generic miner model; its rates are
/// fluid-specific and handled elsewhere.
pub const PUMPJACK: &str = "pumpjack";

/// Nominal power is divided by 30 (an assumed idle duty cycle) to get the
/// drain estimate. Stored as the reciprocal so the estimate is a plain
/// multiply.
pub fn drain_factor() -> Rational {
    Rational::from_fraction(1, 30)
}

/// Non-productive portion of a launch cycle, in seconds.
pub fn rocket_launch_duration() -> Rational {
    Rational::from_fraction(2434, 60)
}

/// Rocket parts consumed per launch.
pub fn rocket_parts_per_launch() -> Rational {
    Rational::from_integer(100)
}

/// Boiler energy consumption in watts. Not present in the data dump.
pub fn boiler_energy() -> Rational {
    Rational::from_integer(1_800_000)
}
