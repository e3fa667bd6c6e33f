//! Randomised what-if estimates layered on top of a signal: the projected
//! profit refreshed by the runner, and simulated forward candles.
//!
//! Unlike the strategies these are not pure; every entry point takes the RNG
//! it draws from.

pub mod projector;
pub mod simulate;
pub mod volatility;

pub use projector::{clamp_to_bracket, profit_on_stake, Projection, Projector};
pub use simulate::simulate_candles;
pub use volatility::{return_volatility, DEFAULT_VOLATILITY};
