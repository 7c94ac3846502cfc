//! Carbon bookkeeping on flux balance solutions
//!
//! [`exchange`] finds the exchange reactions that move carbon across the system boundary and
//! [`efficiency`] turns the fluxes through them into carbon use efficiency (CUE) and gross growth
//! efficiency (GGE).
pub mod efficiency;
pub mod exchange;

pub use efficiency::{
    calculate_cue, calculate_cue_with_co2, calculate_gge, calculate_gge_with_co2, carbon_fates,
    carbon_fates_with_co2, carbon_fates_with_tolerance, CarbonFates,
};
pub use exchange::{atom_exchange_metabolites, carbon_exchange_reactions, CarbonExchanges};

/// Exchange reaction releasing CO2 in BiGG namespace models
pub const DEFAULT_CO2_EXCHANGE: &str = "EX_co2_e";
