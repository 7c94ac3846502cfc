//! Carbon use efficiency and gross growth efficiency of a flux distribution
use serde::{Deserialize, Serialize};

use crate::carbon::exchange::CarbonExchanges;
use crate::carbon::DEFAULT_CO2_EXCHANGE;
use crate::configuration;
use crate::metabolic_model::solution::Solution;

/// Where the carbon taken up by the system ends up, in carbon atoms per unit time
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CarbonFates {
    /// Carbon entering through any exchange
    pub uptake: f64,
    /// Carbon leaving as CO2
    pub respired: f64,
    /// Carbon leaving through any other exchange
    pub excreted: f64,
    /// Carbon retained, `uptake - respired - excreted`
    pub biomass: f64,
}

impl CarbonFates {
    fn undefined() -> Self {
        CarbonFates {
            uptake: f64::NAN,
            respired: f64::NAN,
            excreted: f64::NAN,
            biomass: f64::NAN,
        }
    }

    /// Carbon retained per carbon assimilated, `biomass / (biomass + respired)`
    ///
    /// NaN when no carbon is taken up.
    pub fn cue(&self) -> f64 {
        if self.uptake.is_nan() || self.uptake <= 0. {
            return f64::NAN;
        }
        self.biomass / (self.biomass + self.respired)
    }

    /// Carbon retained per carbon taken up, `biomass / uptake`
    ///
    /// NaN when no carbon is taken up.
    pub fn gge(&self) -> f64 {
        if self.uptake.is_nan() || self.uptake <= 0. {
            return f64::NAN;
        }
        self.biomass / self.uptake
    }
}

/// Partition the carbon flux of a solution into uptake, respiration, excretion and biomass
///
/// Exchange fluxes within the configured solver tolerance of zero are treated as zero. Solutions
/// without fluxes (infeasible, unbounded) give NaN everywhere.
pub fn carbon_fates_with_co2(
    solution: &Solution,
    exchanges: &CarbonExchanges,
    co2_exchange: &str,
) -> CarbonFates {
    let tolerance = configuration::current().tolerance;
    carbon_fates_with_tolerance(solution, exchanges, co2_exchange, tolerance)
}

/// [`carbon_fates_with_co2`] with an explicit zero flux tolerance
pub fn carbon_fates_with_tolerance(
    solution: &Solution,
    exchanges: &CarbonExchanges,
    co2_exchange: &str,
    tolerance: f64,
) -> CarbonFates {
    if !solution.status().has_values() {
        return CarbonFates::undefined();
    }
    let mut fates = CarbonFates {
        uptake: 0.,
        respired: 0.,
        excreted: 0.,
        biomass: 0.,
    };
    for (id, atoms) in exchanges.iter() {
        let flux = solution.flux(id);
        if flux.abs() <= tolerance {
            continue;
        }
        let carbon = flux * atoms;
        if carbon < 0. {
            fates.uptake -= carbon;
        } else if id == co2_exchange {
            fates.respired += carbon;
        } else {
            fates.excreted += carbon;
        }
    }
    fates.biomass = fates.uptake - fates.respired - fates.excreted;
    fates
}

/// [`carbon_fates_with_co2`] using `EX_co2_e` as the CO2 exchange
pub fn carbon_fates(solution: &Solution, exchanges: &CarbonExchanges) -> CarbonFates {
    carbon_fates_with_co2(solution, exchanges, DEFAULT_CO2_EXCHANGE)
}

/// Carbon use efficiency of a solution, see [`CarbonFates::cue`]
pub fn calculate_cue(solution: &Solution, exchanges: &CarbonExchanges) -> f64 {
    carbon_fates(solution, exchanges).cue()
}

/// Carbon use efficiency with an explicit CO2 exchange
pub fn calculate_cue_with_co2(
    solution: &Solution,
    exchanges: &CarbonExchanges,
    co2_exchange: &str,
) -> f64 {
    carbon_fates_with_co2(solution, exchanges, co2_exchange).cue()
}

/// Gross growth efficiency of a solution, see [`CarbonFates::gge`]
pub fn calculate_gge(solution: &Solution, exchanges: &CarbonExchanges) -> f64 {
    carbon_fates(solution, exchanges).gge()
}

/// Gross growth efficiency with an explicit CO2 exchange
pub fn calculate_gge_with_co2(
    solution: &Solution,
    exchanges: &CarbonExchanges,
    co2_exchange: &str,
) -> f64 {
    carbon_fates_with_co2(solution, exchanges, co2_exchange).gge()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimize::OptimizationStatus;
    use indexmap::IndexMap;

    fn exchanges() -> CarbonExchanges {
        let mut atoms = IndexMap::new();
        atoms.insert("EX_glc__D_e".to_string(), 6.);
        atoms.insert("EX_co2_e".to_string(), 1.);
        atoms.insert("EX_ac_e".to_string(), 2.);
        CarbonExchanges::new("C", atoms)
    }

    fn solution(glc: f64, co2: f64, ac: f64) -> Solution {
        let mut fluxes = IndexMap::new();
        fluxes.insert("EX_glc__D_e".to_string(), glc);
        fluxes.insert("EX_co2_e".to_string(), co2);
        fluxes.insert("EX_ac_e".to_string(), ac);
        fluxes.insert("BIOMASS".to_string(), 0.5);
        Solution::from_fluxes(0.5, fluxes)
    }

    #[test]
    fn fates_with_overflow() {
        // 60 carbon in, 20 respired, 10 excreted as acetate
        let sol = solution(-10., 20., 5.);
        let fates = carbon_fates(&sol, &exchanges());
        assert!((fates.uptake - 60.).abs() < 1e-12);
        assert!((fates.respired - 20.).abs() < 1e-12);
        assert!((fates.excreted - 10.).abs() < 1e-12);
        assert!((fates.biomass - 30.).abs() < 1e-12);
        assert!((calculate_cue(&sol, &exchanges()) - 0.6).abs() < 1e-12);
        assert!((calculate_gge(&sol, &exchanges()) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn cue_equals_gge_without_excretion() {
        let sol = solution(-10., 30., 0.);
        let cue = calculate_cue(&sol, &exchanges());
        let gge = calculate_gge(&sol, &exchanges());
        assert!((cue - 0.5).abs() < 1e-12);
        assert!((cue - gge).abs() < 1e-12);
    }

    #[test]
    fn explicit_co2_exchange() {
        // Treating acetate as the respired product swaps the roles
        let sol = solution(-10., 20., 5.);
        let cue = calculate_cue_with_co2(&sol, &exchanges(), "EX_ac_e");
        assert!((cue - 30. / 40.).abs() < 1e-12);
        let gge = calculate_gge_with_co2(&sol, &exchanges(), "EX_ac_e");
        assert!((gge - 0.5).abs() < 1e-12);
    }

    #[test]
    fn no_uptake_is_nan() {
        let sol = solution(0., 0., 0.);
        assert!(calculate_cue(&sol, &exchanges()).is_nan());
        assert!(calculate_gge(&sol, &exchanges()).is_nan());
    }

    #[test]
    fn round_off_fluxes_are_zero() {
        // A starved optimum where every exchange carries only round-off
        let sol = solution(-7.1e-14, 9.9e-14, 3.0e-14);
        let fates = carbon_fates(&sol, &exchanges());
        assert_eq!(fates.uptake, 0.);
        assert_eq!(fates.respired, 0.);
        assert!(calculate_cue(&sol, &exchanges()).is_nan());
        assert!(calculate_gge(&sol, &exchanges()).is_nan());
    }

    #[test]
    fn explicit_tolerance() {
        let sol = solution(-1e-4, 3e-4, 0.);
        let fates = carbon_fates_with_tolerance(&sol, &exchanges(), DEFAULT_CO2_EXCHANGE, 1e-3);
        assert!(fates.cue().is_nan());
        let fates = carbon_fates_with_tolerance(&sol, &exchanges(), DEFAULT_CO2_EXCHANGE, 1e-9);
        assert!((fates.uptake - 6e-4).abs() < 1e-12);
        assert!((fates.cue() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn degenerate_solution_is_nan() {
        let sol = Solution::degenerate(OptimizationStatus::Infeasible);
        let fates = carbon_fates(&sol, &exchanges());
        assert!(fates.uptake.is_nan());
        assert!(calculate_cue(&sol, &exchanges()).is_nan());
        assert!(calculate_gge(&sol, &exchanges()).is_nan());
    }
}
