//! Running the nitrogen, carbon and maintenance sweeps
use log::{debug, info, warn};
use thiserror::Error;

use crate::carbon::{carbon_exchange_reactions, carbon_fates_with_co2, CarbonExchanges};
use crate::metabolic_model::model::{Model, ModelError};
use crate::optimize::solvers::SolverError;
use crate::sweep::config::SweepConfig;
use crate::sweep::table::{
    CarbonRecord, MaintenanceRecord, NitrogenRecord, ResultTable, SweepResults,
};

/// Independent copy of the base model for one sweep
///
/// Bound changes made during a sweep stay in this copy, so no sweep sees the medium another one
/// left behind.
pub fn with_fresh_model(base: &Model) -> Model {
    base.clone()
}

/// Run the nitrogen, carbon and maintenance sweeps, each on a fresh copy of `base`
pub fn run_sweeps(base: &Model, config: &SweepConfig) -> Result<SweepResults, SweepError> {
    let exchanges = carbon_exchange_reactions(base);
    info!("Found {} carbon exchange reactions", exchanges.len());
    if !exchanges.contains(&config.reactions.co2_exchange) {
        warn!(
            "CO2 exchange {} carries no carbon in this model",
            config.reactions.co2_exchange
        );
    }

    let nitrogen = nitrogen_sweep(&mut with_fresh_model(base), &exchanges, config)?;
    let carbon = carbon_sweep(&mut with_fresh_model(base), &exchanges, config)?;
    let maintenance = maintenance_sweep(&mut with_fresh_model(base), &exchanges, config)?;
    Ok(SweepResults {
        nitrogen,
        carbon,
        maintenance,
    })
}

/// Vary the ammonia uptake and the maintenance flux
///
/// Bounds are changed in place on `model`, the last point's bounds remain afterwards.
pub fn nitrogen_sweep(
    model: &mut Model,
    exchanges: &CarbonExchanges,
    config: &SweepConfig,
) -> Result<ResultTable<NitrogenRecord>, SweepError> {
    let reactions = &config.reactions;
    require_reaction(model, &reactions.ammonia_exchange)?;
    require_reaction(model, &reactions.maintenance)?;
    let maintenance_values = config.maintenance.values();

    info!("Starting nitrogen sweep");
    let mut table = ResultTable::new();
    for ammonia in config.ammonia.values() {
        model.set_medium_component(&reactions.ammonia_exchange, ammonia)?;
        for &vm in &maintenance_values {
            model.set_lower_bound(&reactions.maintenance, vm)?;
            let (cue, gge) = evaluate(model, exchanges, &reactions.co2_exchange)?;
            debug!("ammonia={ammonia}, vm={vm}: cue={cue}, gge={gge}");
            table.push(NitrogenRecord {
                ammonia,
                vm,
                cue,
                gge,
            });
        }
    }
    info!("Finished nitrogen sweep, {} points", table.len());
    Ok(table)
}

/// Vary the glucose uptake and the maintenance flux
///
/// Bounds are changed in place on `model`, the last point's bounds remain afterwards.
pub fn carbon_sweep(
    model: &mut Model,
    exchanges: &CarbonExchanges,
    config: &SweepConfig,
) -> Result<ResultTable<CarbonRecord>, SweepError> {
    let reactions = &config.reactions;
    require_reaction(model, &reactions.glucose_exchange)?;
    require_reaction(model, &reactions.maintenance)?;
    let maintenance_values = config.maintenance.values();

    info!("Starting carbon sweep");
    let mut table = ResultTable::new();
    for glc in config.glucose.values() {
        model.set_medium_component(&reactions.glucose_exchange, glc)?;
        for &vm in &maintenance_values {
            model.set_lower_bound(&reactions.maintenance, vm)?;
            let (cue, gge) = evaluate(model, exchanges, &reactions.co2_exchange)?;
            debug!("glc={glc}, vm={vm}: cue={cue}, gge={gge}");
            table.push(CarbonRecord { glc, vm, cue, gge });
        }
    }
    info!("Finished carbon sweep, {} points", table.len());
    Ok(table)
}

/// Vary only the maintenance flux, leaving the medium of `model` as it is
pub fn maintenance_sweep(
    model: &mut Model,
    exchanges: &CarbonExchanges,
    config: &SweepConfig,
) -> Result<ResultTable<MaintenanceRecord>, SweepError> {
    let reactions = &config.reactions;
    require_reaction(model, &reactions.maintenance)?;

    info!("Starting maintenance sweep");
    let mut table = ResultTable::new();
    for vm in config.maintenance.values() {
        model.set_lower_bound(&reactions.maintenance, vm)?;
        let (cue, gge) = evaluate(model, exchanges, &reactions.co2_exchange)?;
        debug!("vm={vm}: cue={cue}, gge={gge}");
        table.push(MaintenanceRecord { vm, cue, gge });
    }
    info!("Finished maintenance sweep, {} points", table.len());
    Ok(table)
}

fn require_reaction(model: &Model, id: &str) -> Result<(), SweepError> {
    match model.reaction(id) {
        Some(_) => Ok(()),
        None => Err(SweepError::MissingReaction(id.to_string())),
    }
}

/// Optimize the current model state and compute its CUE and GGE
fn evaluate(
    model: &Model,
    exchanges: &CarbonExchanges,
    co2_exchange: &str,
) -> Result<(f64, f64), SweepError> {
    let solution = model.optimize()?;
    let fates = carbon_fates_with_co2(&solution, exchanges, co2_exchange);
    Ok((fates.cue(), fates.gge()))
}

#[derive(Error, Debug)]
pub enum SweepError {
    #[error("Reaction {0} is required by the sweep but not in the model")]
    MissingReaction(String),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("Optimization failed: {0}")]
    Solver(#[from] SolverError),
}
