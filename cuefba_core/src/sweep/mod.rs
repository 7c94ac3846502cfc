//! Parameter sweeps of flux balance analysis over medium and maintenance bounds
pub mod config;
pub mod driver;
pub mod grid;
pub mod table;

pub use config::{ConfigError, SweepConfig, SweepReactions};
pub use driver::{
    carbon_sweep, maintenance_sweep, nitrogen_sweep, run_sweeps, with_fresh_model, SweepError,
};
pub use grid::{arange, linspace, Grid};
pub use table::{
    CarbonRecord, MaintenanceRecord, NitrogenRecord, Record, ResultTable, SweepResults,
};
