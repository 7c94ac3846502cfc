//! Run the nitrogen, carbon and maintenance sweeps over a metabolic model and save the results
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use cuefba_core::configuration::{self, SolverKind};
use cuefba_core::io::repository::load_model;
use cuefba_core::io::results::{write_csv_tables, write_results, DEFAULT_RESULTS_PATH};
use cuefba_core::sweep::{run_sweeps, SweepConfig};

#[derive(Parser, Debug)]
#[command(name = "cuefba")]
#[command(version)]
#[command(about = "Carbon use efficiency of flux balance analysis across nitrogen, carbon and maintenance sweeps")]
struct Args {
    /// Name of the model, read from <model-dir>/<model>.json
    #[arg(short, long, default_value = "iJO1366")]
    model: String,

    /// Directory holding COBRA JSON models, overrides CUEFBA_MODEL_DIR
    #[arg(long)]
    model_dir: Option<PathBuf>,

    /// TOML file with the sweep grids and reaction ids
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where to write the bincode encoded results
    #[arg(short, long, default_value = DEFAULT_RESULTS_PATH)]
    output: PathBuf,

    /// Also write one CSV file per table into this directory
    #[arg(long)]
    csv_dir: Option<PathBuf>,

    /// LP solver, clarabel or (with the microlp feature) microlp
    #[arg(long, default_value = "clarabel")]
    solver: SolverKind,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => SweepConfig::from_file(path)
            .with_context(|| format!("Failed to load sweep configuration {}", path.display()))?,
        None => SweepConfig::default(),
    };

    configuration::set_solver(args.solver);
    if let Some(dir) = &args.model_dir {
        configuration::set_model_directory(dir);
    }
    let model =
        load_model(&args.model).with_context(|| format!("Failed to load model {}", args.model))?;

    let results = run_sweeps(&model, &config).context("Sweep failed")?;
    info!(
        "Collected {} nitrogen, {} carbon and {} maintenance records",
        results.nitrogen.len(),
        results.carbon.len(),
        results.maintenance.len()
    );

    write_results(&args.output, &results)
        .with_context(|| format!("Failed to write results to {}", args.output.display()))?;
    if let Some(dir) = &args.csv_dir {
        write_csv_tables(dir, &results)
            .with_context(|| format!("Failed to write CSV tables to {}", dir.display()))?;
    }
    Ok(())
}
