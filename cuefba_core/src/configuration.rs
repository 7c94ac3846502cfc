//! Global defaults shared by model construction and optimization
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::{LazyLock, RwLock};

/// Environment variable used to locate the directory of COBRA JSON models
pub const MODEL_DIRECTORY_ENV: &str = "CUEFBA_MODEL_DIR";

pub static CONFIGURATION: LazyLock<RwLock<Configuration>> =
    LazyLock::new(|| RwLock::new(Configuration::default()));

#[derive(Clone, Debug)]
pub struct Configuration {
    /// Lower bound given to reactions which don't specify one
    pub lower_bound: f64,
    /// Upper bound given to reactions which don't specify one
    pub upper_bound: f64,
    /// Feasibility tolerance passed to the solver
    pub tolerance: f64,
    /// Solver used by [`Model::optimize`](crate::metabolic_model::model::Model::optimize)
    pub solver: SolverKind,
    /// Directory searched by [`load_model`](crate::io::repository::load_model)
    pub model_directory: PathBuf,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            lower_bound: -1000.,
            upper_bound: 1000.,
            tolerance: 1e-07,
            solver: SolverKind::Clarabel,
            model_directory: std::env::var_os(MODEL_DIRECTORY_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("models")),
        }
    }
}

/// Enum used to specify the default solver to use
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolverKind {
    /// Use the Clarabel interior point solver
    Clarabel,
    /// Use the microlp simplex solver, requires the microlp feature to be enabled
    #[cfg(feature = "microlp")]
    Microlp,
}

impl FromStr for SolverKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "clarabel" => Ok(SolverKind::Clarabel),
            #[cfg(feature = "microlp")]
            "microlp" => Ok(SolverKind::Microlp),
            other => Err(format!("Unknown or disabled solver {other}")),
        }
    }
}

/// Read a copy of the current global configuration
pub fn current() -> Configuration {
    match CONFIGURATION.read() {
        Ok(guard) => guard.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

/// Point the global configuration at a different model directory
pub fn set_model_directory<P: Into<PathBuf>>(directory: P) {
    let mut guard = match CONFIGURATION.write() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    guard.model_directory = directory.into();
}

/// Select the solver used by models created from now on
pub fn set_solver(solver: SolverKind) {
    let mut guard = match CONFIGURATION.write() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    guard.solver = solver;
}
