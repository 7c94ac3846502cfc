//! Loading models by name from a directory of COBRA JSON files
use std::path::{Path, PathBuf};

use log::info;
use thiserror::Error;

use crate::configuration;
use crate::io::json::JsonError;
use crate::metabolic_model::model::Model;

/// Load the model `<name>.json` from the configured model directory
///
/// The directory is taken from [`configuration::current`], which defaults to the
/// `CUEFBA_MODEL_DIR` environment variable or `models`.
pub fn load_model(name: &str) -> Result<Model, ModelLoadError> {
    let directory = configuration::current().model_directory;
    load_model_from(directory, name)
}

/// Load the model `<name>.json` from `directory`
pub fn load_model_from<P: AsRef<Path>>(directory: P, name: &str) -> Result<Model, ModelLoadError> {
    let path = model_path(directory.as_ref(), name);
    if !path.is_file() {
        return Err(ModelLoadError::NotFound {
            name: name.to_string(),
            directory: directory.as_ref().to_path_buf(),
        });
    }
    let model = Model::read_json(&path)?;
    info!(
        "Loaded model {} ({} reactions, {} metabolites) from {}",
        name,
        model.reactions.len(),
        model.metabolites.len(),
        path.display()
    );
    Ok(model)
}

fn model_path(directory: &Path, name: &str) -> PathBuf {
    directory.join(format!("{name}.json"))
}

#[derive(Error, Debug)]
pub enum ModelLoadError {
    #[error("No model named {name} in {}", directory.display())]
    NotFound { name: String, directory: PathBuf },
    #[error("Unable to read model: {0}")]
    Json(#[from] JsonError),
}
