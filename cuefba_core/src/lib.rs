//! Core rust implementation of cuefba, a crate for sweeping flux balance analysis over
//! genome-scale metabolic models and summarizing each optimum as carbon use efficiency.

pub mod carbon;
pub mod configuration;
pub mod io;
pub mod metabolic_model;
pub mod optimize;
pub mod sweep;
mod utils;
