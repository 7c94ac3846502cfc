//! Module for reading and writing Models and sweep results
pub mod json;
pub mod repository;
pub mod results;
