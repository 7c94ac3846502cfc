//! Small helpers shared across the crate
pub(crate) mod formula;
pub(crate) mod hashing;
