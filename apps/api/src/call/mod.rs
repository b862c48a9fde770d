// Call metadata and reference-data matching.
// Pure functions only; no I/O happens in this module.

pub mod filename;
pub mod models;
pub mod phone;
