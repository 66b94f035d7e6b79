//! Demo scenarios for the border catalog.
//!
//! Each scenario is a self-contained module that wires real components
//! together (catalog, shift engine, offline content source, save store) and
//! walks one gameplay situation end to end, printing each step.

pub mod clean_shift;
pub mod forged_documents;
pub mod tampered_save;
