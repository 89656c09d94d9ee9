//! Core of the emission inventory processor.
//!
//! Inventory fields are converted to working units, regridded onto a model
//! grid ([`spatial`]), spread over the hours of a representative day
//! ([`temporal`]) and split into the species of a chemical mechanism
//! ([`speciation`]). The [`pipeline`] chains these per sector and pollutant
//! and aggregates the results.

pub mod artifact;
pub mod config;
pub mod grid;
pub mod pipeline;
pub mod registry;
pub mod spatial;
pub mod speciation;
pub mod temporal;
pub mod units;

pub mod errors;

pub use errors::{EmipsError, EmipsResult};
