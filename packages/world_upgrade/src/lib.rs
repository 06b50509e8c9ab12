//! Batch upgrade of stored world records to the current data version.

#[macro_use]
extern crate tracing;

pub mod logging;
pub mod settings;
pub mod batch;
