//! Coordinated ancillary-service control of DERs and flexible loads in a
//! time-domain power-system simulation.

pub mod cli;
pub mod config;
pub mod devices;
/// Telemetry, disturbance-script, and report export.
pub mod io;
/// Control loop, coordinator, and simulation engine boundary.
pub mod sim;
pub mod telemetry;
pub mod translators;
