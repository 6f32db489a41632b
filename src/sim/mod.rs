/// Sampling clock for the control loop.
pub mod clock;
/// Time-scheduled (P, Q) signal coordinator.
pub mod coordinator;
/// Simulation engine boundary and its errors.
pub mod driver;
pub mod engine;
/// In-process engine stand-in.
pub mod recording;
pub mod report;
pub mod types;
