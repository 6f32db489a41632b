//! Device addressing: classes, parameter changes, and inventory groups.

/// Injector inventory partitioning.
pub mod inventory;
pub mod types;

// Re-export the main types for convenience
pub use inventory::{DeviceGroups, PartitionRules};
pub use types::DeviceClass;
pub use types::DeviceSink;
pub use types::ParameterChange;
