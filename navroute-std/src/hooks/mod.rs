//! Standard hook implementations and the registry that orders them.

pub mod logging;
pub mod registry;

pub use logging::LoggingHook;
pub use registry::{Registry, RegistryBuilder};
