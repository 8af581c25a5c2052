mod models;
mod probe;
mod registry;
mod response;

pub use models::{CompositeResult, ProbeResult, Status};
pub use probe::Probe;
pub use registry::{ProbeRegistry, RegistryError};
