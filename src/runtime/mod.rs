//! Session orchestration and the id registry.

pub mod registry;
pub mod session;

pub use registry::IdRegistry;
pub use session::Session;
