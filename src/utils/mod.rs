//! Utility modules: persistence helpers and logging setup.

pub mod logging;
pub mod persistence;

pub use logging::init_logging;
pub use persistence::PersistError;
