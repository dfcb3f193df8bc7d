//! Database initialization and persisted settings

pub mod init;
pub mod settings;

pub use init::*;
pub use settings::*;
