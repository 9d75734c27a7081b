//! Data Models
//!
//! Serializable types shared by the services and the CLI.

pub mod analysis;
pub mod dashboard;
pub mod settings;

pub use analysis::*;
pub use dashboard::*;
pub use settings::*;
