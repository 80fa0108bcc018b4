//! Utility modules shared by the pipeline stages.

pub mod exec;
pub mod mime;
pub mod path;
pub mod plural;
