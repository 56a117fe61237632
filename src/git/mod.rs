//! Git integration: subprocess runner plus the publish workflow.

pub mod publisher;
pub mod runner;

pub use publisher::Publisher;
pub use runner::{CommandOutput, GitRunner, SystemGit};
