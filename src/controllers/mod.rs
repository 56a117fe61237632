pub mod auth;
pub mod content;
pub mod git;
pub mod health;
