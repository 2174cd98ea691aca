//! Data models for the translation editor core

pub mod loaded_project;
pub mod project;

pub use loaded_project::*;
pub use project::*;
