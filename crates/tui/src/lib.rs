pub mod cli;
pub mod commands;
pub mod components;
pub mod config;
pub mod tui;

pub use taskboard_core as core;
pub use taskboard_core::model;

pub use taskboard_core::AppConfig;
