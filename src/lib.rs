pub mod macros;

pub mod audio;
pub mod config;
pub mod control;
pub mod engine;
pub mod events;
pub mod source;
pub mod sys;
pub mod wheel;

#[cfg(feature = "gui")]
pub mod gui;
