pub mod chooser;
pub mod config;
pub mod engine;
pub mod events;
pub mod view;
