pub mod analytics;
pub mod app;
pub mod config;
pub mod events;
pub mod input;
pub mod logging;
pub mod player;
pub mod ui;
pub mod widget;
