pub mod adapter;
pub mod clock;
pub mod commands;
pub mod engine;
pub mod source;
pub mod thread;
