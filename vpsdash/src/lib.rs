//! Terminal client for the VPS-on-phone dashboard API.

pub mod api;
pub mod app;
pub mod command;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod logging;
pub mod notifier;
pub mod render;
pub mod scheduler;
pub mod screen;
pub mod stores;
pub mod types;
pub mod ui;
