mod app;
mod config;
mod effects;
mod location;
mod ui;

pub use app::run_app;
