pub mod client;
pub mod config;
pub mod error;
pub mod form;
pub mod models;
pub mod navigation;
pub mod render;
pub mod screens;
pub mod shell;
pub mod snackbar;
pub mod state;
