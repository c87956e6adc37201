pub mod api;
pub mod commands;
pub mod config;
pub mod credentials;
pub mod error;
pub mod stay;

use clap::ValueEnum;
use serde::Serialize;

#[derive(Clone, Copy, ValueEnum, Debug, Default, Serialize)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
