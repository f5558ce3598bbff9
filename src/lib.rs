pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::AwsCatalogClient;
pub use config::{cli::Cli, AppConfig};
pub use domain::ports::CatalogClient;
pub use utils::error::{MpError, Result};
