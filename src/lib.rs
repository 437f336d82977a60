pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::LocalStorage;
pub use crate::app::export::BillExporter;
pub use crate::config::SessionConfig;
pub use crate::core::{
    aggregator::BillAggregator, engine::SplitEngine, ids::IdGenerator, parser::MenuParser,
    session::BillSession, upload::Uploader,
};
pub use crate::utils::error::{Result, SplitError};
