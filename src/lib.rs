pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{HttpUpload, LocalDirectory, MemoryDelivery};
pub use config::toml_config::SaverConfig;
pub use crate::core::{
    saver::TextSaver,
    sections::{file_name_for, SectionSaver},
    Delivery, OverflowPolicy, SaveReport, SectionName, SectionTable, TextFile,
};
pub use utils::error::{Result, SaveError};
