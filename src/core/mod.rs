pub mod saver;
pub mod sections;

pub use crate::domain::model::{
    OverflowPolicy, SaveReport, SectionFailure, SectionName, SectionTable, TextFile,
    DEFAULT_FILE_NAME, TEXT_PLAIN, TEXT_PLAIN_UTF8,
};
pub use crate::domain::ports::Delivery;
pub use crate::utils::error::Result;
