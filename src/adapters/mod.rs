// Adapters layer: concrete delivery targets for the Delivery port.

pub mod fs;
pub mod http;
pub mod memory;

pub use fs::LocalDirectory;
pub use http::HttpUpload;
pub use memory::MemoryDelivery;
