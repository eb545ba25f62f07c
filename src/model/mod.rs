pub mod downloader;
pub mod registry;

pub use downloader::ModelDownloader;
pub use registry::{ModelInfo, ModelRegistry};
