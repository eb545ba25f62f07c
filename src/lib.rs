//! A pretrained model zoo: named loader handles over a single remote
//! artifact repository, with local download caching and an index of
//! installed models.

pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod repository;
pub mod zoo;

pub use config::Config;
pub use error::{Error, Result};
pub use repository::Repository;
pub use zoo::{ModelFamily, ModelLoader, ModelZoo};
