use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
	pub data_dir: PathBuf,
	pub models_dir: PathBuf,
	pub registry_path: PathBuf,
}

impl Config {
	pub fn new() -> crate::error::Result<Self> {
		let project_dirs = ProjectDirs::from("", "", "mxzoo")
			.ok_or_else(|| crate::error::Error::ConfigError("Could not determine config directory".to_string()))?;

		let data_dir = project_dirs.data_dir().to_path_buf();
		Self::at(data_dir)
	}

	pub fn from_env() -> crate::error::Result<Self> {
		if let Ok(data_dir) = std::env::var("MXZOO_DATA_DIR") {
			Self::at(PathBuf::from(data_dir))
		} else {
			Self::new()
		}
	}

	/// Root all cache paths under `data_dir`, creating the directories.
	pub fn at(data_dir: PathBuf) -> crate::error::Result<Self> {
		let models_dir = data_dir.join("models");
		let registry_path = data_dir.join("models.toml");

		std::fs::create_dir_all(&data_dir)?;
		std::fs::create_dir_all(&models_dir)?;

		Ok(Self {
			data_dir,
			models_dir,
			registry_path,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn at_creates_cache_layout() {
		let tmp = tempfile::tempdir().unwrap();
		let root = tmp.path().join("zoo");
		let config = Config::at(root.clone()).unwrap();

		assert!(config.data_dir.is_dir());
		assert!(config.models_dir.is_dir());
		assert_eq!(config.models_dir, root.join("models"));
		assert_eq!(config.registry_path, root.join("models.toml"));
	}
}
