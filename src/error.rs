use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
	#[error("Model not found: {0}")]
	ModelNotFound(String),

	#[error("Invalid repository URL: {0}")]
	InvalidUrl(String),

	#[error("Metadata error: {0}")]
	Metadata(String),

	#[error("Download failed: {0}")]
	DownloadFailed(String),

	#[error("Checksum mismatch for {file}: expected {expected}, got {actual}")]
	ChecksumMismatch {
		file: String,
		expected: String,
		actual: String,
	},

	#[error("Configuration error: {0}")]
	ConfigError(String),

	#[error("IO error: {0}")]
	IoError(#[from] std::io::Error),

	#[error("Serialization error: {0}")]
	SerializationError(String),
}

impl From<reqwest::Error> for Error {
	fn from(err: reqwest::Error) -> Self {
		Error::DownloadFailed(err.to_string())
	}
}

impl From<serde_json::Error> for Error {
	fn from(err: serde_json::Error) -> Self {
		Error::SerializationError(err.to_string())
	}
}

impl From<toml::de::Error> for Error {
	fn from(err: toml::de::Error) -> Self {
		Error::SerializationError(err.to_string())
	}
}

impl From<toml::ser::Error> for Error {
	fn from(err: toml::ser::Error) -> Self {
		Error::SerializationError(err.to_string())
	}
}

pub type Result<T> = std::result::Result<T, Error>;
