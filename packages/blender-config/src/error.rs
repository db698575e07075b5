pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Failed to read config file at {path:?}.")]
	ReadConfig { path: std::path::PathBuf, source: std::io::Error },
	#[error("Failed to parse config file at {path:?}.")]
	ParseConfig { path: std::path::PathBuf, source: toml::de::Error },
	#[error("{message}")]
	Validation { message: String },
}

/// Rejection of a single `blending.adaptive_block_sizes` rule.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AdaptiveBlockSizeError {
	#[error("Invalid adaptive block size {rule:?}: expected \"from-to:size\".")]
	Malformed { rule: String },
	#[error("Invalid adaptive block size {rule:?}: size must be greater than zero.")]
	ZeroSize { rule: String },
	#[error("Invalid adaptive block size {rule:?}: range start exceeds range end.")]
	InvertedRange { rule: String },
}
