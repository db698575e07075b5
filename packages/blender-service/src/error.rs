pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid configuration: {message}")]
	InvalidConfig { message: String },
	#[error("All search sources failed: {message}")]
	AllSourcesFailed { message: String },
}
impl From<blender_domain::Error> for Error {
	fn from(err: blender_domain::Error) -> Self {
		Self::InvalidConfig { message: err.to_string() }
	}
}

impl From<blender_config::Error> for Error {
	fn from(err: blender_config::Error) -> Self {
		Self::InvalidConfig { message: err.to_string() }
	}
}
