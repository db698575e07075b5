mod error;
mod types;

pub use error::{AdaptiveBlockSizeError, Error, Result};
pub use types::{
	AdaptiveBlockSize, Blending, Config, DEFAULT_BLOCK_SIZE, FacetField, FacetType, Service,
	Source, Sources,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.log_level.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.log_level must be non-empty.".to_string(),
		});
	}

	for (label, source) in
		[("sources.primary", &cfg.sources.primary), ("sources.secondary", &cfg.sources.secondary)]
	{
		if source.id.trim().is_empty() {
			return Err(Error::Validation { message: format!("{label}.id must be non-empty.") });
		}
	}

	if cfg.sources.primary.id == cfg.sources.secondary.id {
		return Err(Error::Validation {
			message: "sources.primary.id and sources.secondary.id must differ.".to_string(),
		});
	}
	if cfg.blending.block_size == 0 {
		return Err(Error::Validation {
			message: "blending.block_size must be greater than zero.".to_string(),
		});
	}

	for (field, facet) in &cfg.facets {
		if field.trim().is_empty() {
			return Err(Error::Validation {
				message: "facets keys must be non-empty field names.".to_string(),
			});
		}
		if facet.secondary.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("facets.{field}.secondary must be non-empty."),
			});
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	for source in [&mut cfg.sources.primary, &mut cfg.sources.secondary] {
		if source.label.as_deref().map(|label| label.trim().is_empty()).unwrap_or(false) {
			source.label = None;
		}
	}

	cfg.service.log_level = cfg.service.log_level.trim().to_string();
}
