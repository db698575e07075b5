use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::Deserialize;

use crate::AdaptiveBlockSizeError;

pub const DEFAULT_BLOCK_SIZE: u32 = 10;

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub sources: Sources,
	#[serde(default)]
	pub blending: Blending,
	/// Keyed by the primary facet field name.
	#[serde(default)]
	pub facets: BTreeMap<String, FacetField>,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Sources {
	pub primary: Source,
	pub secondary: Source,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Source {
	pub id: String,
	/// Optional. Shown to users in source badges and partial failure notices.
	pub label: Option<String>,
}
impl Source {
	pub fn display_name(&self) -> &str {
		self.label.as_deref().unwrap_or(&self.id)
	}
}

#[derive(Debug, Deserialize)]
pub struct Blending {
	#[serde(default = "default_block_size")]
	pub block_size: u32,
	/// Optional. Defaults to `block_size`, which leaves block alternation untouched.
	pub boost_position: Option<u32>,
	#[serde(default)]
	pub boost_count: u32,
	#[serde(default)]
	pub adaptive_block_sizes: Vec<AdaptiveBlockSize>,
}
impl Default for Blending {
	fn default() -> Self {
		Self {
			block_size: DEFAULT_BLOCK_SIZE,
			boost_position: None,
			boost_count: 0,
			adaptive_block_sizes: Vec::new(),
		}
	}
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum FacetType {
	#[default]
	Plain,
	Boolean,
	Hierarchical,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FacetField {
	/// Facet field name in the secondary source's vocabulary.
	pub secondary: String,
	#[serde(default, rename = "type")]
	pub facet_type: FacetType,
	/// Secondary value token to primary value token.
	#[serde(default)]
	pub values: BTreeMap<String, String>,
}

/// Block size override for combined result totals within `from..=to`.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(try_from = "String")]
pub struct AdaptiveBlockSize {
	pub from: u64,
	pub to: u64,
	pub size: u32,
}
impl AdaptiveBlockSize {
	pub fn contains(&self, total: u64) -> bool {
		self.from <= total && total <= self.to
	}
}
impl FromStr for AdaptiveBlockSize {
	type Err = AdaptiveBlockSizeError;

	fn from_str(rule: &str) -> Result<Self, Self::Err> {
		let malformed = || AdaptiveBlockSizeError::Malformed { rule: rule.to_string() };
		let (range, size) = rule.split_once(':').ok_or_else(malformed)?;
		let size: u32 = size.trim().parse().map_err(|_| malformed())?;

		if size == 0 {
			return Err(AdaptiveBlockSizeError::ZeroSize { rule: rule.to_string() });
		}

		let (from, to) = range.split_once('-').ok_or_else(malformed)?;
		let from: u64 = from.trim().parse().map_err(|_| malformed())?;
		let to: u64 = to.trim().parse().map_err(|_| malformed())?;

		if from > to {
			return Err(AdaptiveBlockSizeError::InvertedRange { rule: rule.to_string() });
		}

		Ok(Self { from, to, size })
	}
}
impl TryFrom<String> for AdaptiveBlockSize {
	type Error = AdaptiveBlockSizeError;

	fn try_from(rule: String) -> Result<Self, Self::Error> {
		rule.parse()
	}
}
impl fmt::Display for AdaptiveBlockSize {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}-{}:{}", self.from, self.to, self.size)
	}
}

fn default_block_size() -> u32 {
	DEFAULT_BLOCK_SIZE
}
