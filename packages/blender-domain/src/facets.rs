use std::{
	collections::{BTreeMap, HashMap},
	sync::LazyLock,
};

use regex::Regex;

use blender_config::{Config, FacetField, FacetType};

/// Hierarchy levels rolled up per value; deeper keys only propagate this far.
pub const MAX_HIERARCHY_DEPTH: usize = 32;

/// `(value, count)` pairs, serialized Solr-style as `[value, count]`.
pub type FacetCounts = Vec<(String, u64)>;
/// Facet field name to its value counts.
pub type FacetFields = BTreeMap<String, FacetCounts>;

static HIERARCHICAL_KEY: LazyLock<Option<Regex>> =
	LazyLock::new(|| Regex::new(r"^\d+/.+/$").ok());

/// How one primary facet field is fed from the secondary source's vocabulary.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FacetFieldMapping {
	pub field: String,
	pub secondary: String,
	pub facet_type: FacetType,
	pub values: BTreeMap<String, String>,
}
impl FacetFieldMapping {
	pub fn new(
		field: impl Into<String>,
		secondary: impl Into<String>,
		facet_type: FacetType,
	) -> Self {
		Self {
			field: field.into(),
			secondary: secondary.into(),
			facet_type,
			values: BTreeMap::new(),
		}
	}

	pub fn with_value(mut self, secondary: impl Into<String>, primary: impl Into<String>) -> Self {
		self.values.insert(secondary.into(), primary.into());

		self
	}

	pub fn from_field(field: &str, cfg: &FacetField) -> Self {
		Self {
			field: field.to_string(),
			secondary: cfg.secondary.clone(),
			facet_type: cfg.facet_type,
			values: cfg.values.clone(),
		}
	}

	pub fn all_from_config(cfg: &Config) -> Vec<Self> {
		cfg.facets.iter().map(|(field, facet)| Self::from_field(field, facet)).collect()
	}

	/// Translates a secondary value into the primary vocabulary, or `None` to drop it.
	fn map_value(&self, value: &str) -> Option<String> {
		let mapped = match (self.values.get(value), self.facet_type) {
			(Some(mapped), FacetType::Boolean) => bool_token(mapped).to_string(),
			(Some(mapped), _) => mapped.clone(),
			(None, FacetType::Boolean) => return None,
			(None, _) => value.to_string(),
		};

		if self.facet_type == FacetType::Hierarchical && !is_hierarchical_key(&mapped) {
			return Some(format!("0/{mapped}/"));
		}

		Some(mapped)
	}
}

/// Folds secondary facet counts into the primary fields named by `mappings`.
///
/// Mapped fields with counts on the secondary side are re-sorted by descending count. Every
/// other primary field, including mapped fields with no secondary counts, is returned as is.
pub fn merge_facets(
	mut primary: FacetFields,
	secondary: &FacetFields,
	mappings: &[FacetFieldMapping],
) -> FacetFields {
	for mapping in mappings {
		let Some(incoming) = secondary.get(&mapping.secondary).filter(|counts| !counts.is_empty())
		else {
			continue;
		};
		let existing = primary.remove(&mapping.field).unwrap_or_default();
		let mut counts = ValueCounts::from_pairs(existing);

		for (value, count) in incoming {
			let Some(mapped) = mapping.map_value(value) else { continue };
			let ancestors = match mapping.facet_type {
				FacetType::Hierarchical => ancestor_keys(&mapped),
				_ => Vec::new(),
			};

			counts.add(mapped, *count);

			for ancestor in ancestors {
				counts.add(ancestor, *count);
			}
		}

		primary.insert(mapping.field.clone(), counts.into_sorted());
	}

	primary
}

/// Keys of every ancestor of a hierarchical key, nearest first.
///
/// `"2/a/b/c/"` yields `"1/a/b/"` then `"0/a/"`.
pub fn ancestor_keys(key: &str) -> Vec<String> {
	let Some((level, path)) = key.strip_suffix('/').and_then(|key| key.split_once('/')) else {
		return Vec::new();
	};
	let Ok(level) = level.parse::<usize>() else {
		return Vec::new();
	};
	let segments: Vec<&str> = path.split('/').collect();

	(0..level.min(MAX_HIERARCHY_DEPTH))
		.rev()
		.map(|depth| {
			let prefix = &segments[..(depth + 1).min(segments.len())];

			format!("{depth}/{}/", prefix.join("/"))
		})
		.collect()
}

/// Whether `value` already has the `"{level}/{path}/"` shape.
pub fn is_hierarchical_key(value: &str) -> bool {
	HIERARCHICAL_KEY.as_ref().map(|re| re.is_match(value)).unwrap_or(false)
}

fn bool_token(value: &str) -> &'static str {
	if matches!(value.trim(), "" | "0" | "false") { "false" } else { "true" }
}

/// Value counts that remember first-seen order so equal counts keep it after sorting.
#[derive(Default)]
struct ValueCounts {
	pairs: FacetCounts,
	index: HashMap<String, usize>,
}
impl ValueCounts {
	fn from_pairs(pairs: FacetCounts) -> Self {
		let mut counts = Self::default();

		for (value, count) in pairs {
			counts.add(value, count);
		}

		counts
	}

	fn add(&mut self, value: String, count: u64) {
		match self.index.get(&value) {
			Some(idx) => self.pairs[*idx].1 += count,
			None => {
				self.index.insert(value.clone(), self.pairs.len());
				self.pairs.push((value, count));
			},
		}
	}

	fn into_sorted(mut self) -> FacetCounts {
		self.pairs.sort_by(|lhs, rhs| rhs.1.cmp(&lhs.1));

		self.pairs
	}
}
