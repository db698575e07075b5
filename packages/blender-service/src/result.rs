use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use blender_domain::{FacetFields, SourceKind};

/// Warning tag raised when a source failed but the other still produced results.
pub const PARTIAL_FAILURE: &str = "search_backend_partial_failure";
/// Token in [`PARTIAL_FAILURE`] warnings listing the failed sources' labels.
pub const SOURCES_TOKEN: &str = "%%sources%%";

/// A non-fatal notice shown alongside the blended page.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct BlendWarning {
	pub msg: String,
	#[serde(skip_serializing_if = "BTreeMap::is_empty")]
	pub tokens: BTreeMap<String, String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub details: Option<String>,
}
impl BlendWarning {
	pub fn partial_failure(labels: &[&str]) -> Self {
		Self {
			msg: PARTIAL_FAILURE.to_string(),
			tokens: BTreeMap::from([(SOURCES_TOKEN.to_string(), labels.join(", "))]),
			details: None,
		}
	}

	/// A notice a source attached to its own response, annotated with that source's label.
	pub fn from_source(message: impl Into<String>, label: impl Into<String>) -> Self {
		Self { msg: message.into(), tokens: BTreeMap::new(), details: Some(label.into()) }
	}
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BlendedRecord {
	pub source: SourceKind,
	/// Identifier of the source the record came from.
	pub backend: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub label: Option<String>,
	pub record: Value,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct BlendResult {
	pub records: Vec<BlendedRecord>,
	pub facets: FacetFields,
	/// Sum of both sources' totals, not the number of records on this page.
	pub total: u64,
	pub block_size: usize,
	pub errors: Vec<BlendWarning>,
}
impl BlendResult {
	/// Records `warning` unless an identical one is already present.
	pub fn add_error(&mut self, warning: BlendWarning) {
		if !self.errors.contains(&warning) {
			self.errors.push(warning);
		}
	}

	pub fn count_from(&self, source: SourceKind) -> usize {
		self.records.iter().filter(|record| record.source == source).count()
	}
}
