use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::BoxFuture;
use blender_domain::{FacetFields, RecordSequence};

/// One page fetched from a search source, with the source's own facet counts.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct SourcePage {
	pub records: Vec<Value>,
	pub total: u64,
	#[serde(default)]
	pub facets: FacetFields,
	/// Non-fatal notices the source attached to its response.
	#[serde(default)]
	pub errors: Vec<String>,
}
impl SourcePage {
	pub fn into_parts(self) -> (RecordSequence<Value>, FacetFields, Vec<String>) {
		(RecordSequence::new(self.records, self.total), self.facets, self.errors)
	}
}

/// What became of one source for a blend request.
#[derive(Clone, Debug, PartialEq)]
pub enum SourceOutcome {
	Fetched(SourcePage),
	Failed { message: String },
	/// Deselected by a source filter; not a failure.
	Inactive,
}
impl SourceOutcome {
	pub fn is_fetched(&self) -> bool {
		matches!(self, Self::Fetched(_))
	}

	pub fn failure(&self) -> Option<&str> {
		match self {
			Self::Failed { message } => Some(message),
			_ => None,
		}
	}

	pub fn total(&self) -> u64 {
		match self {
			Self::Fetched(page) => page.total,
			_ => 0,
		}
	}
}

pub trait SearchSource
where
	Self: Send + Sync,
{
	/// Fetches records `[offset, offset + limit)` of the source's result list.
	fn search<'a>(
		&'a self,
		offset: usize,
		limit: usize,
	) -> BoxFuture<'a, color_eyre::Result<SourcePage>>;
}
