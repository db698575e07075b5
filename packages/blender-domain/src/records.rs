use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
	Primary,
	Secondary,
}
impl SourceKind {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Primary => "primary",
			Self::Secondary => "secondary",
		}
	}
}

/// A record paired with the source it was drawn from.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Tagged<R> {
	pub source: SourceKind,
	pub record: R,
}

/// One fetched page of a remote result set.
///
/// `total` is the remote result count and may exceed `records.len()`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RecordSequence<R> {
	pub records: Vec<R>,
	pub total: u64,
}
impl<R> RecordSequence<R> {
	pub fn new(records: Vec<R>, total: u64) -> Self {
		Self { records, total }
	}

	pub fn len(&self) -> usize {
		self.records.len()
	}

	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}
}

/// Sum of both declared totals; an absent side counts as zero.
pub fn combined_total<R>(
	primary: Option<&RecordSequence<R>>,
	secondary: Option<&RecordSequence<R>>,
) -> u64 {
	primary.map(|seq| seq.total).unwrap_or(0) + secondary.map(|seq| seq.total).unwrap_or(0)
}
