use std::collections::VecDeque;

use crate::{BlendConfig, RecordSequence, SourceKind, Tagged, placement};

/// Blends two record sequences into the page `[offset, offset + limit)`.
///
/// Each position takes the next record from the source [`placement::placement_at`] prefers,
/// falling back to the other source once the preferred one runs dry. An absent sequence behaves
/// like an empty one. The page comes back shorter than `limit` when both sources are exhausted.
pub fn interleave<R>(
	primary: Option<RecordSequence<R>>,
	secondary: Option<RecordSequence<R>>,
	offset: usize,
	limit: usize,
	cfg: &BlendConfig,
) -> Vec<Tagged<R>> {
	if limit == 0 {
		return Vec::new();
	}

	let mut primary = tag_all(primary, SourceKind::Primary);
	let mut secondary = tag_all(secondary, SourceKind::Secondary);
	let end = offset.saturating_add(limit);
	let mut merged = Vec::with_capacity(end.min(primary.len() + secondary.len()));

	for position in 0..end {
		let preferred = placement::placement_at(position, cfg).source();
		let (first, second) = match preferred {
			SourceKind::Primary => (&mut primary, &mut secondary),
			SourceKind::Secondary => (&mut secondary, &mut primary),
		};
		let Some(record) = first.pop_front().or_else(|| second.pop_front()) else {
			break;
		};

		merged.push(record);
	}

	merged.into_iter().skip(offset).take(limit).collect()
}

fn tag_all<R>(sequence: Option<RecordSequence<R>>, source: SourceKind) -> VecDeque<Tagged<R>> {
	sequence
		.map(|sequence| sequence.records)
		.unwrap_or_default()
		.into_iter()
		.map(|record| Tagged { source, record })
		.collect()
}
