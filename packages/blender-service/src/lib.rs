mod error;

pub mod filter;
pub mod result;
pub mod source;

pub use error::{Error, Result};
pub use filter::{ActiveSources, SOURCE_FILTER_FIELD, active_sources};
pub use result::{BlendResult, BlendWarning, BlendedRecord, PARTIAL_FAILURE, SOURCES_TOKEN};
pub use source::{SearchSource, SourceOutcome, SourcePage};

use std::{future::Future, pin::Pin};

use serde::Deserialize;
use serde_json::Value;

use blender_config::{Config, Source};
use blender_domain::{
	BlendConfig, FacetFieldMapping, FacetFields, RecordSequence, SourceKind, adaptive,
};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct BlendRequest {
	pub offset: usize,
	pub limit: usize,
	/// Search filters; only `blender_backend` ones are interpreted here.
	#[serde(default)]
	pub filters: Vec<String>,
}
impl BlendRequest {
	pub fn page(offset: usize, limit: usize) -> Self {
		Self { offset, limit, filters: Vec::new() }
	}

	/// Records each source must supply, counted from its first result.
	pub fn window(&self) -> usize {
		self.offset.saturating_add(self.limit)
	}
}

pub struct BlendService {
	pub cfg: Config,
	blend: BlendConfig,
	mappings: Vec<FacetFieldMapping>,
}
impl BlendService {
	pub fn new(cfg: Config) -> Result<Self> {
		blender_config::validate(&cfg)?;

		let blend = BlendConfig::from_blending(&cfg.blending)?;
		let mappings = FacetFieldMapping::all_from_config(&cfg);

		Ok(Self { cfg, blend, mappings })
	}

	/// Fetches both active sources concurrently, then blends what came back.
	pub async fn search(
		&self,
		primary: &dyn SearchSource,
		secondary: &dyn SearchSource,
		request: &BlendRequest,
	) -> Result<BlendResult> {
		let active = active_sources(&self.cfg.sources, &request.filters);
		let window = request.window();
		let (primary, secondary) = tokio::join!(
			fetch(primary, active.primary, window),
			fetch(secondary, active.secondary, window),
		);

		self.blend(primary, secondary, request)
	}

	/// Builds one blended page from already-fetched source outcomes.
	///
	/// A single failed source degrades to the other one with a [`PARTIAL_FAILURE`] warning.
	/// Failure of every active source is an error.
	pub fn blend(
		&self,
		primary: SourceOutcome,
		secondary: SourceOutcome,
		request: &BlendRequest,
	) -> Result<BlendResult> {
		let active = active_sources(&self.cfg.sources, &request.filters);
		let primary = if active.primary { primary } else { SourceOutcome::Inactive };
		let secondary = if active.secondary { secondary } else { SourceOutcome::Inactive };
		let mut result = BlendResult { block_size: self.blend.block_size(), ..Default::default() };

		if !primary.is_fetched() && !secondary.is_fetched() {
			if let Some(message) = primary.failure().or_else(|| secondary.failure()) {
				return Err(Error::AllSourcesFailed { message: message.to_string() });
			}

			tracing::info!("No active search sources for blend request.");

			return Ok(result);
		}

		let mut failed = Vec::new();
		let outcomes = [(SourceKind::Primary, &primary), (SourceKind::Secondary, &secondary)];

		for (kind, outcome) in outcomes {
			let Some(message) = outcome.failure() else { continue };
			let source = self.source(kind);

			tracing::warn!(
				source_id = %source.id,
				source = kind.as_str(),
				error = %message,
				"Search source failed."
			);
			failed.push(source.display_name());
		}

		if !failed.is_empty() {
			result.add_error(BlendWarning::partial_failure(&failed));
		}

		let primary_total = primary.total();
		let secondary_total = secondary.total();
		let (primary_records, primary_facets) =
			self.unpack(SourceKind::Primary, primary, &mut result);
		let (secondary_records, secondary_facets) =
			self.unpack(SourceKind::Secondary, secondary, &mut result);

		result.total = primary_total + secondary_total;

		let block_size = adaptive::select_block_size(
			result.total,
			self.blend.block_size(),
			&self.cfg.blending.adaptive_block_sizes,
		);
		let blend = self.blend.with_block_size(block_size)?;

		result.block_size = block_size;
		result.records = blender_domain::interleave(
			primary_records,
			secondary_records,
			request.offset,
			request.limit,
			&blend,
		)
		.into_iter()
		.map(|tagged| {
			let source = self.source(tagged.source);

			BlendedRecord {
				source: tagged.source,
				backend: source.id.clone(),
				label: source.label.clone(),
				record: tagged.record,
			}
		})
		.collect();
		result.facets = blender_domain::merge_facets(
			primary_facets.unwrap_or_default(),
			&secondary_facets.unwrap_or_default(),
			&self.mappings,
		);
		result.facets.insert(
			SOURCE_FILTER_FIELD.to_string(),
			vec![
				(self.cfg.sources.primary.id.clone(), primary_total),
				(self.cfg.sources.secondary.id.clone(), secondary_total),
			],
		);

		tracing::debug!(
			offset = request.offset,
			limit = request.limit,
			total = result.total,
			block_size,
			records = result.records.len(),
			primary_records = result.count_from(SourceKind::Primary),
			warnings = result.errors.len(),
			"Blended page assembled."
		);

		Ok(result)
	}

	fn source(&self, kind: SourceKind) -> &Source {
		match kind {
			SourceKind::Primary => &self.cfg.sources.primary,
			SourceKind::Secondary => &self.cfg.sources.secondary,
		}
	}

	/// Splits a fetched page into its sequence and facets, forwarding the page's own notices.
	fn unpack(
		&self,
		kind: SourceKind,
		outcome: SourceOutcome,
		result: &mut BlendResult,
	) -> (Option<RecordSequence<Value>>, Option<FacetFields>) {
		let SourceOutcome::Fetched(page) = outcome else {
			return (None, None);
		};
		let (records, facets, errors) = page.into_parts();
		let label = self.source(kind).display_name();

		for message in errors {
			result.add_error(BlendWarning::from_source(message, label));
		}

		(Some(records), Some(facets))
	}
}

async fn fetch(source: &dyn SearchSource, active: bool, window: usize) -> SourceOutcome {
	if !active {
		return SourceOutcome::Inactive;
	}

	match source.search(0, window).await {
		Ok(page) => SourceOutcome::Fetched(page),
		Err(err) => SourceOutcome::Failed { message: err.to_string() },
	}
}
