use std::sync::Mutex;

use serde_json::json;

use blender_config::Config;
use blender_domain::{FacetFields, SourceKind};
use blender_service::{
	BlendRequest, BlendResult, BlendService, BlendWarning, BoxFuture, Error, PARTIAL_FAILURE,
	SOURCES_TOKEN, SearchSource, SourceOutcome, SourcePage,
};

struct PagedSource {
	prefix: &'static str,
	available: usize,
	total: u64,
	facets: FacetFields,
	errors: Vec<String>,
	calls: Mutex<Vec<(usize, usize)>>,
}
impl PagedSource {
	fn new(prefix: &'static str, available: usize, total: u64) -> Self {
		Self {
			prefix,
			available,
			total,
			facets: FacetFields::new(),
			errors: Vec::new(),
			calls: Mutex::new(Vec::new()),
		}
	}

	fn with_facet(mut self, field: &str, counts: &[(&str, u64)]) -> Self {
		let counts = counts.iter().map(|(value, count)| (value.to_string(), *count)).collect();

		self.facets.insert(field.to_string(), counts);

		self
	}

	fn with_error(mut self, message: &str) -> Self {
		self.errors.push(message.to_string());

		self
	}

	fn calls(&self) -> Vec<(usize, usize)> {
		self.calls.lock().expect("Calls lock poisoned.").clone()
	}
}
impl SearchSource for PagedSource {
	fn search<'a>(
		&'a self,
		offset: usize,
		limit: usize,
	) -> BoxFuture<'a, color_eyre::Result<SourcePage>> {
		self.calls.lock().expect("Calls lock poisoned.").push((offset, limit));

		let records = blender_testkit::records(self.prefix, self.available)
			.into_iter()
			.skip(offset)
			.take(limit)
			.collect();
		let page = SourcePage {
			records,
			total: self.total,
			facets: self.facets.clone(),
			errors: self.errors.clone(),
		};

		Box::pin(async move { Ok(page) })
	}
}

struct FailingSource;
impl SearchSource for FailingSource {
	fn search<'a>(
		&'a self,
		_offset: usize,
		_limit: usize,
	) -> BoxFuture<'a, color_eyre::Result<SourcePage>> {
		Box::pin(async { Err(color_eyre::eyre::eyre!("Connection refused.")) })
	}
}

fn config(raw: &str) -> Config {
	toml::from_str(raw).expect("Failed to parse test config.")
}

fn service(raw: &str) -> BlendService {
	BlendService::new(config(raw)).expect("Failed to build blend service.")
}

fn ids(result: &BlendResult) -> Vec<String> {
	blender_testkit::record_ids(result.records.iter().map(|record| &record.record))
}

fn expected(parts: &[(&str, std::ops::Range<usize>)]) -> Vec<String> {
	parts
		.iter()
		.flat_map(|(prefix, range)| range.clone().map(move |idx| format!("{prefix}{idx}")))
		.collect()
}

#[tokio::test]
async fn blends_both_sources() {
	let service = service(blender_testkit::PLAIN_CONFIG_TOML);
	let primary = PagedSource::new("P", 12, 1_200);
	let secondary = PagedSource::new("S", 12, 34);
	let result = service
		.search(&primary, &secondary, &BlendRequest::page(0, 10))
		.await
		.expect("Blend must succeed.");

	assert_eq!(ids(&result), expected(&[("P", 0..5), ("S", 0..5)]));
	assert_eq!(result.total, 1_234);
	assert_eq!(result.block_size, 5);
	assert!(result.errors.is_empty());
	assert_eq!(primary.calls(), vec![(0, 10)]);
	assert_eq!(secondary.calls(), vec![(0, 10)]);
	assert_eq!(
		result.facets["blender_backend"],
		vec![("Solr".to_string(), 1_200), ("EDS".to_string(), 34)]
	);
	assert!(result.records[..5].iter().all(|record| record.source == SourceKind::Primary));
	assert!(result.records[..5].iter().all(|record| record.backend == "Solr"));
	assert!(result.records[5..].iter().all(|record| record.backend == "EDS"));
}

#[tokio::test]
async fn later_page_fetches_whole_window() {
	let service = service(blender_testkit::PLAIN_CONFIG_TOML);
	let primary = PagedSource::new("P", 30, 30);
	let secondary = PagedSource::new("S", 30, 30);
	let result = service
		.search(&primary, &secondary, &BlendRequest::page(10, 10))
		.await
		.expect("Blend must succeed.");

	assert_eq!(ids(&result), expected(&[("P", 5..10), ("S", 5..10)]));
	assert_eq!(primary.calls(), vec![(0, 20)]);
}

#[tokio::test]
async fn boost_window_from_config() {
	let service = service(blender_testkit::SAMPLE_CONFIG_TOML);
	let primary = PagedSource::new("P", 20, 20);
	let secondary = PagedSource::new("S", 20, 20);
	let result = service
		.search(&primary, &secondary, &BlendRequest::page(0, 10))
		.await
		.expect("Blend must succeed.");

	assert_eq!(
		ids(&result),
		expected(&[("P", 0..2), ("S", 0..1), ("P", 2..5), ("S", 1..5)])
	);
	assert_eq!(result.records[0].label.as_deref(), Some("Local"));
}

#[tokio::test]
async fn failed_primary_degrades_to_secondary() {
	let service = service(blender_testkit::SAMPLE_CONFIG_TOML);
	let secondary = PagedSource::new("S", 9, 90);
	let result = service
		.search(&FailingSource, &secondary, &BlendRequest::page(0, 5))
		.await
		.expect("Partial failure must not be fatal.");

	assert_eq!(ids(&result), expected(&[("S", 0..5)]));
	assert!(result.records.iter().all(|record| record.source == SourceKind::Secondary));
	assert_eq!(result.total, 90);
	assert_eq!(result.errors.len(), 1);
	assert_eq!(result.errors[0].msg, PARTIAL_FAILURE);
	assert_eq!(result.errors[0].tokens[SOURCES_TOKEN], "Local");
	assert_eq!(
		result.facets["blender_backend"],
		vec![("Solr".to_string(), 0), ("EDS".to_string(), 90)]
	);
}

#[tokio::test]
async fn every_source_failing_is_an_error() {
	let service = service(blender_testkit::SAMPLE_CONFIG_TOML);
	let err = service
		.search(&FailingSource, &FailingSource, &BlendRequest::page(0, 5))
		.await
		.expect_err("Expected total failure.");

	match err {
		Error::AllSourcesFailed { message } => assert!(message.contains("Connection refused.")),
		other => panic!("Unexpected error: {other:?}"),
	}
}

#[tokio::test]
async fn failed_source_with_other_filtered_out_is_an_error() {
	let service = service(blender_testkit::SAMPLE_CONFIG_TOML);
	let secondary = PagedSource::new("S", 9, 90);
	let request = BlendRequest {
		offset: 0,
		limit: 5,
		filters: vec!["-blender_backend:\"EDS\"".to_string()],
	};
	let err = service
		.search(&FailingSource, &secondary, &request)
		.await
		.expect_err("Expected total failure.");

	assert!(matches!(err, Error::AllSourcesFailed { .. }));
	assert!(secondary.calls().is_empty());
}

#[tokio::test]
async fn filtered_source_is_skipped_without_warning() {
	let service = service(blender_testkit::SAMPLE_CONFIG_TOML);
	let primary = PagedSource::new("P", 9, 9);
	let secondary = PagedSource::new("S", 9, 90);
	let request = BlendRequest {
		offset: 0,
		limit: 5,
		filters: vec!["blender_backend:\"Solr\"".to_string()],
	};
	let result =
		service.search(&primary, &secondary, &request).await.expect("Blend must succeed.");

	assert_eq!(ids(&result), expected(&[("P", 0..5)]));
	assert!(result.errors.is_empty());
	assert_eq!(result.total, 9);
	assert!(secondary.calls().is_empty());
}

#[tokio::test]
async fn excluding_every_source_yields_empty_page() {
	let service = service(blender_testkit::SAMPLE_CONFIG_TOML);
	let primary = PagedSource::new("P", 9, 9);
	let secondary = PagedSource::new("S", 9, 90);
	let request = BlendRequest {
		offset: 0,
		limit: 5,
		filters: vec!["-blender_backend:Solr".to_string(), "-blender_backend:EDS".to_string()],
	};
	let result =
		service.search(&primary, &secondary, &request).await.expect("Blend must succeed.");

	assert!(result.records.is_empty());
	assert_eq!(result.total, 0);
	assert!(result.facets.is_empty());
}

#[tokio::test]
async fn adaptive_block_size_follows_total() {
	let mut cfg = config(blender_testkit::PLAIN_CONFIG_TOML);

	cfg.blending.adaptive_block_sizes = vec![
		"0-10:1".parse().expect("Valid rule."),
		"11-100:2".parse().expect("Valid rule."),
	];

	let service = BlendService::new(cfg).expect("Failed to build blend service.");
	let primary = PagedSource::new("P", 10, 40);
	let secondary = PagedSource::new("S", 10, 40);
	let result = service
		.search(&primary, &secondary, &BlendRequest::page(0, 6))
		.await
		.expect("Blend must succeed.");

	assert_eq!(result.block_size, 2);
	assert_eq!(ids(&result), expected(&[("P", 0..2), ("S", 0..2), ("P", 2..4)]));
}

#[test]
fn source_notices_become_deduplicated_warnings() {
	let service = service(blender_testkit::SAMPLE_CONFIG_TOML);
	let primary = SourcePage {
		records: blender_testkit::records("P", 2),
		total: 2,
		facets: FacetFields::new(),
		errors: vec!["Query too broad.".to_string(), "Query too broad.".to_string()],
	};
	let secondary = SourcePage {
		records: blender_testkit::records("S", 2),
		total: 2,
		facets: FacetFields::new(),
		errors: vec!["Query too broad.".to_string()],
	};
	let result = service
		.blend(
			SourceOutcome::Fetched(primary),
			SourceOutcome::Fetched(secondary),
			&BlendRequest::page(0, 4),
		)
		.expect("Blend must succeed.");

	assert_eq!(
		result.errors,
		vec![
			BlendWarning::from_source("Query too broad.", "Local"),
			BlendWarning::from_source("Query too broad.", "Electronic Stuff"),
		]
	);
}

#[tokio::test]
async fn facets_are_merged_through_mappings() {
	let service = service(blender_testkit::SAMPLE_CONFIG_TOML);
	let primary = PagedSource::new("P", 3, 3)
		.with_facet("format", &[("Book", 2)])
		.with_facet("author", &[("Smith", 1)]);
	let secondary = PagedSource::new("S", 3, 3)
		.with_facet("SourceType", &[("Academic Journals", 4), ("Books", 1)])
		.with_facet("ContentProvider", &[("Communication Abstracts", 2)])
		.with_facet("LIMIT|FT", &[("y", 1), ("n", 1)])
		.with_error("Some limiters were ignored.");
	let result = service
		.search(&primary, &secondary, &BlendRequest::page(0, 6))
		.await
		.expect("Blend must succeed.");

	assert_eq!(result.facets["format"], vec![("Journal".to_string(), 4), ("Book".to_string(), 3)]);
	assert_eq!(result.facets["author"], vec![("Smith".to_string(), 1)]);
	assert_eq!(
		result.facets["building"],
		vec![("1/Main/Sub/".to_string(), 2), ("0/Main/".to_string(), 2)]
	);
	assert_eq!(result.facets["fulltext"], vec![("true".to_string(), 1)]);
	assert_eq!(
		result.errors,
		vec![BlendWarning::from_source("Some limiters were ignored.", "Electronic Stuff")]
	);
}

#[tokio::test]
async fn result_serializes_solr_style_pairs() {
	let service = service(blender_testkit::PLAIN_CONFIG_TOML);
	let primary = PagedSource::new("P", 1, 1);
	let secondary = PagedSource::new("S", 1, 1);
	let result = service
		.search(&primary, &secondary, &BlendRequest::page(0, 2))
		.await
		.expect("Blend must succeed.");
	let value = serde_json::to_value(&result).expect("Result must serialize.");

	assert_eq!(value["facets"]["blender_backend"], json!([["Solr", 1], ["EDS", 1]]));
	assert_eq!(
		value["records"][0],
		json!({ "source": "primary", "backend": "Solr", "record": { "id": "P0" } })
	);
	assert_eq!(value["total"], json!(2));
	assert_eq!(value["errors"], json!([]));
}

#[test]
fn zero_block_size_is_rejected() {
	let mut cfg = config(blender_testkit::PLAIN_CONFIG_TOML);

	cfg.blending.block_size = 0;

	let err = BlendService::new(cfg).err().expect("Expected configuration error.");

	assert!(matches!(err, Error::InvalidConfig { .. }), "Unexpected error: {err:?}");
}
