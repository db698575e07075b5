//! Fixtures shared by the blender test suites.

mod error;

pub use error::{Error, Result};

use std::{
	env, fs,
	path::{Path, PathBuf},
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use serde_json::{Value, json};

/// A complete configuration: two sources, boosting enabled, and one facet of each type.
pub const SAMPLE_CONFIG_TOML: &str = r#"
[service]
log_level = "debug"

[sources.primary]
id    = "Solr"
label = "Local"

[sources.secondary]
id    = "EDS"
label = "Electronic Stuff"

[blending]
block_size     = 5
boost_position = 2
boost_count    = 1

[facets.building]
secondary = "ContentProvider"
type      = "hierarchical"

[facets.building.values]
"Business Source Premier" = "Main"
"Communication Abstracts" = "1/Main/Sub/"

[facets.format]
secondary = "SourceType"

[facets.format.values]
"Academic Journals" = "Journal"
"Books"             = "Book"

[facets.fulltext]
secondary = "LIMIT|FT"
type      = "boolean"

[facets.fulltext.values]
"y" = "1"
"#;

/// A configuration without boosting, so plain block alternation applies everywhere.
pub const PLAIN_CONFIG_TOML: &str = r#"
[service]
log_level = "info"

[sources.primary]
id = "Solr"

[sources.secondary]
id = "EDS"

[blending]
block_size = 5
"#;

/// Temporary config file removed on drop.
pub struct TempConfig {
	path: PathBuf,
}
impl TempConfig {
	pub fn new(payload: &str) -> Result<Self> {
		static COUNTER: AtomicU64 = AtomicU64::new(0);

		let nanos = SystemTime::now()
			.duration_since(UNIX_EPOCH)
			.map_err(|err| Error::Message(format!("System time must be valid: {err}.")))?
			.as_nanos();
		let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
		let pid = std::process::id();
		let mut path = env::temp_dir();

		path.push(format!("blender_config_test_{nanos}_{pid}_{ordinal}.toml"));

		fs::write(&path, payload)?;

		Ok(Self { path })
	}

	pub fn path(&self) -> &Path {
		&self.path
	}
}
impl Drop for TempConfig {
	fn drop(&mut self) {
		let _ = fs::remove_file(&self.path);
	}
}

/// Record ids `{prefix}0..{prefix}{count - 1}`.
pub fn ids(prefix: &str, count: usize) -> Vec<String> {
	(0..count).map(|idx| format!("{prefix}{idx}")).collect()
}

/// Opaque JSON records carrying only an `id`.
pub fn records(prefix: &str, count: usize) -> Vec<Value> {
	ids(prefix, count).into_iter().map(|id| json!({ "id": id })).collect()
}

/// A source page in the JSON shape accepted by the service and the eval app.
pub fn page_json(prefix: &str, count: usize, total: u64, facets: Value) -> Value {
	json!({
		"records": records(prefix, count),
		"total": total,
		"facets": facets,
	})
}

/// Pulls the `id` field back out of records produced by [`records`].
pub fn record_ids<'a>(records: impl IntoIterator<Item = &'a Value>) -> Vec<String> {
	records
		.into_iter()
		.filter_map(|record| record.get("id").and_then(Value::as_str))
		.map(str::to_string)
		.collect()
}
