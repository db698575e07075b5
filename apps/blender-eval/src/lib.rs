use std::{fs, path::PathBuf};

use clap::Parser;
use color_eyre::eyre;
use tracing_subscriber::EnvFilter;

use blender_config::Config;
use blender_service::{BlendRequest, BlendResult, BlendService, BoxFuture, SearchSource, SourcePage};

#[derive(Debug, Parser)]
#[command(version, rename_all = "kebab")]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	/// JSON page served by the primary source. The source fails when omitted.
	#[arg(long, value_name = "FILE")]
	pub primary: Option<PathBuf>,
	/// JSON page served by the secondary source. The source fails when omitted.
	#[arg(long, value_name = "FILE")]
	pub secondary: Option<PathBuf>,
	#[arg(long, value_name = "N", default_value_t = 0)]
	pub offset: usize,
	#[arg(long, value_name = "N", default_value_t = 20)]
	pub limit: usize,
	#[arg(long = "filter", value_name = "FILTER")]
	pub filters: Vec<String>,
}

/// A search source backed by a recorded page on disk.
///
/// The file holds one [`SourcePage`] listing the source's leading records; requests are served by
/// slicing it.
#[derive(Debug)]
pub struct FixtureSource {
	name: &'static str,
	path: Option<PathBuf>,
}
impl FixtureSource {
	pub fn new(name: &'static str, path: Option<PathBuf>) -> Self {
		Self { name, path }
	}

	fn load(&self, offset: usize, limit: usize) -> color_eyre::Result<SourcePage> {
		let Some(path) = &self.path else {
			return Err(eyre::eyre!("No fixture provided for the {} source.", self.name));
		};
		let raw = fs::read_to_string(path)
			.map_err(|err| eyre::eyre!("Failed to read {}: {err}.", path.display()))?;
		let mut page: SourcePage = serde_json::from_str(&raw)
			.map_err(|err| eyre::eyre!("Failed to parse {}: {err}.", path.display()))?;

		page.records = page.records.into_iter().skip(offset).take(limit).collect();

		Ok(page)
	}
}
impl SearchSource for FixtureSource {
	fn search<'a>(
		&'a self,
		offset: usize,
		limit: usize,
	) -> BoxFuture<'a, color_eyre::Result<SourcePage>> {
		Box::pin(async move { self.load(offset, limit) })
	}
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = blender_config::load(&args.config)?;
	let filter = EnvFilter::new(config.service.log_level.clone());

	tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

	let result = blend_fixtures(&args, config).await?;
	let json = serde_json::to_string_pretty(&result)?;

	println!("{json}");

	Ok(())
}

pub async fn blend_fixtures(args: &Args, config: Config) -> color_eyre::Result<BlendResult> {
	let service = BlendService::new(config)?;
	let primary = FixtureSource::new("primary", args.primary.clone());
	let secondary = FixtureSource::new("secondary", args.secondary.clone());
	let request =
		BlendRequest { offset: args.offset, limit: args.limit, filters: args.filters.clone() };
	let result = service.search(&primary, &secondary, &request).await?;

	tracing::info!(
		offset = request.offset,
		limit = request.limit,
		records = result.records.len(),
		total = result.total,
		"Blend evaluated."
	);

	Ok(result)
}
