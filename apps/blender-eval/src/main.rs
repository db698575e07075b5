// crates.io
use clap::Parser;
// self
use blender_eval::Args;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = Args::parse();
	blender_eval::run(args).await
}
