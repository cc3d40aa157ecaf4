use clap::Parser;

use medbot::Args;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = Args::parse();

	medbot::run(args).await
}
