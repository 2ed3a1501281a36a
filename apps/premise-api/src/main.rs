use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = premise_api::Args::parse();

	premise_api::run(args).await
}
