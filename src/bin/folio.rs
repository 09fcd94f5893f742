use clap::Parser;
use folio::cli::{Cli, execute};
use folio::{Settings, logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	dotenv::dotenv().ok();
	let cli = Cli::parse();
	let settings = Settings::load(cli.settings.as_deref())?;
	logging::init(&settings.logging)?;
	execute(cli.command, &settings).await
}
