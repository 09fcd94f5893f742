//! Command-line interface for the `folio` binary

use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use folio_conf::Settings;
use folio_db::{Database, schema};

use crate::build_service;

/// Folio content backend
#[derive(Debug, Parser)]
#[command(name = "folio")]
#[command(about = "Folio content backend management", long_about = None)]
#[command(version)]
pub struct Cli {
	/// Subcommand to execute
	#[command(subcommand)]
	pub command: Commands,

	/// Settings file; defaults to `folio.toml` when present
	#[arg(long, global = true, value_name = "PATH")]
	pub settings: Option<PathBuf>,
}

/// Management commands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
	/// Create the tables and the media root
	Sync {
		/// Drop existing tables first
		#[arg(long)]
		force: bool,
	},

	/// Print the GraphQL schema definition
	Schema {
		/// Write to a file instead of stdout
		#[arg(short, long, value_name = "PATH")]
		output: Option<PathBuf>,
	},

	/// Verify settings, database and media root
	Check,
}

/// Run a parsed command against loaded settings
pub async fn execute(command: Commands, settings: &Settings) -> anyhow::Result<()> {
	match command {
		Commands::Sync { force } => sync(settings, force).await,
		Commands::Schema { output } => write_schema(output),
		Commands::Check => check(settings).await,
	}
}

async fn sync(settings: &Settings, force: bool) -> anyhow::Result<()> {
	let db = Database::connect(&settings.database)
		.await
		.with_context(|| format!("connecting to {}", settings.database.url))?;
	schema::sync(&db, force).await.context("creating tables")?;
	tokio::fs::create_dir_all(&settings.media.root)
		.await
		.with_context(|| format!("creating media root {}", settings.media.root.display()))?;
	tracing::info!(force, url = %settings.database.url, "schema synced");
	db.close().await;
	Ok(())
}

fn write_schema(output: Option<PathBuf>) -> anyhow::Result<()> {
	let sdl = folio_graphql::sdl();
	match output {
		Some(path) => std::fs::write(&path, sdl)
			.with_context(|| format!("writing {}", path.display()))?,
		None => println!("{}", sdl),
	}
	Ok(())
}

async fn check(settings: &Settings) -> anyhow::Result<()> {
	let service = build_service(settings).await?;
	let pages = service.pages().await.context("reading pages")?;
	tracing::info!(pages = pages.len(), "check passed");
	println!("ok: {} pages at {}", pages.len(), settings.database.url);
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(&["folio", "sync"], false)]
	#[case(&["folio", "sync", "--force"], true)]
	fn test_parse_sync(#[case] argv: &[&str], #[case] expected: bool) {
		let cli = Cli::try_parse_from(argv).unwrap();
		assert!(matches!(cli.command, Commands::Sync { force } if force == expected));
	}

	#[rstest]
	fn test_settings_flag_is_global() {
		let cli = Cli::try_parse_from(["folio", "check", "--settings", "prod.toml"]).unwrap();
		assert_eq!(cli.settings, Some(PathBuf::from("prod.toml")));
	}

	#[rstest]
	fn test_unknown_command_is_rejected() {
		assert!(Cli::try_parse_from(["folio", "serve"]).is_err());
	}
}
