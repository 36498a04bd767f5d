use anyhow::Context;
use clap::Parser;

use foodsaver_cli::{Cli, execute};
use foodsaver_infra::{InventoryStore, JsonFileStore, StoreConfig};
use foodsaver_observability::LogSettings;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = LogSettings::from_env();
    foodsaver_observability::tracing::init(if cli.verbose {
        settings.with_default_filter("debug")
    } else {
        settings
    });

    let config = StoreConfig::from_env_or(cli.data);
    tracing::debug!(path = %config.data_path.display(), "opening data file");

    let storage = JsonFileStore::open(&config.data_path)
        .with_context(|| format!("failed to open {}", config.data_path.display()))?;
    let store = InventoryStore::new(storage, config.keys);

    let output = execute(&store, cli.command)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
