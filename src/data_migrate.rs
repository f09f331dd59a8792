//! Upgrades legacy `children.json` and `entries.json` files in place.
//!
//! Usage: `data-migrate [DATA_DIR]`; the directory defaults to `$DATA_DIR`
//! and then `./data`.

use std::path::PathBuf;

use color_eyre::eyre::{Result, eyre};
use dotenv::dotenv;
use kiddytime_db::{
    CHILDREN_FILE, ENTRIES_FILE,
    repositories::{ChildStore, EntryStore},
};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    dotenv().ok();

    let data_dir = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("DATA_DIR").ok())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("./data"));
    if !data_dir.is_dir() {
        return Err(eyre!("Data directory {} does not exist", data_dir.display()));
    }
    info!("Migrating data in {}", data_dir.display());

    let children = ChildStore::open(data_dir.join(CHILDREN_FILE))
        .await?
        .migrate()
        .await?;
    let entries = EntryStore::open(data_dir.join(ENTRIES_FILE))
        .await?
        .migrate()
        .await?;

    if children == 0 && entries == 0 {
        info!("Nothing to migrate");
    } else {
        info!("Migrated {} children and {} entries", children, entries);
    }

    Ok(())
}
