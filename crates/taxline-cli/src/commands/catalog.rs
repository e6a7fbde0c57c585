//! Catalog command - fetch and inspect the provider tax catalog.

use std::fs;
use std::path::PathBuf;

use clap::{Args, Subcommand};
use console::style;
use tracing::info;

use taxline_core::{ProviderTaxList, TaxFamily};

use super::{data_dir, load_catalog, load_config};

/// Arguments for the catalog command.
#[derive(Args)]
pub struct CatalogArgs {
    #[command(subcommand)]
    command: CatalogCommand,
}

#[derive(Subcommand)]
enum CatalogCommand {
    /// Fetch the tax list from the billing provider and cache it
    Fetch(FetchArgs),

    /// Show the cached catalog with resolved families
    Show {
        /// Catalog file (default: the cached catalog)
        #[arg(short = 't', long)]
        catalog: Option<PathBuf>,
    },
}

#[derive(Args)]
struct FetchArgs {
    /// Provider endpoint (default: catalog.source_url from config)
    #[arg(short, long)]
    url: Option<String>,

    /// Output path (default: the cache location)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub async fn run(args: CatalogArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    match args.command {
        CatalogCommand::Fetch(fetch_args) => fetch(fetch_args, config_path).await,
        CatalogCommand::Show { catalog } => show(catalog, config_path),
    }
}

async fn fetch(args: FetchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let url = args
        .url
        .or_else(|| config.catalog.source_url.clone())
        .ok_or_else(|| {
            anyhow::anyhow!("No catalog URL. Pass --url or set catalog.source_url in config.")
        })?;

    info!("Fetching tax catalog from {}", url);
    let list: ProviderTaxList = reqwest::get(&url)
        .await
        .map_err(|e| anyhow::anyhow!("catalog fetch failed: {}", e))?
        .error_for_status()
        .map_err(|e| anyhow::anyhow!("catalog fetch failed: {}", e))?
        .json()
        .await
        .map_err(|e| anyhow::anyhow!("malformed catalog response: {}", e))?;

    if list.taxes.is_empty() {
        anyhow::bail!("Provider returned an empty tax list");
    }

    let output_path = args
        .output
        .unwrap_or_else(|| data_dir().join(&config.catalog.cache_file));
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&output_path, serde_json::to_string_pretty(&list)?)?;

    println!(
        "{} Cached {} taxes at {}",
        style("✓").green(),
        list.taxes.len(),
        output_path.display()
    );

    Ok(())
}

fn show(catalog_path: Option<PathBuf>, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let path = catalog_path.unwrap_or_else(|| data_dir().join(&config.catalog.cache_file));

    if !path.exists() {
        anyhow::bail!(
            "No tax catalog at {}. Run 'taxline catalog fetch' first.",
            path.display()
        );
    }

    let catalog = load_catalog(&path)?;
    println!("Catalog: {} ({} taxes)", path.display(), catalog.len());
    println!();

    for tax in catalog.records() {
        let family = match tax.family {
            TaxFamily::Interstate => style("interstate").cyan(),
            TaxFamily::Intrastate => style("intrastate").green(),
        };
        println!(
            "  {:<16} {:>6.2}%  {}  {}",
            tax.id, tax.percent, family, tax.name
        );
    }

    Ok(())
}
