//! # spacecases-assets
//!
//! Generators for the SpaceCases asset site: skin data, item and container
//! metadata, skin images and prices, built from the public CSGO-API dump.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{Map, Value};
use spacecases_assets::config::{
    Config, DEFAULT_ASSET_DOMAIN, DEFAULT_LOG_DIRECTORY, DEFAULT_OUTPUT_DIRECTORY,
    DEFAULT_USER_AGENTS_FILE, Endpoint, SKINPORT_ITEMS_URL,
};
use spacecases_assets::model::{ApiContainer, ApiItem, Skin};
use spacecases_assets::skin_images::ImageIndex;
use spacecases_assets::{
    condition, container_metadata, data, item_metadata, logging, prices, skin_data, skin_images,
};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    long_about = "Generators for the SpaceCases asset site.\n\
                  Each command fetches CS2 item data, reshapes it and writes JSON or images into the output directory."
)]
struct Args {
    /// Directory generated files are written to
    #[arg(short, long, global = true, default_value = DEFAULT_OUTPUT_DIRECTORY)]
    output: PathBuf,

    /// Asset domain URL used in generated image links
    #[arg(short, long, global = true, default_value = DEFAULT_ASSET_DOMAIN)]
    domain: String,

    /// Force download of API data even if cached
    #[arg(long, global = true)]
    force: bool,

    /// Directory for log files
    #[arg(long, global = true, default_value = DEFAULT_LOG_DIRECTORY)]
    log_dir: PathBuf,

    /// Also write the log to a file in the log directory
    #[arg(long, global = true)]
    log_file: bool,

    /// File with one User-Agent per line for rate-limited requests
    #[arg(long, global = true, default_value = DEFAULT_USER_AGENTS_FILE)]
    user_agents: PathBuf,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Aggregate all CS2 skin data into skin_data.json, prices set to zero
    SkinData,

    /// Generate skin and sticker metadata from the full item dump
    ItemMetadata,

    /// Generate metadata for skin cases, souvenir packages and sticker capsules
    ContainerMetadata,

    /// Download skin images and link them under every available condition
    SkinImages {
        /// Minimum delay between image requests, in milliseconds
        #[arg(long, default_value_t = 1000)]
        delay_ms: u64,
    },

    /// Refresh prices in skin_data.json from Skinport
    RefreshPrices,

    /// Print the wear conditions covered by a float range
    #[command(allow_negative_numbers = true)]
    Conditions { min_float: f64, max_float: f64 },

    /// Show all paths used by the application (output, cache, logs)
    Paths,
}

impl Command {
    fn log_name(&self) -> &'static str {
        match self {
            Command::SkinData => "skin_data",
            Command::ItemMetadata => "item_metadata",
            Command::ContainerMetadata => "container_metadata",
            Command::SkinImages { .. } => "skin_images",
            Command::RefreshPrices => "refresh_prices",
            Command::Conditions { .. } => "conditions",
            Command::Paths => "paths",
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config {
        output_dir: args.output.clone(),
        log_dir: args.log_dir.clone(),
        asset_domain: args.domain.clone(),
        user_agents_path: args.user_agents.clone(),
        force: args.force,
    };

    // Image runs are long and always keep a log file.
    let log_to_file = args.log_file || matches!(args.command, Command::SkinImages { .. });
    let log_path = logging::init(
        args.verbose,
        log_to_file.then(|| (config.log_dir.as_path(), args.command.log_name())),
    )?;
    if let Some(path) = log_path {
        info!("Logging to {}", path.display());
    }

    match args.command {
        Command::SkinData => run_skin_data(&config),
        Command::ItemMetadata => run_item_metadata(&config),
        Command::ContainerMetadata => run_container_metadata(&config),
        Command::SkinImages { delay_ms } => {
            run_skin_images(&config, Duration::from_millis(delay_ms))
        }
        Command::RefreshPrices => run_refresh_prices(&config),
        Command::Conditions {
            min_float,
            max_float,
        } => {
            for condition in condition::conditions_for_range(min_float, max_float)? {
                println!("{} ({})", condition, condition.rank());
            }
            Ok(())
        }
        Command::Paths => {
            println!("App Paths:");
            println!("  Output:  {}", config.output_dir.display());
            println!("  Cache:   {}", data::get_cache_dir()?.display());
            println!("  Logs:    {}", config.log_dir.display());
            Ok(())
        }
    }
}

fn run_skin_data(config: &Config) -> Result<()> {
    let client = data::http_client(None)?;
    let skins: Vec<ApiItem> = data::fetch_endpoint(&client, Endpoint::Skins, config.force)?;
    let result = skin_data::run(&skins, &config.asset_domain)?;
    data::write_json(&config.output_file("skin_data.json"), &result)
}

fn run_item_metadata(config: &Config) -> Result<()> {
    let client = data::http_client(None)?;
    let all: Map<String, Value> = data::fetch_endpoint(&client, Endpoint::All, config.force)?;
    let metadata = item_metadata::run(&all, &config.asset_domain)?;
    data::write_json(&config.output_file("skin_metadata.json"), &metadata.skins)?;
    data::write_json(&config.output_file("sticker_metadata.json"), &metadata.stickers)
}

fn run_container_metadata(config: &Config) -> Result<()> {
    let client = data::http_client(None)?;
    let skins: Vec<ApiItem> = data::fetch_endpoint(&client, Endpoint::Skins, config.force)?;
    let float_ranges = container_metadata::float_ranges(&skins);
    let containers: Vec<ApiContainer> =
        data::fetch_endpoint(&client, Endpoint::Crates, config.force)?;

    let metadata = container_metadata::run(&containers, &float_ranges, &config.asset_domain)?;
    data::write_json(&config.output_file("skin_cases.json"), &metadata.skin_cases)?;
    data::write_json(
        &config.output_file("souvenir_packages.json"),
        &metadata.souvenir_packages,
    )?;
    data::write_json(
        &config.output_file("sticker_capsules.json"),
        &metadata.sticker_capsules,
    )
}

fn run_skin_images(config: &Config, delay: Duration) -> Result<()> {
    let api_client = data::http_client(None)?;
    let skins: Vec<ApiItem> = data::fetch_endpoint(&api_client, Endpoint::Skins, config.force)?;
    let listings: Vec<ApiItem> =
        data::fetch_endpoint(&api_client, Endpoint::SkinsNotGrouped, config.force)?;
    let images = ImageIndex::build(&listings);
    if images.is_empty() {
        warn!("No image URLs found in {}", Endpoint::SkinsNotGrouped.file_name());
    }

    let user_agents = data::UserAgents::load(&config.user_agents_path)?;
    let mut throttle = data::Throttle::new(delay);
    skin_images::run(
        &skins,
        &images,
        &config.raw_images_dir(),
        &config.unformatted_images_dir(),
        |url| {
            throttle.wait();
            data::fetch_bytes(&user_agents.client()?, url)
        },
    )
}

fn run_refresh_prices(config: &Config) -> Result<()> {
    let skin_data_path = config.output_file("skin_data.json");
    let mut skin_data: BTreeMap<String, Skin> = data::load_json(&skin_data_path)
        .context("skin_data.json is required; run the skin-data command first")?;

    let user_agents = data::UserAgents::load(&config.user_agents_path)?;
    let listing_path = data::fetch_cached(
        &user_agents.client()?,
        SKINPORT_ITEMS_URL,
        "skinport_items.json",
        config.force,
    )?;
    let items: Vec<prices::SkinportItem> = data::load_json(&listing_path)?;

    prices::run(&mut skin_data, &items);
    data::write_json(&skin_data_path, &skin_data)
}
