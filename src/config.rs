//! Fixed endpoints, defaults and the per-run configuration.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_OUTPUT_DIRECTORY: &str = "output";
pub const DEFAULT_LOG_DIRECTORY: &str = "logs";
pub const DEFAULT_ASSET_DOMAIN: &str = "https://assets.spacecases.xyz";
pub const DEFAULT_USER_AGENTS_FILE: &str = "user_agents.txt";

const API_BASE: &str = "https://bymykel.github.io/CSGO-API/api/en";
pub const SKINPORT_ITEMS_URL: &str = "https://api.skinport.com/v1/items";

/// How long a cached API response stays fresh.
pub const API_CACHE_EXPIRATION: Duration = Duration::from_secs(12 * 3600);

/// Knives without a finish. They have no float range and share one image.
pub const VANILLA_KNIVES: &[&str] = &[
    "★ Bayonet",
    "★ Bowie Knife",
    "★ Butterfly Knife",
    "★ Classic Knife",
    "★ Falchion Knife",
    "★ Flip Knife",
    "★ Gut Knife",
    "★ Huntsman Knife",
    "★ Karambit",
    "★ Kukri Knife",
    "★ M9 Bayonet",
    "★ Navaja Knife",
    "★ Nomad Knife",
    "★ Paracord Knife",
    "★ Shadow Daggers",
    "★ Skeleton Knife",
    "★ Stiletto Knife",
    "★ Survival Knife",
    "★ Talon Knife",
    "★ Ursus Knife",
];

pub fn is_vanilla_knife(formatted_name: &str) -> bool {
    VANILLA_KNIVES.contains(&formatted_name)
}

/// CSGO-API endpoints consumed by the generators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Skins,
    SkinsNotGrouped,
    All,
    Crates,
}

impl Endpoint {
    pub fn file_name(self) -> &'static str {
        match self {
            Endpoint::Skins => "skins.json",
            Endpoint::SkinsNotGrouped => "skins_not_grouped.json",
            Endpoint::All => "all.json",
            Endpoint::Crates => "crates.json",
        }
    }

    pub fn url(self) -> String {
        format!("{}/{}", API_BASE, self.file_name())
    }
}

/// Settings shared by every generator for one run.
#[derive(Debug, Clone)]
pub struct Config {
    pub output_dir: PathBuf,
    pub log_dir: PathBuf,
    pub asset_domain: String,
    pub user_agents_path: PathBuf,
    /// Ignore cached API responses.
    pub force: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIRECTORY),
            log_dir: PathBuf::from(DEFAULT_LOG_DIRECTORY),
            asset_domain: DEFAULT_ASSET_DOMAIN.to_string(),
            user_agents_path: PathBuf::from(DEFAULT_USER_AGENTS_FILE),
            force: false,
        }
    }
}

impl Config {
    pub fn output_file(&self, name: &str) -> PathBuf {
        self.output_dir.join(name)
    }

    pub fn raw_images_dir(&self) -> PathBuf {
        self.output_dir.join("images").join("raw")
    }

    pub fn unformatted_images_dir(&self) -> PathBuf {
        self.output_dir.join("images").join("unformatted")
    }
}
