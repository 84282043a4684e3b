//! Remote data access: cached API downloads, image fetching and JSON output.

use anyhow::{Context, Result, bail};
use rand::seq::IndexedRandom;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::config::{API_CACHE_EXPIRATION, Endpoint};

pub fn get_cache_dir() -> Result<PathBuf> {
    let project_dirs = directories::ProjectDirs::from("xyz", "spacecases", "spacecases-assets")
        .ok_or_else(|| anyhow::anyhow!("Could not determine cache directory"))?;
    let cache_dir = project_dirs.cache_dir().to_path_buf();
    fs::create_dir_all(&cache_dir)?;
    Ok(cache_dir)
}

/// Whether a cached file is missing, forced stale, or older than `expiration`.
fn needs_download(path: &Path, force: bool, expiration: Duration) -> bool {
    if force || !path.exists() {
        return true;
    }
    fs::metadata(path)
        .and_then(|metadata| metadata.modified())
        .ok()
        .and_then(|modified| modified.elapsed().ok())
        .is_none_or(|elapsed| elapsed > expiration)
}

/// Downloads `url` into the cache as `file_name` unless a fresh copy exists.
pub fn fetch_cached(
    client: &reqwest::blocking::Client,
    url: &str,
    file_name: &str,
    force: bool,
) -> Result<PathBuf> {
    let target_path = get_cache_dir()?.join(file_name);

    if needs_download(&target_path, force, API_CACHE_EXPIRATION) {
        info!("Downloading {}", url);
        download_to_path(client, url, &target_path)?;
    } else {
        debug!("Using cached {}", target_path.display());
    }

    Ok(target_path)
}

/// Fetches and parses a CSGO-API endpoint through the cache.
pub fn fetch_endpoint<T: DeserializeOwned>(
    client: &reqwest::blocking::Client,
    endpoint: Endpoint,
    force: bool,
) -> Result<T> {
    let path = fetch_cached(client, &endpoint.url(), endpoint.file_name(), force)?;
    load_json(&path)
}

fn download_to_path(client: &reqwest::blocking::Client, url: &str, path: &Path) -> Result<()> {
    let mut response = client.get(url).send()?;
    if !response.status().is_success() {
        bail!("Failed to download {}: {}", url, response.status());
    }
    let total = response.content_length();

    // Partial downloads never become a valid cache entry.
    let partial_path = path.with_extension("part");
    let mut file = fs::File::create(&partial_path)?;
    let mut downloaded = 0u64;
    let mut buffer = [0u8; 65536];

    loop {
        let read = response.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        file.write_all(&buffer[..read])?;
        downloaded += read as u64;
    }
    file.flush()?;
    fs::rename(&partial_path, path)?;

    debug!(downloaded, ?total, "Finished download of {}", url);
    Ok(())
}

/// Downloads `url` into memory, failing on non-success statuses.
pub fn fetch_bytes(client: &reqwest::blocking::Client, url: &str) -> Result<Vec<u8>> {
    let response = client.get(url).send()?;
    if !response.status().is_success() {
        bail!("Failed to download {}: {}", url, response.status());
    }
    let bytes = response.bytes()?;
    info!("Successfully made request to: {}", url);
    Ok(bytes.to_vec())
}

pub fn http_client(user_agent: Option<&str>) -> Result<reqwest::blocking::Client> {
    let mut builder = reqwest::blocking::Client::builder();
    if let Some(user_agent) = user_agent {
        builder = builder.user_agent(user_agent.to_string());
    }
    Ok(builder.build()?)
}

/// Pool of User-Agent strings that requests are randomly spread over.
#[derive(Debug, Clone)]
pub struct UserAgents {
    agents: Vec<String>,
}

impl UserAgents {
    pub fn from_lines(content: &str) -> Self {
        let agents = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        Self { agents }
    }

    /// Reads one agent per line; a missing file yields an empty pool.
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(Self::from_lines(&content)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                warn!(
                    "User agent file {} not found, using the default agent",
                    path.display()
                );
                Ok(Self { agents: Vec::new() })
            }
            Err(err) => Err(err).with_context(|| format!("reading {}", path.display())),
        }
    }

    pub fn choose(&self) -> Option<&str> {
        self.agents.choose(&mut rand::rng()).map(String::as_str)
    }

    /// A client carrying a randomly chosen agent.
    pub fn client(&self) -> Result<reqwest::blocking::Client> {
        http_client(self.choose())
    }
}

/// Enforces a minimum delay between consecutive requests.
#[derive(Debug)]
pub struct Throttle {
    delay: Duration,
    last_request: Option<Instant>,
}

impl Throttle {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_request: None,
        }
    }

    pub fn wait(&mut self) {
        if let Some(last) = self.last_request {
            let elapsed = last.elapsed();
            if elapsed < self.delay {
                thread::sleep(self.delay - elapsed);
            }
        }
        self.last_request = Some(Instant::now());
    }
}

pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        bail!("File not found: {}", path.display());
    }
    let file = fs::File::open(path)?;
    let reader = io::BufReader::new(file);
    serde_json::from_reader(reader).with_context(|| format!("failed to parse {}", path.display()))
}

/// Writes `value` as pretty JSON with four-space indentation, keeping non-ASCII text.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = fs::File::create(path)?;
    let mut writer = io::BufWriter::new(file);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
    value
        .serialize(&mut serializer)
        .with_context(|| format!("failed to write {}", path.display()))?;
    writer.flush()?;
    info!("Wrote {}", path.display());
    Ok(())
}
