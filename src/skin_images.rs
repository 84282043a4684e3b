//! Skin image generation.
//!
//! Each skin gets at most three raw images, one per wear slot (FN/MW, FT/WW,
//! BS). Every available condition is then exposed under its full asset key
//! as a relative symlink into `images/raw`. StatTrak and Souvenir copies are
//! bordered in their variant colour.

use anyhow::{Context, Result, anyhow};
use foldhash::HashMap;
use image::{ImageFormat, Rgba, RgbaImage, imageops};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::condition::{Condition, conditions_for_range};
use crate::config::is_vanilla_knife;
use crate::model::ApiItem;
use crate::names::{self, Variant, remove_skin_name_formatting};

/// Width in pixels of the variant border.
pub const BORDER_WIDTH: u32 = 3;

/// Only one listing carries images for this skin, and it is the souvenir one.
const SOUVENIR_IMAGE_ONLY: &str = "MP5-SD | Lab Rats";

/// Conditions sharing each raw image slot, best first.
const IMAGE_SLOTS: [&[Condition]; 3] = [
    &[Condition::FactoryNew, Condition::MinimalWear],
    &[Condition::FieldTested, Condition::WellWorn],
    &[Condition::BattleScarred],
];

pub fn image_slot(condition: Condition) -> usize {
    match condition {
        Condition::FactoryNew | Condition::MinimalWear => 0,
        Condition::FieldTested | Condition::WellWorn => 1,
        Condition::BattleScarred => 2,
    }
}

fn border_colour(variant: Variant) -> Option<Rgba<u8>> {
    match variant {
        Variant::Normal => None,
        Variant::StatTrak => Some(Rgba([0xFF, 0xD7, 0x00, 0xFF])),
        Variant::Souvenir => Some(Rgba([0xCF, 0x6A, 0x32, 0xFF])),
    }
}

/// Remote image URL per listing name, from `skins_not_grouped.json`.
///
/// Doppler listings are keyed as `"<name> - <phase>"`.
#[derive(Debug, Default)]
pub struct ImageIndex {
    urls: HashMap<String, String>,
}

impl ImageIndex {
    pub fn build(listings: &[ApiItem]) -> Self {
        let mut urls = HashMap::default();
        for listing in listings {
            let Some(image) = &listing.image else {
                continue;
            };
            let key = match &listing.phase {
                Some(phase) if names::is_doppler(&listing.name) => {
                    format!("{} - {}", listing.name, phase)
                }
                _ => listing.name.clone(),
            };
            urls.insert(key, image.clone());
        }
        Self { urls }
    }

    fn get(&self, key: &str) -> Result<&str> {
        self.urls
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| anyhow!("no image listed for {key:?}"))
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

/// One download saved under one raw name per variant.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageDownload {
    pub url: String,
    pub raw_images: Vec<(Variant, String)>,
}

/// A symlink `unformatted/<link_name>.png` → `raw/<raw_name>.png`.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageLink {
    pub raw_name: String,
    pub link_name: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkinImagePlan {
    pub downloads: Vec<ImageDownload>,
    pub links: Vec<ImageLink>,
}

/// Works out what to download and link for one grouped skin.
pub fn plan_skin(datum: &ApiItem, images: &ImageIndex) -> Result<SkinImagePlan> {
    if is_vanilla_knife(&datum.name) {
        return plan_vanilla_knife(datum, images);
    }

    let available = conditions_for_range(datum.min_float, datum.max_float)
        .with_context(|| format!("invalid float range for {}", datum.name))?;
    let variants = Variant::available(datum.stattrak, datum.souvenir);
    let phase = datum.phase.as_deref().filter(|_| names::is_doppler(&datum.name));

    let base = match phase {
        Some(phase) => format!(
            "{}{}",
            remove_skin_name_formatting(&datum.name),
            remove_skin_name_formatting(phase)
        ),
        None => remove_skin_name_formatting(&datum.name),
    };

    let mut plan = SkinImagePlan::default();
    for (slot, conditions) in IMAGE_SLOTS.iter().enumerate() {
        let Some(&condition) = conditions.iter().find(|c| available.contains(c)) else {
            continue;
        };
        let listing = match phase {
            Some(phase) => format!("{} ({}) - {}", datum.name, condition, phase),
            None if datum.name == SOUVENIR_IMAGE_ONLY => {
                Variant::Souvenir.apply(&names::with_condition(&datum.name, condition))
            }
            None => names::with_condition(&datum.name, condition),
        };
        plan.downloads.push(ImageDownload {
            url: images.get(&listing)?.to_string(),
            raw_images: variants
                .iter()
                .map(|&variant| (variant, format!("{}{}{}", variant.key_prefix(), base, slot)))
                .collect(),
        });
    }

    for condition in available {
        let slot = image_slot(condition);
        let condition_key = remove_skin_name_formatting(condition.label());
        for variant in &variants {
            let prefix = variant.key_prefix();
            plan.links.push(ImageLink {
                raw_name: format!("{prefix}{base}{slot}"),
                link_name: format!("{prefix}{base}{condition_key}"),
            });
        }
    }

    Ok(plan)
}

/// Vanilla knives have a single image shared by every condition, plus a StatTrak copy.
fn plan_vanilla_knife(datum: &ApiItem, images: &ImageIndex) -> Result<SkinImagePlan> {
    let base = remove_skin_name_formatting(&datum.name);
    let variants = [Variant::Normal, Variant::StatTrak];

    let download = ImageDownload {
        url: images.get(&datum.name)?.to_string(),
        raw_images: variants
            .iter()
            .map(|&variant| (variant, format!("{}{}", variant.key_prefix(), base)))
            .collect(),
    };

    let mut links = Vec::new();
    for condition in Condition::ALL {
        let condition_key = remove_skin_name_formatting(condition.label());
        for variant in variants {
            let prefix = variant.key_prefix();
            links.push(ImageLink {
                raw_name: format!("{prefix}{base}"),
                link_name: format!("{prefix}{base}{condition_key}"),
            });
        }
    }

    Ok(SkinImagePlan {
        downloads: vec![download],
        links,
    })
}

/// Writes one raw image, bordering variant copies.
pub fn save_skin_image(raw_dir: &Path, name: &str, bytes: &[u8], variant: Variant) -> Result<()> {
    let path = raw_dir.join(format!("{name}.png"));
    match border_colour(variant) {
        None => fs::write(&path, bytes)?,
        Some(colour) => {
            let image = image::load_from_memory(bytes)
                .with_context(|| format!("decoding image for {name}"))?
                .to_rgba8();
            let mut bordered = RgbaImage::from_pixel(
                image.width() + 2 * BORDER_WIDTH,
                image.height() + 2 * BORDER_WIDTH,
                colour,
            );
            imageops::replace(&mut bordered, &image, BORDER_WIDTH.into(), BORDER_WIDTH.into());
            bordered
                .save_with_format(&path, ImageFormat::Png)
                .with_context(|| format!("writing {}", path.display()))?;
        }
    }
    Ok(())
}

/// Links `unformatted/<link>.png` to `../raw/<raw>.png`, replacing a stale link.
pub fn create_skin_symlink(unformatted_dir: &Path, link: &ImageLink) -> Result<()> {
    let destination = unformatted_dir.join(format!("{}.png", link.link_name));
    if fs::symlink_metadata(&destination).is_ok() {
        fs::remove_file(&destination)?;
    }
    let source = Path::new("..")
        .join("raw")
        .join(format!("{}.png", link.raw_name));

    #[cfg(unix)]
    std::os::unix::fs::symlink(&source, &destination)
        .with_context(|| format!("linking {}", destination.display()))?;

    #[cfg(not(unix))]
    fs::copy(unformatted_dir.join(&source), &destination)
        .with_context(|| format!("copying {}", destination.display()))?;

    Ok(())
}

/// Downloads, saves and links everything in `plan`.
pub fn execute_plan<F>(
    plan: &SkinImagePlan,
    raw_dir: &Path,
    unformatted_dir: &Path,
    fetch: &mut F,
) -> Result<()>
where
    F: FnMut(&str) -> Result<Vec<u8>>,
{
    for download in &plan.downloads {
        let bytes = fetch(&download.url)?;
        for (variant, raw_name) in &download.raw_images {
            save_skin_image(raw_dir, raw_name, &bytes, *variant)?;
        }
    }
    for link in &plan.links {
        create_skin_symlink(unformatted_dir, link)?;
    }
    Ok(())
}

/// Generates images for every grouped skin, fetching through `fetch`.
pub fn run<F>(
    skins: &[ApiItem],
    images: &ImageIndex,
    raw_dir: &Path,
    unformatted_dir: &Path,
    mut fetch: F,
) -> Result<()>
where
    F: FnMut(&str) -> Result<Vec<u8>>,
{
    fs::create_dir_all(raw_dir)?;
    fs::create_dir_all(unformatted_dir)?;

    let total = skins.len();
    for (count, datum) in skins.iter().enumerate() {
        match &datum.phase {
            Some(phase) if names::is_doppler(&datum.name) => info!(
                "Starting item {}/{}: {} - {}",
                count + 1,
                total,
                datum.name,
                phase
            ),
            _ => info!("Starting item {}/{}: {}", count + 1, total, datum.name),
        }
        let plan = plan_skin(datum, images)?;
        execute_plan(&plan, raw_dir, unformatted_dir, &mut fetch)
            .with_context(|| format!("generating images for {}", datum.name))?;
    }
    Ok(())
}
