//! Skin cases, souvenir packages and sticker capsules from `crates.json`.

use anyhow::{Context, Result, anyhow};
use foldhash::HashMap;
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::model::{
    ApiContainer, ApiItem, Container, ItemContainerEntry, PhaseGroup, Rarity, SkinCase,
    SkinContainerEntry, SouvenirPackage, StickerCapsule,
};
use crate::names::{create_image_url, remove_skin_name_formatting};

/// Sticker capsules that can only be opened with a key.
/// Unformatted names of the sticker capsules that need a key.
const STICKER_CAPSULES_THAT_REQUIRE_KEYS: &[&str] = &["stickercapsule", "stickercapsule2"];

/// Float range per unformatted skin name.
pub type FloatRanges = HashMap<String, (f64, f64)>;

#[derive(Debug, Default)]
pub struct ContainerMetadata {
    pub skin_cases: BTreeMap<String, SkinCase>,
    pub souvenir_packages: BTreeMap<String, SouvenirPackage>,
    pub sticker_capsules: BTreeMap<String, StickerCapsule>,
}

/// Builds the float range table from the grouped `skins.json` listing.
pub fn float_ranges(skins: &[ApiItem]) -> FloatRanges {
    skins
        .iter()
        .map(|skin| {
            (
                remove_skin_name_formatting(&skin.name),
                (skin.min_float, skin.max_float),
            )
        })
        .collect()
}

pub fn run(
    api_data: &[ApiContainer],
    float_ranges: &FloatRanges,
    asset_domain: &str,
) -> Result<ContainerMetadata> {
    let mut metadata = ContainerMetadata::default();

    for datum in api_data {
        let unformatted_name = remove_skin_name_formatting(&datum.name);
        match datum.container_type.as_deref() {
            Some("Case") => {
                let case = skin_container(datum, float_ranges, asset_domain, true, true)?;
                metadata.skin_cases.insert(unformatted_name, case);
            }
            Some("Souvenir") => {
                let package = skin_container(datum, float_ranges, asset_domain, false, false)?;
                metadata.souvenir_packages.insert(unformatted_name, package);
            }
            Some("Sticker Capsule") => {
                let capsule = sticker_capsule(datum, asset_domain)?;
                metadata.sticker_capsules.insert(unformatted_name, capsule);
            }
            other => debug!("Skipping container {} of type {:?}", datum.name, other),
        }
    }

    info!(
        "Generated {} cases, {} souvenir packages, {} sticker capsules",
        metadata.skin_cases.len(),
        metadata.souvenir_packages.len(),
        metadata.sticker_capsules.len()
    );
    Ok(metadata)
}

fn skin_entry(item: &ApiItem, float_ranges: &FloatRanges) -> Result<SkinContainerEntry> {
    let unformatted_name = remove_skin_name_formatting(&item.name);
    let &(min_float, max_float) = float_ranges
        .get(&unformatted_name)
        .ok_or_else(|| anyhow!("no float range known for {}", item.name))?;
    Ok(SkinContainerEntry {
        phase_group: PhaseGroup::from_unformatted_name(&unformatted_name),
        unformatted_name,
        min_float,
        max_float,
    })
}

fn skin_container(
    datum: &ApiContainer,
    float_ranges: &FloatRanges,
    asset_domain: &str,
    requires_key: bool,
    include_rare: bool,
) -> Result<Container<SkinContainerEntry>> {
    let mut contains: BTreeMap<Rarity, Vec<SkinContainerEntry>> = BTreeMap::new();
    for item in &datum.contains {
        let rarity = Rarity::from_api_id(&item.rarity_id)
            .with_context(|| format!("{} in {}", item.name, datum.name))?;
        contains
            .entry(rarity)
            .or_default()
            .push(skin_entry(item, float_ranges)?);
    }
    let contains_rare = if include_rare {
        datum
            .contains_rare
            .iter()
            .map(|item| skin_entry(item, float_ranges))
            .collect::<Result<Vec<_>>>()
            .with_context(|| format!("rare drops of {}", datum.name))?
    } else {
        Vec::new()
    };

    Ok(Container {
        formatted_name: datum.name.clone(),
        price: 0,
        image_url: create_image_url(asset_domain, &remove_skin_name_formatting(&datum.name)),
        requires_key,
        contains,
        contains_rare,
    })
}

fn sticker_capsule(datum: &ApiContainer, asset_domain: &str) -> Result<StickerCapsule> {
    let unformatted_name = remove_skin_name_formatting(&datum.name);
    let mut contains: BTreeMap<Rarity, Vec<ItemContainerEntry>> = BTreeMap::new();
    for item in &datum.contains {
        let rarity = Rarity::from_api_id(&item.rarity_id)
            .with_context(|| format!("{} in {}", item.name, datum.name))?;
        contains.entry(rarity).or_default().push(ItemContainerEntry {
            unformatted_name: remove_skin_name_formatting(&item.name),
        });
    }

    Ok(Container {
        formatted_name: datum.name.clone(),
        price: 0,
        image_url: create_image_url(asset_domain, &unformatted_name),
        requires_key: STICKER_CAPSULES_THAT_REQUIRE_KEYS.contains(&unformatted_name.as_str()),
        contains,
        contains_rare: Vec::new(),
    })
}
