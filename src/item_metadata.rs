//! `skin_metadata.json` and `sticker_metadata.json` from the combined `all.json` dump.

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::condition::Condition;
use crate::config::is_vanilla_knife;
use crate::model::{ApiItem, Rarity, SkinMetadatum, StickerMetadatum};
use crate::names;

#[derive(Debug, Default)]
pub struct ItemMetadata {
    pub skins: BTreeMap<String, SkinMetadatum>,
    pub stickers: BTreeMap<String, StickerMetadatum>,
}

/// Sorts `all.json` entries into skins and stickers by their id.
pub fn run(api_data: &Map<String, Value>, asset_domain: &str) -> Result<ItemMetadata> {
    let mut metadata = ItemMetadata::default();

    for (id, raw) in api_data {
        let is_skin = id.contains("skin");
        if !is_skin && !id.contains("sticker") {
            continue;
        }
        let datum: ApiItem = serde_json::from_value(raw.clone())
            .with_context(|| format!("failed to parse item {id}"))?;
        if is_skin {
            process_skin(&mut metadata.skins, &datum, asset_domain)?;
        } else {
            process_sticker(&mut metadata.stickers, &datum, asset_domain)?;
        }
    }

    info!(
        "Generated metadata for {} skins and {} stickers",
        metadata.skins.len(),
        metadata.stickers.len()
    );
    Ok(metadata)
}

fn process_skin(
    metadata: &mut BTreeMap<String, SkinMetadatum>,
    datum: &ApiItem,
    asset_domain: &str,
) -> Result<()> {
    if is_vanilla_knife(&datum.name) {
        process_vanilla_knife(metadata, datum, asset_domain);
        return Ok(());
    }

    let formatted_name = match &datum.phase {
        Some(phase) if names::is_doppler(&datum.name) => names::insert_phase(&datum.name, phase),
        _ => datum.name.clone(),
    };
    let unformatted_name = names::remove_skin_name_formatting(&formatted_name);
    let rarity = Rarity::from_api_id(&datum.rarity_id)
        .with_context(|| format!("skin {}", datum.name))?;

    metadata.insert(
        unformatted_name.clone(),
        SkinMetadatum {
            formatted_name,
            rarity,
            price: 0,
            image_url: names::create_image_url(asset_domain, &unformatted_name),
            description: names::extract_description(&datum.description),
            min_float: datum.min_float,
            max_float: datum.max_float,
        },
    );
    Ok(())
}

fn process_vanilla_knife(
    metadata: &mut BTreeMap<String, SkinMetadatum>,
    datum: &ApiItem,
    asset_domain: &str,
) {
    debug!("Expanding vanilla knife {}", datum.name);
    for condition in Condition::ALL {
        let formatted_name = names::with_condition(&datum.name, condition);
        let unformatted_name = names::remove_skin_name_formatting(&formatted_name);
        metadata.insert(
            unformatted_name.clone(),
            SkinMetadatum {
                formatted_name,
                rarity: Rarity::Ancient,
                price: 0,
                image_url: names::create_image_url(asset_domain, &unformatted_name),
                description: None,
                min_float: 0.0,
                max_float: 1.0,
            },
        );
    }
}

fn process_sticker(
    metadata: &mut BTreeMap<String, StickerMetadatum>,
    datum: &ApiItem,
    asset_domain: &str,
) -> Result<()> {
    let unformatted_name = names::remove_skin_name_formatting(&datum.name);
    let rarity = Rarity::from_api_id(&datum.rarity_id)
        .with_context(|| format!("sticker {}", datum.name))?;
    metadata.insert(
        unformatted_name.clone(),
        StickerMetadatum {
            formatted_name: datum.name.clone(),
            rarity,
            price: 0,
            image_url: names::create_image_url(asset_domain, &unformatted_name),
        },
    );
    Ok(())
}
