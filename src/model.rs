//! API input records and the catalogue records written to the output directory.

use anyhow::{Result, bail};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

/// A single item from the CSGO-API item database, flattened from the raw JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiItem {
    /// Formatted display name, e.g. "AK-47 | Redline".
    pub name: String,
    /// Raw HTML description.
    pub description: String,
    /// Rarity identifier, e.g. "rarity_rare_weapon".
    pub rarity_id: String,
    /// Rarity display name, e.g. "Mil-Spec Grade".
    pub rarity_name: String,
    /// Lower wear bound; `0.0` when the API omits it.
    pub min_float: f64,
    /// Upper wear bound; `1.0` when the API omits it.
    pub max_float: f64,
    /// Doppler phase, only present on Doppler finishes.
    pub phase: Option<String>,
    pub stattrak: bool,
    pub souvenir: bool,
    /// Remote image URL.
    pub image: Option<String>,
}

impl<'de> Deserialize<'de> for ApiItem {
    /// Flattens the nested `rarity` object and fills in missing float bounds.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize, Default)]
        struct RarityProxy {
            #[serde(default)]
            id: String,
            #[serde(default)]
            name: String,
        }

        #[derive(Deserialize)]
        struct Proxy {
            name: String,
            description: Option<String>,
            rarity: Option<RarityProxy>,
            min_float: Option<f64>,
            max_float: Option<f64>,
            phase: Option<String>,
            stattrak: Option<bool>,
            souvenir: Option<bool>,
            image: Option<String>,
        }

        let proxy = Proxy::deserialize(deserializer)?;
        let rarity = proxy.rarity.unwrap_or_default();

        Ok(ApiItem {
            name: proxy.name,
            description: proxy.description.unwrap_or_default(),
            rarity_id: rarity.id,
            rarity_name: rarity.name,
            min_float: proxy.min_float.unwrap_or(0.0),
            max_float: proxy.max_float.unwrap_or(1.0),
            phase: proxy.phase,
            stattrak: proxy.stattrak.unwrap_or(false),
            souvenir: proxy.souvenir.unwrap_or(false),
            image: proxy.image,
        })
    }
}

/// A case, souvenir package or sticker capsule from `crates.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiContainer {
    pub name: String,
    #[serde(rename = "type", default)]
    pub container_type: Option<String>,
    #[serde(default)]
    pub contains: Vec<ApiItem>,
    #[serde(default)]
    pub contains_rare: Vec<ApiItem>,
}

/// Item rarity, serialized as its integer rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Mythical,
    Legendary,
    Ancient,
    Contraband,
}

impl Rarity {
    const ALL: [Rarity; 7] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::Mythical,
        Rarity::Legendary,
        Rarity::Ancient,
        Rarity::Contraband,
    ];

    /// Maps a CSGO-API rarity id (weapon, sticker or agent flavour) to a rarity.
    pub fn from_api_id(id: &str) -> Result<Self> {
        let rarity = match id {
            "rarity_common_weapon" | "rarity_common" | "rarity_default" => Rarity::Common,
            "rarity_uncommon_weapon" | "rarity_uncommon" => Rarity::Uncommon,
            "rarity_rare_weapon" | "rarity_rare" => Rarity::Rare,
            "rarity_mythical_weapon" | "rarity_mythical" => Rarity::Mythical,
            "rarity_legendary_weapon" | "rarity_legendary" => Rarity::Legendary,
            "rarity_ancient_weapon" | "rarity_ancient" => Rarity::Ancient,
            "rarity_contraband_weapon" | "rarity_contraband" => Rarity::Contraband,
            other => bail!("unknown rarity id: {other:?}"),
        };
        Ok(rarity)
    }
}

impl Serialize for Rarity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

impl<'de> Deserialize<'de> for Rarity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let rank = u8::deserialize(deserializer)?;
        Self::ALL
            .get(rank as usize)
            .copied()
            .ok_or_else(|| serde::de::Error::custom(format!("invalid rarity rank {rank}")))
    }
}

/// Doppler pattern family, serialized as its integer rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseGroup {
    Doppler,
    GammaDoppler,
}

impl PhaseGroup {
    pub fn from_unformatted_name(unformatted_name: &str) -> Option<Self> {
        if unformatted_name.contains("gammadoppler") {
            Some(PhaseGroup::GammaDoppler)
        } else if unformatted_name.contains("doppler") {
            Some(PhaseGroup::Doppler)
        } else {
            None
        }
    }

    /// Phases a price quote for this family fans out to.
    pub fn phases(self) -> &'static [&'static str] {
        match self {
            PhaseGroup::Doppler => &[
                "Phase 1",
                "Phase 2",
                "Phase 3",
                "Phase 4",
                "Ruby",
                "Sapphire",
                "Black Pearl",
            ],
            PhaseGroup::GammaDoppler => &["Phase 1", "Phase 2", "Phase 3", "Phase 4", "Emerald"],
        }
    }
}

impl Serialize for PhaseGroup {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

/// One condition/variant of a skin in `skin_data.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skin {
    pub formatted_name: String,
    pub description: Option<String>,
    pub image_url: String,
    /// Rarity display name as given by the API.
    pub rarity: String,
    pub min_float: f64,
    pub max_float: f64,
    /// Price in cents.
    pub price: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkinMetadatum {
    pub formatted_name: String,
    pub rarity: Rarity,
    pub price: u64,
    pub image_url: String,
    pub description: Option<String>,
    pub min_float: f64,
    pub max_float: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StickerMetadatum {
    pub formatted_name: String,
    pub rarity: Rarity,
    pub price: u64,
    pub image_url: String,
}

/// A skin that can drop from a container.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkinContainerEntry {
    pub unformatted_name: String,
    pub min_float: f64,
    pub max_float: f64,
    pub phase_group: Option<PhaseGroup>,
}

/// A non-skin item (sticker) that can drop from a container.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemContainerEntry {
    pub unformatted_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Container<E> {
    pub formatted_name: String,
    pub price: u64,
    pub image_url: String,
    pub requires_key: bool,
    pub contains: BTreeMap<Rarity, Vec<E>>,
    pub contains_rare: Vec<E>,
}

pub type SkinCase = Container<SkinContainerEntry>;
pub type SouvenirPackage = Container<SkinContainerEntry>;
pub type StickerCapsule = Container<ItemContainerEntry>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_api_item_flattens_rarity_and_defaults_floats() {
        let item: ApiItem = serde_json::from_value(json!({
            "name": "★ Karambit",
            "description": "<i>sharp</i>",
            "rarity": {"id": "rarity_ancient_weapon", "name": "Covert"},
            "min_float": null,
            "stattrak": true
        }))
        .unwrap();
        assert_eq!(item.rarity_id, "rarity_ancient_weapon");
        assert_eq!(item.rarity_name, "Covert");
        assert_eq!(item.min_float, 0.0);
        assert_eq!(item.max_float, 1.0);
        assert!(item.stattrak);
        assert!(!item.souvenir);
        assert_eq!(item.phase, None);
    }

    #[test]
    fn test_rarity_from_api_id() {
        assert_eq!(Rarity::from_api_id("rarity_rare_weapon").unwrap(), Rarity::Rare);
        assert_eq!(Rarity::from_api_id("rarity_default").unwrap(), Rarity::Common);
        assert_eq!(Rarity::from_api_id("rarity_ancient").unwrap(), Rarity::Ancient);
        assert!(Rarity::from_api_id("rarity_unheard_of").is_err());
    }

    #[test]
    fn test_rarity_serializes_as_rank_and_map_key() {
        assert_eq!(serde_json::to_value(Rarity::Mythical).unwrap(), json!(3));
        let mut contains = BTreeMap::new();
        contains.insert(Rarity::Legendary, vec![ItemContainerEntry {
            unformatted_name: "x".to_string(),
        }]);
        let value = serde_json::to_value(&contains).unwrap();
        assert_eq!(value, json!({"4": [{"unformatted_name": "x"}]}));
        let back: Rarity = serde_json::from_value(json!(6)).unwrap();
        assert_eq!(back, Rarity::Contraband);
    }

    #[test]
    fn test_phase_group_detection() {
        assert_eq!(
            PhaseGroup::from_unformatted_name("karambitgammadopplerfactorynew"),
            Some(PhaseGroup::GammaDoppler)
        );
        assert_eq!(
            PhaseGroup::from_unformatted_name("karambitdopplerfactorynew"),
            Some(PhaseGroup::Doppler)
        );
        assert_eq!(PhaseGroup::from_unformatted_name("ak47redline"), None);
        assert_eq!(PhaseGroup::GammaDoppler.phases().len(), 5);
    }
}
