//! `skin_data.json`: one record per skin, condition and variant, priced at zero.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use tracing::info;

use crate::condition::conditions_for_range;
use crate::model::{ApiItem, Skin};
use crate::names::{self, Variant};

/// Expands every skin into its condition and variant records, keyed by asset key.
pub fn run(api_data: &[ApiItem], asset_domain: &str) -> Result<BTreeMap<String, Skin>> {
    let mut result = BTreeMap::new();

    for datum in api_data {
        let conditions = conditions_for_range(datum.min_float, datum.max_float)
            .with_context(|| format!("invalid float range for {}", datum.name))?;
        let description = names::extract_description(&datum.description);

        for condition in conditions {
            let full_formatted_name = match (&datum.phase, names::is_doppler(&datum.name)) {
                (Some(phase), true) => {
                    names::with_phase_and_condition(&datum.name, phase, condition)
                }
                _ => names::with_condition(&datum.name, condition),
            };

            for variant in Variant::available(datum.stattrak, datum.souvenir) {
                let formatted_name = variant.apply(&full_formatted_name);
                let unformatted_name = names::remove_skin_name_formatting(&formatted_name);
                let skin = Skin {
                    image_url: names::create_image_url(asset_domain, &unformatted_name),
                    formatted_name,
                    description: description.clone(),
                    rarity: datum.rarity_name.clone(),
                    min_float: datum.min_float,
                    max_float: datum.max_float,
                    price: 0,
                };
                result.insert(unformatted_name, skin);
            }
        }
    }

    info!("Generated {} skin records", result.len());
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const DOMAIN: &str = "https://assets.example.com";

    fn items(value: serde_json::Value) -> Vec<ApiItem> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_conditions_follow_float_range() {
        let data = items(json!([{
            "name": "AK-47 | Redline",
            "description": "Painted.<i>Red lines.</i>",
            "rarity": {"id": "rarity_legendary_weapon", "name": "Classified"},
            "min_float": 0.1,
            "max_float": 0.7
        }]));

        let result = run(&data, DOMAIN).unwrap();

        let keys: Vec<&str> = result.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec![
                "ak47redlinebattlescarred",
                "ak47redlinefieldtested",
                "ak47redlineminimalwear",
                "ak47redlinewellworn"
            ]
        );
        let skin = &result["ak47redlinefieldtested"];
        assert_eq!(skin.formatted_name, "AK-47 | Redline (Field-Tested)");
        assert_eq!(skin.description.as_deref(), Some("Red lines."));
        assert_eq!(skin.rarity, "Classified");
        assert_eq!(skin.price, 0);
        assert_eq!(
            skin.image_url,
            "https://assets.example.com/generated/images/unformatted/ak47redlinefieldtested.png"
        );
    }

    #[test]
    fn test_stattrak_and_souvenir_variants() {
        let data = items(json!([
            {
                "name": "★ Karambit | Fade",
                "rarity": {"id": "rarity_ancient_weapon", "name": "Covert"},
                "min_float": 0.0,
                "max_float": 0.07,
                "stattrak": true
            },
            {
                "name": "AWP | Dragon Lore",
                "rarity": {"id": "rarity_ancient_weapon", "name": "Covert"},
                "min_float": 0.0,
                "max_float": 0.07,
                "souvenir": true
            }
        ]));

        let result = run(&data, DOMAIN).unwrap();

        assert_eq!(result.len(), 4);
        assert_eq!(
            result["stattrakkarambitfadefactorynew"].formatted_name,
            "★ StatTrak™ Karambit | Fade (Factory New)"
        );
        assert_eq!(
            result["souvenirawpdragonlorefactorynew"].formatted_name,
            "Souvenir AWP | Dragon Lore (Factory New)"
        );
        assert!(result["souvenirawpdragonlorefactorynew"]
            .image_url
            .ends_with("/souvenirawpdragonlorefactorynew.png"));
    }

    #[test]
    fn test_doppler_phase_in_name() {
        let data = items(json!([{
            "name": "★ Karambit | Doppler",
            "rarity": {"id": "rarity_ancient_weapon", "name": "Covert"},
            "min_float": 0.0,
            "max_float": 0.08,
            "phase": "Ruby"
        }]));

        let result = run(&data, DOMAIN).unwrap();

        assert_eq!(
            result["karambitdopplerrubyminimalwear"].formatted_name,
            "★ Karambit | Doppler - Ruby (Minimal Wear)"
        );
        assert!(result.contains_key("karambitdopplerrubyfactorynew"));
    }

    #[test]
    fn test_vanilla_knife_without_floats_gets_every_condition() {
        let data = items(json!([{
            "name": "★ Karambit",
            "rarity": {"id": "rarity_ancient_weapon", "name": "Covert"},
            "min_float": null,
            "max_float": null,
            "stattrak": true
        }]));

        let result = run(&data, DOMAIN).unwrap();

        assert_eq!(result.len(), 10);
        assert!(result.contains_key("stattrakkarambitbattlescarred"));
    }

    #[test]
    fn test_invalid_range_aborts_with_item_name() {
        let data = items(json!([{
            "name": "Broken | Skin",
            "min_float": 0.5,
            "max_float": 0.5
        }]));

        let err = run(&data, DOMAIN).unwrap_err();
        assert!(err.to_string().contains("Broken | Skin"));
    }
}
