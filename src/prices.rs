//! Price refresh for `skin_data.json` from Skinport's item listing.

use foldhash::HashMap;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::condition::Condition;
use crate::config::is_vanilla_knife;
use crate::model::{PhaseGroup, Skin};
use crate::names;

/// One row of `https://api.skinport.com/v1/items`.
#[derive(Debug, Clone, Deserialize)]
pub struct SkinportItem {
    pub market_hash_name: String,
    #[serde(default)]
    pub suggested_price: Option<Decimal>,
}

/// Collected price quotes in cents, keyed by formatted name.
#[derive(Debug, Default)]
pub struct PriceQuotes {
    quotes: HashMap<String, Vec<u64>>,
}

impl PriceQuotes {
    /// Starts with an empty quote list for every known skin.
    pub fn for_skins(skin_data: &BTreeMap<String, Skin>) -> Self {
        let quotes = skin_data
            .values()
            .map(|skin| (skin.formatted_name.clone(), Vec::new()))
            .collect();
        Self { quotes }
    }

    /// Records `price` for `name` if it is a known skin. Returns whether it was.
    pub fn add(&mut self, name: &str, price: u64) -> bool {
        match self.quotes.get_mut(name) {
            Some(quotes) => {
                quotes.push(price);
                true
            }
            None => false,
        }
    }

    /// Truncated mean of the quotes for `name`, zero when there are none.
    pub fn mean(&self, name: &str) -> u64 {
        match self.quotes.get(name) {
            Some(quotes) if !quotes.is_empty() => {
                let sum: u128 = quotes.iter().map(|&q| u128::from(q)).sum();
                (sum / quotes.len() as u128) as u64
            }
            _ => 0,
        }
    }
}

/// Converts a decimal price into whole cents, truncating. Negative prices yield `None`.
pub fn price_to_cents(price: Decimal) -> Option<u64> {
    (price * Decimal::ONE_HUNDRED).trunc().to_u64()
}

/// Spreads Skinport quotes over the matching skin names.
///
/// Vanilla knife quotes apply to every condition; Doppler quotes apply to
/// every phase name that exists in the catalogue.
pub fn aggregate_skinport_prices(quotes: &mut PriceQuotes, items: &[SkinportItem]) {
    let mut matched = 0usize;
    for item in items {
        let Some(price) = item.suggested_price.and_then(price_to_cents) else {
            continue;
        };
        let name = item.market_hash_name.as_str();

        if is_vanilla_knife(name) {
            for condition in Condition::ALL {
                quotes.add(&names::with_condition(name, condition), price);
            }
            matched += 1;
            continue;
        }

        let phase_group = PhaseGroup::from_unformatted_name(&names::remove_skin_name_formatting(name));
        let added = match phase_group {
            Some(group) => group
                .phases()
                .iter()
                .map(|phase| quotes.add(&name.replace('(', &format!("- {phase} (")), price))
                .fold(false, |any, added| any || added),
            None => quotes.add(name, price),
        };
        if added {
            matched += 1;
        } else {
            debug!("No skin for Skinport listing {}", name);
        }
    }
    info!("Matched {} of {} Skinport listings", matched, items.len());
}

/// Writes the mean quote into every skin record.
pub fn apply_prices(skin_data: &mut BTreeMap<String, Skin>, quotes: &PriceQuotes) {
    for skin in skin_data.values_mut() {
        skin.price = quotes.mean(&skin.formatted_name);
    }
}

/// Refreshes all prices in `skin_data` from the given Skinport listing.
pub fn run(skin_data: &mut BTreeMap<String, Skin>, items: &[SkinportItem]) {
    let mut quotes = PriceQuotes::for_skins(skin_data);
    aggregate_skinport_prices(&mut quotes, items);
    apply_prices(skin_data, &quotes);
    let priced = skin_data.values().filter(|skin| skin.price > 0).count();
    info!("Priced {} of {} skins", priced, skin_data.len());
}
