//! Item name handling: asset keys, variant names and asset URLs.

use lazy_static::lazy_static;
use regex::Regex;

use crate::condition::Condition;

const STAR: &str = "★";
const STATTRAK: &str = "StatTrak™";
const SOUVENIR: &str = "Souvenir";

lazy_static! {
    static ref DESCRIPTION_REGEX: Regex = Regex::new(r"<i>(.*?)</i>").unwrap();
}

/// Converts a display name into its asset key: lowercase, alphanumerics only.
///
/// `"★ StatTrak™ Karambit | Doppler - Phase 2 (Factory New)"` becomes
/// `"stattrakkarambitdopplerphase2factorynew"`.
pub fn remove_skin_name_formatting(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Catalogue variants of a single skin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    Normal,
    StatTrak,
    Souvenir,
}

impl Variant {
    /// Applies the variant to a formatted name.
    ///
    /// StatTrak goes after the star on knives and gloves (`"★ StatTrak™ ..."`),
    /// otherwise in front of the name.
    pub fn apply(self, formatted_name: &str) -> String {
        match self {
            Variant::Normal => formatted_name.to_string(),
            Variant::StatTrak if formatted_name.contains(STAR) => {
                formatted_name.replace(STAR, &format!("{STAR} {STATTRAK}"))
            }
            Variant::StatTrak => format!("{STATTRAK} {formatted_name}"),
            Variant::Souvenir => format!("{SOUVENIR} {formatted_name}"),
        }
    }

    /// Prefix the variant contributes to asset keys.
    pub fn key_prefix(self) -> &'static str {
        match self {
            Variant::Normal => "",
            Variant::StatTrak => "stattrak",
            Variant::Souvenir => "souvenir",
        }
    }

    /// Variants present for a skin with the given API flags, normal first.
    pub fn available(stattrak: bool, souvenir: bool) -> Vec<Variant> {
        let mut variants = vec![Variant::Normal];
        if stattrak {
            variants.push(Variant::StatTrak);
        }
        if souvenir {
            variants.push(Variant::Souvenir);
        }
        variants
    }
}

pub fn is_doppler(formatted_name: &str) -> bool {
    formatted_name.contains("Doppler")
}

/// `"<name> (<condition>)"`.
pub fn with_condition(formatted_name: &str, condition: Condition) -> String {
    format!("{formatted_name} ({condition})")
}

/// `"<name> - <phase> (<condition>)"`, the form used for Doppler skins.
pub fn with_phase_and_condition(formatted_name: &str, phase: &str, condition: Condition) -> String {
    format!("{formatted_name} - {phase} ({condition})")
}

/// Inserts a Doppler phase in front of the condition suffix of a full name.
///
/// `"★ Karambit | Doppler (Factory New)"` with `"Ruby"` becomes
/// `"★ Karambit | Doppler - Ruby (Factory New)"`. Names without a condition
/// suffix get the phase appended. Anything after a second `(` is dropped.
pub fn insert_phase(full_name: &str, phase: &str) -> String {
    let mut parts = full_name.split('(');
    let name = parts.next().unwrap_or_default().trim();
    match parts.next() {
        Some(condition) => format!("{} - {} ({}", name, phase, condition.trim()),
        None => format!("{} - {}", name, phase),
    }
}

/// Public URL of a generated image for an asset key.
pub fn create_image_url(asset_domain: &str, unformatted_name: &str) -> String {
    format!(
        "{}/generated/images/unformatted/{}.png",
        asset_domain.trim_end_matches('/'),
        unformatted_name
    )
}

/// Extracts the flavour text between the first `<i>` and `</i>` on one line.
pub fn extract_description(html: &str) -> Option<String> {
    DESCRIPTION_REGEX
        .captures(html)
        .map(|captures| captures[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_formatting() {
        assert_eq!(
            remove_skin_name_formatting("AK-47 | Redline (Field-Tested)"),
            "ak47redlinefieldtested"
        );
        assert_eq!(
            remove_skin_name_formatting("★ StatTrak™ Karambit | Doppler - Phase 2 (Factory New)"),
            "stattrakkarambitdopplerphase2factorynew"
        );
        assert_eq!(remove_skin_name_formatting("Sticker Capsule 2"), "stickercapsule2");
    }

    #[test]
    fn test_variant_names() {
        let name = "AK-47 | Redline (Field-Tested)";
        assert_eq!(Variant::Normal.apply(name), name);
        assert_eq!(
            Variant::StatTrak.apply(name),
            "StatTrak™ AK-47 | Redline (Field-Tested)"
        );
        assert_eq!(
            Variant::Souvenir.apply(name),
            "Souvenir AK-47 | Redline (Field-Tested)"
        );
        assert_eq!(
            Variant::StatTrak.apply("★ Karambit | Fade (Factory New)"),
            "★ StatTrak™ Karambit | Fade (Factory New)"
        );
    }

    #[test]
    fn test_variant_key_prefix_matches_unformatted_name() {
        let name = "★ Karambit | Fade (Factory New)";
        for variant in [Variant::StatTrak, Variant::Souvenir] {
            let key = remove_skin_name_formatting(&variant.apply(name));
            assert!(key.starts_with(variant.key_prefix()), "{key}");
        }
    }

    #[test]
    fn test_available_variants() {
        assert_eq!(Variant::available(false, false), vec![Variant::Normal]);
        assert_eq!(
            Variant::available(true, true),
            vec![Variant::Normal, Variant::StatTrak, Variant::Souvenir]
        );
    }

    #[test]
    fn test_phase_names() {
        assert_eq!(
            with_phase_and_condition("★ Karambit | Doppler", "Ruby", Condition::FactoryNew),
            "★ Karambit | Doppler - Ruby (Factory New)"
        );
        assert_eq!(
            insert_phase("★ Karambit | Doppler (Factory New)", "Ruby"),
            "★ Karambit | Doppler - Ruby (Factory New)"
        );
        assert_eq!(
            insert_phase("★ Karambit | Doppler", "Phase 1"),
            "★ Karambit | Doppler - Phase 1"
        );
        assert_eq!(
            insert_phase("★ Karambit | Doppler (Factory New) (Holo)", "Phase 3"),
            "★ Karambit | Doppler - Phase 3 (Factory New)"
        );
        assert!(is_doppler("★ Bayonet | Gamma Doppler"));
        assert!(!is_doppler("AWP | Asiimov"));
    }

    #[test]
    fn test_image_url() {
        assert_eq!(
            create_image_url("https://assets.example.com/", "ak47redline"),
            "https://assets.example.com/generated/images/unformatted/ak47redline.png"
        );
    }

    #[test]
    fn test_extract_description() {
        assert_eq!(
            extract_description("Painted red.<br><br><i>Some quote</i> and more"),
            Some("Some quote".to_string())
        );
        assert_eq!(extract_description("<i>broken\nline</i>"), None);
        assert_eq!(
            extract_description("<i>a\nb</i><i>c</i>"),
            Some("c".to_string())
        );
        assert_eq!(
            extract_description("<i>outer <i>inner</i> tail</i>"),
            Some("outer <i>inner".to_string())
        );
        assert_eq!(extract_description("no flavour"), None);
    }
}
