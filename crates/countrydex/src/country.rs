//! Core country types for countrydex.
//!
//! This module defines the raw upstream record as the country API sends it,
//! the fixed-shape [`CountryRecord`] the rest of the crate works with, and
//! the projection between the two.

use std::cmp::Ordering;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::config::FlagConfig;

/// Region used when the upstream record has none.
pub const UNKNOWN_REGION: &str = "Unknown";

/// Capital used when the upstream record has none.
pub const NO_CAPITAL: &str = "N/A";

/// Regions offered for filtering.
pub const REGIONS: &[&str] = &["Africa", "Americas", "Antarctic", "Asia", "Europe", "Oceania"];

/// A country as returned by the country API.
///
/// Every field is optional: the upstream data is not uniform and
/// normalization must never fail.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawCountry {
    /// Name block; only `common` is used.
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<RawName>,
    /// ISO 3166-1 alpha-2 code.
    #[serde(default, deserialize_with = "lenient")]
    pub cca2: Option<String>,
    /// Broad geographic region.
    #[serde(default, deserialize_with = "lenient")]
    pub region: Option<String>,
    /// Capital city, or several.
    #[serde(default, deserialize_with = "lenient")]
    pub capital: Option<RawCapital>,
    /// Population count.
    #[serde(default, deserialize_with = "lenient")]
    pub population: Option<serde_json::Number>,
}

/// The `name` object of an upstream record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawName {
    /// Common English name.
    #[serde(default, deserialize_with = "lenient")]
    pub common: Option<String>,
}

/// Upstream capital field: a single string or a list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RawCapital {
    /// A single capital.
    One(String),
    /// Zero or more capitals (e.g. Bolivia, South Africa).
    Many(Vec<Option<String>>),
}

/// Read a field of an unexpected JSON type as missing instead of failing
/// the whole record.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// A normalized country.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CountryRecord {
    /// Common name.
    pub name: String,
    /// Two-letter country code.
    pub code: String,
    /// Region, or `"Unknown"`.
    pub region: String,
    /// Comma-joined capitals, or `"N/A"`.
    pub capital: String,
    /// Population, 0 when unknown.
    pub population: u64,
}

impl From<RawCountry> for CountryRecord {
    fn from(raw: RawCountry) -> Self {
        normalize(raw)
    }
}

/// Project an upstream record into a [`CountryRecord`].
///
/// Missing or odd fields fall back to `"Unknown"`, `"N/A"` and `0`.
#[must_use]
pub fn normalize(raw: RawCountry) -> CountryRecord {
    let name = raw.name.and_then(|n| n.common).unwrap_or_default();
    let code = raw.cca2.unwrap_or_default();

    let region = raw
        .region
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| UNKNOWN_REGION.to_string());

    let capitals: Vec<String> = match raw.capital {
        None => Vec::new(),
        Some(RawCapital::One(c)) => vec![c],
        Some(RawCapital::Many(list)) => list.into_iter().flatten().collect(),
    };
    let capital = capitals
        .into_iter()
        .filter(|c| !c.is_empty())
        .collect::<Vec<_>>()
        .join(", ");
    let capital = if capital.is_empty() {
        NO_CAPITAL.to_string()
    } else {
        capital
    };

    // Negative, fractional or out-of-range counts are treated as unknown.
    let population = raw.population.and_then(|n| n.as_u64()).unwrap_or(0);

    CountryRecord {
        name,
        code,
        region,
        capital,
        population,
    }
}

impl CountryRecord {
    /// URL of this country's flag image.
    #[must_use]
    pub fn flag_url(&self, flags: &FlagConfig) -> String {
        flag_url(flags, &self.code)
    }
}

/// Build the flag image URL for a country code.
///
/// ```
/// use countrydex::config::FlagConfig;
/// use countrydex::country::flag_url;
///
/// assert_eq!(
///     flag_url(&FlagConfig::default(), "FI"),
///     "https://flagcdn.com/w160/fi.png"
/// );
/// ```
#[must_use]
pub fn flag_url(flags: &FlagConfig, code: &str) -> String {
    format!(
        "{}/w{}/{}.png",
        flags.cdn_base.trim_end_matches('/'),
        flags.width,
        code.to_lowercase()
    )
}

/// Sort countries by name, in place, using [`compare_names`].
pub fn sort_by_name(countries: &mut [CountryRecord]) {
    countries.sort_by(|a, b| compare_names(&a.name, &b.name));
}

/// Locale-aware name ordering.
///
/// Names compare first on a folded form that ignores case and Latin
/// diacritics, so "Åland Islands" lands between "Afghanistan" and "Albania".
/// Ties fall back to plain string order to keep the sort total.
#[must_use]
pub fn compare_names(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.cmp(b))
}

/// Case- and accent-folded form of a name used for ordering.
#[must_use]
pub fn collation_key(name: &str) -> String {
    let mut key = String::with_capacity(name.len());
    for c in name.chars() {
        match fold_char(c) {
            Folded::Char(f) => key.push(f),
            Folded::Str(s) => key.push_str(s),
        }
    }
    key
}

enum Folded {
    Char(char),
    Str(&'static str),
}

fn fold_char(c: char) -> Folded {
    let base = match c {
        'À'..='Å' | 'à'..='å' | 'Ā'..='ą' => 'a',
        'Ç' | 'ç' | 'Ć'..='č' => 'c',
        'Ď'..='đ' => 'd',
        'È'..='Ë' | 'è'..='ë' | 'Ē'..='ě' => 'e',
        'Ĝ'..='ģ' => 'g',
        'Ĥ'..='ħ' => 'h',
        'Ì'..='Ï' | 'ì'..='ï' | 'Ĩ'..='ı' => 'i',
        'Ĵ' | 'ĵ' => 'j',
        'Ķ' | 'ķ' => 'k',
        'Ĺ'..='ł' => 'l',
        'Ñ' | 'ñ' | 'Ń'..='ň' => 'n',
        'Ò'..='Ö' | 'Ø' | 'ò'..='ö' | 'ø' | 'Ō'..='ő' => 'o',
        'Ŕ'..='ř' => 'r',
        'Ś'..='š' => 's',
        'Ţ'..='ŧ' => 't',
        'Ù'..='Ü' | 'ù'..='ü' | 'Ũ'..='ų' => 'u',
        'Ŵ' | 'ŵ' => 'w',
        'Ý' | 'ý' | 'ÿ' | 'Ŷ' | 'ŷ' | 'Ÿ' => 'y',
        'Ź'..='ž' => 'z',
        'Æ' | 'æ' => return Folded::Str("ae"),
        'Œ' | 'œ' => return Folded::Str("oe"),
        'ß' => return Folded::Str("ss"),
        'Þ' | 'þ' => return Folded::Str("th"),
        'Ð' | 'ð' => 'd',
        _ => {
            let mut lower = c.to_lowercase();
            return match (lower.next(), lower.next()) {
                (Some(l), None) => Folded::Char(l),
                _ => Folded::Char(c),
            };
        }
    };
    Folded::Char(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(json: &str) -> RawCountry {
        serde_json::from_str(json).expect("valid raw country")
    }

    #[test]
    fn test_normalize_full_record() {
        let record = normalize(raw(
            r#"{"name":{"common":"Finland"},"cca2":"FI","region":"Europe",
                "capital":["Helsinki"],"population":5530719}"#,
        ));

        assert_eq!(record.name, "Finland");
        assert_eq!(record.code, "FI");
        assert_eq!(record.region, "Europe");
        assert_eq!(record.capital, "Helsinki");
        assert_eq!(record.population, 5_530_719);
    }

    #[test]
    fn test_normalize_joins_multiple_capitals() {
        let record = normalize(raw(
            r#"{"name":{"common":"Bolivia"},"cca2":"BO","region":"Americas",
                "capital":["Sucre","La Paz"],"population":11673029}"#,
        ));
        assert_eq!(record.capital, "Sucre, La Paz");
    }

    #[test]
    fn test_normalize_single_string_capital() {
        let record = normalize(raw(r#"{"capital":"Oslo"}"#));
        assert_eq!(record.capital, "Oslo");
    }

    #[test]
    fn test_normalize_empty_capital_is_na() {
        assert_eq!(normalize(raw(r#"{"capital":[]}"#)).capital, "N/A");
        assert_eq!(normalize(raw(r#"{"capital":""}"#)).capital, "N/A");
        assert_eq!(normalize(raw(r#"{"capital":null}"#)).capital, "N/A");
        assert_eq!(normalize(raw("{}")).capital, "N/A");
    }

    #[test]
    fn test_normalize_drops_empty_capital_entries() {
        let record = normalize(raw(r#"{"capital":["", "Pretoria", null, "Cape Town"]}"#));
        assert_eq!(record.capital, "Pretoria, Cape Town");
    }

    #[test]
    fn test_normalize_missing_region_is_unknown() {
        assert_eq!(normalize(raw("{}")).region, "Unknown");
        assert_eq!(normalize(raw(r#"{"region":""}"#)).region, "Unknown");
        assert_eq!(normalize(raw(r#"{"region":null}"#)).region, "Unknown");
    }

    #[test]
    fn test_normalize_population_fallbacks() {
        assert_eq!(normalize(raw("{}")).population, 0);
        assert_eq!(normalize(raw(r#"{"population":null}"#)).population, 0);
        assert_eq!(normalize(raw(r#"{"population":-5}"#)).population, 0);
        assert_eq!(normalize(raw(r#"{"population":0}"#)).population, 0);
    }

    #[test]
    fn test_normalize_missing_name_and_code() {
        let record = normalize(raw(r#"{"name":{}}"#));
        assert_eq!(record.name, "");
        assert_eq!(record.code, "");
    }

    #[test]
    fn test_odd_field_types_read_as_missing() {
        let records: Vec<RawCountry> = serde_json::from_str(
            r#"[
                {"name":{"common":42},"cca2":7,"region":["Europe"],"capital":12,"population":"many"},
                {"name":"Finland","cca2":"FI","region":"Europe","capital":{"x":1}},
                {"name":{"common":"Sweden"},"cca2":"SE","region":"Europe","capital":["Stockholm"],"population":10353442}
            ]"#,
        )
        .unwrap();
        assert_eq!(records.len(), 3);

        let odd = normalize(records[0].clone());
        assert_eq!(odd.name, "");
        assert_eq!(odd.code, "");
        assert_eq!(odd.region, "Unknown");
        assert_eq!(odd.capital, "N/A");
        assert_eq!(odd.population, 0);

        let partial = normalize(records[1].clone());
        assert_eq!(partial.name, "");
        assert_eq!(partial.code, "FI");
        assert_eq!(partial.capital, "N/A");

        assert_eq!(normalize(records[2].clone()).capital, "Stockholm");
    }

    #[test]
    fn test_from_raw() {
        let record: CountryRecord = raw(r#"{"cca2":"SE"}"#).into();
        assert_eq!(record.code, "SE");
    }

    #[test]
    fn test_flag_url_lowercases_code() {
        let flags = FlagConfig::default();
        assert_eq!(flag_url(&flags, "FI"), "https://flagcdn.com/w160/fi.png");
    }

    #[test]
    fn test_flag_url_custom_config() {
        let flags = FlagConfig {
            cdn_base: "https://cdn.example.org/".to_string(),
            width: 320,
        };
        assert_eq!(flag_url(&flags, "se"), "https://cdn.example.org/w320/se.png");
    }

    #[test]
    fn test_collation_key_folds_accents_and_case() {
        assert_eq!(collation_key("Åland Islands"), "aland islands");
        assert_eq!(collation_key("Côte d'Ivoire"), "cote d'ivoire");
        assert_eq!(collation_key("Curaçao"), "curacao");
        assert_eq!(collation_key("São Tomé and Príncipe"), "sao tome and principe");
    }

    #[test]
    fn test_compare_names_locale_aware() {
        assert_eq!(compare_names("Åland Islands", "Albania"), Ordering::Less);
        assert_eq!(compare_names("Afghanistan", "Åland Islands"), Ordering::Less);
        assert_eq!(compare_names("réunion", "Russia"), Ordering::Less);
        assert_eq!(compare_names("Chad", "Chad"), Ordering::Equal);
    }

    #[test]
    fn test_sort_by_name() {
        let mut countries: Vec<CountryRecord> = ["Zimbabwe", "Åland Islands", "Albania", "Afghanistan"]
            .into_iter()
            .map(|name| CountryRecord {
                name: name.to_string(),
                code: String::new(),
                region: UNKNOWN_REGION.to_string(),
                capital: NO_CAPITAL.to_string(),
                population: 0,
            })
            .collect();

        sort_by_name(&mut countries);

        let names: Vec<&str> = countries.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Afghanistan", "Åland Islands", "Albania", "Zimbabwe"]);
    }

    #[test]
    fn test_record_serialization() {
        let record = normalize(raw(r#"{"name":{"common":"Chad"},"cca2":"TD"}"#));
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains(r#""code":"TD""#));
        assert!(json.contains(r#""capital":"N/A""#));
    }
}
