//! Filtering of the country collection.
//!
//! A pure function of the collection and the current inputs; the result is
//! recomputed from scratch whenever an input changes.

use serde::{Deserialize, Serialize};

use crate::country::CountryRecord;
use crate::favourites::Favourites;

/// Current filter inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    /// Free text matched against country names.
    pub query: String,
    /// Exact region to keep; `None` or empty keeps every region.
    pub region: Option<String>,
    /// Keep only favourited countries.
    pub favourites_only: bool,
}

impl Filter {
    /// The active region, if any.
    #[must_use]
    pub fn region(&self) -> Option<&str> {
        self.region.as_deref().filter(|r| !r.is_empty())
    }

    /// Check a single record against this filter.
    #[must_use]
    pub fn matches(&self, country: &CountryRecord, favourites: &Favourites) -> bool {
        Matcher::new(self, favourites).matches(country)
    }
}

/// Keep the countries that pass `filter`, preserving input order.
#[must_use]
pub fn apply<'a>(
    countries: &'a [CountryRecord],
    filter: &Filter,
    favourites: &Favourites,
) -> Vec<&'a CountryRecord> {
    let matcher = Matcher::new(filter, favourites);
    countries.iter().filter(|c| matcher.matches(c)).collect()
}

/// A filter with its query pre-normalized for a linear scan.
struct Matcher<'f> {
    term: String,
    region: Option<&'f str>,
    favourites: Option<&'f Favourites>,
}

impl<'f> Matcher<'f> {
    fn new(filter: &'f Filter, favourites: &'f Favourites) -> Self {
        Self {
            term: filter.query.trim().to_lowercase(),
            region: filter.region(),
            favourites: filter.favourites_only.then_some(favourites),
        }
    }

    fn matches(&self, country: &CountryRecord) -> bool {
        (self.term.is_empty() || country.name.to_lowercase().contains(&self.term))
            && self.region.map_or(true, |r| country.region == r)
            && self.favourites.map_or(true, |f| f.contains(&country.code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn country(name: &str, code: &str, region: &str) -> CountryRecord {
        CountryRecord {
            name: name.to_string(),
            code: code.to_string(),
            region: region.to_string(),
            capital: "N/A".to_string(),
            population: 0,
        }
    }

    fn sample() -> Vec<CountryRecord> {
        vec![
            country("Finland", "FI", "Europe"),
            country("France", "FR", "Europe"),
            country("Japan", "JP", "Asia"),
            country("Niger", "NE", "Africa"),
            country("Nigeria", "NG", "Africa"),
        ]
    }

    fn names<'a>(list: &[&'a CountryRecord]) -> Vec<&'a str> {
        list.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_empty_filter_returns_everything_in_order() {
        let countries = sample();
        let result = apply(&countries, &Filter::default(), &Favourites::new());

        assert_eq!(result.len(), countries.len());
        assert!(result.iter().zip(&countries).all(|(a, b)| *a == b));
    }

    #[test]
    fn test_empty_region_string_is_unset() {
        let countries = sample();
        let filter = Filter {
            region: Some(String::new()),
            ..Filter::default()
        };
        assert_eq!(apply(&countries, &filter, &Favourites::new()).len(), 5);
        assert!(filter.region().is_none());
    }

    #[test]
    fn test_query_is_case_insensitive_substring() {
        let countries = sample();
        let filter = Filter {
            query: "  NIG ".to_string(),
            ..Filter::default()
        };
        let result = apply(&countries, &filter, &Favourites::new());
        assert_eq!(names(&result), ["Niger", "Nigeria"]);
    }

    #[test]
    fn test_query_matches_inside_name() {
        let countries = sample();
        let filter = Filter {
            query: "an".to_string(),
            ..Filter::default()
        };
        let result = apply(&countries, &filter, &Favourites::new());
        assert_eq!(names(&result), ["Finland", "France", "Japan"]);
    }

    #[test]
    fn test_region_is_exact_match() {
        let countries = sample();
        let filter = Filter {
            region: Some("Europe".to_string()),
            ..Filter::default()
        };
        let result = apply(&countries, &filter, &Favourites::new());
        assert_eq!(names(&result), ["Finland", "France"]);

        let filter = Filter {
            region: Some("europe".to_string()),
            ..Filter::default()
        };
        assert!(apply(&countries, &filter, &Favourites::new()).is_empty());
    }

    #[test]
    fn test_query_and_region_combine() {
        let countries = sample();
        let filter = Filter {
            query: "f".to_string(),
            region: Some("Europe".to_string()),
            favourites_only: false,
        };
        let result = apply(&countries, &filter, &Favourites::new());
        assert_eq!(names(&result), ["Finland", "France"]);
    }

    #[test]
    fn test_favourites_only_with_no_favourites_is_empty() {
        let countries = sample();
        for (query, region) in [("", None), ("fin", None), ("", Some("Asia")), ("x", Some("Europe"))] {
            let filter = Filter {
                query: query.to_string(),
                region: region.map(String::from),
                favourites_only: true,
            };
            assert!(apply(&countries, &filter, &Favourites::new()).is_empty());
        }
    }

    #[test]
    fn test_favourites_only_keeps_favourites() {
        let countries = sample();
        let favs: Favourites = ["JP", "FI"].into_iter().collect();
        let filter = Filter {
            favourites_only: true,
            ..Filter::default()
        };
        let result = apply(&countries, &filter, &favs);
        assert_eq!(names(&result), ["Finland", "Japan"]);
    }

    #[test]
    fn test_favourites_ignored_when_flag_off() {
        let countries = sample();
        let favs: Favourites = ["JP"].into_iter().collect();
        assert_eq!(apply(&countries, &Filter::default(), &favs).len(), 5);
    }

    #[test]
    fn test_matches_single_record() {
        let fi = country("Finland", "FI", "Europe");
        let filter = Filter {
            query: "FIN".to_string(),
            ..Filter::default()
        };
        assert!(filter.matches(&fi, &Favourites::new()));
    }
}
