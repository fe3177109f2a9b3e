//! Country dial codes for the phone-number picker.
//!
//! Ranking:
//! - `+<digits>` or bare digits: dial-code prefix match
//! - exact ISO code: 1.0
//! - name prefix: 0.97
//! - word prefix: 0.95
//! - otherwise Jaro-Winkler similarity on the lowercased name

use strsim::jaro_winkler;

/// Minimum similarity for a fuzzy name match.
const MIN_SIMILARITY: f64 = 0.80;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Country {
    /// ISO 3166-1 alpha-2
    pub iso: &'static str,
    pub name: &'static str,
    pub dial_code: &'static str,
}

const fn country(iso: &'static str, name: &'static str, dial_code: &'static str) -> Country {
    Country {
        iso,
        name,
        dial_code,
    }
}

pub const DEFAULT_COUNTRY: Country = country("IN", "India", "+91");

pub const COUNTRIES: &[Country] = &[
    DEFAULT_COUNTRY,
    country("AE", "United Arab Emirates", "+971"),
    country("AU", "Australia", "+61"),
    country("BD", "Bangladesh", "+880"),
    country("BH", "Bahrain", "+973"),
    country("CA", "Canada", "+1"),
    country("DE", "Germany", "+49"),
    country("FR", "France", "+33"),
    country("GB", "United Kingdom", "+44"),
    country("ID", "Indonesia", "+62"),
    country("IE", "Ireland", "+353"),
    country("IT", "Italy", "+39"),
    country("JP", "Japan", "+81"),
    country("KE", "Kenya", "+254"),
    country("KW", "Kuwait", "+965"),
    country("LK", "Sri Lanka", "+94"),
    country("MY", "Malaysia", "+60"),
    country("NP", "Nepal", "+977"),
    country("NZ", "New Zealand", "+64"),
    country("OM", "Oman", "+968"),
    country("PH", "Philippines", "+63"),
    country("PK", "Pakistan", "+92"),
    country("QA", "Qatar", "+974"),
    country("SA", "Saudi Arabia", "+966"),
    country("SG", "Singapore", "+65"),
    country("US", "United States", "+1"),
    country("ZA", "South Africa", "+27"),
];

/// Look up a country by ISO code (case-insensitive).
pub fn country_by_iso(iso: &str) -> Option<&'static Country> {
    COUNTRIES.iter().find(|c| c.iso.eq_ignore_ascii_case(iso.trim()))
}

/// Search the catalog. An empty query returns the catalog in display order.
pub fn search_countries(query: &str, limit: usize) -> Vec<&'static Country> {
    let query = query.trim();
    if query.is_empty() {
        return COUNTRIES.iter().take(limit).collect();
    }

    let digits = query.trim_start_matches('+');
    if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
        let mut matches: Vec<&Country> = COUNTRIES
            .iter()
            .filter(|c| c.dial_code[1..].starts_with(digits))
            .collect();
        // Exact dial code first, then shorter codes
        matches.sort_by_key(|c| (c.dial_code.len() != digits.len() + 1, c.dial_code.len()));
        matches.truncate(limit);
        return matches;
    }

    let needle = query.to_lowercase();
    let mut scored: Vec<(f64, &Country)> = COUNTRIES
        .iter()
        .map(|c| (score(c, &needle), c))
        .filter(|(s, _)| *s >= MIN_SIMILARITY)
        .collect();

    scored.sort_by(|a, b| {
        b.0.partial_cmp(&a.0)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.1.name.cmp(b.1.name))
    });

    scored.into_iter().take(limit).map(|(_, c)| c).collect()
}

fn score(country: &Country, needle: &str) -> f64 {
    if country.iso.eq_ignore_ascii_case(needle) {
        return 1.0;
    }
    let name = country.name.to_lowercase();
    if name.starts_with(needle) {
        return 0.97;
    }
    // Match against each word too so "arabia" finds Saudi Arabia
    name.split_whitespace()
        .map(|word| {
            if word.starts_with(needle) {
                0.95
            } else {
                jaro_winkler(word, needle)
            }
        })
        .fold(jaro_winkler(&name, needle), f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_lists_catalog() {
        let all = search_countries("", 100);
        assert_eq!(all.len(), COUNTRIES.len());
        assert_eq!(all[0].iso, "IN");
    }

    #[test]
    fn test_iso_lookup() {
        assert_eq!(country_by_iso("gb").unwrap().dial_code, "+44");
        assert!(country_by_iso("XX").is_none());
    }

    #[test]
    fn test_dial_code_search() {
        let results = search_countries("+9", 50);
        assert!(results.iter().all(|c| c.dial_code.starts_with("+9")));
        assert!(results.iter().any(|c| c.iso == "IN"));

        let exact = search_countries("+91", 5);
        assert_eq!(exact[0].iso, "IN");

        let shared = search_countries("1", 5);
        assert!(shared.iter().any(|c| c.iso == "US"));
        assert!(shared.iter().any(|c| c.iso == "CA"));
    }

    #[test]
    fn test_name_prefix_ranks_first() {
        let results = search_countries("ind", 5);
        assert_eq!(results[0].name, "India");
        assert!(results.iter().any(|c| c.name == "Indonesia"));
    }

    #[test]
    fn test_fuzzy_name_match() {
        let results = search_countries("singapur", 3);
        assert_eq!(results[0].iso, "SG");

        let results = search_countries("arabia", 3);
        assert_eq!(results[0].iso, "SA");
    }

    #[test]
    fn test_no_match() {
        assert!(search_countries("zzzzzz", 5).is_empty());
    }
}
