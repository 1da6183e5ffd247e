use std::env;

/// Words of a road name must be longer than this to count, which filters
/// suffixes like "St", "Rd" and "Ave".
pub const MIN_SIGNIFICANT_WORD_LEN: usize = 3;

/// Share of significant words that must appear in the address.
pub const WORD_OVERLAP_RATIO: f64 = 0.5;

/// Heuristic thresholds for fuzzy road matching. Both are tunable through
/// the environment (`ROAD_MATCH_MIN_WORD_LEN`, `ROAD_MATCH_WORD_RATIO`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoadMatchSettings {
    pub min_significant_word_len: usize,
    pub word_overlap_ratio: f64,
}

impl Default for RoadMatchSettings {
    fn default() -> Self {
        Self {
            min_significant_word_len: MIN_SIGNIFICANT_WORD_LEN,
            word_overlap_ratio: WORD_OVERLAP_RATIO,
        }
    }
}

impl RoadMatchSettings {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let min_significant_word_len = env::var("ROAD_MATCH_MIN_WORD_LEN")
            .ok()
            .and_then(|value| value.trim().parse().ok())
            .unwrap_or(defaults.min_significant_word_len);
        let word_overlap_ratio = env::var("ROAD_MATCH_WORD_RATIO")
            .ok()
            .and_then(|value| value.trim().parse::<f64>().ok())
            .filter(|ratio| ratio.is_finite() && *ratio >= 0.0)
            .unwrap_or(defaults.word_overlap_ratio);
        Self {
            min_significant_word_len,
            word_overlap_ratio,
        }
    }

    /// Case insensitive match of a free text address against one road name:
    /// either the whole road name occurs in the address, or enough of its
    /// significant words do.
    pub fn matches(&self, address: &str, road: &str) -> bool {
        let road = road.trim().to_lowercase();
        // a blank list entry matches nothing
        if road.is_empty() {
            return false;
        }
        let address = address.to_lowercase();
        if address.contains(&road) {
            return true;
        }

        let significant = road
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|word| word.chars().count() > self.min_significant_word_len)
            .collect::<Vec<_>>();
        let matched = significant
            .iter()
            .filter(|word| address.contains(*word))
            .count();
        let required = (significant.len() as f64 * self.word_overlap_ratio).floor();
        let required = (required as usize).max(1);

        matched >= required
    }

    pub fn matches_any<S: AsRef<str>>(&self, address: &str, roads: &[S]) -> bool {
        roads.iter().any(|road| self.matches(address, road.as_ref()))
    }
}

pub fn matches_road(address: &str, road: &str) -> bool {
    RoadMatchSettings::default().matches(address, road)
}

pub fn matches_any_road<S: AsRef<str>>(address: &str, roads: &[S]) -> bool {
    RoadMatchSettings::default().matches_any(address, roads)
}
