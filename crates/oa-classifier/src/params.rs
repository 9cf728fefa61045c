//! Entity extraction from query text.
//!
//! All functions expect the query already lowercased.

use std::sync::LazyLock;

use regex::Regex;

use oa_protocol::{QueryParameters, Season, TreeAgeCategory, Urgency};

use crate::error::{ClassifierError, ClassifierResult};
use crate::lexicon::Lexicon;

/// Scan order for season words; the first one present wins.
const SEASON_WORDS: [&str; 5] = ["spring", "summer", "autumn", "fall", "winter"];

static RE_NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?").unwrap());

// "5 year old", "12-year", "3 years"
static RE_TREE_AGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*-?\s*year").unwrap());

static RE_AGE_CATEGORY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(young|mature|old)").unwrap());

/// Extract every recognised entity from a lowercased query.
pub fn extract_parameters(query: &str, lexicon: &Lexicon) -> ClassifierResult<QueryParameters> {
    let mut params = QueryParameters {
        numbers: extract_numbers(query)?,
        season: extract_season(query),
        variety: extract_variety(query, lexicon.varieties()),
        ..Default::default()
    };

    match extract_tree_age(query) {
        Some(years) => params.tree_age = Some(years),
        None => params.tree_age_category = extract_age_category(query),
    }

    if lexicon
        .urgency_words()
        .iter()
        .any(|word| query.contains(word.as_str()))
    {
        params.urgency = Some(Urgency::High);
    }

    Ok(params)
}

/// Every numeric substring, in order of appearance.
fn extract_numbers(query: &str) -> ClassifierResult<Vec<f64>> {
    RE_NUMBER
        .find_iter(query)
        .map(|m| {
            m.as_str()
                .parse::<f64>()
                .map_err(|e| ClassifierError::Extraction(format!("{:?}: {e}", m.as_str())))
        })
        .collect()
}

/// First entry of `SEASON_WORDS` that starts a word in the query.
fn extract_season(query: &str) -> Option<Season> {
    SEASON_WORDS
        .iter()
        .find(|word| starts_word(query, word))
        .and_then(|word| Season::from_name(word))
}

/// `needle` occurs at the start of a word ("fall" but not "rainfall").
fn starts_word(query: &str, needle: &str) -> bool {
    query.match_indices(needle).any(|(i, _)| {
        query[..i]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphanumeric())
    })
}

/// Tree age in years. Ages that do not fit a `u32` are ignored.
fn extract_tree_age(query: &str) -> Option<u32> {
    let caps = RE_TREE_AGE.captures(query)?;
    caps[1].parse().ok()
}

fn extract_age_category(query: &str) -> Option<TreeAgeCategory> {
    let caps = RE_AGE_CATEGORY.captures(query)?;
    match &caps[1] {
        "young" => Some(TreeAgeCategory::Young),
        "mature" => Some(TreeAgeCategory::Mature),
        "old" => Some(TreeAgeCategory::Old),
        _ => None,
    }
}

/// First cultivar in lexicon order that the query mentions.
fn extract_variety(query: &str, varieties: &[String]) -> Option<String> {
    varieties
        .iter()
        .find(|variety| query.contains(variety.as_str()))
        .cloned()
}
