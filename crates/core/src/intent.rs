use crate::models::Intent;

const PROBLEM_KEYWORDS: &[&str] = &["مشكلة", "عطل", "ما يشتغل"];

const RECOMMENDATION_KEYWORDS: &[&str] = &["اريد", "أريد", "احسن", "افضل", "برنامج لـ"];

const QUOTE_CHARS: &[char] = &['\'', '"', '`', '‘', '’', '“', '”', '«', '»'];

pub fn normalize_text(input: &str) -> String {
    input
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

/// Trims, lowercases and drops quote characters from a model answer.
pub fn normalize_label(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .filter(|ch| !QUOTE_CHARS.contains(ch))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Keyword heuristic used whenever the remote classifier is unavailable.
/// Problem keywords win over recommendation keywords; never yields
/// `GreetingOrChat`.
pub fn classify_fallback(text: &str) -> Intent {
    if contains_any(text, PROBLEM_KEYWORDS) {
        return Intent::ProblemReport;
    }

    if contains_any(text, RECOMMENDATION_KEYWORDS) {
        return Intent::AppRecommendation;
    }

    Intent::AppSearch
}

fn contains_any(input: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| input.contains(needle))
}
