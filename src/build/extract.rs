//! Heuristic extraction of features and technology tags from README text.
//!
//! Both extractors are pure functions of the document text. Their ordering,
//! truncation and cap rules are part of the page contract: the feature grid
//! follows document order and the tag list follows [`TECH_KEYWORDS`] order.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::util::truncate_chars;

/// Maximum number of features shown on a page.
pub const MAX_FEATURES: usize = 8;

/// Maximum number of technology tags shown on a page.
pub const MAX_TECH_TAGS: usize = 10;

/// Maximum length (in characters) of a feature name.
pub const MAX_FEATURE_NAME_CHARS: usize = 50;

/// Plain bullets must be longer than this to count as a feature.
const MIN_PLAIN_BULLET_CHARS: usize = 10;

/// The closed technology vocabulary. Output order is this order.
pub const TECH_KEYWORDS: &[&str] = &[
    "SwiftUI",
    "Swift",
    "Combine",
    "OpenAI",
    "Pinecone",
    "RAG",
    "Vision",
    "CoreML",
    "Apple Intelligence",
    "MCP",
    "Computer Use",
    "Code Interpreter",
    "MVVM",
    "EventKit",
];

static BULLET: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-*]\s+(.+)$").unwrap());

static BOLD_BULLET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\*\*([^*]+)\*\*[:\s]*(.*)$").unwrap());

static ATX_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6})(?:\s+(.*?))?\s*#*\s*$").unwrap());

static FEATURES_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(core\s+)?features?$").unwrap());

/// A capability extracted from a README's Features section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Feature {
    pub name: String,
    pub description: String,
}

impl Feature {
    fn new(name: &str, description: &str) -> Self {
        Self {
            name: truncate_chars(name.trim(), MAX_FEATURE_NAME_CHARS).to_string(),
            description: description.trim().to_string(),
        }
    }
}

/// Extract up to [`MAX_FEATURES`] features from the first "Features" or
/// "Core Features" section.
///
/// Returns an empty list when the document has no such section.
pub fn extract_features(text: &str) -> Vec<Feature> {
    let mut features = Vec::new();

    for line in features_section(text) {
        if features.len() >= MAX_FEATURES {
            break;
        }
        let Some(bullet) = BULLET.captures(line.trim_end()) else {
            continue;
        };
        let content = bullet[1].trim_end();

        if let Some(bold) = BOLD_BULLET.captures(content) {
            let name = bold[1].trim();
            features.push(Feature::new(name, &bold[2]));
        } else if content.chars().count() > MIN_PLAIN_BULLET_CHARS {
            features.push(Feature::new(content, ""));
        }
    }

    features
}

/// The lines of the first Features section, without its heading.
///
/// The section ends at the next heading of the same or a higher level.
/// Lines inside fenced code blocks are never treated as headings.
fn features_section(text: &str) -> Vec<&str> {
    let mut section = Vec::new();
    let mut section_level: Option<usize> = None;
    let mut in_fence = false;

    for line in text.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
            continue;
        }

        let heading = if in_fence || line.starts_with(' ') {
            None
        } else {
            ATX_HEADING.captures(line).map(|caps| {
                let level = caps[1].len();
                let title = caps.get(2).map_or("", |m| m.as_str()).trim().to_string();
                (level, title)
            })
        };

        match (section_level, heading) {
            (None, Some((level, title))) if FEATURES_TITLE.is_match(&title) => {
                section_level = Some(level);
            }
            (Some(current), Some((level, _))) if level <= current => break,
            (Some(_), _) if !in_fence => section.push(line),
            (Some(_), _) => {}
            (None, _) => {}
        }
    }

    section
}

/// Extract the technology keywords mentioned anywhere in the text.
///
/// Matching is a case-insensitive substring search. A keyword that only
/// ever appears inside a longer vocabulary keyword ("Swift" inside
/// "SwiftUI") does not count on its own.
pub fn extract_tech_tags(text: &str) -> Vec<&'static str> {
    let haystack = text.to_lowercase();
    TECH_KEYWORDS
        .iter()
        .copied()
        .filter(|keyword| mentions(&haystack, keyword))
        .take(MAX_TECH_TAGS)
        .collect()
}

/// Whether `keyword` occurs in the lowercased `haystack` at least once
/// outside every occurrence of a longer keyword that contains it.
fn mentions(haystack: &str, keyword: &str) -> bool {
    let needle = keyword.to_lowercase();
    let covering: Vec<(usize, usize)> = TECH_KEYWORDS
        .iter()
        .map(|other| other.to_lowercase())
        .filter(|other| other.len() > needle.len() && other.contains(&needle))
        .flat_map(|other| {
            haystack
                .match_indices(&other)
                .map(|(start, found)| (start, start + found.len()))
                .collect::<Vec<_>>()
        })
        .collect();

    haystack.match_indices(&needle).any(|(start, _)| {
        let end = start + needle.len();
        !covering.iter().any(|&(from, to)| from <= start && end <= to)
    })
}
