use std::sync::LazyLock;

use regex::Regex;

use crate::parser::types::{parse_type, ARRAY_PREFIX};

static RETURNS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:on success,|returns)([^.]*)(?:on success)?").unwrap());
static RETURNED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([^.]*)(?:is returned)").unwrap());
static ARRAY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)(?:array of )+(\w*)").unwrap());

/// Find the return types named in a method's description.
///
/// `None` means no return clause was found yet; the caller keeps whatever it
/// had and tries again once the description grows.
pub fn infer(description: &[String]) -> Option<Vec<String>> {
    let text = description.join("\n");
    let caps = RETURNS_RE
        .captures(&text)
        .or_else(|| RETURNED_RE.captures(&text))?;
    Some(from_clause(caps[1].trim()))
}

/// Turn the interior of a return clause into type names.
pub fn from_clause(clause: &str) -> Vec<String> {
    if let Some(caps) = ARRAY_RE.captures(clause) {
        return parse_type(&caps[1])
            .into_iter()
            .map(|t| format!("{}{}", ARRAY_PREFIX, t))
            .collect();
    }

    // Capitalized words are type names, everything else is prose.
    clause
        .split_whitespace()
        .filter(|word| word.chars().next().is_some_and(char::is_uppercase))
        .flat_map(|word| {
            let stripped: String = word.chars().filter(|c| !c.is_ascii_punctuation()).collect();
            parse_type(&stripped)
        })
        .collect()
}
