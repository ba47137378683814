use std::str::FromStr;

use colored::Colorize;
use edit_distance::edit_distance;
use itertools::Itertools;
use num::PrimInt;

use crate::Res;

pub fn parse_int_from_str<T: PrimInt + FromStr>(as_str: &str, name: &str) -> Res<T> {
    // parse::<T>() returns a completely unbounded Err on failure,
    // so we just write the error message ourselves
    as_str
        .parse::<T>()
        .map_err(|_err| anyhow::anyhow!("Couldn't parse {name} ('{as_str}')"))
}

/// Splits a metadata line into words, keeping quoted strings (with `\`
/// escapes) together. Quotes are preserved; use [`unquote`] on the pieces.
pub fn split_unquoted_whitespace(text: &str) -> Vec<String> {
    let mut result = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut in_escape = false;

    for c in text.chars() {
        if in_escape {
            current.push(c);
            in_escape = false;
        } else if c == '\\' {
            in_escape = true;
        } else if c == '"' {
            in_quotes = !in_quotes;
            current.push(c);
        } else if c.is_whitespace() && !in_quotes {
            result.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }
    result.push(current);
    result
}

pub fn unquote(s: &str) -> &str {
    s.trim_matches('"')
}

/// Error message for a failed name lookup, listing near matches (by edit
/// distance) when there are any and the full candidate list otherwise.
pub fn unknown_name_error<'a, I: Iterator<Item = &'a str> + Clone>(
    name: &str,
    candidates: I,
    typ: &str,
) -> anyhow::Error {
    let near_matches = candidates
        .clone()
        .filter(|c| edit_distance(&c.to_ascii_lowercase(), &name.to_ascii_lowercase()) <= 3)
        .collect_vec();
    let listed = if near_matches.is_empty() {
        format!(
            "Valid {typ} names are {}",
            candidates.map(|c| format!("'{}'", c.bold())).join(", ")
        )
    } else {
        format!(
            "Perhaps you meant: {}",
            near_matches.iter().map(|c| format!("'{}'", c.bold())).join(", ")
        )
    };
    anyhow::anyhow!("Couldn't find {typ} '{}'. {listed}.", name.red())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_keeps_quoted_strings_together() {
        let words = split_unquoted_whitespace(r#"KingPos "e1" "e8""#);
        assert_eq!(words, vec!["KingPos", "\"e1\"", "\"e8\""]);
        let words = split_unquoted_whitespace(r#"Variant "Standard - Turn Zero""#);
        assert_eq!(words, vec!["Variant", "\"Standard - Turn Zero\""]);
    }

    #[test]
    fn unquote_strips_only_outer_quotes() {
        assert_eq!(unquote("\"5D\""), "5D");
        assert_eq!(unquote("5D"), "5D");
    }

    #[test]
    fn unknown_name_suggests_near_misses() {
        let err = unknown_name_error("standrad", ["standard", "other"].into_iter(), "variant");
        assert!(err.to_string().contains("standard"));
    }
}
