//! Label and URL-segment string transforms
//!
//! All functions are total: any input string yields an output string.

use once_cell::sync::Lazy;
use regex::Regex;

static ACRONYM_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Z]+)([A-Z][a-z])").expect("constant pattern"));

static CAMEL_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-z])([A-Z])").expect("constant pattern"));

/// snake_case → kebab-case (for URL segments)
#[inline]
#[must_use]
pub fn to_kebab_case(s: &str) -> String {
    s.replace('_', "-")
}

/// snake_case or kebab-case → Title Case (for labels)
///
/// Only the first character of each word is touched; the rest is kept as-is.
#[must_use]
pub fn to_title_case(s: &str) -> String {
    s.split(|c: char| c == '_' || c == '-')
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// `-` and `_` → space
#[inline]
#[must_use]
pub fn to_space_case(s: &str) -> String {
    s.replace(|c: char| c == '-' || c == '_', " ")
}

/// camelCase → kebab-case
///
/// # Examples
/// - `userId` → `user-id`
/// - `XMLParser` → `xml-parser`
/// - `max_items` → `max-items`
#[must_use]
pub fn camel_case_to_kebab_case(s: &str) -> String {
    let split = ACRONYM_BOUNDARY.replace_all(s, "$1-$2");
    let split = CAMEL_BOUNDARY.replace_all(&split, "$1-$2");
    split.replace('_', "-").to_lowercase()
}

/// Human label for a field name: `maxRetryCount` → `max retry count`
#[inline]
#[must_use]
pub fn generate_field_label(field: &str) -> String {
    to_space_case(&camel_case_to_kebab_case(field))
}

/// Drop one leading `/`
#[inline]
#[must_use]
pub fn strip_leading_slash(path: &str) -> &str {
    path.strip_prefix('/').unwrap_or(path)
}

/// Drop one trailing `/`
#[inline]
#[must_use]
pub fn strip_trailing_slash(path: &str) -> &str {
    path.strip_suffix('/').unwrap_or(path)
}

/// Join two optional URL prefixes into `/base/incoming`
///
/// Empty or absent parts are skipped; no parts yields the empty string.
#[must_use]
pub fn merge_path_prefix_options(base: Option<&str>, incoming: Option<&str>) -> String {
    let mut prefix = String::new();
    for part in [base, incoming].into_iter().flatten() {
        if part.is_empty() {
            continue;
        }
        prefix.push('/');
        prefix.push_str(strip_leading_slash(strip_trailing_slash(part)));
    }
    prefix
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kebab_from_snake() {
        assert_eq!(to_kebab_case("data_source"), "data-source");
        assert_eq!(to_kebab_case("plain"), "plain");
    }

    #[test]
    fn title_from_snake_and_kebab() {
        assert_eq!(to_title_case("data_source"), "Data Source");
        assert_eq!(to_title_case("object-store"), "Object Store");
        assert_eq!(to_title_case("pipeline"), "Pipeline");
    }

    #[test]
    fn title_keeps_inner_case() {
        assert_eq!(to_title_case("http_URL"), "Http URL");
    }

    #[test]
    fn title_of_empty_is_empty() {
        assert_eq!(to_title_case(""), "");
    }

    #[test]
    fn space_case() {
        assert_eq!(to_space_case("a-b_c"), "a b c");
    }

    #[test]
    fn camel_to_kebab() {
        assert_eq!(camel_case_to_kebab_case("userId"), "user-id");
        assert_eq!(camel_case_to_kebab_case("XMLParser"), "xml-parser");
        assert_eq!(camel_case_to_kebab_case("max_items"), "max-items");
    }

    #[test]
    fn field_label() {
        assert_eq!(generate_field_label("maxRetryCount"), "max retry count");
        assert_eq!(generate_field_label("table_name"), "table name");
    }

    #[test]
    fn slashes() {
        assert_eq!(strip_leading_slash("/api"), "api");
        assert_eq!(strip_trailing_slash("api/"), "api");
        assert_eq!(strip_leading_slash("api"), "api");
    }

    #[test]
    fn merge_prefixes() {
        assert_eq!(merge_path_prefix_options(Some("/api/"), Some("v1")), "/api/v1");
        assert_eq!(merge_path_prefix_options(None, Some("/entities")), "/entities");
        assert_eq!(merge_path_prefix_options(None, None), "");
    }
}
