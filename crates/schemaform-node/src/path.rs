//! Dotted and bracketed data paths
//!
//! Error paths read like accessor chains: `config.hosts[2].port`.
//! The empty string is the root.

/// Append a field name to a path
///
/// # Examples
/// - `("", "name")` → `name`
/// - `("config", "host")` → `config.host`
#[inline]
#[must_use]
pub fn join_field(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}.{name}")
    }
}

/// Append a sequence index to a path
///
/// # Examples
/// - `("", 0)` → `[0]`
/// - `("hosts", 2)` → `hosts[2]`
#[inline]
#[must_use]
pub fn join_index(parent: &str, index: usize) -> String {
    format!("{parent}[{index}]")
}
