//! Path key composition for locating values in an object graph.
//!
//! Keys are plain strings built from property names and collection indexes,
//! e.g. `Address.City` or `Items[3].Name`. The helpers here are pure string
//! composition; nothing in this module allocates state.

/// Builds the key for a named property under `parent`.
///
/// An empty `parent` yields the property name itself, and an empty `name`
/// yields the parent unchanged (a rule result with no member name addresses
/// the node itself).
///
/// # Example
///
/// ```rust
/// use walkabout::path::property_path;
///
/// assert_eq!(property_path("", "Name"), "Name");
/// assert_eq!(property_path("Addr", "City"), "Addr.City");
/// assert_eq!(property_path("Addr", ""), "Addr");
/// ```
pub fn property_path(parent: &str, name: &str) -> String {
    if name.is_empty() {
        parent.to_string()
    } else if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}.{name}")
    }
}

/// Builds the key for a collection element at `index` under `parent`.
///
/// # Example
///
/// ```rust
/// use walkabout::path::index_path;
///
/// assert_eq!(index_path("Items", 2), "Items[2]");
/// assert_eq!(index_path("", 0), "[0]");
/// ```
pub fn index_path(parent: &str, index: usize) -> String {
    format!("{parent}[{index}]")
}

/// Returns true if `key` equals `prefix` or lies underneath it.
///
/// A key lies underneath a prefix when it continues the prefix with a `.`
/// property separator or a `[` index bracket, so `"A"` covers `"A.B"` and
/// `"A[0]"` but never `"AB"`. The empty prefix covers every key.
pub fn is_prefix(prefix: &str, key: &str) -> bool {
    if prefix.is_empty() {
        return true;
    }
    if !key.starts_with(prefix) {
        return false;
    }
    key.len() == prefix.len() || matches!(key.as_bytes()[prefix.len()], b'.' | b'[')
}
