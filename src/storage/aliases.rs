//! Display alias store.
//!
//! Aliases override derived display names and are keyed by the
//! query-stripped path, shared across all users.

use crate::domain::{strip_query, Result};
use crate::host::SettingsStore;
use crate::storage::models::AliasMap;
use crate::storage::settings::{read_aliases, write_aliases};

/// Alias for a path, if one is stored.
#[must_use]
pub fn alias_for<'a>(map: &'a AliasMap, path: &str) -> Option<&'a str> {
    map.get(strip_query(path)).map(String::as_str)
}

/// Sets or clears the alias for a path. A blank alias deletes the
/// entry so the derived name takes over again.
pub fn set_alias(settings: &dyn SettingsStore, path: &str, alias: &str) -> Result<()> {
    let mut map = read_aliases(settings);
    let key = strip_query(path).to_string();
    let trimmed = alias.trim();
    if trimmed.is_empty() {
        map.remove(&key);
    } else {
        map.insert(key, trimmed.to_string());
    }
    write_aliases(settings, &map)
}
