use crate::TeamStyle;
use crate::store::{KeyValueStoreExt, SharedStore};

/// Per-team display colors. The cache only seeds the first paint; colors from
/// a fresh provider response always overwrite it.
#[derive(Clone)]
pub struct StyleCache {
    store: SharedStore,
}

pub fn style_key(team_id: &str) -> String {
    format!("team_style_{team_id}")
}

impl StyleCache {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub fn get_cached_style(&self, team_id: &str) -> Option<TeamStyle> {
        self.store.get_json(&style_key(team_id))
    }

    pub fn set_style(&self, team_id: &str, style: &TeamStyle) {
        self.store.set_json(&style_key(team_id), style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{KeyValueStore, MemoryStore};
    use std::sync::Arc;

    #[test]
    fn test_style_round_trips_under_team_key() {
        let store = Arc::new(MemoryStore::new());
        let cache = StyleCache::new(store.clone());
        let style = TeamStyle::from_provider_hex("FF0000", "00FF00");

        cache.set_style("99", &style);

        assert_eq!(cache.get_cached_style("99"), Some(style));
        let raw: serde_json::Value =
            serde_json::from_str(&store.get("team_style_99").unwrap()).unwrap();
        assert_eq!(
            raw,
            serde_json::json!({"color": "#FF0000", "backgroundColor": "#00FF00"})
        );
    }

    #[test]
    fn test_set_style_overwrites() {
        let cache = StyleCache::new(Arc::new(MemoryStore::new()));
        cache.set_style("1", &TeamStyle::from_provider_hex("000000", "111111"));
        cache.set_style("1", &TeamStyle::from_provider_hex("222222", "333333"));
        assert_eq!(cache.get_cached_style("1").unwrap().color, "#222222");
    }

    #[test]
    fn test_unknown_team_has_no_style() {
        let cache = StyleCache::new(Arc::new(MemoryStore::new()));
        assert_eq!(cache.get_cached_style("404"), None);
    }
}
