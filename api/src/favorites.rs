use crate::FavoriteEntry;
use crate::store::{KeyValueStoreExt, SharedStore};
use log::debug;

pub const FAVORITES_KEY: &str = "favorites";

/// Append-only set of user-marked teams, persisted under one store key.
///
/// Every mutation is a read-modify-write of the whole list with no lock across
/// processes; two writers racing on the same store can drop an entry.
#[derive(Clone)]
pub struct FavoritesRegistry {
    store: SharedStore,
}

impl FavoritesRegistry {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Current favorites in insertion order. A missing or corrupt key is empty.
    pub fn list_favorites(&self) -> Vec<FavoriteEntry> {
        self.store
            .get_json::<Vec<FavoriteEntry>>(FAVORITES_KEY)
            .unwrap_or_default()
    }

    pub fn find(&self, team_id: &str) -> Option<FavoriteEntry> {
        self.list_favorites().into_iter().find(|f| f.id == team_id)
    }

    pub fn is_favorite(&self, team_id: &str) -> bool {
        self.find(team_id).is_some()
    }

    /// Mark a team as favorite. Returns `false` when it already was one, in
    /// which case nothing is written.
    pub fn add_favorite(&self, team_id: &str, name: &str) -> bool {
        let mut favorites = self.list_favorites();
        if favorites.iter().any(|f| f.id == team_id) {
            return false;
        }
        favorites.push(FavoriteEntry {
            id: team_id.to_owned(),
            name: name.to_owned(),
        });
        self.store.set_json(FAVORITES_KEY, &favorites);
        debug!("added favorite {name} ({team_id})");
        true
    }
}
