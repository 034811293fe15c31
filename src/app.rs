use crate::state::app_settings::AppSettings;
use crate::state::app_state::{AppState, Focus};
use crate::state::team_page::{LoadTicket, PageKey};
use cfb_api::aggregate::TeamAggregate;
use cfb_api::client::ApiError;
use cfb_api::favorites::FavoritesRegistry;
use cfb_api::store::SharedStore;
use cfb_api::style::StyleCache;
use chrono::{DateTime, Datelike, Local, TimeZone};

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
    favorites: FavoritesRegistry,
    styles: StyleCache,
}

impl App {
    pub fn new(settings: AppSettings, store: SharedStore) -> Self {
        let favorites = FavoritesRegistry::new(store.clone());
        let styles = StyleCache::new(store);

        let app = Self {
            state: AppState::new(favorites.list_favorites()),
            settings,
            favorites,
            styles,
        };

        if let Some(level) = app.settings.log_level {
            log::set_max_level(level);
            tui_logger::set_default_level(level);
        }

        app
    }

    /// First page to show: the team from the command line, else the first
    /// favorite, else nothing.
    pub fn initial_load(&mut self) -> Option<LoadTicket> {
        let season = self.settings.season.clone();
        let team_id = self
            .settings
            .team_id
            .clone()
            .or_else(|| self.state.favorites.first().map(|f| f.id.clone()))?;
        self.open_team(team_id, season)
    }

    // -----------------------------------------------------------------------
    // Page requests — each returns the load for the network worker, if any
    // -----------------------------------------------------------------------

    pub fn open_team(&mut self, team_id: String, season: Option<String>) -> Option<LoadTicket> {
        let cached = self.styles.get_cached_style(&team_id);
        let ticket = self.state.page.request(PageKey::new(team_id, season), cached)?;
        self.state.selected_standing = 0;
        self.state.last_error = None;
        Some(ticket)
    }

    pub fn reload(&mut self) -> Option<LoadTicket> {
        self.state.last_error = None;
        self.state.page.reload()
    }

    /// Step the season by `delta` years. From the provider's default season
    /// the step starts at the current one.
    pub fn change_season(&mut self, delta: i32) -> Option<LoadTicket> {
        let key = self.state.page.key()?.clone();
        let base = key
            .season
            .as_deref()
            .and_then(|s| s.parse::<i32>().ok())
            .unwrap_or_else(|| current_season_year(Local::now()));
        self.open_team(key.team_id, Some((base + delta).to_string()))
    }

    pub fn open_selected_standing(&mut self) -> Option<LoadTicket> {
        let rows = self.state.page.standings_rows()?;
        let row = rows.get(self.state.selected_standing)?;
        let season = self.state.page.key().and_then(|k| k.season.clone());
        self.open_team(row.id.clone(), season)
    }

    pub fn open_favorite(&mut self, index: usize) -> Option<LoadTicket> {
        let favorite = self.state.favorites.get(index)?.clone();
        self.state.selected_favorite = index;
        let season = self.state.page.key().and_then(|k| k.season.clone());
        self.open_team(favorite.id, season)
    }

    pub fn submit_team_input(&mut self) -> Option<LoadTicket> {
        let team_id = self.state.input.submit()?;
        let season = self.state.page.key().and_then(|k| k.season.clone());
        self.open_team(team_id, season)
    }

    // -----------------------------------------------------------------------
    // Network response handlers — called from main_ui_loop
    // -----------------------------------------------------------------------

    pub fn on_team_loaded(&mut self, epoch: u64, aggregate: TeamAggregate) -> bool {
        self.state.page.on_loaded(epoch, aggregate)
    }

    pub fn on_team_failed(&mut self, epoch: u64, error: ApiError) -> bool {
        let applied = self.state.page.on_failed(epoch, &error);
        if applied {
            self.state.last_error = Some(error.to_string());
        }
        applied
    }

    // -----------------------------------------------------------------------
    // Favorites
    // -----------------------------------------------------------------------

    /// Mark the loaded team as a favorite. A no-op for teams already marked.
    pub fn mark_favorite(&mut self) {
        let Some(profile) = self.state.page.profile() else {
            return;
        };
        let (id, name) = (profile.id.clone(), profile.abbreviation.clone());
        if self.favorites.add_favorite(&id, &name) {
            self.state.favorites = self.favorites.list_favorites();
        }
    }

    pub fn current_is_favorite(&self) -> bool {
        self.state
            .page
            .profile()
            .is_some_and(|p| self.state.is_favorite(&p.id))
    }

    // -----------------------------------------------------------------------
    // Navigation
    // -----------------------------------------------------------------------

    pub fn toggle_focus(&mut self) {
        self.state.focus = match self.state.focus {
            Focus::Standings => Focus::Favorites,
            Focus::Favorites => Focus::Standings,
        };
    }

    pub fn select_down(&mut self) {
        match self.state.focus {
            Focus::Standings => {
                let len = self.state.page.standings_rows().map_or(0, |r| r.len());
                if self.state.selected_standing + 1 < len {
                    self.state.selected_standing += 1;
                }
            }
            Focus::Favorites => {
                if self.state.selected_favorite + 1 < self.state.favorites.len() {
                    self.state.selected_favorite += 1;
                }
            }
        }
    }

    pub fn select_up(&mut self) {
        match self.state.focus {
            Focus::Standings => {
                self.state.selected_standing = self.state.selected_standing.saturating_sub(1);
            }
            Focus::Favorites => {
                self.state.selected_favorite = self.state.selected_favorite.saturating_sub(1);
            }
        }
    }

    pub fn open_selected(&mut self) -> Option<LoadTicket> {
        match self.state.focus {
            Focus::Standings => self.open_selected_standing(),
            Focus::Favorites => self.open_favorite(self.state.selected_favorite),
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_help(&mut self) {
        self.state.show_help = !self.state.show_help;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }
}

/// College football seasons are named for the year they kick off; until
/// August the provider's current season is still last year's.
fn current_season_year<Tz: TimeZone>(now: DateTime<Tz>) -> i32 {
    if now.month() >= 8 { now.year() } else { now.year() - 1 }
}
