use cfb_api::aggregate::TeamAggregate;
use cfb_api::client::ApiError;
use cfb_api::view::{
    self, ChartAppearance, ChartDataset, StandingsViewModel, TeamSummaryViewModel,
};
use cfb_api::{QueryParams, StandingsEntry, TeamProfile, TeamStyle};
use chrono::Local;
use log::{debug, warn};

/// Where the page is in its request/response cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PagePhase {
    /// No team chosen yet.
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed { message: String },
}

/// What the page is showing: a team, optionally pinned to a season.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageKey {
    pub team_id: String,
    pub season: Option<String>,
}

impl PageKey {
    pub fn new(team_id: impl Into<String>, season: Option<String>) -> Self {
        Self { team_id: team_id.into(), season }
    }

    pub fn query(&self) -> QueryParams {
        QueryParams::for_season(self.season.as_deref())
    }
}

/// One load handed to the network worker. The epoch ties the eventual
/// response back to the request that is still current.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    pub epoch: u64,
    pub team_id: String,
    pub query: QueryParams,
}

/// Team page state machine: `Idle → Loading → Loaded | Failed`, re-entering
/// `Loading` on every key change.
#[derive(Debug, Default)]
pub struct TeamPageState {
    pub phase: PagePhase,
    epoch: u64,
    key: Option<PageKey>,
    profile: Option<TeamProfile>,
    standings: Option<Vec<StandingsEntry>>,
    style: Option<TeamStyle>,
    standings_error: Option<String>,
    loaded_at: Option<String>,
}

impl TeamPageState {
    /// Point the page at `key`. Returns the load to run, or `None` when the
    /// page already shows (or is fetching) exactly that key.
    pub fn request(&mut self, key: PageKey, cached_style: Option<TeamStyle>) -> Option<LoadTicket> {
        let unchanged = self.key.as_ref() == Some(&key)
            && matches!(self.phase, PagePhase::Loading | PagePhase::Loaded);
        if unchanged {
            return None;
        }
        Some(self.start(key, cached_style))
    }

    /// Fetch the current key again regardless of state.
    pub fn reload(&mut self) -> Option<LoadTicket> {
        let key = self.key.clone()?;
        let style = self.style.clone();
        Some(self.start(key, style))
    }

    fn start(&mut self, key: PageKey, seed_style: Option<TeamStyle>) -> LoadTicket {
        self.epoch += 1;
        self.phase = PagePhase::Loading;
        self.profile = None;
        self.standings = None;
        self.standings_error = None;
        self.style = seed_style;

        debug!(
            "loading team {} season {:?} (epoch {})",
            key.team_id, key.season, self.epoch
        );
        let ticket = LoadTicket {
            epoch: self.epoch,
            team_id: key.team_id.clone(),
            query: key.query(),
        };
        self.key = Some(key);
        ticket
    }

    fn is_current(&self, epoch: u64) -> bool {
        if epoch != self.epoch {
            debug!("dropping stale response (epoch {epoch}, current {})", self.epoch);
            return false;
        }
        true
    }

    /// Apply a successful aggregate. Returns `false` if it was stale.
    pub fn on_loaded(&mut self, epoch: u64, aggregate: TeamAggregate) -> bool {
        if !self.is_current(epoch) {
            return false;
        }
        if let Some(err) = &aggregate.standings_error {
            warn!("showing team {} without standings: {err}", aggregate.profile.id);
        }
        self.standings_error = aggregate.standings_error.map(|e| e.to_string());
        self.style = Some(aggregate.style);
        self.standings = aggregate.standings;
        self.profile = Some(aggregate.profile);
        self.loaded_at = Some(Local::now().format("%H:%M").to_string());
        self.phase = PagePhase::Loaded;
        true
    }

    /// Apply a failed aggregate. Returns `false` if it was stale.
    pub fn on_failed(&mut self, epoch: u64, error: &ApiError) -> bool {
        if !self.is_current(epoch) {
            return false;
        }
        warn!("team page failed: {error}");
        self.profile = None;
        self.standings = None;
        self.phase = PagePhase::Failed { message: error.to_string() };
        true
    }

    pub fn key(&self) -> Option<&PageKey> {
        self.key.as_ref()
    }

    pub fn profile(&self) -> Option<&TeamProfile> {
        self.profile.as_ref()
    }

    /// Cached colors while loading, provider colors once loaded.
    pub fn style(&self) -> Option<&TeamStyle> {
        self.style.as_ref()
    }

    pub fn standings_error(&self) -> Option<&str> {
        self.standings_error.as_deref()
    }

    pub fn loaded_at(&self) -> Option<&str> {
        self.loaded_at.as_deref()
    }

    // -----------------------------------------------------------------------
    // View models — rebuilt from state on every call
    // -----------------------------------------------------------------------

    pub fn summary(&self) -> Option<TeamSummaryViewModel> {
        view::build_team_summary(self.profile.as_ref()?)
    }

    pub fn standings_rows(&self) -> Option<Vec<StandingsViewModel>> {
        self.standings.as_deref().map(view::build_standings_rows)
    }

    pub fn chart(&self) -> Option<ChartDataset> {
        let profile = self.profile.as_ref()?;
        let record = profile.season_record()?;
        let style = self.style.clone().unwrap_or_else(|| {
            TeamStyle::from_provider_hex(&profile.color, &profile.alternate_color)
        });
        Some(view::build_chart_dataset(
            &record.stats,
            &ChartAppearance::new(&profile.abbreviation, &style),
        ))
    }
}
